/// Characters whose consecutive repeats collapse into `<char><count>`.
fn is_quantifiable(c: char) -> bool {
    matches!(c, '<' | '>' | '+' | '-' | ',' | '.')
}

/// Brackets and run-length digits survive shortening one by one.
fn is_passthrough(c: char) -> bool {
    matches!(c, '[' | ']') || c.is_ascii_digit()
}

/// Run-length compress program text for display.
///
/// Runs of `<>+-,.` longer than one become the character followed by the
/// run length. Brackets and digits pass through one by one; everything else
/// is dropped before runs are counted, so comments never split a run. The
/// result is not valid program text, and shortening it again is a no-op.
pub fn shorten(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text
        .chars()
        .filter(|&c| is_quantifiable(c) || is_passthrough(c))
        .peekable();

    while let Some(c) = chars.next() {
        if !is_quantifiable(c) {
            out.push(c);
            continue;
        }
        let mut run = 1;
        while chars.next_if_eq(&c).is_some() {
            run += 1;
        }
        out.push(c);
        if run > 1 {
            out.push_str(&run.to_string());
        }
    }

    out
}
