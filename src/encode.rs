use crate::error::EncodeError;
use crate::table::TransitionTable;

/// Synthesize a program whose output is exactly `text`.
///
/// Each character is reached either from the previously printed value or
/// from a fresh zero cell to the right, whichever is shorter. The result
/// always compiles.
pub fn encode(text: &str) -> Result<String, EncodeError> {
    let table = TransitionTable::global();
    let mut program = String::new();
    let mut last: u8 = 0;

    for (position, ch) in text.chars().enumerate() {
        let target =
            u8::try_from(u32::from(ch)).map_err(|_| EncodeError::UnencodableChar { ch, position })?;

        let from_last = table.entry(last, target);
        let from_fresh = table.entry(0, target);
        if from_last.len() <= from_fresh.len() + 1 {
            program.push_str(from_last);
        } else {
            program.push('>');
            program.push_str(from_fresh);
        }
        program.push('.');
        last = target;
    }

    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::vm::execute;

    fn round_trip(text: &str) -> String {
        let program = compile(&encode(text).unwrap()).unwrap();
        execute(&program, &[]).unwrap().output
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(encode("").unwrap(), "");
        assert_eq!(round_trip(""), "");
    }

    #[test]
    fn test_repeated_char_reuses_cell() {
        let program = encode("aaa").unwrap();
        assert!(program.ends_with("..."));
    }

    #[test]
    fn test_round_trip_ascii() {
        let text = "Hello, World!\nThe quick brown fox jumps over the lazy dog 0123456789";
        assert_eq!(round_trip(text), text);
    }

    #[test]
    fn test_round_trip_every_byte() {
        let text: String = (0..=255u8).map(char::from).collect();
        assert_eq!(round_trip(&text), text);
        let reversed: String = text.chars().rev().collect();
        assert_eq!(round_trip(&reversed), reversed);
    }

    #[test]
    fn test_beats_naive_output() {
        let text = "~~~";
        // The naive program spells each byte with plain '+' runs.
        assert!(encode(text).unwrap().len() < '~' as usize);
    }

    #[test]
    fn test_rejects_wide_chars() {
        assert_eq!(
            encode("ab€"),
            Err(EncodeError::UnencodableChar { ch: '€', position: 2 })
        );
        assert!(encode("ÿ").is_ok());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::compile::compile;
    use crate::vm::execute;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn encoded_programs_print_their_text(bytes in prop::collection::vec(any::<u8>(), 0..48)) {
            let text: String = bytes.into_iter().map(char::from).collect();
            let program = compile(&encode(&text).unwrap()).unwrap();
            let result = execute(&program, &[]).unwrap();
            prop_assert_eq!(result.output, text);
        }
    }
}
