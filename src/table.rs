//! Precomputed shortest snippets for moving a cell from one value to another.
//!
//! `entry(x, y)` applied to a cell holding `x` leaves the pointer on a cell
//! holding `y`. Straight runs of `+`/`-` stay on the same cell; loop
//! snippets drain the current cell into its right neighbour and finish on
//! that neighbour. A snippet only ever touches the current cell and the one
//! to its right, and expects the latter to be zero. Every snippet is
//! bracket-balanced.

use std::sync::LazyLock;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

const VALUES: usize = 256;

/// Largest step size tried for each side of a multiplicative loop.
const MAX_LOOP_STEP: usize = 40;

static GLOBAL: LazyLock<TransitionTable> = LazyLock::new(TransitionTable::build);

/// 256×256 grid of snippets, indexed `from * 256 + to`.
pub struct TransitionTable {
    entries: Vec<String>,
}

impl TransitionTable {
    /// The process-wide table, built on first use.
    pub fn global() -> &'static TransitionTable {
        &GLOBAL
    }

    /// Snippet turning a cell holding `from` into one holding `to`.
    pub fn entry(&self, from: u8, to: u8) -> &str {
        &self.entries[from as usize * VALUES + to as usize]
    }

    /// Build a fresh table. This is expensive; prefer [`TransitionTable::global`].
    pub fn build() -> Self {
        let start = Instant::now();
        let mut entries = baseline();
        let mut lens: Vec<usize> = entries.iter().map(String::len).collect();

        let mut rounds = 0;
        loop {
            rounds += 1;
            let mut changed = apply_loops(&mut entries, &mut lens);
            changed |= close_transitively(&mut entries, &mut lens);
            debug!(round = rounds, changed, "transition table round finished");
            if !changed {
                break;
            }
        }

        info!(
            rounds,
            elapsed = ?start.elapsed(),
            total_len = lens.iter().sum::<usize>(),
            "transition table built"
        );
        Self { entries }
    }
}

/// Straight runs of `+` or `-` along the shorter way round.
fn baseline() -> Vec<String> {
    let mut entries = Vec::with_capacity(VALUES * VALUES);
    for x in 0..VALUES {
        for y in 0..VALUES {
            let delta = (y + VALUES - x) % VALUES;
            if delta <= VALUES / 2 {
                entries.push("+".repeat(delta));
            } else {
                entries.push("-".repeat(VALUES - delta));
            }
        }
    }
    entries
}

/// Iterations needed to bring `x` to exactly zero by repeatedly adding
/// `step` (mod 256), giving up after one full cycle.
fn iterations_to_zero(x: usize, step: usize) -> Option<usize> {
    let mut j = x;
    let mut count = 0;
    while count < VALUES {
        if j == 0 {
            break;
        }
        j = (j + step) % VALUES;
        count += 1;
    }
    (j == 0).then_some(count)
}

fn loop_snippet(drain: char, d: usize, fill: char, n: usize) -> String {
    let mut s = String::with_capacity(d + n + 5);
    s.push('[');
    s.extend(std::iter::repeat_n(drain, d));
    s.push('>');
    s.extend(std::iter::repeat_n(fill, n));
    s.push_str("<]>");
    s
}

/// Offer `[-{d}>+{n}<]>` and its mirror `[+{d}>-{n}<]>` for every row.
fn apply_loops(entries: &mut [String], lens: &mut [usize]) -> bool {
    entries
        .par_chunks_mut(VALUES)
        .zip(lens.par_chunks_mut(VALUES))
        .enumerate()
        .map(|(x, (row, row_lens))| {
            let mut changed = false;
            for d in 1..MAX_LOOP_STEP {
                // Subtracting d is adding 256 - d.
                let down = iterations_to_zero(x, VALUES - d);
                let up = iterations_to_zero(x, d);
                for n in 1..MAX_LOOP_STEP {
                    let len = d + n + 5;
                    if let Some(k) = down {
                        let y = (k * n) % VALUES;
                        if len < row_lens[y] {
                            row[y] = loop_snippet('-', d, '+', n);
                            row_lens[y] = len;
                            changed = true;
                        }
                    }
                    if let Some(k) = up {
                        let y = (VALUES - (k * n) % VALUES) % VALUES;
                        if len < row_lens[y] {
                            row[y] = loop_snippet('+', d, '-', n);
                            row_lens[y] = len;
                            changed = true;
                        }
                    }
                }
            }
            changed
        })
        .reduce(|| false, |a, b| a | b)
}

/// Relax every entry against `entry(x, z) + entry(z, y)` until a full pass
/// finds nothing shorter. Each pass reads a snapshot of the previous one so
/// rows can be relaxed in parallel.
fn close_transitively(entries: &mut [String], lens: &mut [usize]) -> bool {
    let mut any_change = false;
    loop {
        let prev_entries = entries.to_vec();
        let prev_lens = lens.to_vec();

        let changed = entries
            .par_chunks_mut(VALUES)
            .zip(lens.par_chunks_mut(VALUES))
            .enumerate()
            .map(|(x, (row, row_lens))| {
                let mut changed = false;
                let from_x = &prev_lens[x * VALUES..(x + 1) * VALUES];
                for y in 0..VALUES {
                    let mut best = row_lens[y];
                    let mut via = None;
                    for (z, &first) in from_x.iter().enumerate() {
                        let len = first + prev_lens[z * VALUES + y];
                        if len < best {
                            best = len;
                            via = Some(z);
                        }
                    }
                    if let Some(z) = via {
                        let mut s = String::with_capacity(best);
                        s.push_str(&prev_entries[x * VALUES + z]);
                        s.push_str(&prev_entries[z * VALUES + y]);
                        row[y] = s;
                        row_lens[y] = best;
                        changed = true;
                    }
                }
                changed
            })
            .reduce(|| false, |a, b| a | b);

        if !changed {
            return any_change;
        }
        any_change = true;
    }
}
