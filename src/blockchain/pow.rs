use std::sync::atomic::{AtomicBool, Ordering};

use crate::hash::fast_digest;

/// Required hex prefix of the puzzle digest (16 leading zero bits).
pub const DEFAULT_POW_PREFIX: &str = "0000";

/// How many attempts run between two looks at the cancellation flag.
const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Fast digest of the decimal rendering of `value`.
pub fn puzzle_digest(value: u64) -> String {
    fast_digest(value.to_string().as_bytes())
}

/// Does `nonce` solve the puzzle for `prefix`?
pub fn meets_prefix(nonce: u64, prefix: &str) -> bool {
    puzzle_digest(nonce).starts_with(prefix)
}

/// Find the smallest `solution >= 1` such that the puzzle digest of
/// `seed + solution` satisfies `is_solved`. Unbounded: it only returns once
/// a solution exists.
pub fn solve<F>(seed: u64, is_solved: F) -> u64
where
    F: Fn(&str) -> bool,
{
    let mut solution: u64 = 1;
    loop {
        if is_solved(&puzzle_digest(seed.wrapping_add(solution))) {
            return solution;
        }
        solution = solution.wrapping_add(1);
    }
}

pub fn solve_with_prefix(seed: u64, prefix: &str) -> u64 {
    solve(seed, |digest| digest.starts_with(prefix))
}

/// Same search as [`solve`], but gives up with `None` once `cancel` is set.
/// A solution found before the flag is observed is still returned.
pub fn solve_cancellable<F>(seed: u64, is_solved: F, cancel: &AtomicBool) -> Option<u64>
where
    F: Fn(&str) -> bool,
{
    let mut solution: u64 = 1;
    loop {
        if solution % CANCEL_CHECK_INTERVAL == 1 && cancel.load(Ordering::Relaxed) {
            return None;
        }
        if is_solved(&puzzle_digest(seed.wrapping_add(solution))) {
            return Some(solution);
        }
        solution = solution.wrapping_add(1);
    }
}
