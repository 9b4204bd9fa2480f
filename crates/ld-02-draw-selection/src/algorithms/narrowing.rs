//! Working-set narrowing
//!
//! One round keeps part of the working set based on a single digit:
//! - length <= 4: leading slice of `max(1, floor(len * digit / 10))`
//! - otherwise: first half for digits 0-4, second half for 5-9, with the
//!   split point at `ceil(len / 2)`

/// Apply one narrowing round.
pub fn narrow(working: &[u64], digit: u8) -> &[u64] {
    let len = working.len();
    if len <= 1 {
        return working;
    }

    if len <= 4 {
        let keep = (len * usize::from(digit) / 10).max(1);
        return &working[..keep.min(len)];
    }

    let mid = len.div_ceil(2);
    if digit >= 5 {
        &working[mid..]
    } else {
        &working[..mid]
    }
}
