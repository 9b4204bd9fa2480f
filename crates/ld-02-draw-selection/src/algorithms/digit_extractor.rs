//! Entropy Digit Extractor
//!
//! Reads the n-th decimal character of a hash string, counting backwards
//! from its last character. Hex letters are skipped.

use crate::domain::SelectionError;

/// Number of ASCII decimal digits in `hash`.
pub fn count_digits(hash: &str) -> usize {
    hash.bytes().filter(u8::is_ascii_digit).count()
}

/// Value (0-9) of the `n`-th decimal digit from the end of `hash` (1-indexed).
///
/// When `hash` holds fewer than `n` digits, `n` is reduced modulo the digit
/// count and a zero remainder wraps to `1`, the last digit of the string.
pub fn digit_at(hash: &str, n: usize) -> Result<u8, SelectionError> {
    let digits: Vec<u8> = hash
        .bytes()
        .rev()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();

    let count = digits.len();
    if count == 0 {
        return Err(SelectionError::MalformedHash(hash.to_string()));
    }

    let position = if count < n {
        match n % count {
            0 => 1,
            rem => rem,
        }
    } else {
        n
    };

    // Position 0 never matches while scanning; fall back to the first digit
    // of the string.
    let digit = position
        .checked_sub(1)
        .and_then(|i| digits.get(i))
        .or_else(|| digits.last())
        .copied()
        .unwrap_or_default();

    Ok(digit)
}
