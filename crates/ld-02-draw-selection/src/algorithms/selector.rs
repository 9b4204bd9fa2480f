//! Deterministic Selector
//!
//! `(ticket_count, entropy_hash) -> winning_index`, a pure function.
//!
//! # Pipeline
//! 1. Build `1..=ticket_count` and cut it into chunks
//! 2. Shuffle the chunks with digit #1 from the end of the hash
//! 3. Flatten into the working set
//! 4. Narrow with digits #2, #3, ... until one value survives; past
//!    position 20 the first survivor is kept
//! 5. Winning index = survivor - 1

use crate::algorithms::chunk_shuffle::{chunk_size, shuffle_chunks, split_into_chunks};
use crate::algorithms::digit_extractor::digit_at;
use crate::algorithms::narrowing::narrow;
use crate::domain::{DrawSelection, SelectionError, SelectionTrace, MAX_DIGIT_POSITION};

/// Select the 0-based winning index for a cohort of `ticket_count` tickets.
pub fn select(ticket_count: u64, entropy_hash: &str) -> Result<u64, SelectionError> {
    select_with_trace(ticket_count, entropy_hash).map(|selection| selection.winning_index)
}

/// Select the winning index and keep the audit trace.
pub fn select_with_trace(
    ticket_count: u64,
    entropy_hash: &str,
) -> Result<DrawSelection, SelectionError> {
    if ticket_count == 0 {
        return Err(SelectionError::NoTicketsAvailable);
    }

    let size = chunk_size(ticket_count);
    let chunks = split_into_chunks(ticket_count, size);
    let chunk_count = chunks.len() as u64;

    let shuffle_digit = digit_at(entropy_hash, 1)?;
    let mut working = shuffle_chunks(chunks, shuffle_digit);

    let mut position = 2usize;
    let mut narrowing_digits = Vec::new();
    let mut working_set_sizes = Vec::new();
    let mut forced_termination = false;

    while working.len() > 1 {
        let digit = digit_at(entropy_hash, position)?;
        working = narrow(&working, digit).to_vec();
        narrowing_digits.push(digit);
        working_set_sizes.push(working.len() as u64);

        position += 1;
        if position > MAX_DIGIT_POSITION {
            if working.len() > 1 {
                forced_termination = true;
                tracing::debug!(
                    ticket_count,
                    remaining = working.len(),
                    "Digit positions exhausted, keeping first survivor"
                );
            }
            working.truncate(1);
        }
    }

    // `narrow` never empties a non-empty set and the shuffle keeps every
    // ticket, so exactly one survivor remains.
    let survivor = working.first().copied().unwrap_or(1);

    Ok(DrawSelection {
        winning_index: survivor - 1,
        total_tickets: ticket_count,
        trace: SelectionTrace {
            chunk_size: size,
            chunk_count,
            shuffle_digit,
            narrowing_digits,
            working_set_sizes,
            forced_termination,
        },
    })
}
