//! Value objects for Draw Selection

use serde::{Deserialize, Serialize};

/// Lower bound on the chunk size used for the shuffle.
pub const MIN_CHUNK_SIZE: u64 = 5;

/// Upper bound on the chunk size used for the shuffle.
pub const MAX_CHUNK_SIZE: u64 = 20;

/// Ticket count is divided by this before clamping to the chunk bounds.
pub const CHUNK_DIVISOR: u64 = 5;

/// Once the digit position passes this bound the first survivor wins.
pub const MAX_DIGIT_POSITION: usize = 20;

/// Audit record of how a winner was narrowed down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionTrace {
    /// Chunk size used for the shuffle.
    pub chunk_size: u64,
    /// Number of chunks before shuffling.
    pub chunk_count: u64,
    /// Digit #1 from the end of the hash, drives the shuffle.
    pub shuffle_digit: u8,
    /// Digits consumed by the narrowing rounds, in order (positions 2, 3, ...).
    pub narrowing_digits: Vec<u8>,
    /// Working-set length after each narrowing round.
    pub working_set_sizes: Vec<u64>,
    /// True when the position bound cut the working set to its first element.
    pub forced_termination: bool,
}

/// Outcome of a draw selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawSelection {
    /// 0-based index into the cohort.
    pub winning_index: u64,
    /// Cohort size the index refers to.
    pub total_tickets: u64,
    /// How the index was reached.
    pub trace: SelectionTrace,
}
