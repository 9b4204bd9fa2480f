//! Draw selection algorithms
//!
//! - `digit_extractor`: decimal digits read from the end of a hash
//! - `chunk_shuffle`: chunking and the positional chunk swap
//! - `narrowing`: halving / fractional slicing of the working set
//! - `selector`: the full pipeline

pub mod chunk_shuffle;
pub mod digit_extractor;
pub mod narrowing;
pub mod selector;

pub use chunk_shuffle::{chunk_size, shuffle_chunks, split_into_chunks, swap_target};
pub use digit_extractor::{count_digits, digit_at};
pub use narrowing::narrow;
pub use selector::{select, select_with_trace};
