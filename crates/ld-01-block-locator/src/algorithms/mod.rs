//! # Algorithms Module
//!
//! Core search algorithms for the Block Time Locator.

pub mod backoff;
pub mod block_search;

pub use backoff::with_retry;
pub use block_search::find_first_block_at_or_after;
