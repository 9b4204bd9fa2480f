//! # LD-02: Draw Selection Subsystem
//!
//! Deterministic winner selection: a block hash and a ticket count map to
//! exactly one 0-based ticket index, with no hidden state. Anyone holding the
//! recorded hash and cohort size can re-derive the winner.
//!
//! ## Architecture
//!
//! - **Domain**: `DrawSelection`, `SelectionTrace`, `SelectionError`, constants
//! - **Algorithms**: digit extraction, chunk shuffle, narrowing, selector
//!
//! ## Fairness
//!
//! The chunk swap and the narrowing rounds are not uniformly distributed.
//! They are preserved exactly so historical draws keep verifying; see
//! `algorithms::chunk_shuffle`.

pub mod algorithms;
pub mod domain;

pub use algorithms::{chunk_size, count_digits, digit_at, narrow, select, select_with_trace};
pub use domain::errors::SelectionError;
pub use domain::value_objects::*;
