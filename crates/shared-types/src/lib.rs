//! # Shared Types Crate
//!
//! This crate contains the domain entities shared by every draw subsystem:
//! tickets, draws, block summaries and the UTC day arithmetic that ties a
//! ticket cohort to the block used as its entropy source.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the `Draw` record layout is defined once here
//!   so the orchestrator and the verifier cannot drift apart.
//! - **Immutable History**: a `Draw` is never mutated after creation; only
//!   compensation during a failed commit may remove it.
//! - **UTC Only**: every draw date is a UTC calendar day whose entropy target
//!   is its midnight boundary.

pub mod entities;
pub mod errors;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use time::*;
