//! # Error Types
//!
//! Errors raised when an entity invariant would be broken.

use thiserror::Error;

use crate::entities::DrawId;

/// Entity invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// `0 <= winning_index < total_tickets` does not hold.
    #[error("Winning index {index} out of range for {total} tickets")]
    WinningIndexOutOfRange { index: u64, total: u64 },

    /// A draw must cover at least one ticket.
    #[error("Draw cannot be created for an empty cohort")]
    EmptyCohort,

    /// The ticket is already linked to a different draw.
    #[error("Ticket already won draw {0}")]
    AlreadyWinner(DrawId),
}
