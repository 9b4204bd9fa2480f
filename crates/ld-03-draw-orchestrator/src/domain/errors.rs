//! Error types for the Draw Orchestrator

use chrono::NaiveDate;
use ld_01_block_locator::LocatorError;
use ld_02_draw_selection::SelectionError;
use shared_types::{DrawId, EntityError, UserId};
use thiserror::Error;

/// Draw orchestration and query errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    /// Entropy block lookup failed.
    #[error(transparent)]
    Locator(#[from] LocatorError),

    /// Winner selection failed.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// A computed draw violated an entity invariant.
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// The user ledger has no such user.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// No draw with this id has been recorded.
    #[error("Draw not found: {0}")]
    DrawNotFound(DrawId),

    /// The repository already holds a draw for this date.
    #[error("A draw already exists for {date}")]
    DrawAlreadyExists {
        /// The contested date.
        date: NaiveDate,
    },

    /// The ticket snapshot does not agree with a recorded draw.
    #[error("Snapshot inconsistent: {0}")]
    SnapshotInconsistent(String),

    /// Ticket or draw store failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Points ledger failure.
    #[error("Ledger error: {0}")]
    Ledger(String),
}

impl DrawError {
    /// Whether the next scheduled attempt may succeed without operator action.
    pub fn is_transient(&self) -> bool {
        match self {
            DrawError::Locator(e) => e.is_transient(),
            DrawError::Storage(_) | DrawError::Ledger(_) => true,
            _ => false,
        }
    }

    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            DrawError::Locator(LocatorError::EntropySourceUnavailable { .. }) => {
                "entropy_source_unavailable"
            }
            DrawError::Locator(LocatorError::NoBlockAfterTarget { .. }) => "no_block_after_target",
            DrawError::Locator(LocatorError::BlockUnavailable { .. }) => "block_unavailable",
            DrawError::Selection(SelectionError::NoTicketsAvailable) => "no_tickets_available",
            DrawError::Selection(SelectionError::MalformedHash(_)) => "malformed_hash",
            DrawError::Entity(_) => "invalid_draw",
            DrawError::UserNotFound(_) => "user_not_found",
            DrawError::DrawNotFound(_) => "draw_not_found",
            DrawError::DrawAlreadyExists { .. } => "draw_already_exists",
            DrawError::SnapshotInconsistent(_) => "snapshot_inconsistent",
            DrawError::Storage(_) => "storage",
            DrawError::Ledger(_) => "ledger",
        }
    }
}

/// Result type for draw operations
pub type DrawResult<T> = Result<T, DrawError>;
