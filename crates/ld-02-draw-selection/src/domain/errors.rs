//! Error types for Draw Selection

use thiserror::Error;

/// Errors that can occur while selecting a winner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The cohort is empty; there is nothing to draw.
    #[error("No tickets available for drawing")]
    NoTicketsAvailable,

    /// The entropy hash contains no decimal digit characters.
    #[error("Malformed entropy hash (no decimal digits): {0:?}")]
    MalformedHash(String),
}
