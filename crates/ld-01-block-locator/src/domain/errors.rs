//! # Domain Errors
//!
//! Error types for the Block Time Locator.

use shared_types::Timestamp;
use thiserror::Error;

/// Failure of a single chain-data provider call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Transport-level failure (connection refused, timeout, TLS...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Provider message
        message: String,
    },

    /// The response could not be decoded.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Block Time Locator error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    /// Provider unreachable after the retry budget was spent.
    #[error("Entropy source unavailable after {attempts} attempts: {reason}")]
    EntropySourceUnavailable {
        /// Attempts made for the failing call
        attempts: u32,
        /// Last provider error
        reason: String,
    },

    /// The chain tip is older than the target instant.
    #[error("No block at or after timestamp {target} (tip timestamp {tip_timestamp})")]
    NoBlockAfterTarget {
        /// Requested instant
        target: Timestamp,
        /// Timestamp of the latest block
        tip_timestamp: Timestamp,
    },

    /// The converged block could not be fetched.
    #[error("Block {number} unavailable from provider")]
    BlockUnavailable {
        /// Block number the search converged to
        number: u64,
    },
}

impl LocatorError {
    /// Whether retrying later may succeed.
    ///
    /// Every locator failure is transient: the chain keeps growing and
    /// providers come back. None of them may be papered over with a
    /// substitute entropy value.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LocatorError::EntropySourceUnavailable { .. }
                | LocatorError::NoBlockAfterTarget { .. }
                | LocatorError::BlockUnavailable { .. }
        )
    }
}
