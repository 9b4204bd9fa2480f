//! # Domain Value Objects
//!
//! Immutable value types for the Block Time Locator.

use serde::{Deserialize, Serialize};
use shared_types::{BlockHash, BlockSummary, Timestamp};

/// Result of a successful lookup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocatedBlock {
    /// Lowest block number whose timestamp is at or after the target.
    pub number: u64,
    /// Hash of that block (the entropy hash).
    pub hash: BlockHash,
    /// Timestamp of that block.
    pub timestamp: Timestamp,
    /// Target the search ran against.
    pub target: Timestamp,
    /// Provider round-trips spent (excluding retries).
    pub round_trips: u32,
}

impl LocatedBlock {
    /// Build from the converged block.
    pub fn from_summary(block: BlockSummary, target: Timestamp, round_trips: u32) -> Self {
        Self {
            number: block.number,
            hash: block.hash,
            timestamp: block.timestamp,
            target,
            round_trips,
        }
    }
}

/// Inclusive search interval over block numbers.
///
/// `low` may end up one past `high`; the search has converged when it does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchWindow {
    /// Lowest candidate.
    pub low: u64,
    /// Highest candidate (`None` once the window fell below block 0).
    pub high: Option<u64>,
}

impl SearchWindow {
    /// Window over `[0, latest]`.
    pub fn new(latest: u64) -> Self {
        Self {
            low: 0,
            high: Some(latest),
        }
    }

    /// Midpoint candidate, or `None` once converged.
    pub fn midpoint(&self) -> Option<u64> {
        let high = self.high?;
        if self.low > high {
            return None;
        }
        Some(self.low + (high - self.low) / 2)
    }

    /// Candidate is before the target: keep the upper half.
    pub fn raise_low(&mut self, mid: u64) {
        self.low = mid + 1;
    }

    /// Candidate is at/after the target (or missing): keep the lower half.
    pub fn lower_high(&mut self, mid: u64) {
        self.high = mid.checked_sub(1);
    }
}
