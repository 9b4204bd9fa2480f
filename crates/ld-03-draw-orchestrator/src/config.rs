//! # Draw Configuration

use serde::{Deserialize, Serialize};

/// Points credited to a winner when none is configured.
pub const DEFAULT_WINNING_REWARD: u64 = 100;

/// Draw orchestrator configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawConfig {
    /// Points credited to the owner of the winning ticket.
    pub winning_reward: u64,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            winning_reward: DEFAULT_WINNING_REWARD,
        }
    }
}

impl DrawConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self { winning_reward: 10 }
    }
}
