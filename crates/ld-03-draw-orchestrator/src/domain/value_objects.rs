//! Value objects for the Draw Orchestrator

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{BlockHash, Draw, DrawId, UserId};

/// Result of one orchestrator run for a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOutcome {
    /// The cohort was empty; no draw recorded.
    Skipped {
        /// The empty draw date.
        date: NaiveDate,
    },
    /// A draw for the date already existed; nothing changed.
    AlreadyCompleted(Draw),
    /// A new draw was committed.
    Completed {
        /// The committed record.
        draw: Draw,
        /// Owner of the winning ticket, already credited.
        winner: UserId,
        /// Provider round-trips spent locating the entropy block.
        locator_round_trips: u32,
        /// Whether the selector hit its position bound.
        forced_termination: bool,
    },
}

impl DrawOutcome {
    /// The recorded draw, if any.
    pub fn draw(&self) -> Option<&Draw> {
        match self {
            DrawOutcome::Skipped { .. } => None,
            DrawOutcome::AlreadyCompleted(draw) | DrawOutcome::Completed { draw, .. } => Some(draw),
        }
    }

    /// Whether this run committed a new draw.
    pub fn is_completed(&self) -> bool {
        matches!(self, DrawOutcome::Completed { .. })
    }
}

/// Projection behind "today's draw".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayDraw {
    /// Current UTC date.
    pub draw_date: NaiveDate,
    /// Today's draw once it has run.
    pub draw: Option<Draw>,
    /// Next UTC midnight.
    pub next_draw_time: DateTime<Utc>,
    /// Today's draw is recorded and resolved.
    pub is_draw_complete: bool,
    /// Tickets in today's cohort (the recorded total once drawn).
    pub participating_tickets: u64,
}

/// Outcome of re-deriving a recorded draw.
///
/// A mismatch is an expected result (reorganisation or tampering), not an
/// error; entropy-source failures surface as `Err` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Draw that was re-derived.
    pub draw_id: DrawId,
    /// Its draw date.
    pub draw_date: NaiveDate,
    /// Hash stored on the draw.
    pub recorded_block_hash: BlockHash,
    /// Hash of the block located now.
    pub recomputed_block_hash: BlockHash,
    /// Number of the block located now.
    pub recomputed_block_number: u64,
    /// Index derived from the recomputed hash and the recorded total
    /// (`None` when the recorded total is zero or the re-read cohort does
    /// not have that many tickets).
    pub recomputed_index: Option<u64>,
    /// Recorded and recomputed hashes agree.
    pub block_hash_matches: bool,
    /// Recomputed index and its cohort ticket agree with the record.
    pub winner_matches: bool,
    /// Re-read cohort has exactly `total_tickets` tickets.
    pub cohort_size_matches: bool,
}

impl VerificationReport {
    /// Every check passed.
    pub fn is_valid(&self) -> bool {
        self.block_hash_matches && self.winner_matches && self.cohort_size_matches
    }
}
