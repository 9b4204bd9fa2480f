//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Chain**: `BlockHash`, `BlockSummary`
//! - **Lottery**: `Ticket`, `Draw`, `NewDraw`, `DrawState`
//! - **Identity**: `UserId`, `TicketId`, `DrawId`

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::EntityError;

/// Unix timestamp in seconds, as reported by block headers.
pub type Timestamp = u64;

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// Hex-encoded block hash exactly as returned by the chain-data provider.
///
/// Kept as text: the selector reads the decimal characters of this string,
/// so any normalisation (case, prefix) would change historical draws.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockHash(String);

impl BlockHash {
    /// Wrap a provider-supplied hash string.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Borrow the raw hash text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockHash {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BlockHash {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The subset of a block the draw engine needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    /// Block number (height).
    pub number: u64,
    /// Block timestamp in unix seconds.
    pub timestamp: Timestamp,
    /// Block hash.
    pub hash: BlockHash,
}

// =============================================================================
// CLUSTER B: IDENTITY
// =============================================================================

/// Owner of tickets and holder of a point balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque, unique ticket identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub Uuid);

impl TicketId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequential draw identifier assigned by the draw repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawId(pub u64);

impl fmt::Display for DrawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// CLUSTER C: THE LOTTERY
// =============================================================================

/// A lottery ticket, eligible for exactly one draw date.
///
/// `draw_id` is set only together with `is_winner`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub owner: UserId,
    pub purchased_at: DateTime<Utc>,
    /// UTC day whose draw this ticket takes part in.
    pub draw_date: NaiveDate,
    pub is_winner: bool,
    pub draw_id: Option<DrawId>,
}

impl Ticket {
    /// Create a fresh, non-winning ticket.
    pub fn new(owner: UserId, purchased_at: DateTime<Utc>, draw_date: NaiveDate) -> Self {
        Self {
            id: TicketId::generate(),
            owner,
            purchased_at,
            draw_date,
            is_winner: false,
            draw_id: None,
        }
    }

    /// Whether the ticket belongs to the cohort of `date` as of `cutoff`.
    pub fn is_eligible_for(&self, date: NaiveDate, cutoff: DateTime<Utc>) -> bool {
        self.draw_date == date && self.purchased_at <= cutoff
    }

    /// Flag as the winner of `draw`.
    pub fn mark_winner(&mut self, draw: DrawId) -> Result<(), EntityError> {
        match self.draw_id {
            Some(existing) if existing != draw => Err(EntityError::AlreadyWinner(existing)),
            _ => {
                self.is_winner = true;
                self.draw_id = Some(draw);
                Ok(())
            }
        }
    }

    /// Undo `mark_winner` (commit compensation only).
    pub fn clear_winner(&mut self) {
        self.is_winner = false;
        self.draw_id = None;
    }
}

/// Ordering used for cohort snapshots: purchase time, then id.
///
/// The winning index refers to a position in this order, so it must never
/// change for historical cohorts.
pub fn cohort_order(a: &Ticket, b: &Ticket) -> std::cmp::Ordering {
    a.purchased_at
        .cmp(&b.purchased_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// A draw that has been computed but not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDraw {
    pub draw_date: NaiveDate,
    pub block_number: u64,
    pub block_hash: BlockHash,
    pub block_timestamp: Timestamp,
    pub winning_ticket_id: TicketId,
    pub winning_index: u64,
    pub total_tickets: u64,
    /// Tickets purchased after this instant were not part of the cohort.
    pub snapshot_cutoff: DateTime<Utc>,
}

impl NewDraw {
    /// Check `0 <= winning_index < total_tickets`.
    pub fn validate(&self) -> Result<(), EntityError> {
        if self.total_tickets == 0 {
            return Err(EntityError::EmptyCohort);
        }
        if self.winning_index >= self.total_tickets {
            return Err(EntityError::WinningIndexOutOfRange {
                index: self.winning_index,
                total: self.total_tickets,
            });
        }
        Ok(())
    }

    /// Attach the repository-assigned id and creation time.
    pub fn into_draw(self, id: DrawId, created_at: DateTime<Utc>) -> Draw {
        Draw {
            id,
            draw_date: self.draw_date,
            block_number: self.block_number,
            block_hash: self.block_hash,
            block_timestamp: self.block_timestamp,
            winning_ticket_id: Some(self.winning_ticket_id),
            winning_index: Some(self.winning_index),
            total_tickets: self.total_tickets,
            snapshot_cutoff: self.snapshot_cutoff,
            created_at,
        }
    }
}

/// Immutable historical record of one draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub id: DrawId,
    /// UTC day (midnight boundary) this draw settles.
    pub draw_date: NaiveDate,
    pub block_number: u64,
    pub block_hash: BlockHash,
    pub block_timestamp: Timestamp,
    pub winning_ticket_id: Option<TicketId>,
    pub winning_index: Option<u64>,
    /// Fixed at draw time, never mutated afterwards.
    pub total_tickets: u64,
    pub snapshot_cutoff: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Draw {
    /// Whether a winner has been recorded.
    pub fn is_resolved(&self) -> bool {
        self.winning_ticket_id.is_some()
    }
}

/// Per-day lifecycle of a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawState {
    /// No draw has run (or the day had no tickets).
    NoDraw,
    /// Entropy lookup or selection in progress.
    Selecting,
    /// Draw persisted and winner credited.
    Completed,
    /// Last attempt failed; retryable on the next trigger.
    Failed,
}
