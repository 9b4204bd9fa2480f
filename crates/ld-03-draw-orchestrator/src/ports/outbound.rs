//! Driven Ports (SPI - Outbound Dependencies)
//!
//! The ticket store, draw repository and points ledger are owned by other
//! systems. None of them offers a transaction spanning all three, so the
//! orchestrator commits in a fixed order and compensates on failure.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use shared_types::{Draw, DrawId, NewDraw, Ticket, TicketId, UserId};

use crate::domain::DrawResult;

/// Ticket persistence.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Cohort for `date`: tickets with that draw date purchased at or before
    /// `cutoff`, sorted by `shared_types::cohort_order`.
    async fn tickets_eligible_for(
        &self,
        date: NaiveDate,
        cutoff: DateTime<Utc>,
    ) -> DrawResult<Vec<Ticket>>;

    /// Flag a ticket as the winner of a draw.
    async fn mark_winner(&self, ticket: TicketId, draw: DrawId) -> DrawResult<()>;

    /// Undo `mark_winner` (compensation).
    async fn clear_winner(&self, ticket: TicketId) -> DrawResult<()>;

    /// Persist a new ticket.
    async fn create(
        &self,
        owner: UserId,
        purchased_at: DateTime<Utc>,
        draw_date: NaiveDate,
    ) -> DrawResult<Ticket>;

    /// Every ticket of a user, in any order.
    async fn tickets_for_user(&self, owner: UserId) -> DrawResult<Vec<Ticket>>;
}

/// Draw persistence. At most one draw per date.
#[async_trait]
pub trait DrawRepository: Send + Sync {
    /// Assign an id and store. Fails with `DrawAlreadyExists` when the date
    /// already has a draw.
    async fn insert(&self, draw: NewDraw, created_at: DateTime<Utc>) -> DrawResult<Draw>;

    /// Draw by id.
    async fn find_by_id(&self, id: DrawId) -> DrawResult<Option<Draw>>;

    /// Draw recorded for a date.
    async fn find_by_date(&self, date: NaiveDate) -> DrawResult<Option<Draw>>;

    /// Remove a draw (compensation only).
    async fn delete(&self, id: DrawId) -> DrawResult<()>;
}

/// Points ledger for users.
#[async_trait]
pub trait UserLedger: Send + Sync {
    /// Whether the ledger knows the user.
    async fn user_exists(&self, user: UserId) -> DrawResult<bool>;

    /// Add `amount` points. Fails with `UserNotFound` for unknown users.
    async fn credit_points(&self, user: UserId, amount: u64) -> DrawResult<()>;
}
