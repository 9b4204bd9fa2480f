//! Driving Ports (API - Inbound)

use async_trait::async_trait;
use chrono::NaiveDate;
use shared_types::{Draw, DrawId, DrawState, Ticket, UserId};

use crate::domain::{DrawOutcome, DrawResult, TodayDraw, VerificationReport};

/// Lottery operations: the daily draw, ticket issuance and read projections.
#[async_trait]
pub trait LotteryApi: Send + Sync {
    /// Run the draw for the current UTC day.
    async fn run_daily_draw(&self) -> DrawResult<DrawOutcome>;

    /// Run the draw for an explicit date (catch-up, backfill).
    ///
    /// Idempotent: a date that already has a draw returns
    /// `DrawOutcome::AlreadyCompleted` and changes nothing.
    async fn run_draw_for(&self, date: NaiveDate) -> DrawResult<DrawOutcome>;

    /// Issue a ticket for the next UTC midnight's draw.
    async fn create_ticket_for_user(&self, user: UserId) -> DrawResult<Ticket>;

    /// Recorded draw for a date, `None` when no draw ran.
    async fn draw_for_date(&self, date: NaiveDate) -> DrawResult<Option<Draw>>;

    /// Summary of today's draw.
    async fn today_draw(&self) -> DrawResult<TodayDraw>;

    /// All tickets of a user, newest first.
    async fn tickets_for_user(&self, user: UserId) -> DrawResult<Vec<Ticket>>;

    /// Non-winning tickets of a user whose draw can still run: draw date
    /// today or later with no draw recorded. By draw date ascending.
    async fn active_tickets_for_user(&self, user: UserId) -> DrawResult<Vec<Ticket>>;

    /// In-process lifecycle state for a date.
    fn draw_state(&self, date: NaiveDate) -> DrawState;
}

/// Independent re-derivation of recorded draws. Never mutates state.
#[async_trait]
pub trait DrawVerifierApi: Send + Sync {
    /// Re-run the locator and selector for a draw and compare.
    async fn verify_detailed(&self, draw: DrawId) -> DrawResult<VerificationReport>;

    /// `Ok(false)` on mismatch, `Err` when verification could not run.
    async fn verify(&self, draw: DrawId) -> DrawResult<bool> {
        Ok(self.verify_detailed(draw).await?.is_valid())
    }
}
