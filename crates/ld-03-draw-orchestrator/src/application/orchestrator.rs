//! Draw Orchestrator Service
//!
//! Runs one draw per UTC day:
//! 1. Snapshot the cohort as of now (the cutoff is recorded on the draw)
//! 2. Locate the first block at or after the day's midnight
//! 3. Select the winning index from the block hash
//! 4. Commit: insert draw, flag winner, credit points
//!
//! The three commit steps live in different stores. They run in that order
//! and each failure undoes the steps before it, so a day either has a
//! complete draw or none at all.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use ld_01_block_locator::BlockTimeLocatorApi;
use ld_02_draw_selection::select_with_trace;
use parking_lot::RwLock;
use shared_types::{
    current_draw_date, draw_timestamp, next_draw_date, next_midnight, Draw, DrawState, NewDraw,
    Ticket, TimeSource, UserId,
};
use tokio::sync::Mutex;

use crate::config::DrawConfig;
use crate::domain::{DrawError, DrawEvent, DrawOutcome, DrawResult, DrawStateBook, TodayDraw};
use crate::ports::{DrawRepository, LotteryApi, TicketStore, UserLedger};

/// Collaborators shared by the orchestrator and the verifier.
#[derive(Clone)]
pub struct DrawDependencies {
    /// Entropy block lookup.
    pub locator: Arc<dyn BlockTimeLocatorApi>,
    /// Ticket persistence; source of every cohort.
    pub tickets: Arc<dyn TicketStore>,
    /// Draw records, one per date.
    pub draws: Arc<dyn DrawRepository>,
    /// User existence and points.
    pub ledger: Arc<dyn UserLedger>,
    /// Wall clock for cutoffs, draw dates and record timestamps.
    pub clock: Arc<dyn TimeSource>,
}

/// Draw Orchestrator - the daily batch and the lottery read model.
pub struct DrawOrchestrator {
    config: DrawConfig,
    deps: DrawDependencies,
    /// Serialises draw runs in this process.
    run_lock: Mutex<()>,
    states: RwLock<DrawStateBook>,
}

impl DrawOrchestrator {
    /// Orchestrator with an empty per-date state book.
    pub fn new(config: DrawConfig, deps: DrawDependencies) -> Self {
        Self {
            config,
            deps,
            run_lock: Mutex::new(()),
            states: RwLock::new(DrawStateBook::new()),
        }
    }

    /// Reward and other draw settings in effect.
    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    fn transition(&self, date: NaiveDate, event: DrawEvent) -> DrawState {
        self.states.write().apply(date, event)
    }

    /// Snapshot, locate, select and commit. Caller holds the run lock.
    async fn attempt(&self, date: NaiveDate) -> DrawResult<DrawOutcome> {
        let cutoff = self.deps.clock.now();
        let cohort = self.deps.tickets.tickets_eligible_for(date, cutoff).await?;

        if cohort.is_empty() {
            tracing::info!(draw_date = %date, "No tickets for draw date, skipping");
            return Ok(DrawOutcome::Skipped { date });
        }

        let total_tickets = cohort.len() as u64;
        let target = draw_timestamp(date);
        tracing::info!(
            draw_date = %date,
            ticket_count = total_tickets,
            target,
            cutoff = %cutoff,
            "Starting draw"
        );

        let block = self.deps.locator.locate(target).await?;
        let selection = select_with_trace(total_tickets, block.hash.as_str())?;

        let winner = usize::try_from(selection.winning_index)
            .ok()
            .and_then(|index| cohort.get(index))
            .ok_or_else(|| {
                DrawError::SnapshotInconsistent(format!(
                    "index {} outside cohort of {}",
                    selection.winning_index, total_tickets
                ))
            })?;

        tracing::info!(
            draw_date = %date,
            block_number = block.number,
            block_hash = %block.hash,
            winning_index = selection.winning_index,
            ticket_id = %winner.id,
            shuffle_digit = selection.trace.shuffle_digit,
            narrowing_rounds = selection.trace.narrowing_digits.len(),
            forced_termination = selection.trace.forced_termination,
            "Winner selected"
        );

        let new_draw = NewDraw {
            draw_date: date,
            block_number: block.number,
            block_hash: block.hash.clone(),
            block_timestamp: block.timestamp,
            winning_ticket_id: winner.id,
            winning_index: selection.winning_index,
            total_tickets,
            snapshot_cutoff: cutoff,
        };
        new_draw.validate()?;

        let draw = self.commit(new_draw, winner).await?;

        Ok(DrawOutcome::Completed {
            draw,
            winner: winner.owner,
            locator_round_trips: block.round_trips,
            forced_termination: selection.trace.forced_termination,
        })
    }

    /// Insert draw → mark winner → credit points, compensating on failure.
    async fn commit(&self, new_draw: NewDraw, winner: &Ticket) -> DrawResult<Draw> {
        let draw = self.deps.draws.insert(new_draw, self.deps.clock.now()).await?;

        if let Err(e) = self.deps.tickets.mark_winner(winner.id, draw.id).await {
            tracing::warn!(
                draw_id = %draw.id,
                ticket_id = %winner.id,
                error = %e,
                "Marking winner failed, removing draw"
            );
            self.remove_draw(&draw).await;
            return Err(e);
        }

        let reward = self.config.winning_reward;
        if let Err(e) = self.deps.ledger.credit_points(winner.owner, reward).await {
            tracing::warn!(
                draw_id = %draw.id,
                user_id = %winner.owner,
                error = %e,
                "Crediting winner failed, clearing winner flag and removing draw"
            );
            if let Err(undo) = self.deps.tickets.clear_winner(winner.id).await {
                tracing::error!(
                    ticket_id = %winner.id,
                    error = %undo,
                    "Compensation failed: winner flag left set"
                );
            }
            self.remove_draw(&draw).await;
            return Err(e);
        }

        tracing::info!(
            draw_id = %draw.id,
            draw_date = %draw.draw_date,
            user_id = %winner.owner,
            reward,
            "Draw committed"
        );
        Ok(draw)
    }

    async fn remove_draw(&self, draw: &Draw) {
        if let Err(e) = self.deps.draws.delete(draw.id).await {
            tracing::error!(
                draw_id = %draw.id,
                error = %e,
                "Compensation failed: draw record left in place"
            );
        }
    }

    async fn ensure_user(&self, user: UserId) -> DrawResult<()> {
        if self.deps.ledger.user_exists(user).await? {
            Ok(())
        } else {
            Err(DrawError::UserNotFound(user))
        }
    }
}

#[async_trait]
impl LotteryApi for DrawOrchestrator {
    async fn run_daily_draw(&self) -> DrawResult<DrawOutcome> {
        let today = current_draw_date(self.deps.clock.now());
        self.run_draw_for(today).await
    }

    async fn run_draw_for(&self, date: NaiveDate) -> DrawResult<DrawOutcome> {
        let _run = self.run_lock.lock().await;

        if let Some(existing) = self.deps.draws.find_by_date(date).await? {
            self.transition(date, DrawEvent::Recorded);
            tracing::info!(draw_date = %date, draw_id = %existing.id, "Draw already recorded");
            return Ok(DrawOutcome::AlreadyCompleted(existing));
        }

        self.transition(date, DrawEvent::Triggered);

        match self.attempt(date).await {
            Ok(outcome) => {
                let event = match &outcome {
                    DrawOutcome::Skipped { .. } => DrawEvent::Skipped,
                    _ => DrawEvent::Committed,
                };
                self.transition(date, event);
                Ok(outcome)
            }
            // Another writer recorded the date between our check and insert.
            Err(DrawError::DrawAlreadyExists { .. }) => {
                let existing = self
                    .deps
                    .draws
                    .find_by_date(date)
                    .await?
                    .ok_or_else(|| DrawError::Storage(format!("draw for {} vanished", date)))?;
                self.transition(date, DrawEvent::Recorded);
                Ok(DrawOutcome::AlreadyCompleted(existing))
            }
            Err(e) => {
                self.transition(date, DrawEvent::Failed);
                tracing::error!(
                    draw_date = %date,
                    error = %e,
                    reason = e.reason(),
                    transient = e.is_transient(),
                    "Draw attempt failed"
                );
                Err(e)
            }
        }
    }

    async fn create_ticket_for_user(&self, user: UserId) -> DrawResult<Ticket> {
        self.ensure_user(user).await?;

        let now = self.deps.clock.now();
        let ticket = self
            .deps
            .tickets
            .create(user, now, next_draw_date(now))
            .await?;

        tracing::debug!(
            user_id = %user,
            ticket_id = %ticket.id,
            draw_date = %ticket.draw_date,
            "Ticket created"
        );
        Ok(ticket)
    }

    async fn draw_for_date(&self, date: NaiveDate) -> DrawResult<Option<Draw>> {
        self.deps.draws.find_by_date(date).await
    }

    async fn today_draw(&self) -> DrawResult<TodayDraw> {
        let now = self.deps.clock.now();
        let today = current_draw_date(now);
        let draw = self.deps.draws.find_by_date(today).await?;

        let participating_tickets = match &draw {
            Some(draw) => draw.total_tickets,
            None => self.deps.tickets.tickets_eligible_for(today, now).await?.len() as u64,
        };

        Ok(TodayDraw {
            draw_date: today,
            is_draw_complete: draw.as_ref().is_some_and(Draw::is_resolved),
            draw,
            next_draw_time: next_midnight(now),
            participating_tickets,
        })
    }

    async fn tickets_for_user(&self, user: UserId) -> DrawResult<Vec<Ticket>> {
        self.ensure_user(user).await?;

        let mut tickets = self.deps.tickets.tickets_for_user(user).await?;
        tickets.sort_by(|a, b| {
            b.purchased_at
                .cmp(&a.purchased_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(tickets)
    }

    async fn active_tickets_for_user(&self, user: UserId) -> DrawResult<Vec<Ticket>> {
        let tickets = self.deps.tickets.tickets_for_user(user).await?;
        // Only today's date is ever drawn; an earlier date without a draw
        // was skipped or given up on.
        let today = current_draw_date(self.deps.clock.now());

        let mut drawn: HashMap<NaiveDate, bool> = HashMap::new();
        let mut active = Vec::new();
        for ticket in tickets
            .into_iter()
            .filter(|t| !t.is_winner && t.draw_date >= today)
        {
            let has_draw = match drawn.get(&ticket.draw_date) {
                Some(known) => *known,
                None => {
                    let found = self
                        .deps
                        .draws
                        .find_by_date(ticket.draw_date)
                        .await?
                        .is_some();
                    drawn.insert(ticket.draw_date, found);
                    found
                }
            };
            if !has_draw {
                active.push(ticket);
            }
        }

        active.sort_by(|a, b| {
            a.draw_date
                .cmp(&b.draw_date)
                .then_with(|| a.purchased_at.cmp(&b.purchased_at))
        });
        Ok(active)
    }

    fn draw_state(&self, date: NaiveDate) -> DrawState {
        self.states.read().state(date)
    }
}
