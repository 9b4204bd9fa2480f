//! In-memory adapters
//!
//! Back the store ports with `parking_lot` maps. Used by tests, the demo
//! runtime and backfill tooling. Each adapter can be told to fail its
//! mutating call so commit compensation can be exercised.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use shared_types::{cohort_order, Draw, DrawId, NewDraw, Ticket, TicketId, UserId};

use crate::domain::{DrawError, DrawResult};
use crate::ports::{DrawRepository, TicketStore, UserLedger};

// =============================================================================
// Tickets
// =============================================================================

#[derive(Debug, Default)]
struct TicketState {
    tickets: HashMap<TicketId, Ticket>,
    fail_mark_winner: bool,
}

/// In-memory ticket store.
#[derive(Debug, Default)]
pub struct InMemoryTicketStore {
    state: RwLock<TicketState>,
}

impl InMemoryTicketStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fully-formed ticket (seeding).
    pub fn insert(&self, ticket: Ticket) {
        self.state.write().tickets.insert(ticket.id, ticket);
    }

    /// Make `mark_winner` fail with a storage error.
    pub fn fail_mark_winner(&self, fail: bool) {
        self.state.write().fail_mark_winner = fail;
    }

    /// Ticket by id.
    pub fn get(&self, id: TicketId) -> Option<Ticket> {
        self.state.read().tickets.get(&id).cloned()
    }

    /// Number of stored tickets.
    pub fn len(&self) -> usize {
        self.state.read().tickets.len()
    }

    /// No tickets stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every winning ticket.
    pub fn winners(&self) -> Vec<Ticket> {
        self.state
            .read()
            .tickets
            .values()
            .filter(|t| t.is_winner)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn tickets_eligible_for(
        &self,
        date: NaiveDate,
        cutoff: DateTime<Utc>,
    ) -> DrawResult<Vec<Ticket>> {
        let mut cohort: Vec<Ticket> = self
            .state
            .read()
            .tickets
            .values()
            .filter(|t| t.is_eligible_for(date, cutoff))
            .cloned()
            .collect();
        cohort.sort_by(cohort_order);
        Ok(cohort)
    }

    async fn mark_winner(&self, ticket: TicketId, draw: DrawId) -> DrawResult<()> {
        let mut state = self.state.write();
        if state.fail_mark_winner {
            return Err(DrawError::Storage("ticket store rejected update".to_string()));
        }
        let entry = state
            .tickets
            .get_mut(&ticket)
            .ok_or_else(|| DrawError::Storage(format!("ticket {} not found", ticket)))?;
        entry.mark_winner(draw)?;
        Ok(())
    }

    async fn clear_winner(&self, ticket: TicketId) -> DrawResult<()> {
        let mut state = self.state.write();
        let entry = state
            .tickets
            .get_mut(&ticket)
            .ok_or_else(|| DrawError::Storage(format!("ticket {} not found", ticket)))?;
        entry.clear_winner();
        Ok(())
    }

    async fn create(
        &self,
        owner: UserId,
        purchased_at: DateTime<Utc>,
        draw_date: NaiveDate,
    ) -> DrawResult<Ticket> {
        let ticket = Ticket::new(owner, purchased_at, draw_date);
        self.insert(ticket.clone());
        Ok(ticket)
    }

    async fn tickets_for_user(&self, owner: UserId) -> DrawResult<Vec<Ticket>> {
        Ok(self
            .state
            .read()
            .tickets
            .values()
            .filter(|t| t.owner == owner)
            .cloned()
            .collect())
    }
}

// =============================================================================
// Draws
// =============================================================================

#[derive(Debug, Default)]
struct DrawTable {
    draws: BTreeMap<DrawId, Draw>,
    by_date: HashMap<NaiveDate, DrawId>,
    next_id: u64,
    fail_inserts: bool,
}

/// In-memory draw repository with a unique index on the draw date.
#[derive(Debug, Default)]
pub struct InMemoryDrawRepository {
    table: RwLock<DrawTable>,
}

impl InMemoryDrawRepository {
    /// Empty repository; ids start at 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `insert` fail with a storage error.
    pub fn fail_inserts(&self, fail: bool) {
        self.table.write().fail_inserts = fail;
    }

    /// Number of recorded draws.
    pub fn len(&self) -> usize {
        self.table.read().draws.len()
    }

    /// No draws recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrite a stored draw (simulates tampering with history).
    pub fn overwrite(&self, draw: Draw) {
        let mut table = self.table.write();
        table.by_date.insert(draw.draw_date, draw.id);
        table.draws.insert(draw.id, draw);
    }
}

#[async_trait]
impl DrawRepository for InMemoryDrawRepository {
    async fn insert(&self, draw: NewDraw, created_at: DateTime<Utc>) -> DrawResult<Draw> {
        let mut table = self.table.write();
        if table.fail_inserts {
            return Err(DrawError::Storage("draw repository unavailable".to_string()));
        }
        if table.by_date.contains_key(&draw.draw_date) {
            return Err(DrawError::DrawAlreadyExists {
                date: draw.draw_date,
            });
        }

        table.next_id += 1;
        let id = DrawId(table.next_id);
        let draw = draw.into_draw(id, created_at);
        table.by_date.insert(draw.draw_date, id);
        table.draws.insert(id, draw.clone());
        Ok(draw)
    }

    async fn find_by_id(&self, id: DrawId) -> DrawResult<Option<Draw>> {
        Ok(self.table.read().draws.get(&id).cloned())
    }

    async fn find_by_date(&self, date: NaiveDate) -> DrawResult<Option<Draw>> {
        let table = self.table.read();
        Ok(table
            .by_date
            .get(&date)
            .and_then(|id| table.draws.get(id))
            .cloned())
    }

    async fn delete(&self, id: DrawId) -> DrawResult<()> {
        let mut table = self.table.write();
        if let Some(draw) = table.draws.remove(&id) {
            table.by_date.remove(&draw.draw_date);
        }
        Ok(())
    }
}

// =============================================================================
// Points
// =============================================================================

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<UserId, u64>,
    fail_credits: bool,
}

/// In-memory points ledger.
#[derive(Debug, Default)]
pub struct InMemoryUserLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryUserLedger {
    /// Ledger without users.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with an opening balance.
    pub fn add_user(&self, user: UserId, balance: u64) {
        self.state.write().balances.insert(user, balance);
    }

    /// Current balance, `None` for unknown users.
    pub fn balance(&self, user: UserId) -> Option<u64> {
        self.state.read().balances.get(&user).copied()
    }

    /// Make `credit_points` fail with a ledger error.
    pub fn fail_credits(&self, fail: bool) {
        self.state.write().fail_credits = fail;
    }
}

#[async_trait]
impl UserLedger for InMemoryUserLedger {
    async fn user_exists(&self, user: UserId) -> DrawResult<bool> {
        Ok(self.state.read().balances.contains_key(&user))
    }

    async fn credit_points(&self, user: UserId, amount: u64) -> DrawResult<()> {
        let mut state = self.state.write();
        if state.fail_credits {
            return Err(DrawError::Ledger("ledger unavailable".to_string()));
        }
        let balance = state
            .balances
            .get_mut(&user)
            .ok_or(DrawError::UserNotFound(user))?;
        *balance = balance.saturating_add(amount);
        Ok(())
    }
}
