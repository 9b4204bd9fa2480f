//! Shared fixture for orchestrator and verifier tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use ld_01_block_locator::{BlockTimeLocator, InMemoryChain, LocatorConfig};
use shared_types::{FixedTimeSource, Ticket, UserId};

use super::{DrawDependencies, DrawOrchestrator, DrawVerifier};
use crate::adapters::{InMemoryDrawRepository, InMemoryTicketStore, InMemoryUserLedger};
use crate::config::DrawConfig;

/// 2023-12-31 23:00:00 UTC; block 300 lands exactly on the next midnight.
pub const GENESIS: u64 = 1_704_063_600;
pub const BLOCK_INTERVAL: u64 = 12;
pub const MIDNIGHT_BLOCK: u64 = 300;

pub fn draw_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Ten minutes past the draw date's midnight.
pub fn run_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 10, 0).unwrap()
}

pub struct Fixture {
    pub chain: Arc<InMemoryChain>,
    pub tickets: Arc<InMemoryTicketStore>,
    pub draws: Arc<InMemoryDrawRepository>,
    pub ledger: Arc<InMemoryUserLedger>,
    pub clock: Arc<FixedTimeSource>,
    pub orchestrator: DrawOrchestrator,
    pub verifier: DrawVerifier,
}

impl Fixture {
    pub fn new() -> Self {
        let chain = Arc::new(InMemoryChain::with_regular_blocks(
            1_000,
            GENESIS,
            BLOCK_INTERVAL,
        ));
        let tickets = Arc::new(InMemoryTicketStore::new());
        let draws = Arc::new(InMemoryDrawRepository::new());
        let ledger = Arc::new(InMemoryUserLedger::new());
        let clock = Arc::new(FixedTimeSource::new(run_time()));

        for user in 1..=3 {
            ledger.add_user(UserId(user), 0);
        }

        let deps = DrawDependencies {
            locator: Arc::new(BlockTimeLocator::new(
                LocatorConfig::for_testing(),
                Arc::clone(&chain),
            )),
            tickets: tickets.clone(),
            draws: draws.clone(),
            ledger: ledger.clone(),
            clock: clock.clone(),
        };

        Self {
            orchestrator: DrawOrchestrator::new(DrawConfig::for_testing(), deps.clone()),
            verifier: DrawVerifier::new(deps),
            chain,
            tickets,
            draws,
            ledger,
            clock,
        }
    }

    /// `count` tickets for the draw date, bought a minute apart on the
    /// previous afternoon, owners rotating over users 1..=3.
    pub fn seed_tickets(&self, count: u64) -> Vec<Ticket> {
        let start = Utc.with_ymd_and_hms(2023, 12, 31, 12, 0, 0).unwrap();
        (0..count)
            .map(|i| {
                let ticket = Ticket::new(
                    UserId(i % 3 + 1),
                    start + Duration::minutes(i as i64),
                    draw_date(),
                );
                self.tickets.insert(ticket.clone());
                ticket
            })
            .collect()
    }
}
