//! Fully wired draw runtime over in-memory adapters.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use draw_runtime::{DrawRuntime, DrawScheduler, RuntimeConfig, ScheduleConfig, Stores};
use ld_01_block_locator::{InMemoryChain, LocatorConfig};
use ld_03_draw_orchestrator::{
    DrawVerifierApi, InMemoryDrawRepository, InMemoryTicketStore, InMemoryUserLedger, LotteryApi,
};
use lottery_telemetry::DrawMetrics;
use shared_types::{FixedTimeSource, Ticket, UserId};

/// 2023-12-31 23:00:00 UTC.
pub const GENESIS: u64 = 1_704_063_600;
pub const BLOCK_INTERVAL: u64 = 12;
/// First block at 2024-01-01 00:00:00 UTC.
pub const DAY_ONE_BLOCK: u64 = 300;
/// First block at 2024-01-02 00:00:00 UTC.
pub const DAY_TWO_BLOCK: u64 = 7_500;
pub const USERS: u64 = 4;

pub fn day_one() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

pub fn day_two() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

/// Ten minutes past midnight of `date`.
pub fn shortly_after(date: NaiveDate) -> DateTime<Utc> {
    shared_types::day_start(date) + Duration::minutes(10)
}

pub struct Harness {
    pub chain: Arc<InMemoryChain>,
    pub tickets: Arc<InMemoryTicketStore>,
    pub draws: Arc<InMemoryDrawRepository>,
    pub ledger: Arc<InMemoryUserLedger>,
    pub clock: Arc<FixedTimeSource>,
    pub metrics: DrawMetrics,
    pub runtime: DrawRuntime,
    pub lottery: Arc<dyn LotteryApi>,
    pub verifier: Arc<dyn DrawVerifierApi>,
}

impl Harness {
    /// Chain covering both test days, clock at day one 00:10.
    pub fn new() -> Self {
        Self::with_chain(InMemoryChain::with_regular_blocks(
            10_000,
            GENESIS,
            BLOCK_INTERVAL,
        ))
    }

    pub fn with_chain(chain: InMemoryChain) -> Self {
        let chain = Arc::new(chain);
        let tickets = Arc::new(InMemoryTicketStore::new());
        let draws = Arc::new(InMemoryDrawRepository::new());
        let ledger = Arc::new(InMemoryUserLedger::new());
        let clock = Arc::new(FixedTimeSource::new(shortly_after(day_one())));
        let metrics = DrawMetrics::new().unwrap();

        for user in 1..=USERS {
            ledger.add_user(UserId(user), 0);
        }

        let mut config = RuntimeConfig::default();
        config.chain.rpc_url = "memory://".to_string();
        config.locator = LocatorConfig::for_testing();
        config.schedule = ScheduleConfig::for_testing();
        config.api.listen_addr = ([127, 0, 0, 1], 0).into();

        let runtime = DrawRuntime::new(
            config,
            chain.clone(),
            Stores {
                tickets: tickets.clone(),
                draws: draws.clone(),
                ledger: ledger.clone(),
            },
            clock.clone(),
            metrics.clone(),
        );
        let state = runtime.app_state();

        Self {
            chain,
            tickets,
            draws,
            ledger,
            clock,
            metrics,
            lottery: state.lottery,
            verifier: state.verifier,
            runtime,
        }
    }

    /// `count` day-one tickets bought a minute apart from 2023-12-31 12:00,
    /// owners rotating over all users. Returned in cohort order.
    pub fn seed_tickets(&self, count: u64) -> Vec<Ticket> {
        let start = Utc.with_ymd_and_hms(2023, 12, 31, 12, 0, 0).unwrap();
        (0..count)
            .map(|i| {
                let ticket = Ticket::new(
                    UserId(i % USERS + 1),
                    start + Duration::minutes(i as i64),
                    day_one(),
                );
                self.tickets.insert(ticket.clone());
                ticket
            })
            .collect()
    }

    pub fn scheduler(&self) -> DrawScheduler {
        DrawScheduler::new(
            self.lottery.clone(),
            self.clock.clone(),
            ScheduleConfig::for_testing(),
            self.metrics.clone(),
        )
    }

    pub fn total_points(&self) -> u64 {
        (1..=USERS)
            .filter_map(|user| self.ledger.balance(UserId(user)))
            .sum()
    }
}
