//! # Daily Draw Scheduler
//!
//! Fires the daily draw a fixed offset after each UTC midnight.
//!
//! ## Attempt Budget
//!
//! A transient failure (entropy source down, tip not yet past midnight,
//! storage hiccup) is retried every `retry_interval_secs` until
//! `max_attempts_per_day` attempts have been made. A permanent failure stops
//! the day immediately. Either way the day ends with an operator alert and
//! the scheduler waits for the next trigger.
//!
//! ## Catch-up
//!
//! On startup, if today's trigger has already passed and today has no draw,
//! the draw runs right away.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use ld_03_draw_orchestrator::{DrawError, DrawOutcome, LotteryApi};
use lottery_telemetry::{log_draw_event, DrawMetrics, HistogramTimer};
use shared_types::{current_draw_date, day_start, TimeSource};
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::config::ScheduleConfig;

const SUBSYSTEM: &str = "scheduler";

/// The next `midnight + offset` strictly after `now`.
pub fn next_trigger_after(now: DateTime<Utc>, offset: Duration) -> DateTime<Utc> {
    let today = day_start(current_draw_date(now)) + offset;
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// How a scheduled day ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayResult {
    /// The orchestrator returned an outcome.
    Done(DrawOutcome),
    /// Every attempt failed, or a permanent error stopped the day.
    GaveUp { attempts: u32, last_error: DrawError },
    /// Shutdown arrived while waiting to retry.
    Interrupted,
}

/// Runs the daily draw on a wall-clock schedule.
pub struct DrawScheduler {
    lottery: Arc<dyn LotteryApi>,
    clock: Arc<dyn TimeSource>,
    config: ScheduleConfig,
    metrics: DrawMetrics,
}

impl DrawScheduler {
    pub fn new(
        lottery: Arc<dyn LotteryApi>,
        clock: Arc<dyn TimeSource>,
        config: ScheduleConfig,
        metrics: DrawMetrics,
    ) -> Self {
        Self {
            lottery,
            clock,
            config,
            metrics,
        }
    }

    fn trigger_offset(&self) -> Duration {
        Duration::seconds(i64::try_from(self.config.trigger_offset_secs).unwrap_or(i64::MAX))
    }

    /// Run until the shutdown channel flips to `true`.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            trigger_offset_secs = self.config.trigger_offset_secs,
            max_attempts_per_day = self.config.max_attempts_per_day,
            "[scheduler] Daily draw scheduler started"
        );

        if self.catch_up(&mut shutdown).await == Some(DayResult::Interrupted) {
            return;
        }

        loop {
            let now = self.clock.now();
            let trigger = next_trigger_after(now, self.trigger_offset());
            let wait = (trigger - now).to_std().unwrap_or(StdDuration::ZERO);
            info!(next_trigger = %trigger, "[scheduler] Waiting for next draw");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = shutdown.changed() => {
                    info!("[scheduler] Shutdown signal received");
                    return;
                }
            }

            let date = current_draw_date(self.clock.now());
            if self.run_day(date, &mut shutdown).await == DayResult::Interrupted {
                return;
            }
        }
    }

    /// Run today's draw if its trigger has passed and no draw is recorded.
    pub async fn catch_up(&self, shutdown: &mut watch::Receiver<bool>) -> Option<DayResult> {
        let now = self.clock.now();
        let today = current_draw_date(now);
        if now < day_start(today) + self.trigger_offset() {
            return None;
        }

        match self.lottery.draw_for_date(today).await {
            Ok(Some(_)) => None,
            Ok(None) => {
                log_draw_event!(info, SUBSYSTEM, today, "Trigger already passed, catching up");
                Some(self.run_day(today, shutdown).await)
            }
            Err(e) => {
                warn!(draw_date = %today, error = %e, "[scheduler] Catch-up check failed");
                Some(self.run_day(today, shutdown).await)
            }
        }
    }

    /// Attempt the draw for `date` within the day's budget.
    pub async fn run_day(&self, date: NaiveDate, shutdown: &mut watch::Receiver<bool>) -> DayResult {
        let max_attempts = self.config.max_attempts_per_day.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let error = match self.attempt(date).await {
                Ok(outcome) => return DayResult::Done(outcome),
                Err(e) => e,
            };

            if !error.is_transient() || attempt >= max_attempts {
                error!(
                    subsystem = SUBSYSTEM,
                    draw_date = %date,
                    attempts = attempt,
                    reason = error.reason(),
                    error = %error,
                    "OPERATOR ALERT: daily draw abandoned, no draw recorded for this date"
                );
                return DayResult::GaveUp {
                    attempts: attempt,
                    last_error: error,
                };
            }

            log_draw_event!(
                warn,
                SUBSYSTEM,
                date,
                "Draw attempt failed, retrying",
                attempt = attempt,
                retry_in_secs = self.config.retry_interval_secs,
                error = %error
            );

            tokio::select! {
                _ = tokio::time::sleep(self.config.retry_interval()) => {}
                _ = shutdown.changed() => {
                    info!("[scheduler] Shutdown signal received during retry wait");
                    return DayResult::Interrupted;
                }
            }
        }
    }

    async fn attempt(&self, date: NaiveDate) -> Result<DrawOutcome, DrawError> {
        let _timer = HistogramTimer::new(&self.metrics.draw_duration);
        let result = self.lottery.run_draw_for(date).await;

        match &result {
            Ok(DrawOutcome::Completed {
                draw,
                locator_round_trips,
                forced_termination,
                ..
            }) => {
                self.metrics.draws_completed.inc();
                self.metrics
                    .locator_round_trips
                    .observe(f64::from(*locator_round_trips));
                log_draw_event!(
                    info,
                    SUBSYSTEM,
                    date,
                    "Draw completed",
                    draw_id = %draw.id,
                    total_tickets = draw.total_tickets,
                    forced_termination = *forced_termination
                );
            }
            Ok(DrawOutcome::Skipped { .. }) => {
                self.metrics.draws_skipped.inc();
                log_draw_event!(info, SUBSYSTEM, date, "No tickets, draw skipped");
            }
            Ok(DrawOutcome::AlreadyCompleted(draw)) => {
                log_draw_event!(info, SUBSYSTEM, date, "Draw already recorded", draw_id = %draw.id);
            }
            Err(e) => {
                self.metrics
                    .draws_failed
                    .with_label_values(&[e.reason()])
                    .inc();
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
    }

    fn scheduler(fx: &Fixture, config: ScheduleConfig) -> DrawScheduler {
        DrawScheduler::new(
            fx.orchestrator.clone(),
            fx.clock.clone(),
            config,
            fx.metrics.clone(),
        )
    }

    #[test]
    fn test_next_trigger_same_day() {
        let offset = Duration::seconds(60);
        assert_eq!(next_trigger_after(at(0, 0, 30), offset), at(0, 1, 0));
    }

    #[test]
    fn test_next_trigger_rolls_over() {
        let offset = Duration::seconds(60);
        let tomorrow = Utc.with_ymd_and_hms(2024, 1, 2, 0, 1, 0).unwrap();
        assert_eq!(next_trigger_after(at(0, 1, 0), offset), tomorrow);
        assert_eq!(next_trigger_after(at(18, 0, 0), offset), tomorrow);
    }

    #[test]
    fn test_next_trigger_zero_offset() {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(next_trigger_after(at(0, 0, 0), Duration::zero()), midnight);
    }

    #[tokio::test]
    async fn test_run_day_completes_and_records_metrics() {
        let fx = Fixture::new();
        fx.seed_tickets(13);
        let (_tx, mut rx) = watch::channel(false);

        let result = scheduler(&fx, ScheduleConfig::for_testing())
            .run_day(draw_date(), &mut rx)
            .await;

        assert!(matches!(result, DayResult::Done(DrawOutcome::Completed { .. })));
        assert_eq!(fx.metrics.draws_completed.get(), 1);
        assert_eq!(fx.metrics.locator_round_trips.get_sample_count(), 1);
        assert_eq!(fx.metrics.draw_duration.get_sample_count(), 1);
    }

    #[tokio::test]
    async fn test_run_day_skips_empty_cohort() {
        let fx = Fixture::new();
        let (_tx, mut rx) = watch::channel(false);

        let result = scheduler(&fx, ScheduleConfig::for_testing())
            .run_day(draw_date(), &mut rx)
            .await;

        assert_eq!(result, DayResult::Done(DrawOutcome::Skipped { date: draw_date() }));
        assert_eq!(fx.metrics.draws_skipped.get(), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_exhausts_budget() {
        let fx = Fixture::new();
        fx.seed_tickets(5);
        fx.chain.set_offline(true);
        let (_tx, mut rx) = watch::channel(false);

        let result = scheduler(&fx, ScheduleConfig::for_testing())
            .run_day(draw_date(), &mut rx)
            .await;

        match result {
            DayResult::GaveUp { attempts, last_error } => {
                assert_eq!(attempts, 3);
                assert_eq!(last_error.reason(), "entropy_source_unavailable");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        let failed = fx
            .metrics
            .draws_failed
            .with_label_values(&["entropy_source_unavailable"])
            .get();
        assert_eq!(failed, 3);
        assert!(fx.draws.is_empty());
    }

    #[tokio::test]
    async fn test_retry_recovers_within_budget() {
        let fx = Fixture::new();
        fx.seed_tickets(13);
        // The locator gives up after three failed calls; the second attempt succeeds.
        fx.chain.fail_next(3);
        let (_tx, mut rx) = watch::channel(false);

        let result = scheduler(&fx, ScheduleConfig::for_testing())
            .run_day(draw_date(), &mut rx)
            .await;

        assert!(matches!(result, DayResult::Done(DrawOutcome::Completed { .. })));
        assert_eq!(fx.metrics.draws_completed.get(), 1);
        assert_eq!(
            fx.metrics
                .draws_failed
                .with_label_values(&["entropy_source_unavailable"])
                .get(),
            1
        );
    }

    #[tokio::test]
    async fn test_permanent_failure_stops_immediately() {
        let fx = Fixture::new();
        fx.seed_tickets(5);
        fx.chain.replace_hash(MIDNIGHT_BLOCK, "abcdef");
        let (_tx, mut rx) = watch::channel(false);

        let result = scheduler(&fx, ScheduleConfig::for_testing())
            .run_day(draw_date(), &mut rx)
            .await;

        assert!(matches!(result, DayResult::GaveUp { attempts: 1, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_retry_wait() {
        let fx = Fixture::new();
        fx.seed_tickets(5);
        fx.chain.set_offline(true);
        let config = ScheduleConfig {
            retry_interval_secs: 3_600,
            ..ScheduleConfig::for_testing()
        };
        let (tx, mut rx) = watch::channel(false);
        tx.send(true).unwrap();

        let result = scheduler(&fx, config).run_day(draw_date(), &mut rx).await;
        assert_eq!(result, DayResult::Interrupted);
    }

    #[tokio::test]
    async fn test_catch_up_runs_missed_draw() {
        let fx = Fixture::new();
        fx.seed_tickets(13);
        let (_tx, mut rx) = watch::channel(false);

        let result = scheduler(&fx, ScheduleConfig::for_testing())
            .catch_up(&mut rx)
            .await;

        assert!(matches!(result, Some(DayResult::Done(DrawOutcome::Completed { .. }))));
        assert_eq!(fx.draws.len(), 1);
    }

    #[tokio::test]
    async fn test_catch_up_waits_for_trigger() {
        let fx = Fixture::new();
        fx.seed_tickets(13);
        // Run time is ten minutes past midnight; an hour's offset has not passed.
        let config = ScheduleConfig {
            trigger_offset_secs: 3_600,
            ..ScheduleConfig::for_testing()
        };
        let (_tx, mut rx) = watch::channel(false);

        assert_eq!(scheduler(&fx, config).catch_up(&mut rx).await, None);
        assert!(fx.draws.is_empty());
    }

    #[tokio::test]
    async fn test_catch_up_is_noop_when_drawn() {
        let fx = Fixture::new();
        fx.seed_tickets(13);
        fx.orchestrator.run_draw_for(draw_date()).await.unwrap();
        let (_tx, mut rx) = watch::channel(false);

        let sched = scheduler(&fx, ScheduleConfig::for_testing());
        assert_eq!(sched.catch_up(&mut rx).await, None);
        assert_eq!(fx.metrics.draws_completed.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_exits_on_shutdown() {
        let fx = Fixture::new();
        let config = ScheduleConfig {
            trigger_offset_secs: 3_600,
            ..ScheduleConfig::for_testing()
        };
        let sched = scheduler(&fx, config);
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move { sched.run(rx).await });
        tx.send(true).unwrap();
        handle.await.unwrap();
        assert!(fx.draws.is_empty());
    }
}
