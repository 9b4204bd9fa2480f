//! # Failure Flows
//!
//! No draw may be recorded from a substitute entropy source, and a failed
//! commit must leave no partial state behind. Each scenario fails, checks
//! that nothing leaked, then recovers and checks the recovered draw is the
//! one the chain dictates.

#[cfg(test)]
mod tests {
    use draw_runtime::DayResult;
    use ld_01_block_locator::{synthetic_hash, InMemoryChain, LocatorError};
    use ld_03_draw_orchestrator::{DrawError, DrawOutcome};
    use shared_types::{DrawState, UserId};
    use tokio::sync::watch;

    use crate::integration::harness::*;

    fn assert_nothing_committed(h: &Harness) {
        assert!(h.draws.is_empty());
        assert!(h.tickets.winners().is_empty());
        assert_eq!(h.total_points(), 0);
    }

    #[tokio::test]
    async fn test_provider_outage_records_nothing() {
        let h = Harness::new();
        h.seed_tickets(40);
        h.chain.set_offline(true);

        let err = h.lottery.run_daily_draw().await.unwrap_err();
        assert!(matches!(
            err,
            DrawError::Locator(LocatorError::EntropySourceUnavailable { attempts: 3, .. })
        ));
        assert!(err.is_transient());
        assert_eq!(h.lottery.draw_state(day_one()), DrawState::Failed);
        assert_nothing_committed(&h);

        let errors = h
            .metrics
            .provider_errors
            .with_label_values(&["eth_blockNumber"])
            .get();
        assert_eq!(errors, 3);

        h.chain.set_offline(false);
        let outcome = h.lottery.run_daily_draw().await.unwrap();
        assert_eq!(outcome.draw().unwrap().winning_index, Some(35));
        assert_eq!(h.lottery.draw_state(day_one()), DrawState::Completed);
    }

    #[tokio::test]
    async fn test_tip_before_midnight_waits_for_chain() {
        // Chain stops two blocks short of midnight.
        let h = Harness::with_chain(InMemoryChain::with_regular_blocks(
            DAY_ONE_BLOCK - 1,
            GENESIS,
            BLOCK_INTERVAL,
        ));
        h.seed_tickets(40);

        let err = h.lottery.run_daily_draw().await.unwrap_err();
        assert!(matches!(
            err,
            DrawError::Locator(LocatorError::NoBlockAfterTarget { .. })
        ));
        assert_nothing_committed(&h);

        for n in DAY_ONE_BLOCK - 1..=DAY_ONE_BLOCK + 5 {
            h.chain
                .push_block(GENESIS + n * BLOCK_INTERVAL, synthetic_hash(n));
        }

        let outcome = h.lottery.run_daily_draw().await.unwrap();
        let draw = outcome.draw().unwrap();
        assert_eq!(draw.block_number, DAY_ONE_BLOCK);
        assert_eq!(draw.winning_index, Some(35));
    }

    #[tokio::test]
    async fn test_ledger_failure_rolls_back_commit() {
        let h = Harness::new();
        h.seed_tickets(40);
        h.ledger.fail_credits(true);

        let err = h.lottery.run_daily_draw().await.unwrap_err();
        assert!(matches!(err, DrawError::Ledger(_)));
        assert_nothing_committed(&h);
        assert!(h.lottery.draw_for_date(day_one()).await.unwrap().is_none());

        h.ledger.fail_credits(false);
        let outcome = h.lottery.run_daily_draw().await.unwrap();
        assert_eq!(outcome.draw().unwrap().winning_index, Some(35));
        assert_eq!(h.ledger.balance(UserId(4)), Some(100));
        assert_eq!(h.tickets.winners().len(), 1);
    }

    #[tokio::test]
    async fn test_winner_flag_failure_rolls_back_commit() {
        let h = Harness::new();
        h.seed_tickets(40);
        h.tickets.fail_mark_winner(true);

        assert!(h.lottery.run_daily_draw().await.is_err());
        assert_nothing_committed(&h);

        h.tickets.fail_mark_winner(false);
        assert!(h.lottery.run_daily_draw().await.unwrap().is_completed());
        assert_eq!(h.total_points(), 100);
    }

    #[tokio::test]
    async fn test_draw_insert_failure_writes_nothing() {
        let h = Harness::new();
        h.seed_tickets(40);
        h.draws.fail_inserts(true);

        let err = h.lottery.run_daily_draw().await.unwrap_err();
        assert!(matches!(err, DrawError::Storage(_)));
        assert_nothing_committed(&h);
    }

    #[tokio::test]
    async fn test_scheduler_gives_up_after_budget() {
        let h = Harness::new();
        h.seed_tickets(40);
        h.chain.set_offline(true);
        let (_tx, mut rx) = watch::channel(false);

        let result = h.scheduler().run_day(day_one(), &mut rx).await;
        let DayResult::GaveUp { attempts, last_error } = result else {
            panic!("expected the scheduler to give up");
        };
        assert_eq!(attempts, 3);
        assert_eq!(last_error.reason(), "entropy_source_unavailable");
        assert_nothing_committed(&h);

        let failed = h
            .metrics
            .draws_failed
            .with_label_values(&["entropy_source_unavailable"])
            .get();
        assert_eq!(failed, 3);
    }

    #[tokio::test]
    async fn test_verify_distinguishes_outage_from_mismatch() {
        let h = Harness::new();
        h.seed_tickets(40);
        let outcome = h.lottery.run_daily_draw().await.unwrap();
        let DrawOutcome::Completed { draw, .. } = outcome else {
            panic!("expected a completed draw");
        };

        h.chain.set_offline(true);
        let err = h.verifier.verify(draw.id).await.unwrap_err();
        assert!(matches!(
            err,
            DrawError::Locator(LocatorError::EntropySourceUnavailable { .. })
        ));

        h.chain.set_offline(false);
        assert!(h.verifier.verify(draw.id).await.unwrap());
    }
}
