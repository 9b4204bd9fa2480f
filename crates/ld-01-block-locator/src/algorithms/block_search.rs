//! # Block Search
//!
//! Binary search over block numbers for the first block whose timestamp is
//! at or after a target instant.
//!
//! # Probing rules
//! 1. Window starts at `[0, latest]`
//! 2. `timestamp < target` keeps the upper half
//! 3. `timestamp >= target` keeps the lower half
//! 4. A missing candidate also keeps the lower half (narrowing from below it)
//! 5. After convergence the block at `low` is fetched again; if it is still
//!    missing the lookup fails

use shared_types::Timestamp;

use super::backoff::with_retry;
use crate::config::RetryPolicy;
use crate::domain::{LocatedBlock, LocatorError, SearchWindow};
use crate::ports::ChainDataProvider;

/// Locate the lowest block with `timestamp >= target`.
pub async fn find_first_block_at_or_after<P>(
    provider: &P,
    target: Timestamp,
    retry: &RetryPolicy,
) -> Result<LocatedBlock, LocatorError>
where
    P: ChainDataProvider + ?Sized,
{
    let latest = with_retry(retry, "latest_block_number", || provider.latest_block_number()).await?;
    let mut round_trips = 1u32;
    let mut tip_timestamp: Option<Timestamp> = None;
    let mut window = SearchWindow::new(latest);

    while let Some(mid) = window.midpoint() {
        let candidate = with_retry(retry, "block", || provider.block(mid)).await?;
        round_trips += 1;

        match candidate {
            None => {
                tracing::debug!(block = mid, "Candidate block unavailable, narrowing below it");
                window.lower_high(mid);
            }
            Some(block) if block.timestamp < target => {
                if mid == latest {
                    tip_timestamp = Some(block.timestamp);
                }
                window.raise_low(mid);
            }
            Some(_) => window.lower_high(mid),
        }
    }

    // `low` only passes the tip after the tip itself was probed as too early.
    if window.low > latest {
        return Err(LocatorError::NoBlockAfterTarget {
            target,
            tip_timestamp: tip_timestamp.unwrap_or_default(),
        });
    }

    let converged = window.low;
    let block = with_retry(retry, "block", || provider.block(converged)).await?;
    round_trips += 1;

    match block {
        Some(block) => {
            tracing::debug!(
                block = block.number,
                block_timestamp = block.timestamp,
                target,
                round_trips,
                "Located first block at or after target"
            );
            Ok(LocatedBlock::from_summary(block, target, round_trips))
        }
        None => Err(LocatorError::BlockUnavailable { number: converged }),
    }
}
