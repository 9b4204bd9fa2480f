//! Draw Verifier Service
//!
//! Re-derives a recorded draw from scratch: locate the entropy block for the
//! draw date again, re-read the cohort as of the recorded cutoff and run the
//! selector on the recorded total once the cohort confirms it. Read-only;
//! safe to run alongside anything.

use async_trait::async_trait;
use ld_02_draw_selection::{select, SelectionError};
use shared_types::{draw_timestamp, DrawId};

use super::orchestrator::DrawDependencies;
use crate::domain::{DrawError, DrawResult, VerificationReport};
use crate::ports::DrawVerifierApi;

/// Independent verifier for recorded draws.
pub struct DrawVerifier {
    deps: DrawDependencies,
}

impl DrawVerifier {
    /// Verifier over the same stores and locator the orchestrator draws from.
    pub fn new(deps: DrawDependencies) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl DrawVerifierApi for DrawVerifier {
    async fn verify_detailed(&self, draw_id: DrawId) -> DrawResult<VerificationReport> {
        let draw = self
            .deps
            .draws
            .find_by_id(draw_id)
            .await?
            .ok_or(DrawError::DrawNotFound(draw_id))?;

        let located = self
            .deps
            .locator
            .locate(draw_timestamp(draw.draw_date))
            .await?;

        let cohort = self
            .deps
            .tickets
            .tickets_eligible_for(draw.draw_date, draw.snapshot_cutoff)
            .await?;

        // The selector walks the whole `1..=total` range, so a recorded total
        // the cohort does not back is reported without selecting.
        let cohort_size_matches = cohort.len() as u64 == draw.total_tickets;
        let recomputed_index = if cohort_size_matches {
            match select(draw.total_tickets, located.hash.as_str()) {
                Ok(index) => Some(index),
                Err(SelectionError::NoTicketsAvailable) => None,
                Err(e) => return Err(e.into()),
            }
        } else {
            None
        };

        let recomputed_winner = recomputed_index
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| cohort.get(index))
            .map(|ticket| ticket.id);

        let report = VerificationReport {
            draw_id,
            draw_date: draw.draw_date,
            block_hash_matches: located.hash == draw.block_hash,
            winner_matches: recomputed_winner.is_some()
                && recomputed_winner == draw.winning_ticket_id
                && recomputed_index == draw.winning_index,
            cohort_size_matches,
            recorded_block_hash: draw.block_hash,
            recomputed_block_hash: located.hash,
            recomputed_block_number: located.number,
            recomputed_index,
        };

        if report.is_valid() {
            tracing::info!(draw_id = %draw_id, draw_date = %report.draw_date, "Draw verified");
        } else {
            tracing::warn!(
                draw_id = %draw_id,
                draw_date = %report.draw_date,
                block_hash_matches = report.block_hash_matches,
                winner_matches = report.winner_matches,
                cohort_size_matches = report.cohort_size_matches,
                recorded_hash = %report.recorded_block_hash,
                recomputed_hash = %report.recomputed_block_hash,
                "Draw verification mismatch"
            );
        }

        Ok(report)
    }
}
