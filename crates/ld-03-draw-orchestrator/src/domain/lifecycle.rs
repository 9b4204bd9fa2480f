//! Per-day draw lifecycle
//!
//! ```text
//! [NO_DRAW] ──triggered──→ [SELECTING] ──committed──→ [COMPLETED]
//!     ↑                        │    │
//!     └────────skipped─────────┘    └──failed──→ [FAILED] ──triggered──→ [SELECTING]
//! ```
//!
//! `Completed` is terminal. The durable draw record is the source of truth;
//! this book only mirrors it for observability, so a restart starts from
//! `NoDraw` and the first run for a recorded date moves straight to
//! `Completed` via `DrawEvent::Recorded`.

use std::collections::HashMap;

use chrono::NaiveDate;
use shared_types::DrawState;

/// Events that drive the per-day state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawEvent {
    /// A run for the date started.
    Triggered,
    /// The cohort was empty.
    Skipped,
    /// Draw, winner flag and credit all committed.
    Committed,
    /// The attempt aborted.
    Failed,
    /// A draw for the date was found in the repository.
    Recorded,
}

/// Deterministic transition function.
pub fn next_state(current: DrawState, event: DrawEvent) -> DrawState {
    match (current, event) {
        (_, DrawEvent::Recorded) => DrawState::Completed,
        (DrawState::Completed, _) => DrawState::Completed,
        (DrawState::NoDraw | DrawState::Failed, DrawEvent::Triggered) => DrawState::Selecting,
        (DrawState::Selecting, DrawEvent::Skipped) => DrawState::NoDraw,
        (DrawState::Selecting, DrawEvent::Committed) => DrawState::Completed,
        (DrawState::Selecting, DrawEvent::Failed) => DrawState::Failed,
        (state, _) => state,
    }
}

/// In-process view of every date's lifecycle.
#[derive(Debug, Default)]
pub struct DrawStateBook {
    states: HashMap<NaiveDate, DrawState>,
}

impl DrawStateBook {
    /// Empty book; every date starts at `NoDraw`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state; unknown dates are `NoDraw`.
    pub fn state(&self, date: NaiveDate) -> DrawState {
        self.states.get(&date).copied().unwrap_or(DrawState::NoDraw)
    }

    /// Apply an event and return the new state.
    pub fn apply(&mut self, date: NaiveDate, event: DrawEvent) -> DrawState {
        let current = self.state(date);
        let next = next_state(current, event);
        if next != current {
            tracing::debug!(draw_date = %date, from = ?current, to = ?next, "Draw state transition");
        }
        self.states.insert(date, next);
        next
    }
}
