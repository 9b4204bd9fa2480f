//! # ld-03-draw-orchestrator
//!
//! Daily draw orchestration and independent verification.
//!
//! ## Overview
//!
//! - **DrawOrchestrator**: snapshot the day's cohort, locate the entropy
//!   block (Subsystem 1), select the winner (Subsystem 2), commit
//! - **DrawVerifier**: re-derive a recorded draw and compare
//! - **Read model**: today's draw, draw by date, tickets by user
//!
//! ## Data Flow
//!
//! ```text
//! Scheduler ──run_daily_draw──→ Orchestrator (3)
//!                                   │
//!                                   ├── locate(midnight) ──→ Block Locator (1)
//!                                   ├── select(count, hash) ──→ Draw Selection (2)
//!                                   │
//!                                   └── insert draw → mark winner → credit points
//! ```
//!
//! ## Commit and Compensation
//!
//! | Step fails | Undo |
//! |------------|------|
//! | insert draw | nothing written |
//! | mark winner | delete draw |
//! | credit points | clear winner flag, delete draw |
//!
//! ## Idempotency
//!
//! The draw repository holds at most one draw per date. A run for a date
//! that already has one returns `DrawOutcome::AlreadyCompleted`. Runs in one
//! process are serialised by an async mutex.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ld_03_draw_orchestrator::{DrawConfig, DrawDependencies, DrawOrchestrator, LotteryApi};
//!
//! let orchestrator = DrawOrchestrator::new(DrawConfig::default(), deps);
//! match orchestrator.run_daily_draw().await? {
//!     DrawOutcome::Completed { draw, .. } => println!("winner index {:?}", draw.winning_index),
//!     DrawOutcome::Skipped { .. } => println!("no tickets today"),
//!     DrawOutcome::AlreadyCompleted(_) => {}
//! }
//! ```

#![warn(missing_docs)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{InMemoryDrawRepository, InMemoryTicketStore, InMemoryUserLedger};
pub use application::{DrawDependencies, DrawOrchestrator, DrawVerifier};
pub use config::{DrawConfig, DEFAULT_WINNING_REWARD};
pub use domain::{
    next_state, DrawError, DrawEvent, DrawOutcome, DrawResult, DrawStateBook, TodayDraw,
    VerificationReport,
};
pub use ports::{DrawRepository, DrawVerifierApi, LotteryApi, TicketStore, UserLedger};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
