//! Adapters for the Draw Orchestrator.

pub mod memory;

pub use memory::{InMemoryDrawRepository, InMemoryTicketStore, InMemoryUserLedger};
