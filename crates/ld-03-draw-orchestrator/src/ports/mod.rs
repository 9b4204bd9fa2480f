//! Ports layer for the Draw Orchestrator.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
