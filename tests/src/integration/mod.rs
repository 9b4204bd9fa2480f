//! # Integration Flows
//!
//! Every subsystem runs for real against in-memory adapters: the block
//! locator binary-searches an `InMemoryChain`, the selector runs on the
//! located hash and the orchestrator commits into in-memory stores.

#[cfg(test)]
mod harness;

mod failures;
mod flows;
