//! # LD-01 Block Time Locator
//!
//! Finds the first blockchain block whose timestamp is at or after a target
//! UTC instant. That block's hash is the entropy source of a draw.
//!
//! **Subsystem ID:** 1  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! No party controls which block is first after midnight, and anyone can
//! later repeat the lookup against any archive node:
//! - Binary search over block numbers `[0, latest]`
//! - Sequential provider round-trips, each retried with exponential backoff
//! - No fallback entropy: an unreachable provider or a tip older than the
//!   target is an error, never a substitute block
//!
//! ## Failure Modes
//!
//! | Error | Meaning |
//! |-------|---------|
//! | `EntropySourceUnavailable` | Provider unreachable after retries |
//! | `NoBlockAfterTarget` | Chain tip is older than the target |
//! | `BlockUnavailable` | Converged block could not be fetched |
//!
//! ## Module Structure
//!
//! ```text
//! ld-01-block-locator/
//! ├── domain/          # LocatedBlock, SearchWindow, errors
//! ├── algorithms/      # Block search, retry with backoff
//! ├── ports/           # BlockTimeLocatorApi (inbound) + ChainDataProvider (outbound)
//! ├── adapters/        # JSON-RPC provider
//! ├── application/     # BlockTimeLocator service
//! └── config.rs        # LocatorConfig, RetryPolicy
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{parse_hex_u64, JsonRpcChainProvider};
pub use algorithms::{find_first_block_at_or_after, with_retry};
pub use application::BlockTimeLocator;
pub use config::{LocatorConfig, RetryPolicy};
pub use domain::{LocatedBlock, LocatorError, ProviderError, SearchWindow};
pub use ports::{synthetic_hash, BlockTimeLocatorApi, ChainDataProvider, InMemoryChain};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
