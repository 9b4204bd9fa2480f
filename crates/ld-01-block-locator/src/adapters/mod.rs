//! # Adapters Module
//!
//! Concrete chain-data providers.

pub mod json_rpc;

pub use json_rpc::{parse_hex_u64, JsonRpcChainProvider};
