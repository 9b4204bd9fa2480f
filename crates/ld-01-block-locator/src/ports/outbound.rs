//! # Outbound Ports
//!
//! Traits for external dependencies (the chain-data provider).

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{BlockHash, BlockSummary, Timestamp};

use crate::domain::ProviderError;

/// Chain-data provider - outbound port.
#[async_trait]
pub trait ChainDataProvider: Send + Sync {
    /// Number of the latest block.
    async fn latest_block_number(&self) -> Result<u64, ProviderError>;

    /// Fetch a block by number. `Ok(None)` means the provider has no data
    /// for it (pruned, not yet indexed, or beyond the tip).
    async fn block(&self, number: u64) -> Result<Option<BlockSummary>, ProviderError>;

    /// Provider identifier (for logging/debugging).
    fn provider_id(&self) -> &str;
}

// =============================================================================
// In-Memory Implementation for Testing
// =============================================================================

#[derive(Debug, Default)]
struct ChainState {
    blocks: Vec<BlockSummary>,
    missing: HashSet<u64>,
    /// Number of upcoming calls that fail with a transport error.
    failures_remaining: u32,
    /// Every call fails while set.
    offline: bool,
    calls: u64,
}

/// In-memory chain for tests, demos and backfill tooling.
///
/// Blocks are numbered from 0 in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryChain {
    id: String,
    state: RwLock<ChainState>,
}

impl InMemoryChain {
    /// Empty chain.
    pub fn new() -> Self {
        Self {
            id: "in-memory-chain".to_string(),
            state: RwLock::new(ChainState::default()),
        }
    }

    /// Chain of `count` blocks starting at `genesis_timestamp`, one block
    /// every `interval` seconds. Hashes are derived from the block number.
    pub fn with_regular_blocks(count: u64, genesis_timestamp: Timestamp, interval: u64) -> Self {
        let chain = Self::new();
        for n in 0..count {
            chain.push_block(genesis_timestamp + n * interval, synthetic_hash(n));
        }
        chain
    }

    /// Append a block; returns its number.
    pub fn push_block(&self, timestamp: Timestamp, hash: impl Into<BlockHash>) -> u64 {
        let mut state = self.state.write();
        let number = state.blocks.len() as u64;
        state.blocks.push(BlockSummary {
            number,
            timestamp,
            hash: hash.into(),
        });
        number
    }

    /// Replace the hash of an existing block (simulates a reorganisation).
    pub fn replace_hash(&self, number: u64, hash: impl Into<BlockHash>) {
        let mut state = self.state.write();
        if let Some(block) = state.blocks.get_mut(number as usize) {
            block.hash = hash.into();
        }
    }

    /// Make a block unfetchable (`Ok(None)`).
    pub fn hide_block(&self, number: u64) {
        self.state.write().missing.insert(number);
    }

    /// Fail the next `count` calls with a transport error.
    pub fn fail_next(&self, count: u32) {
        self.state.write().failures_remaining = count;
    }

    /// Toggle a permanent outage.
    pub fn set_offline(&self, offline: bool) {
        self.state.write().offline = offline;
    }

    /// Total calls received (including failed ones).
    pub fn calls(&self) -> u64 {
        self.state.read().calls
    }

    /// Block by number, ignoring outages and gaps.
    pub fn get(&self, number: u64) -> Option<BlockSummary> {
        self.state.read().blocks.get(number as usize).cloned()
    }

    fn check_available(&self) -> Result<(), ProviderError> {
        let mut state = self.state.write();
        state.calls += 1;
        if state.offline {
            return Err(ProviderError::Transport("provider offline".to_string()));
        }
        if state.failures_remaining > 0 {
            state.failures_remaining -= 1;
            return Err(ProviderError::Transport("connection reset".to_string()));
        }
        Ok(())
    }
}

/// Deterministic hash text for synthetic block `n`.
pub fn synthetic_hash(n: u64) -> BlockHash {
    BlockHash::new(format!("0x{:064x}", n.wrapping_mul(0x9e37_79b9_7f4a_7c15)))
}

#[async_trait]
impl ChainDataProvider for InMemoryChain {
    async fn latest_block_number(&self) -> Result<u64, ProviderError> {
        self.check_available()?;
        let state = self.state.read();
        match state.blocks.len() {
            0 => Err(ProviderError::MalformedResponse("chain has no blocks".to_string())),
            len => Ok(len as u64 - 1),
        }
    }

    async fn block(&self, number: u64) -> Result<Option<BlockSummary>, ProviderError> {
        self.check_available()?;
        let state = self.state.read();
        if state.missing.contains(&number) {
            return Ok(None);
        }
        Ok(state.blocks.get(number as usize).cloned())
    }

    fn provider_id(&self) -> &str {
        &self.id
    }
}
