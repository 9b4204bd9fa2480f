//! # JSON-RPC Chain Provider
//!
//! `ChainDataProvider` over an Ethereum-compatible JSON-RPC endpoint
//! (`eth_blockNumber`, `eth_getBlockByNumber`).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use shared_types::{BlockHash, BlockSummary};

use crate::domain::ProviderError;
use crate::ports::ChainDataProvider;

/// JSON-RPC request structure.
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a, T: Serialize> {
    jsonrpc: &'static str,
    method: &'a str,
    params: T,
    id: u64,
}

/// JSON-RPC response structure.
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Block fields we read from `eth_getBlockByNumber`.
#[derive(Debug, Deserialize)]
struct RpcBlock {
    number: String,
    timestamp: String,
    hash: String,
}

/// HTTP JSON-RPC chain-data provider.
pub struct JsonRpcChainProvider {
    http_client: reqwest::Client,
    rpc_url: String,
    request_id: AtomicU64,
}

impl JsonRpcChainProvider {
    /// Create a provider with a per-request timeout.
    ///
    /// Fails when the HTTP client cannot be built (TLS backend init).
    pub fn new(rpc_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            rpc_url: rpc_url.into(),
            request_id: AtomicU64::new(1),
        })
    }

    /// Make a JSON-RPC call. A `null` result comes back as `None`.
    async fn call<P: Serialize + Send, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<Option<R>, ProviderError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Transport(format!(
                "HTTP {} from provider",
                response.status()
            )));
        }

        let rpc_response: JsonRpcResponse<R> = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        if let Some(error) = rpc_response.error {
            return Err(ProviderError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(rpc_response.result)
    }
}

#[async_trait]
impl ChainDataProvider for JsonRpcChainProvider {
    async fn latest_block_number(&self) -> Result<u64, ProviderError> {
        let result: Option<String> = self.call("eth_blockNumber", Vec::<()>::new()).await?;
        let hex = result
            .ok_or_else(|| ProviderError::MalformedResponse("missing block number".to_string()))?;
        parse_hex_u64(&hex)
    }

    async fn block(&self, number: u64) -> Result<Option<BlockSummary>, ProviderError> {
        let block_hex = format!("0x{:x}", number);
        let result: Option<RpcBlock> = self
            .call("eth_getBlockByNumber", (block_hex, false))
            .await?;

        result.map(block_summary).transpose()
    }

    fn provider_id(&self) -> &str {
        &self.rpc_url
    }
}

fn block_summary(block: RpcBlock) -> Result<BlockSummary, ProviderError> {
    Ok(BlockSummary {
        number: parse_hex_u64(&block.number)?,
        timestamp: parse_hex_u64(&block.timestamp)?,
        hash: BlockHash::new(block.hash),
    })
}

/// Parse a `0x`-prefixed hex quantity.
pub fn parse_hex_u64(s: &str) -> Result<u64, ProviderError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(digits, 16)
        .map_err(|e| ProviderError::MalformedResponse(format!("invalid quantity {:?}: {}", s, e)))
}
