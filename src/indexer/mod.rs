//! Native-token balance lookups through the indexer service.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::IndexerConfig;

const ETHER_BALANCE_PATH: &str = "/rpc/Indexer/GetEtherBalance";

/// Errors returned while querying the indexer.
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Indexer request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Indexer returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed indexer response: {0}")]
    Decode(String),
}

/// Result type for indexer operations.
pub type IndexerResult<T> = Result<T, IndexerError>;

/// Source of native-token balances.
#[async_trait]
pub trait BalanceIndexer: Send + Sync {
    /// Balance of `account` in wei.
    async fn ether_balance(&self, account: Address) -> IndexerResult<U256>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EtherBalanceRequest {
    account_address: Address,
}

#[derive(Deserialize)]
struct EtherBalanceResponse {
    balance: EtherBalance,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EtherBalance {
    #[serde(with = "crate::relayer::types::lenient_u256")]
    balance_wei: U256,
}

/// Indexer client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct IndexerClient {
    client: Client,
    base_url: String,
}

impl IndexerClient {
    /// Create a client for the indexer at `config.url`.
    pub fn new(config: &IndexerConfig) -> IndexerResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl BalanceIndexer for IndexerClient {
    async fn ether_balance(&self, account: Address) -> IndexerResult<U256> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, ETHER_BALANCE_PATH))
            .json(&EtherBalanceRequest {
                account_address: account,
            })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(IndexerError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: EtherBalanceResponse =
            serde_json::from_str(&text).map_err(|e| IndexerError::Decode(e.to_string()))?;
        Ok(parsed.balance.balance_wei)
    }
}
