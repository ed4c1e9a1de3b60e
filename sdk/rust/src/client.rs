//! Client for the claim relayer HTTP API.

use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Body of `POST /transaction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSubmission {
    pub session_wallet: String,
    pub sequence_wallet: String,
    pub nonce: serde_json::Value,
    pub sig: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eth_auth_proof_string: Option<String>,
}

/// Reply of `POST /transaction`, carried in the body whatever the HTTP status.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ClaimReply {
    Relayed { tx: String, status: u16 },
    Failed {
        msg: String,
        status: u16,
        #[serde(default)]
        kind: Option<String>,
    },
}

impl ClaimReply {
    /// Transaction hash when the claim was relayed.
    pub fn tx_hash(&self) -> Option<&str> {
        match self {
            ClaimReply::Relayed { tx, .. } => Some(tx),
            ClaimReply::Failed { .. } => None,
        }
    }
}

/// Reply of `GET /health`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: String,
    pub version: String,
    pub wallet_address: String,
    pub chain_id: u64,
}

pub struct RelayerClient {
    client: Client,
    server_url: String,
}

impl RelayerClient {
    pub fn new(server_url: &str) -> Self {
        Self {
            client: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    /// Submit a signed claim and wait for the relayer's verdict.
    pub async fn submit_claim(
        &self,
        claim: &ClaimSubmission,
    ) -> Result<ClaimReply, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .post(format!("{}/transaction", self.server_url))
            .json(claim)
            .send()
            .await?;

        // Failures may arrive with a non-200 status in strict mode; the body
        // has the same shape either way.
        let text = resp.text().await?;
        Ok(serde_json::from_str::<ClaimReply>(&text)?)
    }

    pub async fn health(&self) -> Result<Health, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/health", self.server_url))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(format!("Relayer returned error status {}: {}", status, text).into());
        }
        Ok(serde_json::from_str(&text)?)
    }
}
