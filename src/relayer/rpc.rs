//! HTTP client for the relayer's JSON RPC service.

use alloy::primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::RelayerServiceConfig;
use crate::relayer::types::{
    FeeOptions, FeeQuote, MetaTxnId, MetaTxnReceipt, MetaTxnStatus, RelayerError, RelayerResult,
};
use crate::relayer::Relayer;
use crate::smart_wallet::MetaCall;

const FEE_OPTIONS_PATH: &str = "/rpc/Relayer/FeeOptions";
const SEND_META_TXN_PATH: &str = "/rpc/Relayer/SendMetaTxn";
const META_TXN_RECEIPT_PATH: &str = "/rpc/Relayer/GetMetaTxnReceipt";

#[derive(Serialize)]
struct FeeOptionsRequest<'a> {
    wallet: Address,
    to: Address,
    data: &'a Bytes,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMetaTxnRequest<'a> {
    call: &'a MetaCall,
    #[serde(skip_serializing_if = "Option::is_none")]
    quote: Option<&'a FeeQuote>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendMetaTxnResponse {
    status: bool,
    txn_hash: String,
}

#[derive(Serialize)]
struct MetaTxnReceiptRequest<'a> {
    #[serde(rename = "metaTxID")]
    meta_tx_id: &'a str,
}

#[derive(Deserialize)]
struct MetaTxnReceiptResponse {
    receipt: Option<RawMetaTxnReceipt>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMetaTxnReceipt {
    id: String,
    status: MetaTxnStatus,
    #[serde(default)]
    revert_reason: Option<String>,
    /// JSON-encoded chain receipt, embedded as a string.
    #[serde(default)]
    txn_receipt: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddedChainReceipt {
    transaction_hash: TxHash,
}

/// Relayer client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct RpcRelayer {
    client: Client,
    base_url: String,
}

impl RpcRelayer {
    /// Create a client for the relayer at `config.url`.
    pub fn new(config: &RelayerServiceConfig) -> RelayerResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> RelayerResult<(StatusCode, Option<R>)> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok((status, None));
        }

        let text = response.text().await?;
        if !status.is_success() {
            return Err(RelayerError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed = serde_json::from_str(&text)
            .map_err(|e| RelayerError::Decode(format!("{} ({})", e, path)))?;
        Ok((status, Some(parsed)))
    }

    async fn post_required<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> RelayerResult<R> {
        match self.post(path, body).await? {
            (_, Some(parsed)) => Ok(parsed),
            (status, None) => Err(RelayerError::Status {
                status: status.as_u16(),
                body: format!("{} not found", path),
            }),
        }
    }
}

#[async_trait]
impl Relayer for RpcRelayer {
    async fn fee_options(&self, call: &MetaCall) -> RelayerResult<FeeOptions> {
        let request = FeeOptionsRequest {
            wallet: call.wallet_address,
            to: call.contract,
            data: &call.input,
        };
        let fees: FeeOptions = self.post_required(FEE_OPTIONS_PATH, &request).await?;

        tracing::debug!(
            wallet = %call.wallet_address,
            options = fees.options.len(),
            sponsored = fees.sponsored,
            has_quote = fees.quote.is_some(),
            "Fee options received"
        );
        Ok(fees)
    }

    async fn send_meta_txn(
        &self,
        call: &MetaCall,
        quote: Option<&FeeQuote>,
    ) -> RelayerResult<MetaTxnId> {
        let request = SendMetaTxnRequest { call, quote };
        let response: SendMetaTxnResponse =
            self.post_required(SEND_META_TXN_PATH, &request).await?;

        if !response.status {
            return Err(RelayerError::Rejected(format!(
                "relayer refused meta-transaction {}",
                response.txn_hash
            )));
        }

        tracing::info!(
            wallet = %call.wallet_address,
            meta_txn_id = %response.txn_hash,
            "Meta-transaction accepted by relayer"
        );
        Ok(MetaTxnId(response.txn_hash))
    }

    async fn meta_txn_receipt(&self, id: &MetaTxnId) -> RelayerResult<Option<MetaTxnReceipt>> {
        let request = MetaTxnReceiptRequest { meta_tx_id: &id.0 };
        let raw = match self
            .post::<_, MetaTxnReceiptResponse>(META_TXN_RECEIPT_PATH, &request)
            .await?
        {
            (_, Some(MetaTxnReceiptResponse { receipt: Some(raw) })) => raw,
            _ => return Ok(None),
        };

        let txn_hash = match raw.txn_receipt.as_deref() {
            Some(embedded) if !embedded.trim().is_empty() => {
                let chain: EmbeddedChainReceipt = serde_json::from_str(embedded)
                    .map_err(|e| RelayerError::Decode(format!("txnReceipt: {}", e)))?;
                Some(chain.transaction_hash)
            }
            _ => None,
        };

        Ok(Some(MetaTxnReceipt {
            id: MetaTxnId(raw.id),
            status: raw.status,
            revert_reason: raw.revert_reason.filter(|r| !r.is_empty()),
            txn_hash,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let config = RelayerServiceConfig {
            url: "http://localhost:9000/".to_string(),
            ..Default::default()
        };
        let relayer = RpcRelayer::new(&config).unwrap();
        assert_eq!(relayer.base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_send_request_shape() {
        let call = MetaCall {
            wallet_address: Address::with_last_byte(1),
            contract: Address::with_last_byte(2),
            input: Bytes::from_static(&[0xde, 0xad]),
        };
        let with_quote = serde_json::to_value(SendMetaTxnRequest {
            call: &call,
            quote: Some(&FeeQuote("q".to_string())),
        })
        .unwrap();
        assert_eq!(with_quote["call"]["walletAddress"], "0x0000000000000000000000000000000000000001");
        assert_eq!(with_quote["call"]["input"], "0xdead");
        assert_eq!(with_quote["quote"], "q");

        let without_quote =
            serde_json::to_value(SendMetaTxnRequest { call: &call, quote: None }).unwrap();
        assert!(without_quote.get("quote").is_none());
    }
}
