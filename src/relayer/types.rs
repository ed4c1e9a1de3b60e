//! Relayer request and response types.

use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by the relayer service or while talking to it.
#[derive(Debug, Error)]
pub enum RelayerError {
    /// The HTTP request could not be completed.
    #[error("Relayer request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The relayer answered with a non-success HTTP status.
    #[error("Relayer returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The relayer accepted the request but refused the transaction.
    #[error("Relayer rejected transaction: {0}")]
    Rejected(String),

    /// The response body did not have the expected shape.
    #[error("Malformed relayer response: {0}")]
    Decode(String),
}

/// Result type for relayer operations.
pub type RelayerResult<T> = Result<T, RelayerError>;

/// Token a fee can be paid in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeToken {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contract_address: Option<Address>,
    #[serde(default)]
    pub decimals: Option<u32>,
}

/// A payment the relayer accepts in exchange for dispatching a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeOption {
    pub token: FeeToken,
    /// Recipient of the fee.
    pub to: Address,
    /// Amount in the token's smallest unit.
    #[serde(with = "lenient_u256")]
    pub value: U256,
    /// Gas the fee transfer may use.
    #[serde(with = "lenient_u256")]
    pub gas_limit: U256,
}

/// Opaque token binding a fee negotiation to the submission that pays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeQuote(pub String);

/// Result of a fee negotiation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeOptions {
    #[serde(default)]
    pub options: Vec<FeeOption>,
    #[serde(default)]
    pub quote: Option<FeeQuote>,
    #[serde(default)]
    pub sponsored: bool,
}

impl FeeOptions {
    /// First option payable in the token with the given symbol.
    pub fn find_by_symbol(&self, symbol: &str) -> Option<&FeeOption> {
        self.options.iter().find(|option| option.token.symbol == symbol)
    }
}

/// Identifier the relayer assigns to a submitted meta-transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetaTxnId(pub String);

impl std::fmt::Display for MetaTxnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Dispatch state of a meta-transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetaTxnStatus {
    Queued,
    Sent,
    Succeeded,
    PartiallyFailed,
    Failed,
    Dropped,
    #[serde(other)]
    Unknown,
}

impl MetaTxnStatus {
    /// Whether the relayer is still working on the transaction.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Queued | Self::Sent | Self::Unknown)
    }
}

/// Relayer-side receipt of a meta-transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTxnReceipt {
    pub id: MetaTxnId,
    pub status: MetaTxnStatus,
    pub revert_reason: Option<String>,
    /// Hash of the on-chain transaction carrying the meta-transaction.
    pub txn_hash: Option<TxHash>,
}

/// Accepts integers either as JSON numbers or as decimal / 0x-hex strings.
pub(crate) mod lenient_u256 {
    use alloy::primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(U256::from(n)),
            Repr::Text(s) => U256::from_str(s.trim()).map_err(serde::de::Error::custom),
        }
    }
}
