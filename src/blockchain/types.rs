//! Chain-specific types and error definitions.

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export BlockchainConfig from config module to avoid duplication
pub use crate::config::schema::BlockchainConfig;

/// Receipt status code for a successful transaction.
pub const STATUS_SUCCESS: u64 = 1;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Invalid private key format or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Return data from a contract call could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Outcome of a mined transaction as reported by the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Hash of the mined transaction.
    pub transaction_hash: TxHash,
    /// 1 on success, 0 when execution reverted.
    pub status: u64,
    /// Block the transaction was included in, when known.
    pub block_number: Option<u64>,
}

impl TransactionReceipt {
    /// Whether the on-chain execution succeeded.
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

impl From<&alloy::rpc::types::TransactionReceipt> for TransactionReceipt {
    fn from(receipt: &alloy::rpc::types::TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            status: u64::from(receipt.status()),
            block_number: receipt.block_number,
        }
    }
}
