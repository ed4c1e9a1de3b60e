//! Errors surfaced by the claim orchestrator.

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::relayer::RelayerError;
use crate::smart_wallet::WalletError;

/// Failure of a claim relay, tagged by where it happened.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request could not be encoded into a contract call.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Transport failure talking to the node, relayer, or indexer.
    #[error("Network error: {0}")]
    Network(String),

    /// The relayer refused or lost the transaction.
    #[error("Relayer error: {0}")]
    Relayer(String),

    /// The transaction was mined but its execution did not succeed.
    #[error("Unexpected status: {status}")]
    Reverted { status: u64, tx_hash: TxHash },

    /// The signing key could not produce a signature.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Confirmation did not arrive within the configured wait.
    #[error("Timed out: {0}")]
    Timeout(String),
}

/// Result type for claim relays.
pub type RelayResult<T> = Result<T, RelayError>;

impl RelayError {
    /// Stable identifier of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Encoding(_) => "encoding",
            RelayError::Network(_) => "network",
            RelayError::Relayer(_) => "relayer",
            RelayError::Reverted { .. } => "reverted",
            RelayError::Signing(_) => "signing",
            RelayError::Timeout(_) => "timeout",
        }
    }

    /// Whether submitting the same claim again may succeed.
    ///
    /// A timeout is not retryable: the transaction may still land.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RelayError::Network(_) | RelayError::Relayer(_))
    }
}

impl From<BlockchainError> for RelayError {
    fn from(err: BlockchainError) -> Self {
        match err {
            BlockchainError::Wallet(msg) => RelayError::Signing(msg),
            other => RelayError::Network(other.to_string()),
        }
    }
}

impl From<RelayerError> for RelayError {
    fn from(err: RelayerError) -> Self {
        match err {
            RelayerError::Transport(e) => RelayError::Network(e.to_string()),
            other => RelayError::Relayer(other.to_string()),
        }
    }
}

impl From<WalletError> for RelayError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Blockchain(e) => e.into(),
            WalletError::Relayer(e) => e.into(),
            dropped @ WalletError::Dropped { .. } => RelayError::Relayer(dropped.to_string()),
            WalletError::ConfirmationTimeout(limit) => {
                RelayError::Timeout(format!("no confirmation within {:?}", limit))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverted_message_matches_status() {
        let err = RelayError::Reverted {
            status: 0,
            tx_hash: TxHash::ZERO,
        };
        assert_eq!(err.to_string(), "Unexpected status: 0");
        assert_eq!(err.kind(), "reverted");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_blockchain_errors_classified() {
        let err: RelayError = BlockchainError::Rpc("down".to_string()).into();
        assert_eq!(err.kind(), "network");
        assert!(err.is_retryable());

        let err: RelayError = BlockchainError::Wallet("bad key".to_string()).into();
        assert_eq!(err.kind(), "signing");
    }

    #[test]
    fn test_relayer_errors_classified() {
        let err: RelayError = RelayerError::Rejected("no".to_string()).into();
        assert_eq!(err.kind(), "relayer");

        let err: RelayError = WalletError::ConfirmationTimeout(std::time::Duration::from_secs(30)).into();
        assert_eq!(err.kind(), "timeout");
        assert!(!err.is_retryable());
    }
}
