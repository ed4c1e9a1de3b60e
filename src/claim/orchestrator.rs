//! Claim relay workflow.
//!
//! ```text
//! Built → FeeNegotiated → SubmittedWithFee | SubmittedWithoutFee → Confirmed → Success | Reverted
//! ```

use alloy::primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::claim::error::{RelayError, RelayResult};
use crate::claim::request::{ClaimRequest, PreparedTransaction};
use crate::observability::metrics;
use crate::relayer::{FeeOption, FeeOptions, FeeQuote};
use crate::smart_wallet::{BoundWallet, WalletTransaction};

/// Result of a successful relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimOutcome {
    pub transaction_hash: TxHash,
}

/// How the relayer is paid for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeePath {
    /// A native-token transfer rides along with the claim.
    Native,
    /// The claim goes out alone.
    Free,
}

impl FeePath {
    pub fn as_str(self) -> &'static str {
        match self {
            FeePath::Native => "native",
            FeePath::Free => "free",
        }
    }
}

/// Batch chosen for submission plus the quote it must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSelection {
    pub path: FeePath,
    pub transactions: Vec<WalletTransaction>,
    pub quote: Option<FeeQuote>,
}

/// Choose how to pay for `claim` given the relayer's offer.
///
/// The option in `native_symbol` is paid with a transfer that reverts the
/// whole batch on failure. Without one the claim is sent alone and unquoted.
pub fn select_fee(claim: WalletTransaction, fees: &FeeOptions, native_symbol: &str) -> FeeSelection {
    match fees.find_by_symbol(native_symbol) {
        Some(option) => FeeSelection {
            path: FeePath::Native,
            transactions: vec![claim, fee_transaction(option)],
            quote: fees.quote.clone(),
        },
        None => FeeSelection {
            path: FeePath::Free,
            transactions: vec![claim],
            quote: None,
        },
    }
}

fn fee_transaction(option: &FeeOption) -> WalletTransaction {
    WalletTransaction::required_transfer(option.to, option.value, option.gas_limit)
}

/// Turns claim requests into confirmed transactions.
#[derive(Debug, Clone)]
pub struct ClaimOrchestrator {
    wallet: BoundWallet,
    claim_contract: Address,
    native_symbol: String,
}

impl ClaimOrchestrator {
    /// Create an orchestrator relaying through `wallet` to `claim_contract`.
    pub fn new(wallet: BoundWallet, claim_contract: Address, native_symbol: impl Into<String>) -> Self {
        Self {
            wallet,
            claim_contract,
            native_symbol: native_symbol.into(),
        }
    }

    /// The relaying wallet.
    pub fn wallet(&self) -> &BoundWallet {
        &self.wallet
    }

    /// Relay one claim and wait for it to be confirmed.
    pub async fn execute_tx(&self, request: &ClaimRequest) -> RelayResult<ClaimOutcome> {
        let start = Instant::now();
        tracing::info!(
            session_wallet = %request.session_wallet,
            sequence_wallet = %request.sequence_wallet,
            "Relaying claim"
        );

        let result = self.relay(request).await;
        match &result {
            Ok((outcome, path)) => {
                metrics::record_claim("success", path.as_str(), start);
                tracing::info!(
                    tx_hash = %outcome.transaction_hash,
                    fee_path = path.as_str(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Claim relayed"
                );
            }
            Err(e) => {
                metrics::record_claim(e.kind(), "none", start);
                tracing::error!(error = %e, kind = e.kind(), "Claim relay failed");
            }
        }
        result.map(|(outcome, _)| outcome)
    }

    async fn relay(&self, request: &ClaimRequest) -> RelayResult<(ClaimOutcome, FeePath)> {
        let prepared = PreparedTransaction::build(self.claim_contract, request)?;
        let claim = prepared.to_wallet_transaction();

        let state = self.wallet.state().await?;
        let fees = self
            .wallet
            .fee_options(std::slice::from_ref(&claim), &state)
            .await?;

        let selection = select_fee(claim, &fees, &self.native_symbol);
        match selection.path {
            FeePath::Native => tracing::info!(
                symbol = %self.native_symbol,
                batch = selection.transactions.len(),
                "Sending the transaction with a fee"
            ),
            FeePath::Free => tracing::info!(
                symbol = %self.native_symbol,
                offered = fees.options.len(),
                "No native fee option, sending the transaction without a fee"
            ),
        }

        let response = self
            .wallet
            .send_transaction(&selection.transactions, &state, selection.quote.as_ref())
            .await?;
        tracing::debug!(meta_txn_id = %response.id(), "Awaiting confirmation");

        let receipt = response.wait().await?;
        if !receipt.is_success() {
            return Err(RelayError::Reverted {
                status: receipt.status,
                tx_hash: receipt.transaction_hash,
            });
        }

        Ok((
            ClaimOutcome {
                transaction_hash: receipt.transaction_hash,
            },
            selection.path,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relayer::FeeToken;
    use alloy::primitives::{Bytes, U256};

    fn option(symbol: &str, value: u64) -> FeeOption {
        FeeOption {
            token: FeeToken {
                symbol: symbol.to_string(),
                name: None,
                contract_address: None,
                decimals: Some(18),
            },
            to: Address::with_last_byte(0xfe),
            value: U256::from(value),
            gas_limit: U256::from(30_000),
        }
    }

    fn claim() -> WalletTransaction {
        WalletTransaction::call(Address::with_last_byte(1), Bytes::from_static(b"claim"))
    }

    #[test]
    fn test_native_option_appends_fee_transfer() {
        let fees = FeeOptions {
            options: vec![option("USDC", 5), option("MATIC", 1000)],
            quote: Some(FeeQuote("q-1".to_string())),
            sponsored: false,
        };

        let selection = select_fee(claim(), &fees, "MATIC");
        assert_eq!(selection.path, FeePath::Native);
        assert_eq!(selection.transactions.len(), 2);
        assert_eq!(selection.transactions[0], claim());

        let fee = &selection.transactions[1];
        assert!(fee.revert_on_error);
        assert_eq!(fee.to, Address::with_last_byte(0xfe));
        assert_eq!(fee.value, U256::from(1000));
        assert_eq!(fee.gas_limit, U256::from(30_000));
        assert!(fee.data.is_empty());
        assert_eq!(selection.quote, Some(FeeQuote("q-1".to_string())));
    }

    #[test]
    fn test_missing_native_option_sends_claim_alone() {
        let fees = FeeOptions {
            options: vec![option("USDC", 5)],
            quote: Some(FeeQuote("q-2".to_string())),
            sponsored: false,
        };

        let selection = select_fee(claim(), &fees, "MATIC");
        assert_eq!(selection.path, FeePath::Free);
        assert_eq!(selection.transactions, vec![claim()]);
        assert!(selection.quote.is_none());
    }

    #[test]
    fn test_symbol_match_is_exact() {
        let fees = FeeOptions {
            options: vec![option("matic", 1)],
            quote: None,
            sponsored: false,
        };
        assert_eq!(select_fee(claim(), &fees, "MATIC").path, FeePath::Free);
    }
}
