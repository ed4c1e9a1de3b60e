//! Startup reporting.

use alloy::primitives::U256;

use crate::indexer::BalanceIndexer;
use crate::smart_wallet::SmartWallet;

/// What the startup balance check found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundingStatus {
    Funded(U256),
    Empty,
    Unknown,
}

/// Log the relaying wallet and warn when it has no native balance.
///
/// Never fails: a broken indexer only costs the warning.
pub async fn report_wallet(wallet: &SmartWallet, indexer: &dyn BalanceIndexer) -> FundingStatus {
    tracing::info!(
        wallet_address = %wallet.get_address(),
        "Relaying from this smart wallet"
    );

    match wallet.get_balance(indexer).await {
        Ok(balance) if balance.is_zero() => {
            tracing::warn!(
                balance = %balance,
                "Please top up with the native token, the wallet balance is zero"
            );
            FundingStatus::Empty
        }
        Ok(balance) => {
            tracing::info!(balance_wei = %balance, "Wallet balance");
            FundingStatus::Funded(balance)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not read wallet balance");
            FundingStatus::Unknown
        }
    }
}
