//! Confirmation monitoring for mined transactions.
//!
//! # Responsibilities
//! - Poll for the receipt of a known transaction hash
//! - Wait until the configured number of blocks sit on top of it

use alloy::primitives::TxHash;
use std::time::Duration;
use tokio::time::interval;

use crate::blockchain::client::ChainReader;
use crate::blockchain::types::{BlockchainResult, TransactionReceipt};

/// Waits for receipts to reach the required confirmation depth.
pub struct ConfirmationWatcher<'a> {
    chain: &'a dyn ChainReader,
    required_confirmations: u32,
    poll_interval: Duration,
}

impl<'a> ConfirmationWatcher<'a> {
    /// Create a watcher over `chain`.
    pub fn new(chain: &'a dyn ChainReader, required_confirmations: u32, poll_interval: Duration) -> Self {
        Self {
            chain,
            required_confirmations,
            poll_interval,
        }
    }

    /// Wait for a transaction to be mined and confirmed.
    ///
    /// There is no deadline here; callers bound the wait if they need to.
    /// A reverted transaction is returned as soon as it is mined.
    pub async fn wait(&self, tx_hash: TxHash) -> BlockchainResult<TransactionReceipt> {
        let mut ticker = interval(self.poll_interval);

        loop {
            ticker.tick().await;

            let receipt = match self.chain.get_transaction_receipt(tx_hash).await? {
                Some(r) => r,
                None => {
                    tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    continue;
                }
            };

            if !receipt.is_success() {
                return Ok(receipt);
            }

            let current_block = self.chain.get_block_number().await?;
            let tx_block = receipt.block_number.unwrap_or(current_block);
            // The inclusion block counts as the first confirmation.
            let confirmations = current_block.saturating_sub(tx_block).saturating_add(1);

            if confirmations >= u64::from(self.required_confirmations) {
                return Ok(receipt);
            }

            tracing::debug!(
                tx_hash = %tx_hash,
                confirmations = confirmations,
                required = self.required_confirmations,
                "Waiting for confirmations"
            );
        }
    }
}
