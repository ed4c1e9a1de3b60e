//! Wallet-level data types.

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::sol_types::SolValue;
use serde::{Deserialize, Serialize};

use crate::config::WalletContextConfig;
use crate::smart_wallet::abi;

/// One signer of a wallet configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSigner {
    pub weight: u8,
    pub address: Address,
}

/// Signers and threshold that control a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    pub threshold: u16,
    pub signers: Vec<WalletSigner>,
}

impl WalletConfig {
    /// Configuration with a single owner that alone meets the threshold.
    pub fn single_owner(owner: Address) -> Self {
        Self {
            threshold: 1,
            signers: vec![WalletSigner {
                weight: 1,
                address: owner,
            }],
        }
    }

    /// Commitment to this configuration stored by the wallet.
    ///
    /// Starts from the threshold as a word and folds every signer in with
    /// `keccak256(abi.encode(hash, weight, signer))`.
    pub fn image_hash(&self) -> B256 {
        let seed = B256::from(U256::from(self.threshold).to_be_bytes::<32>());
        self.signers.iter().fold(seed, |hash, signer| {
            keccak256((hash, U256::from(signer.weight), signer.address).abi_encode())
        })
    }
}

/// Deployment of the wallet contracts shared by every wallet.
pub type WalletContext = WalletContextConfig;

/// Chain-side state of a wallet at the moment it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletState {
    /// Whether the wallet proxy has code at its counterfactual address.
    pub deployed: bool,
    /// Next nonce the wallet accepts.
    pub nonce: U256,
}

/// A call executed by the wallet as part of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub delegate_call: bool,
    pub revert_on_error: bool,
    pub gas_limit: U256,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl WalletTransaction {
    /// Plain contract call: no value, no gas limit, failures do not revert the batch.
    pub fn call(to: Address, data: Bytes) -> Self {
        Self {
            delegate_call: false,
            revert_on_error: false,
            gas_limit: U256::ZERO,
            to,
            value: U256::ZERO,
            data,
        }
    }

    /// Native token transfer that reverts the whole batch if it fails.
    pub fn required_transfer(to: Address, value: U256, gas_limit: U256) -> Self {
        Self {
            delegate_call: false,
            revert_on_error: true,
            gas_limit,
            to,
            value,
            data: Bytes::new(),
        }
    }
}

impl From<&WalletTransaction> for abi::Transaction {
    fn from(tx: &WalletTransaction) -> Self {
        abi::Transaction {
            delegateCall: tx.delegate_call,
            revertOnError: tx.revert_on_error,
            gasLimit: tx.gas_limit,
            target: tx.to,
            value: tx.value,
            data: tx.data.clone(),
        }
    }
}

impl From<abi::Transaction> for WalletTransaction {
    fn from(tx: abi::Transaction) -> Self {
        Self {
            delegate_call: tx.delegateCall,
            revert_on_error: tx.revertOnError,
            gas_limit: tx.gasLimit,
            to: tx.target,
            value: tx.value,
            data: tx.data,
        }
    }
}

/// Fully encoded call handed to the relayer for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaCall {
    /// Wallet the call acts for.
    pub wallet_address: Address,
    /// Contract the relayer sends to (the wallet, or the guest module for
    /// an undeployed wallet).
    pub contract: Address,
    /// Calldata.
    pub input: Bytes,
}
