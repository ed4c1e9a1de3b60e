//! Claim requests and the contract call they become.

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::signers::Signature;
use alloy::sol_types::SolCall;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::blockchain::{BlockchainResult, Wallet};
use crate::claim::error::{RelayError, RelayResult};
use crate::smart_wallet::abi;
use crate::smart_wallet::WalletTransaction;

/// Claim nonce as it arrives over JSON: a number or a decimal/hex string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NonceInput {
    Number(u64),
    Text(String),
}

impl NonceInput {
    fn parse(&self) -> RelayResult<U256> {
        match self {
            NonceInput::Number(n) => Ok(U256::from(*n)),
            NonceInput::Text(s) => U256::from_str(s.trim())
                .map_err(|e| RelayError::Encoding(format!("invalid nonce '{}': {}", s, e))),
        }
    }
}

impl From<u64> for NonceInput {
    fn from(n: u64) -> Self {
        NonceInput::Number(n)
    }
}

/// A claim as received from a client. Nothing is validated until encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub session_wallet: String,
    pub sequence_wallet: String,
    pub nonce: Option<NonceInput>,
    pub signature: String,
}

/// Call to the claim contract, fixed once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTransaction {
    pub to: Address,
    pub data: Bytes,
}

impl PreparedTransaction {
    /// Encode `relayClaim(sessionWallet, sequenceWallet, nonce, sig)` for `contract`.
    pub fn build(contract: Address, request: &ClaimRequest) -> RelayResult<Self> {
        let session_wallet = parse_address("sessionWallet", &request.session_wallet)?;
        let sequence_wallet = parse_address("sequenceWallet", &request.sequence_wallet)?;
        let nonce = request
            .nonce
            .as_ref()
            .ok_or_else(|| RelayError::Encoding("missing nonce".to_string()))?
            .parse()?;
        let sig = Bytes::from_str(request.signature.trim())
            .map_err(|e| RelayError::Encoding(format!("invalid sig: {}", e)))?;

        let data = abi::relayClaimCall {
            sessionWallet_: session_wallet,
            sequenceWallet_: sequence_wallet,
            nonce_: nonce,
            sig_: sig,
        }
        .abi_encode();

        Ok(Self {
            to: contract,
            data: data.into(),
        })
    }

    /// The wallet batch element carrying this call.
    pub fn to_wallet_transaction(&self) -> WalletTransaction {
        WalletTransaction::call(self.to, self.data.clone())
    }
}

fn parse_address(field: &str, value: &str) -> RelayResult<Address> {
    Address::from_str(value.trim())
        .map_err(|e| RelayError::Encoding(format!("invalid {} '{}': {}", field, value, e)))
}

/// Message a session key signs to authorize a claim:
/// `keccak256(abi.encodePacked(sessionWallet, sequenceWallet, uint256 nonce))`.
pub fn claim_digest(session_wallet: Address, sequence_wallet: Address, nonce: U256) -> B256 {
    let mut packed = Vec::with_capacity(20 + 20 + 32);
    packed.extend_from_slice(session_wallet.as_slice());
    packed.extend_from_slice(sequence_wallet.as_slice());
    packed.extend_from_slice(&nonce.to_be_bytes::<32>());
    keccak256(&packed)
}

/// Sign a claim with `session_key` for `sequence_wallet` (EIP-191 over the digest).
pub async fn sign_claim(
    session_key: &Wallet,
    sequence_wallet: Address,
    nonce: U256,
) -> BlockchainResult<Signature> {
    let digest = claim_digest(session_key.address(), sequence_wallet, nonce);
    session_key.sign_message(digest.as_slice()).await
}
