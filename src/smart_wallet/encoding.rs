//! Digest, signature and calldata encoding for wallet batches.
//!
//! Signature layout: `uint16 threshold` followed by one part per signer.
//! A signing part is `0x00 ‖ weight ‖ r ‖ s ‖ v ‖ 0x02` (an `eth_sign`
//! signature); a non-signing part is `0x01 ‖ weight ‖ address`.

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::signers::Signature;
use alloy::sol_types::{SolCall, SolValue};

use crate::smart_wallet::abi;
use crate::smart_wallet::types::{MetaCall, WalletConfig, WalletContext, WalletTransaction};

const FLAG_SIGNATURE: u8 = 0;
const FLAG_ADDRESS: u8 = 1;
const SIG_TYPE_ETH_SIGN: u8 = 2;

fn abi_transactions(txns: &[WalletTransaction]) -> Vec<abi::Transaction> {
    txns.iter().map(abi::Transaction::from).collect()
}

/// `keccak256(abi.encode(nonce, txns))`.
pub fn batch_digest(nonce: U256, txns: &[WalletTransaction]) -> B256 {
    keccak256((nonce, abi_transactions(txns)).abi_encode_params())
}

/// Digest bound to a chain and a wallet: `keccak256("\x19\x01" ‖ chainId ‖ wallet ‖ digest)`.
pub fn sub_digest(chain_id: u64, wallet: Address, digest: B256) -> B256 {
    let mut packed = Vec::with_capacity(2 + 32 + 20 + 32);
    packed.extend_from_slice(b"\x19\x01");
    packed.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
    packed.extend_from_slice(wallet.as_slice());
    packed.extend_from_slice(digest.as_slice());
    keccak256(&packed)
}

/// Wallet signature where every signer equal to `signer` contributes `signature`.
pub fn encode_signature(config: &WalletConfig, signer: Address, signature: &Signature) -> Bytes {
    let mut out = Vec::with_capacity(2 + config.signers.len() * 68);
    out.extend_from_slice(&config.threshold.to_be_bytes());
    for part in &config.signers {
        if part.address == signer {
            out.push(FLAG_SIGNATURE);
            out.push(part.weight);
            out.extend_from_slice(&signature.as_bytes());
            out.push(SIG_TYPE_ETH_SIGN);
        } else {
            out.push(FLAG_ADDRESS);
            out.push(part.weight);
            out.extend_from_slice(part.address.as_slice());
        }
    }
    out.into()
}

/// Signature listing the signers without signing, used for fee estimation.
pub fn encode_unsigned(config: &WalletConfig) -> Bytes {
    let mut out = Vec::with_capacity(2 + config.signers.len() * 22);
    out.extend_from_slice(&config.threshold.to_be_bytes());
    for part in &config.signers {
        out.push(FLAG_ADDRESS);
        out.push(part.weight);
        out.extend_from_slice(part.address.as_slice());
    }
    out.into()
}

/// `execute(txns, nonce, signature)` calldata.
pub fn encode_execute(txns: &[WalletTransaction], nonce: U256, signature: Bytes) -> Bytes {
    abi::executeCall {
        _txs: abi_transactions(txns),
        _nonce: nonce,
        _signature: signature,
    }
    .abi_encode()
    .into()
}

/// Wrap a wallet call so the relayer can dispatch it.
///
/// An undeployed wallet gets a guest-module bundle that deploys the proxy
/// through the factory and then runs the wallet's `execute`.
pub fn build_meta_call(
    wallet: Address,
    config: &WalletConfig,
    context: &WalletContext,
    deployed: bool,
    execute_input: Bytes,
) -> MetaCall {
    if deployed {
        return MetaCall {
            wallet_address: wallet,
            contract: wallet,
            input: execute_input,
        };
    }

    let deploy_input: Bytes = abi::deployCall {
        _mainModule: context.main_module,
        _salt: config.image_hash(),
    }
    .abi_encode()
    .into();

    let bundle = [
        WalletTransaction {
            revert_on_error: true,
            ..WalletTransaction::call(context.factory, deploy_input)
        },
        WalletTransaction {
            revert_on_error: true,
            ..WalletTransaction::call(wallet, execute_input)
        },
    ];

    MetaCall {
        wallet_address: wallet,
        contract: context.guest_module,
        input: encode_execute(&bundle, U256::ZERO, Bytes::new()),
    }
}
