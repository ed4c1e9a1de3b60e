//! Smart-contract wallet facade.
//!
//! # Data Flow
//! ```text
//! server key (blockchain::Wallet)
//!     → SmartWallet (config, context, counterfactual address)
//!     → connect(chain, relayer) → BoundWallet
//!     → fee_options / send_transaction (encoding.rs signs and packs)
//!     → TransactionResponse::wait (relayer receipt, then chain confirmations)
//! ```

pub mod abi;
pub mod encoding;
pub mod types;
pub mod wallet;

pub use types::{MetaCall, WalletConfig, WalletContext, WalletSigner, WalletState, WalletTransaction};
pub use wallet::{
    counterfactual_address, BoundWallet, SmartWallet, TransactionResponse, WaitSettings,
    WalletError, WalletResult,
};
