//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key, RPC URL)
//!     → wallet.rs (key loading, signing)
//!     → client.rs (RPC connection with timeouts, failover)
//!     → transaction.rs (receipt polling, confirmation depth)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{BlockchainClient, ChainReader};
pub use transaction::ConfirmationWatcher;
pub use types::{BlockchainConfig, BlockchainError, BlockchainResult, TransactionReceipt};
pub use wallet::Wallet;
