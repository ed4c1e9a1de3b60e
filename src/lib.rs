//! Claim relayer library.
//!
//! Relays signed claims to the claim contract through a smart-contract
//! wallet and a meta-transaction relayer.

pub mod blockchain;
pub mod claim;
pub mod config;
pub mod http;
pub mod indexer;
pub mod lifecycle;
pub mod observability;
pub mod relayer;
pub mod smart_wallet;

/// Crate version reported at startup and by the health endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use claim::{ClaimOrchestrator, ClaimRequest, RelayError};
pub use config::schema::RelayerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use smart_wallet::SmartWallet;
