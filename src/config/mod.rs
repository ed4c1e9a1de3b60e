//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file (RELAYER_CONFIG or --config)
//!     → loader.rs (parse & deserialize, apply env overrides)
//!     → validation.rs (semantic checks)
//!     → RelayerConfig (validated, immutable)
//!     → handed to each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow running with no file at all
//! - The private key never lives in the config file; see `blockchain::wallet`

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    BlockchainConfig, ClaimConfig, HttpConfig, IndexerConfig, ListenerConfig, ObservabilityConfig,
    RelayerConfig, RelayerServiceConfig, WalletContextConfig,
};
