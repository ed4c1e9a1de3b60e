//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relayer.
//! All types derive Serde traits for deserialization from config files.

use alloy::primitives::{address, bytes, Address, Bytes};
use serde::{Deserialize, Serialize};

/// Root configuration for the claim relayer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayerConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Blockchain node settings.
    pub blockchain: BlockchainConfig,

    /// Meta-transaction relayer settings.
    pub relayer: RelayerServiceConfig,

    /// Balance indexer settings.
    pub indexer: IndexerConfig,

    /// Smart wallet contract deployment.
    pub wallet: WalletContextConfig,

    /// Claim contract settings.
    pub claim: ClaimConfig,

    /// HTTP surface settings.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl RelayerConfig {
    /// Address the HTTP listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listener.host, self.listener.port)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port. Overridden by `PORT`.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID (80001 for Polygon Mumbai).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required before a receipt is reported.
    pub confirmation_blocks: u32,

    /// Interval between receipt polls in milliseconds.
    pub receipt_poll_interval_ms: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://nodes.sequence.app/mumbai".to_string(),
            failover_urls: Vec::new(),
            chain_id: 80001,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            receipt_poll_interval_ms: 2000,
        }
    }
}

/// Meta-transaction relayer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayerServiceConfig {
    /// Base URL of the relayer RPC service.
    pub url: String,

    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,

    /// Symbol of the chain's native gas token; the matching fee option is paid.
    pub native_token_symbol: String,

    /// Interval between meta-transaction receipt polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Upper bound on the confirmation wait. `None` waits indefinitely.
    pub confirmation_timeout_secs: Option<u64>,
}

impl Default for RelayerServiceConfig {
    fn default() -> Self {
        Self {
            url: "https://mumbai-relayer.sequence.app".to_string(),
            request_timeout_secs: 30,
            native_token_symbol: "MATIC".to_string(),
            poll_interval_ms: 1000,
            confirmation_timeout_secs: None,
        }
    }
}

/// Balance indexer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Base URL of the indexer RPC service.
    pub url: String,

    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            url: "https://mumbai-indexer.sequence.app".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Addresses of the smart wallet contracts shared by every wallet instance.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct WalletContextConfig {
    /// CREATE2 factory that deploys wallets.
    pub factory: Address,

    /// Implementation the wallet proxy delegates to.
    pub main_module: Address,

    /// Upgradable implementation (after the first config update).
    pub main_module_upgradable: Address,

    /// Stateless module used to bundle a deploy with the first execute.
    pub guest_module: Address,

    /// Proxy creation code prefixed to the main module address.
    pub wallet_creation_code: Bytes,
}

impl Default for WalletContextConfig {
    fn default() -> Self {
        Self {
            factory: address!("f9D09D634Fb818b05149329C1dcCFAeA53639d96"),
            main_module: address!("d01F11855bCcb95f88D7A48492F66410d4637313"),
            main_module_upgradable: address!("7EFE6cE415956c5f80C6530cC6cc81b4808F6118"),
            guest_module: address!("02390F3E6E5FD1C6786CB78FD3027C117a9955A7"),
            wallet_creation_code: bytes!(
                "603a600e3d39601a805130553df3363d3d373d3d3d363d30545af43d82803e903d91601857fd5bf3"
            ),
        }
    }
}

/// Claim contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClaimConfig {
    /// Contract exposing `relayClaim`.
    pub contract_address: Address,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            contract_address: address!("761D7728FB98Fe451800e0346C8C6b8590477CFD"),
        }
    }
}

/// HTTP surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Map failures to real HTTP status codes instead of always answering 200.
    pub strict_status_codes: bool,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Total request timeout in seconds. `None` lets a claim wait for confirmation.
    pub request_timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            strict_status_codes: false,
            max_body_bytes: 64 * 1024,
            request_timeout_secs: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "claim_relayer=debug,tower_http=debug".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
