//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::RelayerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the optional config file path.
pub const CONFIG_PATH_ENV_VAR: &str = "RELAYER_CONFIG";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, message: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, message } => write!(f, "Invalid {}: {}", var, message),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RelayerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: RelayerConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load configuration the way the server binary does.
///
/// Reads the file named by `path` (or `RELAYER_CONFIG`) when present, falls
/// back to defaults otherwise, then applies environment overrides and
/// validates the result.
pub fn load_from_env(path: Option<&Path>) -> Result<RelayerConfig, ConfigError> {
    let env_path = std::env::var(CONFIG_PATH_ENV_VAR).ok();
    let path = path.or(env_path.as_deref().map(Path::new));

    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => RelayerConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides on top of a parsed config.
///
/// `lookup` abstracts the environment so overrides can be tested without
/// touching process state.
pub fn apply_env_overrides<F>(config: &mut RelayerConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        config.listener.port = port.trim().parse().map_err(|e| ConfigError::Env {
            var: "PORT",
            message: format!("'{}' is not a port: {}", port, e),
        })?;
    }
    if let Some(url) = lookup("RELAYER_RPC_URL") {
        config.blockchain.rpc_url = url;
    }
    if let Some(url) = lookup("RELAYER_URL") {
        config.relayer.url = url;
    }
    if let Some(url) = lookup("RELAYER_INDEXER_URL") {
        config.indexer.url = url;
    }
    if let Some(address) = lookup("RELAYER_CLAIM_CONTRACT") {
        config.claim.contract_address = address.trim().parse().map_err(|e| ConfigError::Env {
            var: "RELAYER_CLAIM_CONTRACT",
            message: format!("'{}' is not an address: {}", address, e),
        })?;
    }
    Ok(())
}
