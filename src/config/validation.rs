//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that parse but cannot
//! work at runtime. Every problem is reported, not just the first.

use crate::config::schema::RelayerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &RelayerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "blockchain.rpc_url", &config.blockchain.rpc_url);
    for url in &config.blockchain.failover_urls {
        check_url(&mut errors, "blockchain.failover_urls", url);
    }
    check_url(&mut errors, "relayer.url", &config.relayer.url);
    check_url(&mut errors, "indexer.url", &config.indexer.url);

    if config.blockchain.chain_id == 0 {
        errors.push(ValidationError::new("blockchain.chain_id", "must be non-zero"));
    }
    if config.blockchain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be greater than 0"));
    }
    if config.blockchain.receipt_poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "blockchain.receipt_poll_interval_ms",
            "must be greater than 0",
        ));
    }
    if config.relayer.request_timeout_secs == 0 {
        errors.push(ValidationError::new("relayer.request_timeout_secs", "must be greater than 0"));
    }
    if config.relayer.poll_interval_ms == 0 {
        errors.push(ValidationError::new("relayer.poll_interval_ms", "must be greater than 0"));
    }
    if config.relayer.confirmation_timeout_secs == Some(0) {
        errors.push(ValidationError::new(
            "relayer.confirmation_timeout_secs",
            "must be greater than 0 when set",
        ));
    }
    if config.relayer.native_token_symbol.trim().is_empty() {
        errors.push(ValidationError::new("relayer.native_token_symbol", "must not be empty"));
    }
    if config.indexer.request_timeout_secs == 0 {
        errors.push(ValidationError::new("indexer.request_timeout_secs", "must be greater than 0"));
    }
    if config.wallet.wallet_creation_code.is_empty() {
        errors.push(ValidationError::new("wallet.wallet_creation_code", "must not be empty"));
    }
    if config.claim.contract_address.is_zero() {
        errors.push(ValidationError::new("claim.contract_address", "zero address not allowed"));
    }
    if config.http.max_body_bytes == 0 {
        errors.push(ValidationError::new("http.max_body_bytes", "must be greater than 0"));
    }
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address '{}'", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RelayerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RelayerConfig::default();
        config.blockchain.rpc_url = "not a url".to_string();
        config.relayer.url = "ftp://relayer".to_string();
        config.relayer.native_token_symbol = "  ".to_string();
        config.claim.contract_address = Address::ZERO;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "blockchain.rpc_url",
                "relayer.url",
                "relayer.native_token_symbol",
                "claim.contract_address",
            ]
        );
        assert!(errors[1].to_string().contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn test_zero_confirmation_timeout_rejected() {
        let mut config = RelayerConfig::default();
        config.relayer.confirmation_timeout_secs = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "relayer.confirmation_timeout_secs");
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = RelayerConfig::default();
        config.observability.metrics_address = "nowhere".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
