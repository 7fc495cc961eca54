//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that URLs, addresses and amounts parse
//! - Validate value ranges (timeouts > 0, gas limits > 0)
//! - Require a way to locate the contract under test
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HarnessConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;

use crate::config::schema::HarnessConfig;
use crate::units::{self, ETHER_DECIMALS};

/// Levels accepted by `observability.log_level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a deserialized configuration.
pub fn validate_config(config: &HarnessConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "blockchain.rpc_url", &config.blockchain.rpc_url);
    for (i, url) in config.blockchain.failover_urls.iter().enumerate() {
        check_url(&mut errors, &format!("blockchain.failover_urls[{}]", i), url);
    }
    if config.blockchain.rpc_timeout_secs == 0 {
        push(&mut errors, "blockchain.rpc_timeout_secs", "must be greater than 0");
    }
    if config.blockchain.receipt_timeout_secs == 0 {
        push(&mut errors, "blockchain.receipt_timeout_secs", "must be greater than 0");
    }
    if config.blockchain.poll_base_ms > config.blockchain.poll_max_ms {
        push(&mut errors, "blockchain.poll_base_ms", "must not exceed poll_max_ms");
    }

    check_address(&mut errors, "accounts.whale", &config.accounts.whale);
    if let Some(deployer) = &config.accounts.deployer {
        check_address(&mut errors, "accounts.deployer", deployer);
    }

    let contracts = &config.contracts;
    match (&contracts.target, &contracts.target_artifact) {
        (Some(target), _) => check_address(&mut errors, "contracts.target", target),
        (None, Some(_)) => {}
        (None, None) => push(
            &mut errors,
            "contracts.target",
            "either target or target_artifact must be set",
        ),
    }
    check_address(&mut errors, "contracts.stablecoin", &contracts.stablecoin);
    check_address(&mut errors, "contracts.uniswap_factory", &contracts.uniswap_factory);
    for (field, value) in [
        ("contracts.usdc", &contracts.usdc),
        ("contracts.curve_swap", &contracts.curve_swap),
        ("contracts.curve_swap_token", &contracts.curve_swap_token),
    ] {
        if let Some(address) = value {
            check_address(&mut errors, field, address);
        }
    }

    check_amount(&mut errors, "funding.eth_in", &config.funding.eth_in, ETHER_DECIMALS);
    check_amount(
        &mut errors,
        "funding.min_token_gain",
        &config.funding.min_token_gain,
        contracts.stablecoin_decimals,
    );
    if config.funding.gas == 0 {
        push(&mut errors, "funding.gas", "must be greater than 0");
    }

    check_amount(&mut errors, "scenarios.gas_top_up", &config.scenarios.gas_top_up, ETHER_DECIMALS);
    check_amount(
        &mut errors,
        "scenarios.token_amount",
        &config.scenarios.token_amount,
        contracts.stablecoin_decimals,
    );
    if config.scenarios.token_gas_limit == 0 {
        push(&mut errors, "scenarios.token_gas_limit", "must be greater than 0");
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        push(
            &mut errors,
            "observability.log_level",
            &format!(
                "unknown level '{}', expected one of {}",
                config.observability.log_level,
                LOG_LEVELS.join("|")
            ),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn push(errors: &mut Vec<ValidationError>, field: &str, message: &str) {
    errors.push(ValidationError {
        field: field.to_string(),
        message: message.to_string(),
    });
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if let Err(e) = value.parse::<url::Url>() {
        push(errors, field, &format!("invalid URL '{}': {}", value, e));
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if let Err(e) = value.parse::<Address>() {
        push(errors, field, &format!("invalid address '{}': {}", value, e));
    }
}

/// Amounts must parse exactly and be non-zero; a zero amount makes its check vacuous.
fn check_amount(errors: &mut Vec<ValidationError>, field: &str, value: &str, decimals: u8) {
    match units::parse_amount(value, decimals) {
        Ok(amount) if amount.is_zero() => push(errors, field, "must be greater than 0"),
        Ok(_) => {}
        Err(e) => push(errors, field, &e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&HarnessConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = HarnessConfig::default();
        config.blockchain.rpc_url = "not a url".to_string();
        config.blockchain.rpc_timeout_secs = 0;
        config.accounts.whale = "0x1234".to_string();
        config.scenarios.token_amount = "lots".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "blockchain.rpc_url",
                "blockchain.rpc_timeout_secs",
                "accounts.whale",
                "scenarios.token_amount",
            ]
        );
    }

    #[test]
    fn test_requires_target_source() {
        let mut config = HarnessConfig::default();
        config.contracts.target = None;
        config.contracts.target_artifact = None;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "contracts.target");
    }

    #[test]
    fn test_explicit_target_is_checked() {
        let mut config = HarnessConfig::default();
        config.contracts.target = Some("0xnothex".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().starts_with("contracts.target: invalid address"));
    }

    #[test]
    fn test_rejects_zero_amounts() {
        let mut config = HarnessConfig::default();
        config.funding.eth_in = "0".to_string();
        config.funding.min_token_gain = "0.0".to_string();
        config.scenarios.gas_top_up = "0".to_string();
        config.scenarios.token_amount = "0".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "funding.eth_in",
                "funding.min_token_gain",
                "scenarios.gas_top_up",
                "scenarios.token_amount",
            ]
        );
        assert!(errors.iter().all(|e| e.message == "must be greater than 0"));
    }

    #[test]
    fn test_rejects_amount_finer_than_token_decimals() {
        let mut config = HarnessConfig::default();
        config.contracts.stablecoin_decimals = 6;
        config.scenarios.token_amount = "0.0000001".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "scenarios.token_amount");
        assert!(errors[0].message.contains("more than 6 decimal places"));
    }

    #[test]
    fn test_log_level_is_checked() {
        let mut config = HarnessConfig::default();
        config.observability.log_level = "WARN".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "observability.log_level");
        assert!(errors[0].message.contains("trace|debug|info|warn|error"));
    }
}
