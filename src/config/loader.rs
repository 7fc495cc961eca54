//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::HarnessConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `blockchain.rpc_url`.
pub const RPC_URL_ENV_VAR: &str = "CURVE_HARNESS_RPC_URL";

/// Environment variable overriding `contracts.target`.
pub const TARGET_ENV_VAR: &str = "CURVE_HARNESS_TARGET";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
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
///
/// Environment overrides are applied before validation.
pub fn load_config(path: &Path) -> Result<HarnessConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse, apply environment overrides and validate configuration text.
pub fn parse_config(content: &str) -> Result<HarnessConfig, ConfigError> {
    let mut config: HarnessConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    apply_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build the default configuration, with environment overrides, validated.
pub fn default_config() -> Result<HarnessConfig, ConfigError> {
    parse_config("")
}

fn apply_overrides(config: &mut HarnessConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(RPC_URL_ENV_VAR) {
        tracing::debug!(rpc_url = %url, "RPC URL overridden from environment");
        config.blockchain.rpc_url = url;
    }
    if let Some(target) = lookup(TARGET_ENV_VAR) {
        tracing::debug!(target = %target, "Target overridden from environment");
        config.contracts.target = Some(target);
    }
}
