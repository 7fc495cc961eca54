//! Decimal amounts to and from base units.
//!
//! Amounts in config files are human-readable decimals (`"0.1"` ether,
//! `"100"` DAI). Everything on the wire is a `U256` in base units.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;
use thiserror::Error;

/// Decimals of the native currency.
pub const ETHER_DECIMALS: u8 = 18;

/// Error raised for an amount that is not a non-negative decimal.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid amount '{input}': {reason}")]
pub struct AmountError {
    pub input: String,
    pub reason: String,
}

/// Parse a decimal string into base units for a token with `decimals`.
pub fn parse_amount(input: &str, decimals: u8) -> Result<U256, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.starts_with('-') {
        return Err(AmountError {
            input: input.to_string(),
            reason: "expected a non-negative decimal".to_string(),
        });
    }
    if let Some((_, fraction)) = trimmed.split_once('.') {
        if fraction.len() > decimals as usize {
            return Err(AmountError {
                input: input.to_string(),
                reason: format!("more than {} decimal places", decimals),
            });
        }
    }

    parse_units(trimmed, decimals)
        .map(Into::into)
        .map_err(|e| AmountError {
            input: input.to_string(),
            reason: e.to_string(),
        })
}

/// Parse an ether amount into wei.
pub fn ether(input: &str) -> Result<U256, AmountError> {
    parse_amount(input, ETHER_DECIMALS)
}

/// Render base units as a decimal string without trailing zeros.
pub fn format_amount(value: U256, decimals: u8) -> String {
    let formatted = match format_units(value, decimals) {
        Ok(formatted) => formatted,
        Err(_) => return value.to_string(),
    };
    if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        formatted
    }
}
