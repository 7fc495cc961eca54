//! Balance assertions over arbitrary-precision amounts.
//!
//! Every comparison is done on `U256`; a balance that went down where an
//! increase was expected is reported as a failure, never an underflow panic.

use alloy::primitives::U256;
use serde::Serialize;
use thiserror::Error;

/// A failed balance check.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[error("{message}: expected {expected}, observed {observed}")]
pub struct AssertionFailure {
    pub message: String,
    pub expected: String,
    pub observed: String,
}

/// What a passing check saw, for the run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub expected: String,
    pub observed: String,
}

pub type AssertionResult = Result<Observation, AssertionFailure>;

/// `after - before == expected`.
pub fn assert_exact_delta(what: &str, before: U256, after: U256, expected: U256) -> AssertionResult {
    let Some(delta) = after.checked_sub(before) else {
        return Err(AssertionFailure {
            message: format!("{} decreased", what),
            expected: format!("+{}", expected),
            observed: format!("-{}", before - after),
        });
    };

    if delta != expected {
        return Err(AssertionFailure {
            message: format!("{} changed by the wrong amount", what),
            expected: format!("+{}", expected),
            observed: format!("+{}", delta),
        });
    }

    Ok(Observation {
        expected: format!("+{}", expected),
        observed: format!("+{}", delta),
    })
}

/// `observed >= minimum`.
pub fn assert_at_least(what: &str, observed: U256, minimum: U256) -> AssertionResult {
    if observed < minimum {
        return Err(AssertionFailure {
            message: format!("{} below minimum", what),
            expected: format!(">= {}", minimum),
            observed: observed.to_string(),
        });
    }

    Ok(Observation {
        expected: format!(">= {}", minimum),
        observed: observed.to_string(),
    })
}

/// `after - before >= minimum`.
pub fn assert_gain_at_least(what: &str, before: U256, after: U256, minimum: U256) -> AssertionResult {
    match after.checked_sub(before) {
        Some(gain) => assert_at_least(what, gain, minimum).map(|obs| Observation {
            expected: format!("+{}", obs.expected),
            observed: format!("+{}", obs.observed),
        }),
        None => Err(AssertionFailure {
            message: format!("{} decreased", what),
            expected: format!("+>= {}", minimum),
            observed: format!("-{}", before - after),
        }),
    }
}
