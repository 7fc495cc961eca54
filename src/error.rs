//! Top-level error type for harness operations.

use thiserror::Error;

use crate::assertions::AssertionFailure;
use crate::blockchain::BlockchainError;
use crate::contracts::artifact::ArtifactError;

/// Errors that fail a scenario or stop the harness from connecting.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error("assertion failed: {0}")]
    Assertion(#[from] AssertionFailure),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// A configured value could not be used.
    #[error("invalid {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),
}

impl HarnessError {
    pub fn invalid(field: &str, reason: impl std::fmt::Display) -> Self {
        Self::Invalid {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;
