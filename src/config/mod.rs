//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, deserialize, environment overrides)
//!     → validation.rs (semantic checks)
//!     → HarnessConfig (validated, immutable)
//!     → handed to Harness::connect
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AccountsConfig, BlockchainConfig, ContractsConfig, FundingConfig, HarnessConfig,
    ImpersonationMode, ObservabilityConfig, ScenarioConfig,
};
