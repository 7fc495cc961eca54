//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (optional private key)
//!     → wallet.rs (local signer for the deployer)
//!     → client.rs (RPC connection with timeouts, failover, impersonation)
//!     → transaction.rs (submit, poll receipt, confirm)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{BlockchainClient, SharedProvider};
pub use types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};
pub use wallet::Wallet;
