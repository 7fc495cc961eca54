//! Resilience helpers for RPC traffic.
//!
//! # Data Flow
//! ```text
//! RPC read:
//!     → timeouts.rs (enforce per-call deadline)
//!     → on failure: next provider in the failover list
//!
//! Receipt polling:
//!     → backoff.rs (jittered exponential delay between polls)
//!     → timeouts.rs (overall receipt deadline)
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - State-changing calls are never retried
//! - Polling backs off so a slow node is not hammered

pub mod backoff;
pub mod timeouts;

pub use backoff::{calculate_backoff, PollBackoff};
pub use timeouts::with_timeout;
