//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → spans: run (run_id) → scenario (name)
//!
//! Consumers:
//!     → stderr, pretty or JSON lines
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing of CI runs
//! - Run ID flows through every event of a run
//! - `RUST_LOG` overrides the configured level

pub mod logging;

pub use logging::init_logging;
