//! Integration harness for the CurveProtocol contract on a mainnet fork.

pub mod assertions;
pub mod blockchain;
pub mod config;
pub mod contracts;
pub mod error;
pub mod harness;
pub mod observability;
pub mod resilience;
pub mod scenarios;
pub mod units;

pub use config::HarnessConfig;
pub use error::{HarnessError, HarnessResult};
pub use harness::Harness;
pub use scenarios::{RunReport, Scenario, ScenarioRunner};
