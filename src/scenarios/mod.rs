//! Scenario suite.
//!
//! # Data Flow
//! ```text
//! HarnessConfig.scenarios
//!     → runner.rs (select, order, fail-fast)
//!     → for each scenario:
//!         funding.rs (buy stablecoin for the whale, if enabled)
//!         native.rs / token.rs (act, then assert)
//!     → report.rs (RunReport)
//! ```
//!
//! # Design Decisions
//! - Strictly sequential; one RPC call in flight at a time
//! - Setup runs before every scenario, so each one starts from a funded whale
//! - The runner only sees the `ScenarioExecutor` seam, which keeps it testable
//!   without a node

pub mod funding;
pub mod native;
pub mod report;
pub mod runner;
pub mod token;

use serde::Serialize;
use std::future::Future;

use crate::assertions::Observation;
use crate::error::{HarnessError, HarnessResult};

pub use report::{RunReport, ScenarioOutcome, ScenarioStatus};
pub use runner::ScenarioRunner;

/// Name reported for the setup step.
pub const SETUP_NAME: &str = "fund-whale";

/// A scenario of the suite, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// Top up the whale with native currency and check the exact delta.
    SendEther,
    /// Transfer the stablecoin from the whale to the target.
    TransferToken,
    /// Approve the target to spend the deployer's stablecoin.
    ApproveToken,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [
        Scenario::SendEther,
        Scenario::TransferToken,
        Scenario::ApproveToken,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::SendEther => "send-ether",
            Scenario::TransferToken => "transfer-token",
            Scenario::ApproveToken => "approve-token",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Scenario::SendEther => "should send ether to the whale",
            Scenario::TransferToken => "should transfer the stablecoin to the target",
            Scenario::ApproveToken => "should approve the stablecoin to the target",
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Scenario {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s.trim())
            .ok_or_else(|| HarnessError::UnknownScenario(s.to_string()))
    }
}

/// Something that can run the setup step and individual scenarios.
pub trait ScenarioExecutor {
    /// Setup run before each scenario.
    fn setup(&self) -> impl Future<Output = HarnessResult<Observation>>;

    /// Run one scenario and its assertion.
    fn execute(&self, scenario: Scenario) -> impl Future<Output = HarnessResult<Observation>>;
}
