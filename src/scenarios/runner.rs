//! Sequential scenario runner.

use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::assertions::Observation;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::scenarios::report::{RunReport, ScenarioOutcome, ScenarioStatus};
use crate::scenarios::{Scenario, ScenarioExecutor, SETUP_NAME};

/// Runs the selected scenarios one after another.
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    scenarios: Vec<Scenario>,
    setup_before_each: bool,
    fail_fast: bool,
}

impl ScenarioRunner {
    pub fn new(scenarios: Vec<Scenario>, setup_before_each: bool, fail_fast: bool) -> Self {
        Self {
            scenarios,
            setup_before_each,
            fail_fast,
        }
    }

    /// Build a runner from configuration. `only` selects scenarios by name;
    /// order always follows the suite order.
    pub fn from_config(config: &HarnessConfig) -> HarnessResult<Self> {
        let selected = select(&config.scenarios.only)?;
        Ok(Self::new(selected, config.funding.enabled, config.scenarios.fail_fast))
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Run every selected scenario against `executor`.
    pub async fn run<E: ScenarioExecutor>(&self, executor: &E) -> RunReport {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("run", %run_id);
        self.run_inner(run_id, executor).instrument(span).await
    }

    async fn run_inner<E: ScenarioExecutor>(&self, run_id: Uuid, executor: &E) -> RunReport {
        let started = Instant::now();
        let mut outcomes = Vec::with_capacity(self.scenarios.len());
        let mut halted = false;

        tracing::info!(scenarios = self.scenarios.len(), "Starting run");

        for &scenario in &self.scenarios {
            if halted {
                outcomes.push(outcome(scenario, ScenarioStatus::Skipped, None, None, 0));
                continue;
            }

            let scenario_started = Instant::now();
            let result = self
                .run_one(scenario, executor)
                .instrument(tracing::info_span!("scenario", name = scenario.name()))
                .await;
            let elapsed = scenario_started.elapsed().as_millis() as u64;

            match result {
                Ok(observation) => {
                    tracing::info!(scenario = scenario.name(), observed = %observation.observed, "Scenario passed");
                    outcomes.push(outcome(scenario, ScenarioStatus::Passed, Some(observation), None, elapsed));
                }
                Err(e) => {
                    tracing::error!(scenario = scenario.name(), error = %e, "Scenario failed");
                    outcomes.push(outcome(scenario, ScenarioStatus::Failed, None, Some(e.to_string()), elapsed));
                    halted = self.fail_fast;
                }
            }
        }

        let report = RunReport {
            run_id,
            outcomes,
            duration_ms: started.elapsed().as_millis() as u64,
        };
        tracing::info!(
            passed = report.passed(),
            failed = report.failed(),
            skipped = report.skipped(),
            "Run finished"
        );
        report
    }

    async fn run_one<E: ScenarioExecutor>(&self, scenario: Scenario, executor: &E) -> Result<Observation, String> {
        if self.setup_before_each {
            executor
                .setup()
                .await
                .map_err(|e| format!("{} failed: {}", SETUP_NAME, e))?;
        }
        executor.execute(scenario).await.map_err(|e| e.to_string())
    }
}

fn select(only: &[String]) -> Result<Vec<Scenario>, HarnessError> {
    if only.is_empty() {
        return Ok(Scenario::ALL.to_vec());
    }
    let wanted = only
        .iter()
        .map(|name| name.parse::<Scenario>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Scenario::ALL
        .into_iter()
        .filter(|s| wanted.contains(s))
        .collect())
}

fn outcome(
    scenario: Scenario,
    status: ScenarioStatus,
    observation: Option<Observation>,
    error: Option<String>,
    duration_ms: u64,
) -> ScenarioOutcome {
    let (expected, observed) = match observation {
        Some(o) => (Some(o.expected), Some(o.observed)),
        None => (None, None),
    };
    ScenarioOutcome {
        name: scenario.name().to_string(),
        description: scenario.description().to_string(),
        status,
        expected,
        observed,
        error,
        duration_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertions::AssertionFailure;
    use std::cell::RefCell;

    /// Records calls and fails the scenarios it is told to.
    #[derive(Default)]
    struct ScriptedExecutor {
        calls: RefCell<Vec<String>>,
        failing: Vec<Scenario>,
        setup_fails: bool,
    }

    impl ScenarioExecutor for ScriptedExecutor {
        async fn setup(&self) -> HarnessResult<Observation> {
            self.calls.borrow_mut().push(SETUP_NAME.to_string());
            if self.setup_fails {
                return Err(HarnessError::invalid("funding", "exchange missing"));
            }
            Ok(Observation {
                expected: "+>= 1000".to_string(),
                observed: "+1200".to_string(),
            })
        }

        async fn execute(&self, scenario: Scenario) -> HarnessResult<Observation> {
            self.calls.borrow_mut().push(scenario.name().to_string());
            if self.failing.contains(&scenario) {
                return Err(AssertionFailure {
                    message: "balance below minimum".to_string(),
                    expected: ">= 100".to_string(),
                    observed: "0".to_string(),
                }
                .into());
            }
            Ok(Observation {
                expected: ">= 100".to_string(),
                observed: "100".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_setup_runs_before_each_scenario() {
        let executor = ScriptedExecutor::default();
        let report = ScenarioRunner::new(Scenario::ALL.to_vec(), true, true)
            .run(&executor)
            .await;

        assert!(report.is_success());
        assert_eq!(report.passed(), 3);
        assert_eq!(
            *executor.calls.borrow(),
            vec![
                "fund-whale",
                "send-ether",
                "fund-whale",
                "transfer-token",
                "fund-whale",
                "approve-token"
            ]
        );
        assert_eq!(report.outcomes[0].observed.as_deref(), Some("100"));
    }

    #[tokio::test]
    async fn test_fail_fast_skips_the_rest() {
        let executor = ScriptedExecutor {
            failing: vec![Scenario::SendEther],
            ..Default::default()
        };
        let report = ScenarioRunner::new(Scenario::ALL.to_vec(), false, true)
            .run(&executor)
            .await;

        assert_eq!((report.passed(), report.failed(), report.skipped()), (0, 1, 2));
        assert_eq!(*executor.calls.borrow(), vec!["send-ether"]);
        assert!(report.outcomes[0]
            .error
            .as_deref()
            .unwrap()
            .starts_with("assertion failed: balance below minimum"));
    }

    #[tokio::test]
    async fn test_keep_going_without_fail_fast() {
        let executor = ScriptedExecutor {
            failing: vec![Scenario::TransferToken],
            ..Default::default()
        };
        let report = ScenarioRunner::new(Scenario::ALL.to_vec(), false, false)
            .run(&executor)
            .await;

        assert_eq!((report.passed(), report.failed(), report.skipped()), (2, 1, 0));
        assert_eq!(report.outcomes[1].status, ScenarioStatus::Failed);
    }

    #[tokio::test]
    async fn test_setup_failure_fails_scenario() {
        let executor = ScriptedExecutor {
            setup_fails: true,
            ..Default::default()
        };
        let report = ScenarioRunner::new(vec![Scenario::ApproveToken], true, true)
            .run(&executor)
            .await;

        assert_eq!(report.failed(), 1);
        assert_eq!(*executor.calls.borrow(), vec!["fund-whale"]);
        assert!(report.outcomes[0]
            .error
            .as_deref()
            .unwrap()
            .starts_with("fund-whale failed: invalid funding"));
    }

    #[test]
    fn test_selection_keeps_suite_order() {
        let only = vec!["approve-token".to_string(), "send-ether".to_string()];
        assert_eq!(select(&only).unwrap(), vec![Scenario::SendEther, Scenario::ApproveToken]);
        assert_eq!(select(&[]).unwrap(), Scenario::ALL.to_vec());
        assert!(select(&["exchange".to_string()]).is_err());
    }

    #[test]
    fn test_from_config() {
        let mut config = HarnessConfig::default();
        config.funding.enabled = false;
        config.scenarios.only = vec!["transfer-token".to_string()];
        let runner = ScenarioRunner::from_config(&config).unwrap();
        assert_eq!(runner.scenarios(), &[Scenario::TransferToken]);
        assert!(!runner.setup_before_each);
    }
}
