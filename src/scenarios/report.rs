//! Run results.

use serde::Serialize;
use uuid::Uuid;

/// Final state of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Passed,
    Failed,
    /// Not run because an earlier scenario failed in fail-fast mode.
    Skipped,
}

/// Result of one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub description: String,
    pub status: ScenarioStatus,
    /// Bound or exact value the assertion checked against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Results of a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub outcomes: Vec<ScenarioOutcome>,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn count(&self, status: ScenarioStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn passed(&self) -> usize {
        self.count(ScenarioStatus::Passed)
    }

    pub fn failed(&self) -> usize {
        self.count(ScenarioStatus::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(ScenarioStatus::Skipped)
    }

    /// True when nothing failed and nothing was skipped.
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.skipped() == 0
    }

    /// Human-readable summary, one line per scenario.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for outcome in &self.outcomes {
            let mark = match outcome.status {
                ScenarioStatus::Passed => "ok",
                ScenarioStatus::Failed => "FAILED",
                ScenarioStatus::Skipped => "skipped",
            };
            out.push_str(&format!(
                "{:<8} {} ({} ms)\n",
                mark, outcome.description, outcome.duration_ms
            ));
            if let Some(error) = &outcome.error {
                out.push_str(&format!("         {}\n", error));
            }
        }
        out.push_str(&format!(
            "\n{} passed, {} failed, {} skipped in {} ms\n",
            self.passed(),
            self.failed(),
            self.skipped(),
            self.duration_ms
        ));
        out
    }
}
