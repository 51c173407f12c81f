//! Results of running a test scaffold.

use serde::{Deserialize, Serialize};

use super::assertion::AssertionGroup;

/// Outcome of a single assertion as reported by the scaffold trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionOutcome {
    /// Group the assertion ran under, if a header preceded it.
    pub group: Option<AssertionGroup>,
    /// Assertion description.
    pub description: String,
    /// Whether it passed.
    pub passed: bool,
    /// Failure detail printed by the scaffold (empty on pass).
    pub detail: String,
}

/// Aggregated result of one scaffold run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunResult {
    /// Assertions that passed.
    pub passed: usize,
    /// Assertions that failed.
    pub failed: usize,
    /// Assertions that ran.
    pub total: usize,
    /// Exit code of the scaffold process.
    pub exit_code: i32,
    /// Per-assertion outcomes in trace order.
    pub outcomes: Vec<AssertionOutcome>,
}

impl TestRunResult {
    /// Returns `true` if no assertion failed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.exit_code == 0
    }

    /// Returns only the failed outcomes.
    #[must_use]
    pub fn failures(&self) -> Vec<&AssertionOutcome> {
        self.outcomes.iter().filter(|o| !o.passed).collect()
    }

    /// The scaffold's summary line, `<passed>/<total> passed`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{}/{} passed", self.passed, self.total)
    }
}
