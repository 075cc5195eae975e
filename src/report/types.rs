use crate::runner::state::{ScenarioStateReport, TestSessionReport, TestSummary};
use serde::{Deserialize, Serialize};

/// Test results for report generation
///
/// Written as `test-results.json` at the end of a run and read back by the
/// `report` subcommand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResults {
    pub session_id: String,
    pub scenarios: Vec<ScenarioStateReport>,
    pub summary: TestSummary,
    pub generated_at: String,
}

impl TestResults {
    pub fn from_session(report: TestSessionReport) -> Self {
        Self {
            session_id: report.session_id,
            scenarios: report.scenarios,
            summary: report.summary,
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
