use super::types::TestResults;
use crate::runner::state::{ScenarioStateReport, ScenarioStatus, StepStatus};
use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;

fn seconds(ms: u64) -> String {
    (ms as f64 / 1000.0).to_string()
}

fn is_failed(scenario: &ScenarioStateReport) -> bool {
    scenario.status == ScenarioStatus::Failed
}

/// Generate JUnit XML report string from TestResults
///
/// One `<testsuite>` per feature file, one `<testcase>` per scenario.
pub fn generate_junit_xml(results: &TestResults) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let total_tests = results.scenarios.len();
    let failures = results.scenarios.iter().filter(|s| is_failed(s)).count();
    let total_duration: u64 = results
        .scenarios
        .iter()
        .map(|s| s.total_duration_ms.unwrap_or(0))
        .sum();

    // <testsuites>
    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "wazuh-e2e"));
    suites_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suites_start.push_attribute(("failures", failures.to_string().as_str()));
    suites_start.push_attribute(("time", seconds(total_duration).as_str()));
    writer.write_event(Event::Start(suites_start))?;

    // Group scenarios by feature file, keeping first-seen order
    let mut features: Vec<(&str, Vec<&ScenarioStateReport>)> = Vec::new();
    for scenario in &results.scenarios {
        match features
            .iter_mut()
            .find(|(path, _)| *path == scenario.feature_path)
        {
            Some((_, group)) => group.push(scenario),
            None => features.push((scenario.feature_path.as_str(), vec![scenario])),
        }
    }

    for (id, (feature_path, scenarios)) in features.iter().enumerate() {
        let feature_name = scenarios
            .first()
            .map(|s| s.feature_name.as_str())
            .unwrap_or_default();
        let failures = scenarios.iter().filter(|s| is_failed(s)).count();
        let duration: u64 = scenarios
            .iter()
            .map(|s| s.total_duration_ms.unwrap_or(0))
            .sum();

        let mut suite_start = BytesStart::new("testsuite");
        suite_start.push_attribute(("name", feature_name));
        suite_start.push_attribute(("id", id.to_string().as_str()));
        suite_start.push_attribute(("file", *feature_path));
        suite_start.push_attribute(("tests", scenarios.len().to_string().as_str()));
        suite_start.push_attribute(("failures", failures.to_string().as_str()));
        suite_start.push_attribute(("time", seconds(duration).as_str()));
        suite_start.push_attribute(("timestamp", results.generated_at.as_str()));
        writer.write_event(Event::Start(suite_start))?;

        for scenario in scenarios {
            write_test_case(&mut writer, scenario)?;
        }

        writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let result = writer.into_inner().into_inner();
    let xml = String::from_utf8(result)?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(
    writer: &mut Writer<W>,
    scenario: &ScenarioStateReport,
) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");
    let classname = scenario
        .feature_path
        .trim_end_matches(".feature")
        .replace(['/', '\\'], ".");

    case_start.push_attribute(("name", scenario.scenario_name.as_str()));
    case_start.push_attribute(("classname", classname.as_str()));
    case_start.push_attribute((
        "time",
        seconds(scenario.total_duration_ms.unwrap_or(0)).as_str(),
    ));
    writer.write_event(Event::Start(case_start))?;

    if is_failed(scenario) {
        let failed_step = scenario
            .steps
            .iter()
            .find(|s| matches!(s.status, StepStatus::Failed { .. }));

        let mut fail_start = BytesStart::new("failure");
        fail_start.push_attribute((
            "message",
            scenario.error.as_deref().unwrap_or("Unknown error"),
        ));
        fail_start.push_attribute(("type", "StepFailure"));
        writer.write_event(Event::Start(fail_start))?;

        if let Some(step) = failed_step {
            let body = format!("line {}: {}", step.line, step.step_display);
            writer.write_event(Event::Text(BytesText::new(&body)))?;
        }

        writer.write_event(Event::End(BytesEnd::new("failure")))?;
    }

    // Step log, one line per step
    let log: Vec<String> = scenario
        .steps
        .iter()
        .map(|step| {
            let mark = match &step.status {
                StepStatus::Passed => "passed",
                StepStatus::Failed { .. } => "failed",
                StepStatus::Skipped { .. } => "skipped",
                StepStatus::Pending | StepStatus::Running => "not run",
            };
            format!("[{}] {}", mark, step.step_display)
        })
        .collect();
    writer.write_event(Event::Start(BytesStart::new("system-out")))?;
    writer.write_event(Event::Text(BytesText::new(&log.join("\n"))))?;
    writer.write_event(Event::End(BytesEnd::new("system-out")))?;

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// Write `junit.xml` into `output_dir`
pub fn write_report(results: &TestResults, output_dir: &Path) -> Result<()> {
    let path = output_dir.join("junit.xml");
    write_report_to(results, &path)
}

pub fn write_report_to(results: &TestResults, path: &Path) -> Result<()> {
    let xml = generate_junit_xml(results)?;
    std::fs::write(path, xml)
        .with_context(|| format!("Failed to write JUnit report {}", path.display()))?;
    println!("    Generated JUnit report: {}", path.display());
    Ok(())
}
