pub mod context;
pub mod events;
pub mod executor;
pub mod plan;
pub mod state;

use anyhow::{Context, Result};
use colored::Colorize;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use events::*;
pub use plan::{plan_scenarios, PlannedScenario, PlannedStep};
pub use state::*;

use crate::driver::BrowserDriver;
use crate::pageobjects::PageObjects;
use crate::parser::{parse_feature_file, Feature};
use crate::steps::standard_registry;
use crate::utils::config::Config;

/// Per-invocation switches that don't belong in the config file
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Scenario must carry every tag (feature tags count, a leading `@` is ignored)
    pub tags: Vec<String>,
    /// Screenshot the page when a step fails
    pub snapshot: bool,
    /// Write test-results.json and junit.xml
    pub report: bool,
}

/// Collect `.feature` files under `path` (or `path` itself), sorted
pub fn collect_feature_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        anyhow::bail!("Path not found: {}", path.display());
    }
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().map_or(false, |ext| ext == "feature"))
        .collect();
    files.sort();
    Ok(files)
}

pub fn load_features(path: &Path) -> Result<Vec<Feature>> {
    collect_feature_files(path)?
        .iter()
        .map(|file| parse_feature_file(file))
        .collect()
}

/// Run the feature files at `path` against a freshly launched browser
///
/// Fails when any step cannot be resolved (before the browser starts) or
/// when any scenario fails.
pub async fn run_features(path: &Path, config: Config, options: RunOptions) -> Result<()> {
    let features = load_features(path)?;
    if features.is_empty() {
        println!("{} No feature files found in {}", "ℹ".blue(), path.display());
        return Ok(());
    }

    let registry = standard_registry()?;
    let scenarios = plan_scenarios(&features, &registry, &options.tags)?;
    if scenarios.is_empty() {
        println!(
            "{} No scenarios match tags {:?}",
            "ℹ".blue(),
            options.tags
        );
        return Ok(());
    }
    info!(
        "Running {} scenario(s) from {} feature file(s)",
        scenarios.len(),
        features.len()
    );

    let driver = crate::driver::launch(&config)
        .await
        .context("Failed to launch browser")?;
    let result = run_with_driver(driver.clone(), config, &scenarios, &options).await;

    if let Err(e) = driver.close().await {
        warn!("Failed to close browser: {:#}", e);
    }

    let report = result?;
    if report.summary.failed_scenarios > 0 {
        anyhow::bail!(
            "{} of {} scenario(s) failed",
            report.summary.failed_scenarios,
            report.summary.total_scenarios
        );
    }
    Ok(())
}

/// Execute planned scenarios on an already running driver
pub async fn run_with_driver(
    driver: Arc<dyn BrowserDriver>,
    config: Config,
    scenarios: &[PlannedScenario],
    options: &RunOptions,
) -> Result<TestSessionReport> {
    let pages = PageObjects::new()?;
    let mut executor =
        executor::TestExecutor::new(driver, Arc::new(pages), Arc::new(config), options);
    executor.run(scenarios).await;
    executor.finish().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::fake::FakeDriver;

    const SAMPLE_DATA: &str = r#"
@sample-data
Feature: Sample data

  Scenario: Remove sample data
    Given The wazuh admin user is logged
    When The user navigates to the sample data page
    And The user removes sample data for each category
    Then The remove data success toasts are displayed
"#;

    #[test]
    fn test_collect_feature_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b.feature"), SAMPLE_DATA).unwrap();
        std::fs::write(dir.path().join("nested/a.feature"), SAMPLE_DATA).unwrap();
        std::fs::write(dir.path().join("notes.md"), "not a feature").unwrap();

        let files = collect_feature_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("b.feature"));
        assert!(files[1].ends_with("nested/a.feature"));

        let single = collect_feature_files(&dir.path().join("b.feature")).unwrap();
        assert_eq!(single.len(), 1);

        assert!(collect_feature_files(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("broken.feature"),
            "Scenario: Y\n    Given The wazuh admin user is logged\n",
        )
        .unwrap();
        let err = load_features(dir.path()).unwrap_err();
        assert!(err.to_string().contains("broken.feature"));
    }

    #[test]
    fn test_shipped_features_resolve() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("features");
        let features = load_features(&dir).unwrap();
        assert_eq!(features.len(), 2);

        let scenarios = plan_scenarios(&features, &standard_registry().unwrap(), &[]).unwrap();
        assert_eq!(scenarios.len(), 5);

        let smoke =
            plan_scenarios(&features, &standard_registry().unwrap(), &["smoke".to_string()])
                .unwrap();
        assert_eq!(smoke.len(), 2);
    }

    #[tokio::test]
    async fn test_feature_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let feature_path = dir.path().join("sample-data.feature");
        std::fs::write(&feature_path, SAMPLE_DATA).unwrap();

        let pages = PageObjects::new().unwrap();
        let driver = FakeDriver::new();
        driver.set_count(pages.login.app_header.value(), 1);
        driver.set_count(pages.sample_data.remove_data_button.value(), 3);
        let toast = pages.sample_data.data_added_successfully_toast.value().to_string();
        driver.on_click(pages.sample_data.remove_data_button.value(), move |dom| {
            dom.push(&toast, "Data removed");
        });

        let features = load_features(dir.path()).unwrap();
        let scenarios =
            plan_scenarios(&features, &standard_registry().unwrap(), &["sample-data".to_string()])
                .unwrap();
        let config = Config {
            default_timeout_ms: 100,
            poll_interval_ms: 5,
            output_dir: dir.path().join("output"),
            ..Config::default()
        };
        let options = RunOptions {
            report: true,
            ..RunOptions::default()
        };

        let report = run_with_driver(Arc::new(driver.clone()), config, &scenarios, &options)
            .await
            .unwrap();

        assert_eq!(report.summary.failed_scenarios, 0);
        assert_eq!(report.summary.passed, 4);
        assert_eq!(report.scenarios[0].feature_path, feature_path.display().to_string());
        assert_eq!(driver.count(pages.sample_data.data_added_successfully_toast.value()), 3);

        let saved = crate::report::json::read_results(&dir.path().join("output/test-results.json"))
            .unwrap();
        assert_eq!(saved.scenarios.len(), 1);
    }
}
