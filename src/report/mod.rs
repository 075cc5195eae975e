pub mod json;
pub mod junit;
pub mod types;

use anyhow::Result;
use std::path::Path;

pub use types::TestResults;

/// Re-render a saved results file
pub async fn generate_report(
    results_path: &Path,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let test_results = json::read_results(results_path)?;

    match format {
        "json" => json::generate(&test_results, output).await,
        "junit" => match output {
            Some(path) => junit::write_report_to(&test_results, path),
            None => {
                println!("{}", junit::generate_junit_xml(&test_results)?);
                Ok(())
            }
        },
        _ => anyhow::bail!("Unknown format: {} (expected json or junit)", format),
    }
}

/// Write `test-results.json` and `junit.xml` into `output_dir`
pub async fn write_all(results: &TestResults, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;
    json::generate(results, Some(&output_dir.join("test-results.json"))).await?;
    junit::write_report(results, output_dir)
}
