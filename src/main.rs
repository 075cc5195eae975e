use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use wazuh_e2e::pageobjects::PageObjects;
use wazuh_e2e::utils::config::{CliOverrides, Config};
use wazuh_e2e::{report, runner, steps};

#[derive(Parser)]
#[command(name = "wazuh-e2e")]
#[command(version = "0.1.0")]
#[command(about = "Browser end-to-end tests for the Wazuh dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run feature file(s) or a directory of them
    Run {
        /// Path to a .feature file or directory
        path: PathBuf,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Filter scenarios by tags (comma-separated, all must match)
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Dashboard base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Run the browser headless
        #[arg(long, default_value = "false")]
        headless: bool,

        /// Browser engine (chromium, firefox, webkit)
        #[arg(short, long)]
        browser: Option<String>,

        /// Output directory for reports and screenshots
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Screenshot the page when a step fails
        #[arg(long, short = 's', default_value = "false")]
        snapshot: bool,

        /// Generate reports (JSON, JUnit)
        #[arg(long, default_value = "false")]
        report: bool,

        /// Keep running remaining scenarios after a failure
        #[arg(long, default_value = "false")]
        continue_on_failure: bool,
    },

    /// List registered step phrases
    Steps,

    /// Print every page object selector
    Selectors,

    /// Generate report from test results
    Report {
        /// Path to test-results.json
        results: PathBuf,

        /// Output format (json, junit)
        #[arg(short, long, default_value = "junit")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            path,
            config,
            tags,
            base_url,
            headless,
            browser,
            output,
            snapshot,
            report,
            continue_on_failure,
        } => {
            let mut cfg = Config::load(config.as_deref())?;
            cfg.apply_cli(CliOverrides {
                base_url,
                headless,
                browser,
                output_dir: output,
                continue_on_failure,
            })?;

            println!(
                "{} Running features from: {}",
                "▶".green().bold(),
                path.display()
            );
            println!("  Dashboard: {}", cfg.base_url.cyan());
            println!("  Browser: {:?}", cfg.browser);
            if !tags.is_empty() {
                println!("  Tags: {}", tags.join(", ").yellow());
            }
            println!("  Output: {}", cfg.output_dir.display().to_string().cyan());
            if snapshot {
                println!("  Snapshots: {}", "Enabled".green());
            }
            if report {
                println!("  Reports: {}", "Enabled".green());
            }

            runner::run_features(
                &path,
                cfg,
                runner::RunOptions {
                    tags,
                    snapshot,
                    report,
                },
            )
            .await?;
        }

        Commands::Steps => {
            let registry = steps::standard_registry()?;
            for def in registry.definitions() {
                println!("{:<28} {}", format!("{:?}", def.id).blue(), def.phrase);
            }
        }

        Commands::Selectors => {
            let pages = PageObjects::new()?;
            for entry in pages.registry().entries() {
                println!("{:<40} {}", entry.name.cyan(), entry.selector);
            }
        }

        Commands::Report {
            results,
            format,
            output,
        } => {
            println!(
                "{} Generating {} report from: {}",
                "📊".to_string().blue(),
                format.cyan(),
                results.display()
            );
            report::generate_report(&results, &format, output.as_deref()).await?;
        }
    }

    Ok(())
}
