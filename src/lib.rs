pub mod driver;
pub mod error;
pub mod pageobjects;
pub mod parser;
pub mod report;
pub mod runner;
pub mod steps;
pub mod utils;

// Re-export common items
pub use report::generate_report;
pub use runner::{run_features, RunOptions};
pub use utils::config::Config;
