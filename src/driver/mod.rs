pub mod common;
#[cfg(test)]
pub mod fake;
pub mod query;
pub mod traits;
pub mod web;

pub use query::{assert_length, get_object, ElementQuery};
pub use traits::{BrowserDriver, Selector};

use anyhow::Result;
use std::sync::Arc;

use crate::utils::config::Config;

/// Launch the browser driver described by the configuration
pub async fn launch(config: &Config) -> Result<Arc<dyn BrowserDriver>> {
    let driver = web::WebDriver::new(web::WebDriverConfig::from(config)).await?;
    Ok(Arc::new(driver))
}
