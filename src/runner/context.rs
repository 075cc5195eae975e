use std::path::PathBuf;
use std::sync::Arc;

use crate::driver::common::PollConfig;
use crate::driver::{get_object, BrowserDriver, ElementQuery, Selector};
use crate::error::StepError;
use crate::pageobjects::PageObjects;
use crate::utils::config::Config;

/// Something an earlier step did that later steps check against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    SampleDataAdded { categories: usize },
    SampleDataRemoved { categories: usize },
}

/// Per-scenario execution context handed to every step
///
/// Driver, page objects and configuration are shared across the run; the
/// observations start empty for each scenario.
pub struct ScenarioContext {
    pub driver: Arc<dyn BrowserDriver>,
    pub pages: Arc<PageObjects>,
    pub config: Arc<Config>,
    pub feature_path: String,
    pub scenario_name: String,
    observations: Vec<Observation>,
}

impl ScenarioContext {
    pub fn new(
        driver: Arc<dyn BrowserDriver>,
        pages: Arc<PageObjects>,
        config: Arc<Config>,
        feature_path: &str,
        scenario_name: &str,
    ) -> Self {
        Self {
            driver,
            pages,
            config,
            feature_path: feature_path.to_string(),
            scenario_name: scenario_name.to_string(),
            observations: Vec::new(),
        }
    }

    pub fn poll(&self) -> PollConfig {
        self.config.poll_config()
    }

    /// Resolve `selector` with the configured command timeout
    pub async fn get_object(&self, selector: &Selector) -> Result<ElementQuery<'_>, StepError> {
        get_object(self.driver.as_ref(), selector, self.poll()).await
    }

    /// Navigate to a dashboard route (relative to the base URL)
    pub async fn visit(&mut self, route: &str) -> Result<(), StepError> {
        let url = self.config.url_for(route);
        self.driver.navigate(&url).await?;
        Ok(())
    }

    pub fn record(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    /// Value picked from the most recent observation `pick` accepts
    pub fn last_observed<T, P>(&self, pick: P) -> Option<T>
    where
        P: Fn(&Observation) -> Option<T>,
    {
        self.observations.iter().rev().find_map(pick)
    }

    /// Screenshot path for a failed step of this scenario, one directory per feature file
    pub fn failure_screenshot_path(&self, step_index: usize) -> PathBuf {
        let feature = sanitize(self.feature_path.trim_end_matches(".feature"));
        let scenario = sanitize(&self.scenario_name);
        self.config
            .output_dir
            .join("screenshots")
            .join(feature)
            .join(format!("{}_step{}.png", scenario, step_index))
    }
}

fn sanitize(name: &str) -> String {
    name.trim_start_matches(['.', '/', '\\'])
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
