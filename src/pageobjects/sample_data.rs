//! Wazuh menu > Settings > Sample data

use super::registry::SelectorRegistry;
use crate::driver::Selector;
use crate::error::RegistryError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleDataPage {
    pub route: String,
    /// One "Add data" button per sample-data category card
    pub add_data_button: Selector,
    /// One "Remove data" button per category card that currently holds data
    pub remove_data_button: Selector,
    /// Success toast raised for each category once its data is added or removed
    pub data_added_successfully_toast: Selector,
}

impl Default for SampleDataPage {
    fn default() -> Self {
        Self {
            route: "/app/wazuh#/settings?tab=sample_data".to_string(),
            add_data_button: Selector::css(r#".euiCard button:has-text("Add data")"#),
            remove_data_button: Selector::css(r#".euiCard button:has-text("Remove data")"#),
            data_added_successfully_toast: Selector::css(
                r#"[class="euiToast euiToast--success euiGlobalToastListItem"]"#,
            ),
        }
    }
}

impl SampleDataPage {
    pub fn registry(&self) -> Result<SelectorRegistry, RegistryError> {
        SelectorRegistry::builder()
            .entry("addDataButton", self.add_data_button.clone())
            .entry("removeDataButton", self.remove_data_button.clone())
            .entry(
                "dataAddedSuccessfullyToast",
                self.data_added_successfully_toast.clone(),
            )
            .build()
    }
}
