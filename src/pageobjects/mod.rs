//! Page objects: named selectors grouped by dashboard screen
//!
//! Built once per run and shared read-only with every step.

pub mod decoders;
pub mod login;
pub mod registry;
pub mod sample_data;

pub use decoders::DecodersPage;
pub use login::LoginPage;
pub use registry::{SelectorEntry, SelectorRegistry};
pub use sample_data::SampleDataPage;

use crate::error::RegistryError;

#[derive(Debug, Clone)]
pub struct PageObjects {
    pub login: LoginPage,
    pub decoders: DecodersPage,
    pub sample_data: SampleDataPage,
    registry: SelectorRegistry,
}

impl PageObjects {
    /// Build every page and validate the combined registry
    pub fn new() -> Result<Self, RegistryError> {
        Self::from_pages(
            LoginPage::default(),
            DecodersPage::default(),
            SampleDataPage::default(),
        )
    }

    pub fn from_pages(
        login: LoginPage,
        decoders: DecodersPage,
        sample_data: SampleDataPage,
    ) -> Result<Self, RegistryError> {
        let registry = SelectorRegistry::merge(&[
            ("login", &login.registry()?),
            ("decoders", &decoders.registry()?),
            ("sampleData", &sample_data.registry()?),
        ])?;

        Ok(Self {
            login,
            decoders,
            sample_data,
            registry,
        })
    }

    /// Every selector, qualified as `page.name`
    pub fn registry(&self) -> &SelectorRegistry {
        &self.registry
    }
}
