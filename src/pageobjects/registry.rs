use std::collections::HashSet;

use crate::driver::Selector;
use crate::error::RegistryError;

/// A named selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorEntry {
    pub name: String,
    pub selector: Selector,
}

/// Immutable, validated set of named selectors
///
/// Names are unique and no value is blank. Entries keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorRegistry {
    entries: Vec<SelectorEntry>,
}

impl SelectorRegistry {
    pub fn builder() -> SelectorRegistryBuilder {
        SelectorRegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&Selector> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.selector)
    }

    pub fn entries(&self) -> &[SelectorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Combine registries, qualifying every name as `prefix.name`
    pub fn merge(parts: &[(&str, &SelectorRegistry)]) -> Result<Self, RegistryError> {
        let mut builder = Self::builder();
        for (prefix, registry) in parts {
            for entry in registry.entries() {
                builder = builder.entry(format!("{}.{}", prefix, entry.name), entry.selector.clone());
            }
        }
        builder.build()
    }
}

#[derive(Debug, Default)]
pub struct SelectorRegistryBuilder {
    entries: Vec<SelectorEntry>,
}

impl SelectorRegistryBuilder {
    pub fn entry(mut self, name: impl Into<String>, selector: Selector) -> Self {
        self.entries.push(SelectorEntry {
            name: name.into(),
            selector,
        });
        self
    }

    pub fn build(self) -> Result<SelectorRegistry, RegistryError> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if entry.name.trim().is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if entry.selector.is_empty() {
                return Err(RegistryError::EmptyValue(entry.name.clone()));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(RegistryError::DuplicateName(entry.name.clone()));
            }
        }
        Ok(SelectorRegistry {
            entries: self.entries,
        })
    }
}
