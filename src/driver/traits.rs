use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;

/// CSS selector for rendered page elements, including the engine's
/// pseudo-class extensions
///
/// Values are opaque to this crate; only the driver interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector(String);

impl Selector {
    pub fn css(value: impl Into<String>) -> Self {
        Selector(value.into())
    }

    /// Raw selector expression
    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Browser driver interface
///
/// The query layer builds retries and assertions on top of these
/// single-shot operations, so implementations must not wait for elements
/// themselves.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate the page to an absolute URL
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Number of elements currently matching the selector
    async fn query_count(&self, selector: &Selector) -> Result<usize>;

    /// Visible text of every element currently matching the selector, in document order
    async fn element_texts(&self, selector: &Selector) -> Result<Vec<String>>;

    /// Click the `index`-th (0-based) element matching the selector
    async fn click(&self, selector: &Selector, index: usize) -> Result<()>;

    /// Replace the value of the first input matching the selector
    async fn fill(&self, selector: &Selector, text: &str) -> Result<()>;

    /// Save a screenshot of the page
    async fn take_screenshot(&self, path: &Path) -> Result<()>;

    /// Release the browser
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
