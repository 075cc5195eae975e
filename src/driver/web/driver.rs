//! Web Driver implementation using Playwright
//!
//! This driver runs the scenarios against a real browser using the Playwright library.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use playwright::api::{Browser, BrowserContext, Page, Viewport};
use playwright::Playwright;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::driver::traits::{BrowserDriver, Selector};
use crate::utils::config::{BrowserType, Config};

/// Web Driver configuration
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    pub browser_type: BrowserType,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub ignore_https_errors: bool,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for WebDriverConfig {
    fn from(config: &Config) -> Self {
        Self {
            browser_type: config.browser,
            headless: config.headless,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            ignore_https_errors: config.ignore_https_errors,
        }
    }
}

/// Web Driver using Playwright
pub struct WebDriver {
    #[allow(dead_code)]
    playwright: Arc<Playwright>,
    browser: Arc<Browser>,
    #[allow(dead_code)]
    context: Arc<BrowserContext>,
    page: Arc<Mutex<Page>>,
}

impl WebDriver {
    /// Launch a browser and open a single page
    pub async fn new(config: WebDriverConfig) -> Result<Self> {
        let playwright = Playwright::initialize()
            .await
            .context("Failed to initialize Playwright")?;

        let (browser_type, name) = match config.browser_type {
            BrowserType::Chromium => (playwright.chromium(), "chromium"),
            BrowserType::Firefox => (playwright.firefox(), "firefox"),
            BrowserType::Webkit => (playwright.webkit(), "webkit"),
        };

        info!("Launching {} (headless: {})", name, config.headless);
        let browser = browser_type
            .launcher()
            .headless(config.headless)
            .launch()
            .await
            .with_context(|| format!("Failed to launch {}", name))?;

        let context = browser
            .context_builder()
            .ignore_https_errors(config.ignore_https_errors)
            .build()
            .await?;

        let page = context.new_page().await?;

        page.set_viewport_size(Viewport {
            width: config.viewport_width as i32,
            height: config.viewport_height as i32,
        })
        .await?;

        Ok(Self {
            playwright: Arc::new(playwright),
            browser: Arc::new(browser),
            context: Arc::new(context),
            page: Arc::new(Mutex::new(page)),
        })
    }
}

#[async_trait]
impl BrowserDriver for WebDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        let page = self.page.lock().await;
        debug!("goto {}", url);
        page.goto_builder(url)
            .goto()
            .await
            .with_context(|| format!("Failed to navigate to {}", url))?;
        Ok(())
    }

    async fn query_count(&self, selector: &Selector) -> Result<usize> {
        let page = self.page.lock().await;
        let sel = selector.value();
        let elements = page.query_selector_all(sel).await?;
        Ok(elements.len())
    }

    async fn element_texts(&self, selector: &Selector) -> Result<Vec<String>> {
        let page = self.page.lock().await;
        let sel = selector.value();
        let elements = page.query_selector_all(sel).await?;

        let mut texts = Vec::with_capacity(elements.len());
        for el in elements {
            texts.push(el.inner_text().await?);
        }
        Ok(texts)
    }

    async fn click(&self, selector: &Selector, index: usize) -> Result<()> {
        let page = self.page.lock().await;
        let sel = selector.value();
        let elements = page.query_selector_all(sel).await?;
        let count = elements.len();

        match elements.into_iter().nth(index) {
            Some(el) => {
                el.click_builder().click().await?;
                Ok(())
            }
            None => anyhow::bail!(
                "Element {} not found for selector {} ({} matched)",
                index,
                sel,
                count
            ),
        }
    }

    async fn fill(&self, selector: &Selector, text: &str) -> Result<()> {
        let page = self.page.lock().await;
        let sel = selector.value();
        match page.query_selector(sel).await? {
            Some(el) => {
                el.fill_builder(text).fill().await?;
                Ok(())
            }
            None => anyhow::bail!("Input not found for selector {}", sel),
        }
    }

    async fn take_screenshot(&self, path: &Path) -> Result<()> {
        let page = self.page.lock().await;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        page.screenshot_builder()
            .path(path.to_path_buf())
            .screenshot()
            .await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }
}
