//! Scripted in-memory driver for tests
//!
//! The "page" is a map from selector to the texts of its matching elements.
//! Clicks can trigger effects on that map and counts can be scheduled to
//! change after a delay, which is enough to exercise the polling layer and
//! whole scenarios without a browser.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::traits::{BrowserDriver, Selector};

/// Selector -> element texts
#[derive(Debug, Default)]
pub struct FakeDom {
    elements: HashMap<String, Vec<String>>,
}

impl FakeDom {
    pub fn set_elements(&mut self, selector: &str, texts: &[&str]) {
        self.elements.insert(
            selector.to_string(),
            texts.iter().map(|t| t.to_string()).collect(),
        );
    }

    pub fn set_count(&mut self, selector: &str, count: usize) {
        self.elements
            .insert(selector.to_string(), vec![String::new(); count]);
    }

    pub fn push(&mut self, selector: &str, text: &str) {
        self.elements
            .entry(selector.to_string())
            .or_default()
            .push(text.to_string());
    }

    pub fn count(&self, selector: &str) -> usize {
        self.elements.get(selector).map_or(0, Vec::len)
    }
}

type ClickEffect = Box<dyn Fn(&mut FakeDom) + Send + Sync>;

#[derive(Default)]
struct FakeState {
    dom: FakeDom,
    scheduled: Vec<(Instant, String, usize)>,
    effects: HashMap<String, ClickEffect>,
    clicks: Vec<(String, usize)>,
    fills: Vec<(String, String)>,
    navigations: Vec<String>,
    query_error: Option<String>,
}

impl FakeState {
    fn apply_due(&mut self) {
        let now = Instant::now();
        let (due, pending): (Vec<_>, Vec<_>) =
            self.scheduled.drain(..).partition(|(at, _, _)| *at <= now);
        self.scheduled = pending;
        for (_, selector, count) in due {
            self.dom.set_count(&selector, count);
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeDriver {
    state: Arc<Mutex<FakeState>>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn set_elements(&self, selector: &str, texts: &[&str]) {
        self.with(|s| s.dom.set_elements(selector, texts));
    }

    pub fn set_count(&self, selector: &str, count: usize) {
        self.with(|s| s.dom.set_count(selector, count));
    }

    /// Change the number of matches once `delay` has elapsed
    pub fn set_count_after(&self, selector: &str, count: usize, delay: Duration) {
        self.with(|s| {
            s.scheduled
                .push((Instant::now() + delay, selector.to_string(), count))
        });
    }

    /// Run `effect` against the page every time an element matching `selector` is clicked
    pub fn on_click<F>(&self, selector: &str, effect: F)
    where
        F: Fn(&mut FakeDom) + Send + Sync + 'static,
    {
        self.with(|s| {
            s.effects.insert(selector.to_string(), Box::new(effect));
        });
    }

    pub fn fail_queries(&self, message: &str) {
        self.with(|s| s.query_error = Some(message.to_string()));
    }

    pub fn count(&self, selector: &str) -> usize {
        self.with(|s| s.dom.count(selector))
    }

    pub fn clicks(&self) -> Vec<(String, usize)> {
        self.with(|s| s.clicks.clone())
    }

    pub fn fills(&self) -> Vec<(String, String)> {
        self.with(|s| s.fills.clone())
    }

    pub fn navigations(&self) -> Vec<String> {
        self.with(|s| s.navigations.clone())
    }
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.with(|s| s.navigations.push(url.to_string()));
        Ok(())
    }

    async fn query_count(&self, selector: &Selector) -> Result<usize> {
        self.with(|s| {
            if let Some(ref message) = s.query_error {
                anyhow::bail!("{}", message);
            }
            s.apply_due();
            Ok(s.dom.count(&selector.to_string()))
        })
    }

    async fn element_texts(&self, selector: &Selector) -> Result<Vec<String>> {
        self.with(|s| {
            if let Some(ref message) = s.query_error {
                anyhow::bail!("{}", message);
            }
            s.apply_due();
            Ok(s
                .dom
                .elements
                .get(&selector.to_string())
                .cloned()
                .unwrap_or_default())
        })
    }

    async fn click(&self, selector: &Selector, index: usize) -> Result<()> {
        let key = selector.to_string();
        self.with(|s| {
            s.apply_due();
            let count = s.dom.count(&key);
            if index >= count {
                anyhow::bail!("No element {} for selector {} ({} found)", index, key, count);
            }
            s.clicks.push((key.clone(), index));
            if let Some(effect) = s.effects.get(&key) {
                effect(&mut s.dom);
            }
            Ok(())
        })
    }

    async fn fill(&self, selector: &Selector, text: &str) -> Result<()> {
        let key = selector.to_string();
        self.with(|s| {
            if s.dom.count(&key) == 0 {
                anyhow::bail!("No input for selector {}", key);
            }
            s.fills.push((key, text.to_string()));
            Ok(())
        })
    }

    async fn take_screenshot(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, b"fake-png")?;
        Ok(())
    }
}
