//! Element queries with retry-until-timeout assertions
//!
//! [`get_object`] resolves a selector to a live [`ElementQuery`]; the query's
//! `should_*` assertions re-query the page until they hold or the command
//! timeout elapses. Nothing here mutates the page except the explicit
//! `click*` helpers.

use log::debug;

use super::common::{poll_until, PollConfig, Polled};
use super::traits::{BrowserDriver, Selector};
use crate::error::StepError;

/// Elements matching a selector that resolved at least once
pub struct ElementQuery<'a> {
    driver: &'a dyn BrowserDriver,
    selector: Selector,
    poll: PollConfig,
    resolved_count: usize,
}

/// Wait until at least one element matches `selector`
///
/// Fails with [`StepError::ResolutionFailure`] when nothing matches before
/// `poll.timeout_ms` elapses.
pub async fn get_object<'a>(
    driver: &'a dyn BrowserDriver,
    selector: &Selector,
    poll: PollConfig,
) -> Result<ElementQuery<'a>, StepError> {
    debug!("get_object {}", selector);
    let polled = poll_until(|| driver.query_count(selector), |n| *n > 0, poll).await?;

    match polled {
        Polled::Satisfied(count) => Ok(ElementQuery {
            driver,
            selector: selector.clone(),
            poll,
            resolved_count: count,
        }),
        Polled::TimedOut(_) => Err(StepError::ResolutionFailure {
            selector: selector.to_string(),
            timeout_ms: poll.timeout_ms,
        }),
    }
}

/// Assert exactly `expected` elements match `selector`
///
/// A non-zero count must resolve first, so an empty page is reported as a
/// resolution failure. Zero skips resolution and waits for the matches to go.
pub async fn assert_length(
    driver: &dyn BrowserDriver,
    selector: &Selector,
    expected: usize,
    poll: PollConfig,
) -> Result<(), StepError> {
    if expected > 0 {
        return get_object(driver, selector, poll)
            .await?
            .should_have_length(expected)
            .await;
    }

    let polled = poll_until(|| driver.query_count(selector), |n| *n == 0, poll).await?;
    match polled {
        Polled::Satisfied(_) => Ok(()),
        Polled::TimedOut(actual) => Err(StepError::AssertionFailure {
            selector: selector.to_string(),
            expected,
            actual,
        }),
    }
}

impl<'a> ElementQuery<'a> {
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Count seen when the selector first resolved
    pub fn resolved_count(&self) -> usize {
        self.resolved_count
    }

    /// Assert exactly `expected` elements match, retrying until the timeout
    pub async fn should_have_length(&self, expected: usize) -> Result<(), StepError> {
        let driver = self.driver;
        let selector = &self.selector;
        let polled = poll_until(
            || driver.query_count(selector),
            |n| *n == expected,
            self.poll,
        )
        .await?;

        match polled {
            Polled::Satisfied(_) => Ok(()),
            Polled::TimedOut(actual) => Err(StepError::AssertionFailure {
                selector: selector.to_string(),
                expected,
                actual,
            }),
        }
    }

    /// Assert at least one element is still present
    pub async fn should_be_visible(&self) -> Result<(), StepError> {
        let driver = self.driver;
        let selector = &self.selector;
        let polled = poll_until(|| driver.query_count(selector), |n| *n > 0, self.poll).await?;

        if polled.is_satisfied() {
            Ok(())
        } else {
            Err(StepError::ResolutionFailure {
                selector: selector.to_string(),
                timeout_ms: self.poll.timeout_ms,
            })
        }
    }

    /// Assert some matching element's text contains `expected`
    pub async fn should_contain_text(&self, expected: &str) -> Result<(), StepError> {
        let driver = self.driver;
        let selector = &self.selector;
        let polled = poll_until(
            || driver.element_texts(selector),
            |texts| texts.iter().any(|t| t.contains(expected)),
            self.poll,
        )
        .await?;

        match polled {
            Polled::Satisfied(_) => Ok(()),
            Polled::TimedOut(actual) => Err(StepError::TextMismatch {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
            }),
        }
    }

    /// Click the `index`-th matching element
    pub async fn click(&self, index: usize) -> Result<(), StepError> {
        self.driver.click(&self.selector, index).await?;
        Ok(())
    }

    /// Click every element that matched at resolution time, returning how many were clicked
    ///
    /// Clicks go last to first so that a clicked element leaving the match set
    /// does not shift the index of the ones still to click.
    pub async fn click_all(&self) -> Result<usize, StepError> {
        for index in (0..self.resolved_count).rev() {
            self.driver.click(&self.selector, index).await?;
        }
        Ok(self.resolved_count)
    }
}
