//! Error types shared by the page objects, step registry and step handlers.
//!
//! Driver plumbing and the CLI stay on `anyhow`; the types here are the ones
//! callers match on.

use thiserror::Error;

/// Failure of a single scenario step
#[derive(Debug, Error)]
pub enum StepError {
    /// Elements resolved, but not the expected number of them
    #[error("expected {expected} element(s) matching `{selector}`, found {actual}")]
    AssertionFailure {
        selector: String,
        expected: usize,
        actual: usize,
    },

    /// Nothing matched the selector before the timeout elapsed
    #[error("timed out after {timeout_ms}ms waiting for `{selector}` to resolve")]
    ResolutionFailure { selector: String, timeout_ms: u64 },

    #[error("expected an element matching `{selector}` to contain {expected:?}, found {actual:?}")]
    TextMismatch {
        selector: String,
        expected: String,
        actual: Vec<String>,
    },

    /// A step argument or configuration value the step needs is missing or invalid
    #[error("{0}")]
    Precondition(String),

    /// The browser driver itself failed (navigation, click, protocol error)
    #[error("driver error: {0:#}")]
    Driver(anyhow::Error),
}

impl From<anyhow::Error> for StepError {
    fn from(err: anyhow::Error) -> Self {
        StepError::Driver(err)
    }
}

impl StepError {
    /// True for the two failure kinds raised by element assertions
    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            StepError::AssertionFailure { .. }
                | StepError::ResolutionFailure { .. }
                | StepError::TextMismatch { .. }
        )
    }
}

/// Invalid selector registry contents
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("selector name must not be empty")]
    EmptyName,

    #[error("selector `{0}` has an empty value")]
    EmptyValue(String),

    #[error("selector `{0}` is defined more than once")]
    DuplicateName(String),
}

/// Step definition registration and resolution failures
#[derive(Debug, Error)]
pub enum StepRegistryError {
    #[error("invalid step phrase `{phrase}`: {message}")]
    InvalidPattern { phrase: String, message: String },

    #[error("step phrase `{0}` is registered more than once")]
    DuplicatePhrase(String),

    #[error("undefined step: `{0}`")]
    Undefined(String),

    #[error("ambiguous step `{text}` matches: {candidates:?}")]
    Ambiguous {
        text: String,
        candidates: Vec<String>,
    },
}
