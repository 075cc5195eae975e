//! Polling utilities shared by the element query layer
//!
//! Element lookups are retried until they satisfy a condition or the
//! command timeout elapses, mirroring the retry-until-timeout behaviour
//! browser test tools give their queries.

use anyhow::Result;
use std::future::Future;
use std::time::{Duration, Instant};

/// Polling configuration for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub timeout_ms: u64,
    pub initial_interval_ms: u64,
    pub max_interval_ms: u64,
    pub use_exponential_backoff: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 4000,
            initial_interval_ms: 100,
            max_interval_ms: 500,
            use_exponential_backoff: true,
        }
    }
}

impl PollConfig {
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Outcome of [`poll_until`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Polled<T> {
    /// The attempt produced a value the predicate accepted
    Satisfied(T),
    /// Timeout elapsed; carries the last observed value
    TimedOut(T),
}

impl<T> Polled<T> {
    pub fn into_inner(self) -> T {
        match self {
            Polled::Satisfied(v) | Polled::TimedOut(v) => v,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        matches!(self, Polled::Satisfied(_))
    }
}

/// Attempt repeatedly until `accept` holds or the timeout is reached
///
/// The attempt runs at least once, even with a zero timeout. Attempt errors are
/// returned immediately, they are not retried.
pub async fn poll_until<T, F, Fut, P>(
    mut attempt: F,
    accept: P,
    config: PollConfig,
) -> Result<Polled<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&T) -> bool,
{
    let start = Instant::now();
    let timeout = Duration::from_millis(config.timeout_ms);
    let mut interval = config.initial_interval_ms.max(1);

    loop {
        let value = attempt().await?;
        if accept(&value) {
            return Ok(Polled::Satisfied(value));
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Ok(Polled::TimedOut(value));
        }

        let remaining = timeout - elapsed;
        tokio::time::sleep(Duration::from_millis(interval).min(remaining)).await;

        if config.use_exponential_backoff {
            interval = next_interval(interval, config.max_interval_ms);
        }
    }
}

/// Grow `interval` by half, rounding up, capped at `max_ms`
fn next_interval(interval: u64, max_ms: u64) -> u64 {
    (interval * 3).div_ceil(2).min(max_ms.max(1))
}
