//! Polling policy for the `wait*` operations
//!
//! Waits are plain async loops around [`WaitPolicy::pause`]. The sleep is
//! cancel-safe, so a caller can bound or abort any wait by dropping its
//! future, e.g. with `tokio::time::timeout` or `tokio::select!`.

use std::time::Duration;

use crate::error::{Error, Result};

/// Default delay between two observations
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Attempt budget for object existence waits
pub const OBJECT_MAX_ATTEMPTS: u32 = 20;

/// How often to poll and how many times before giving up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval: Duration,
    /// `None` polls until the condition holds or an observation fails
    pub max_attempts: Option<u32>,
}

impl WaitPolicy {
    /// Unbounded policy with the given interval
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }

    /// Policy used when waiting on a stack: every 5 seconds, no cap
    pub fn stack() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }

    /// Policy used when waiting on an object: every 5 seconds, 20 attempts
    pub fn object() -> Self {
        Self::new(DEFAULT_INTERVAL).with_max_attempts(OBJECT_MAX_ATTEMPTS)
    }

    /// Give up with [`Error::Timeout`] once this many attempts have been made
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Called after an unsatisfied observation.
    ///
    /// Fails with [`Error::Timeout`] once `attempts_made` reaches the cap,
    /// otherwise sleeps for one interval.
    pub async fn pause(&self, attempts_made: u32) -> Result<()> {
        if let Some(max) = self.max_attempts {
            if attempts_made >= max {
                return Err(Error::Timeout {
                    attempts: attempts_made,
                });
            }
        }

        tracing::debug!(
            "Condition not met after {} attempt(s), sleeping {:?}",
            attempts_made,
            self.interval
        );
        tokio::time::sleep(self.interval).await;
        Ok(())
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::stack()
    }
}
