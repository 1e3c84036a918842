//! Retry policy for fallible fetch operations.
//!
//! Each raised error is classified through
//! [`DataError::fault_kind`](findata_core::DataError::fault_kind): server-side
//! faults (HTTP 5xx) are retried after a pause, everything else is surfaced
//! immediately.

use std::future::Future;
use std::time::Duration;

use findata_core::{DataError, FaultKind, Result};
use tracing::info;

/// Default total attempt budget.
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default pause between attempts.
const DEFAULT_PAUSE: Duration = Duration::from_secs(2);

/// Policy for retrying transient provider faults.
///
/// Holds no state across calls; the same policy value can wrap any number of
/// operations, concurrently or in sequence.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    max_attempts: u32,
    pause: Duration,
}

impl Default for RetryPolicy {
    /// Five total attempts with a two-second pause between them.
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            pause: DEFAULT_PAUSE,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with a custom attempt budget and pause.
    ///
    /// `max_attempts` is clamped to at least 1 so the operation always runs
    /// once.
    #[must_use]
    pub fn new(max_attempts: u32, pause: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            pause,
        }
    }

    /// Runs `operation`, retrying transient faults up to the attempt budget.
    ///
    /// - On success the value is returned immediately.
    /// - A permanent fault (client-side status, or no classifiable status at
    ///   all) is returned immediately, even when attempts remain.
    /// - A transient fault (status >= 500) pauses and retries; once the
    ///   budget is exhausted the last observed error is surfaced unchanged.
    ///
    /// At most `max_attempts` invocations and `max_attempts - 1` pauses.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => match error.fault_kind() {
                    FaultKind::Permanent => return Err(error),
                    FaultKind::Transient => {
                        info!(
                            status = error.status(),
                            attempt,
                            max_attempts = self.max_attempts,
                            "Retrying server-side fault after a pause"
                        );
                        last_error = Some(error);
                        if attempt < self.max_attempts {
                            tokio::time::sleep(self.pause).await;
                        }
                    }
                },
            }
        }

        Err(last_error
            .unwrap_or_else(|| DataError::Other("Retry budget exhausted with no error".to_string())))
    }
}
