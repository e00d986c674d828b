//! Process-wide request throttle.
//!
//! A [`RateLimiter`] guarantees a minimum interval between the starts of
//! consecutive outbound calls. The lock is held while waiting, so callers
//! queue in arrival order: under concurrent load one lookup is released per
//! interval across the whole process.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum delay between consecutive calls.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter that allows one call per `min_interval`.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Waits until a call is permitted and records it.
    ///
    /// The first call never waits.
    pub async fn until_ready(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                log::debug!("Rate limiter: waiting {}ms", wait.as_millis());
                tokio::time::sleep(wait).await;
            }
        }

        *last_call = Some(Instant::now());
    }
}
