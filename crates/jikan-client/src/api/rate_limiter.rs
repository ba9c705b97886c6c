//! Request throttle for the Jikan API.
//!
//! Enforces a minimum interval between consecutive requests so the client
//! stays under the public API's rate limit.

use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Spaces requests at least `min_interval` apart.
///
/// The last-request timestamp lives behind an async mutex and the lock is
/// held across the sleep, so concurrent callers queue up and leave the gate
/// one at a time with the full interval between them.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter that allows one request per `interval_ms` milliseconds.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            min_interval: Duration::from_millis(interval_ms),
            last_request: Mutex::new(None),
        }
    }

    /// Wait until the next request is allowed to go out.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!(
                    wait_ms = wait_time.as_millis(),
                    "Rate limit: waiting before next request"
                );
                sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }

    /// The configured minimum spacing between requests.
    pub fn interval(&self) -> Duration {
        self.min_interval
    }
}
