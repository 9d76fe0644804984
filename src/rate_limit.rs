use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Process-wide gate serializing outbound API calls.
///
/// Every upstream request goes through [`acquire`](RateLimiter::acquire),
/// which guarantees at least `min_interval` between any two grants no matter
/// how many tasks contend. One instance is shared (via `Arc`) by every
/// resolver so the spacing holds across all lookup kinds.
pub struct RateLimiter {
    min_interval: Duration,
    last_granted: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_granted: Mutex::new(None),
        }
    }

    /// Blocks until `min_interval` has elapsed since the previous grant, then
    /// records the current time as the new grant.
    ///
    /// The elapsed check, the sleep, and the timestamp update form one
    /// critical section: the lock is held across the sleep, so contending
    /// tasks queue on the whole sequence rather than racing past a sleeping
    /// holder. Cannot fail; only delays.
    pub async fn acquire(&self) {
        let mut last = self.last_granted.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}
