//! Minimum spacing between oracle requests

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Reserves time slots so consecutive calls are at least `min_interval` apart.
///
/// The interval is given per call, so one limiter can serve call sites with
/// different quotas while still bounding the aggregate request rate.
#[derive(Debug, Default)]
pub struct RateLimiter {
    last_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until at least `min_interval` has passed since the previous slot
    pub async fn acquire(&self, min_interval: Duration) {
        let wait = {
            let mut last = self
                .last_slot
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let now = Instant::now();
            let slot = match *last {
                Some(prev) => (prev + min_interval).max(now),
                None => now,
            };
            *last = Some(slot);
            slot - now
        };
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}
