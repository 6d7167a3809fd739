// Request pacing for the LLM judge.
//
// Each call reserves the next free send slot while holding the lock, then
// sleeps until that slot after releasing it. Evaluations sharing one client
// go out `interval` apart in reservation order. Very low rates are clamped to
// MAX_INTERVAL between calls.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Longest gap the limiter will enforce between two calls.
pub const MAX_INTERVAL: Duration = Duration::from_secs(3600);

/// Shared pacer; clones reserve slots from the same schedule.
#[derive(Clone)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// Pace calls to `requests_per_second`. Zero, negative or NaN turns
    /// pacing off.
    pub fn new(requests_per_second: f64) -> Self {
        Self {
            interval: interval_for(requests_per_second),
            next_slot: Arc::new(Mutex::new(None)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for this caller's send slot.
    pub async fn acquire(&self) {
        if self.interval.is_zero() {
            return;
        }

        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(reserved) if reserved > now => reserved,
                _ => now,
            };
            *next = Some(slot + self.interval);
            slot
        };

        tokio::time::sleep_until(slot).await;
    }
}

fn interval_for(requests_per_second: f64) -> Duration {
    if requests_per_second.is_nan() || requests_per_second <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(1.0 / requests_per_second)
        .map_or(MAX_INTERVAL, |interval| interval.min(MAX_INTERVAL))
}
