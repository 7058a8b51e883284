//! Rate limiting for upstream API calls
//!
//! The NewsBreak Business API is gated by a flat calls-per-second cap on a
//! single connection, so this limiter enforces a minimum interval between
//! consecutive grants rather than a burstable token bucket. Grant order
//! matches acquisition order: the tokio mutex queues waiters FIFO, and the
//! wait happens inside the critical section so no two callers can observe a
//! stale clock and both proceed.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use crate::error::{Error, Result};

/// Default upstream rate cap (requests per second)
pub const DEFAULT_CALLS_PER_SECOND: u32 = 10;

/// Serializes outgoing calls to a configured rate
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum spacing between consecutive grants
    min_interval: Duration,
    /// Instant of the previous grant; mutated only under the lock
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `calls_per_second` requests per second.
    ///
    /// A zero rate is a configuration error.
    pub fn new(calls_per_second: u32) -> Result<Self> {
        if calls_per_second == 0 {
            return Err(Error::configuration(
                "calls_per_second must be positive",
            ));
        }

        Ok(Self {
            min_interval: Duration::from_secs(1) / calls_per_second,
            last_call: Mutex::new(None),
        })
    }

    /// Wait until at least the minimum interval has elapsed since the
    /// previous grant, then record this grant. Never fails, only delays.
    pub async fn acquire(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let elapsed = Instant::now().saturating_duration_since(previous);
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }

        *last_call = Some(Instant::now());
    }

    /// Minimum spacing between grants
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}
