//! Retry policy for transient transport failures
//!
//! Only failures where no HTTP response was obtained are retried; the
//! dispatcher classifies any obtained response immediately. Delays follow
//! the deterministic `base * multiplier^i` progression the upstream
//! integration was tuned against, so jitter is off by default.

use std::time::Duration;

use backoff::ExponentialBackoff;

use crate::error::{Error, Result};

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,
    /// Base delay for exponential backoff (in seconds)
    pub base_delay_secs: u64,
    /// Maximum delay between retries (in seconds)
    pub max_delay_secs: u64,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
    /// Whether to randomize delays to avoid thundering herd
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 1,
            max_delay_secs: 30,
            multiplier: 2.0,
            jitter: false,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy with a custom attempt budget
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Set the base delay
    pub fn with_base_delay(mut self, seconds: u64) -> Self {
        self.base_delay_secs = seconds;
        self
    }

    /// Set the maximum delay
    pub fn with_max_delay(mut self, seconds: u64) -> Self {
        self.max_delay_secs = seconds;
        self
    }

    /// Enable or disable jitter
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Reject a policy that can never dispatch a request
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::configuration("max_attempts must be positive"));
        }
        Ok(())
    }

    /// Create an exponential backoff instance for one send
    pub fn create_backoff(&self) -> ExponentialBackoff {
        let mut backoff = ExponentialBackoff {
            initial_interval: Duration::from_secs(self.base_delay_secs),
            max_interval: Duration::from_secs(self.max_delay_secs),
            multiplier: self.multiplier,
            max_elapsed_time: None, // attempt budget is enforced separately
            ..Default::default()
        };

        if !self.jitter {
            backoff.randomization_factor = 0.0;
        }

        backoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoff::backoff::Backoff;

    #[test]
    fn test_default_retry_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay_secs, 1);
        assert_eq!(policy.max_delay_secs, 30);
        assert!(!policy.jitter);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let policy = RetryPolicy::new(0);
        assert!(matches!(
            policy.validate(),
            Err(Error::Configuration { .. })
        ));
        assert!(RetryPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_deterministic_backoff_sequence() {
        let policy = RetryPolicy::default();
        let mut backoff = policy.create_backoff();

        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(1)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(2)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(4)));
    }

    #[test]
    fn test_backoff_respects_max_delay() {
        let policy = RetryPolicy::default().with_max_delay(3);
        let mut backoff = policy.create_backoff();

        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(1)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(2)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(3)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_builder_methods() {
        let policy = RetryPolicy::new(5).with_base_delay(2).with_jitter(true);
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay_secs, 2);
        assert!(policy.jitter);
    }
}
