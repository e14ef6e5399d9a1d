//! Retry policy for failed fetch attempts
//!
//! The policy is deliberately simple: a fixed number of attempts with a fixed
//! cooldown between them. No exponential backoff and no jitter — the upstream
//! provider's rate limiting is coarse and of unknown duration, and a long
//! fixed cooldown avoids cascading bans where an adaptive schedule would just
//! probe the limit repeatedly.
//!
//! The cooldown applies to every failed attempt uniformly, whether the
//! failure was a transport error or an empty result.

use crate::config::RetryConfig;
use std::time::Duration;

/// Pure retry decision object built from [`RetryConfig`]
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    max_attempts: u32,
    cooldown: Duration,
}

impl RetryPolicy {
    /// Build a policy from configuration
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            cooldown: config.cooldown,
        }
    }

    /// Maximum total attempts per vessel, including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether another attempt should follow the given failed one
    ///
    /// `attempt` is one-based; retries continue while `attempt < max_attempts`.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Fixed wait between a failed attempt and the next
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(&RetryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_allows_one_retry() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 2);
        assert!(policy.should_retry(1), "first failure should be retried");
        assert!(!policy.should_retry(2), "second failure exhausts attempts");
    }

    #[test]
    fn default_cooldown_is_120_seconds() {
        assert_eq!(RetryPolicy::default().cooldown(), Duration::from_secs(120));
    }

    #[test]
    fn cooldown_is_constant_across_attempts() {
        let policy = RetryPolicy::new(&RetryConfig {
            max_attempts: 5,
            cooldown: Duration::from_secs(7),
        });
        // Same wait regardless of which attempt just failed
        for _attempt in 1..5 {
            assert_eq!(policy.cooldown(), Duration::from_secs(7));
        }
    }

    #[test]
    fn single_attempt_policy_never_retries() {
        let policy = RetryPolicy::new(&RetryConfig {
            max_attempts: 1,
            cooldown: Duration::from_secs(120),
        });
        assert!(!policy.should_retry(1));
    }

    #[test]
    fn should_retry_counts_up_to_max() {
        let policy = RetryPolicy::new(&RetryConfig {
            max_attempts: 4,
            cooldown: Duration::from_secs(1),
        });
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(policy.should_retry(3));
        assert!(!policy.should_retry(4));
    }
}
