//! Pacing policy between successful vessel fetches
//!
//! The orchestrator waits the operator-configured interval after each
//! successful vessel before starting the next one. The policy is the identity
//! on that interval, clamped from below by the configured floor: an operator
//! may wait longer than the floor but never less. No adaptive backoff based on
//! observed provider behavior is applied.

use crate::config::PacingConfig;
use std::time::Duration;

/// Pacing decision object built from [`PacingConfig`]
#[derive(Clone, Copy, Debug)]
pub struct PacingPolicy {
    min_interval: Duration,
}

impl PacingPolicy {
    /// Build a policy from configuration
    pub fn new(config: &PacingConfig) -> Self {
        Self {
            min_interval: config.min_interval,
        }
    }

    /// How long to wait after a successful vessel fetch
    ///
    /// Returns the configured interval unchanged when it meets the floor,
    /// otherwise the floor itself.
    pub fn wait_for(&self, configured: Duration) -> Duration {
        configured.max(self.min_interval)
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::new(&PacingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_interval_is_used_exactly() {
        let policy = PacingPolicy::default();
        assert_eq!(
            policy.wait_for(Duration::from_secs(30)),
            Duration::from_secs(30)
        );
        assert_eq!(
            policy.wait_for(Duration::from_secs(3600)),
            Duration::from_secs(3600)
        );
    }

    #[test]
    fn floor_applies_to_sub_minimum_intervals() {
        let policy = PacingPolicy::new(&PacingConfig {
            min_interval: Duration::from_secs(5),
        });
        assert_eq!(
            policy.wait_for(Duration::from_secs(2)),
            Duration::from_secs(5),
            "the floor is a minimum wait, never a target"
        );
    }

    #[test]
    fn floor_never_shortens_a_longer_interval() {
        let policy = PacingPolicy::new(&PacingConfig {
            min_interval: Duration::from_secs(5),
        });
        assert_eq!(
            policy.wait_for(Duration::from_secs(60)),
            Duration::from_secs(60)
        );
    }
}
