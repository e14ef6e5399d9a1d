//! Configuration types for vessel-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Staging and output directory configuration
///
/// Groups settings for where raw segments are staged by the fetch collaborator
/// and where merged results are persisted. Used as a nested sub-config within
/// [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Staging root for raw segment files (default: "./temp")
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Directory for persisted merged results (default: "./results")
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            staging_dir: default_staging_dir(),
            results_dir: default_results_dir(),
        }
    }
}

/// Retry behavior for failed fetch attempts
///
/// The cooldown is a fixed wait, not exponential and not jittered: the
/// upstream provider's rate limiting is coarse and of unknown duration, and a
/// long fixed cooldown is the simplest policy that avoids cascading bans.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum total attempts per vessel, including the first (default: 2)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed wait between a failed attempt and the next (default: 120 seconds)
    #[serde(default = "default_cooldown", with = "duration_serde")]
    pub cooldown: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            cooldown: default_cooldown(),
        }
    }
}

/// Pacing behavior between successful vessel fetches
///
/// The operator-configured per-job interval is used as-is, clamped to
/// `min_interval` from below. This is a floor, never a reduction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Minimum wait between successful vessel fetches (default: 1 second)
    #[serde(default = "default_min_interval", with = "duration_serde")]
    pub min_interval: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_interval: default_min_interval(),
        }
    }
}

/// Main configuration for vessel-dl
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Staging and output directories
    #[serde(default)]
    pub staging: StagingConfig,

    /// Retry behavior for failed fetch attempts
    #[serde(default)]
    pub retry: RetryConfig,

    /// Pacing behavior between successful vessel fetches
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Number of vessels fetched concurrently (must be 1)
    ///
    /// Strictly sequential processing is a policy to respect the provider's
    /// rate limits, not an implementation accident. The field exists so the
    /// invariant is explicit and validated rather than implicit.
    #[serde(default = "default_max_concurrent_vessels")]
    pub max_concurrent_vessels: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            staging: StagingConfig::default(),
            retry: RetryConfig::default(),
            pacing: PacingConfig::default(),
            max_concurrent_vessels: default_max_concurrent_vessels(),
        }
    }
}

impl Config {
    /// Validate the configuration before any orchestration starts
    ///
    /// Returns [`Error::Config`] naming the offending key for the first
    /// invalid setting found.
    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(Error::Config {
                message: "retry.max_attempts must be at least 1".to_string(),
                key: Some("retry.max_attempts".to_string()),
            });
        }
        if self.max_concurrent_vessels != 1 {
            return Err(Error::Config {
                message: format!(
                    "max_concurrent_vessels must be 1 (sequential by policy), got {}",
                    self.max_concurrent_vessels
                ),
                key: Some("max_concurrent_vessels".to_string()),
            });
        }
        Ok(())
    }
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("./temp")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("./results")
}

fn default_max_attempts() -> u32 {
    2
}

fn default_cooldown() -> Duration {
    Duration::from_secs(120)
}

fn default_min_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_max_concurrent_vessels() -> usize {
    1
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
