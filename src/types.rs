//! Core types and events

use crate::error::{Error, Result};
use crate::merge::MergedTrack;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inclusive date range for a batch job
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of positional history to fetch
    pub start: NaiveDate,
    /// Last day of positional history to fetch (inclusive)
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a date range; `start` must not be after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidJob(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }
}

/// One batch run's worth of operator input
///
/// Immutable for the duration of the run. Duplicate vessel identifiers are
/// allowed and processed independently, in list order.
#[derive(Clone, Debug)]
pub struct BatchJob {
    /// Opaque provider credentials
    pub api_key: String,
    /// Vessel identifiers, processed strictly in this order
    pub vessels: Vec<String>,
    /// Date range to fetch for every vessel
    pub range: DateRange,
    /// Wait between successful vessel fetches
    pub pacing: Duration,
}

impl BatchJob {
    /// Reject invalid jobs before orchestration begins
    ///
    /// Errors here are the only batch-fatal condition in normal operation;
    /// everything past this point is caught per vessel.
    pub fn validate(&self) -> Result<()> {
        if self.vessels.is_empty() {
            return Err(Error::InvalidJob("vessel list is empty".to_string()));
        }
        if self.vessels.iter().any(|v| v.trim().is_empty()) {
            return Err(Error::InvalidJob(
                "vessel list contains an empty identifier".to_string(),
            ));
        }
        if self.range.start > self.range.end {
            return Err(Error::InvalidJob(format!(
                "start date {} is after end date {}",
                self.range.start, self.range.end
            )));
        }
        if self.pacing.is_zero() {
            return Err(Error::InvalidJob(
                "pacing interval must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}

/// Final state of one vessel task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TaskOutcome {
    /// All segments fetched and merged
    Succeeded,
    /// All attempts exhausted without a usable result
    Failed {
        /// Human-readable failure reason (last error, or "no data")
        reason: String,
    },
}

impl TaskOutcome {
    /// Whether this outcome is a success
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Succeeded)
    }
}

/// Per-vessel result entry within a [`BatchOutcome`]
#[derive(Clone, Debug)]
pub struct VesselResult {
    /// Vessel identifier as given in the job
    pub vessel_id: String,
    /// Zero-based position in the job's vessel list
    pub index: usize,
    /// Number of fetch attempts made for this vessel
    pub attempts: u32,
    /// Final outcome for this vessel
    pub outcome: TaskOutcome,
    /// Merged track, present iff the outcome is [`TaskOutcome::Succeeded`]
    pub track: Option<MergedTrack>,
}

/// Final artifact of a batch run
///
/// Entries appear in the job's original vessel-list order regardless of the
/// success/failure mix.
#[derive(Clone, Debug, Default)]
pub struct BatchOutcome {
    /// One entry per vessel in the job, in list order
    pub results: Vec<VesselResult>,
    /// Number of vessels that succeeded
    pub succeeded: usize,
    /// Number of vessels that failed
    pub failed: usize,
}

impl BatchOutcome {
    /// Results for vessels that produced a merged track
    pub fn succeeded_results(&self) -> impl Iterator<Item = &VesselResult> {
        self.results.iter().filter(|r| r.outcome.is_success())
    }
}

/// Event emitted during a batch run
///
/// Consumers subscribe via [`crate::batch::BatchDownloader::subscribe`];
/// presentation layers own their own rendering and thread marshaling.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A vessel task started
    TaskStarted {
        /// One-based position of this vessel in the batch
        index: usize,
        /// Total number of vessels in the batch
        total: usize,
        /// Vessel identifier
        vessel_id: String,
    },

    /// A fetch attempt failed
    AttemptFailed {
        /// Vessel identifier
        vessel_id: String,
        /// One-based attempt number
        attempt: u32,
        /// Error detail for the failed attempt
        error: String,
    },

    /// Cooling down before the next attempt (one event per remaining second)
    RetryWaiting {
        /// Vessel identifier
        vessel_id: String,
        /// Whole seconds left in the cooldown
        seconds_remaining: u64,
    },

    /// A vessel task completed with a merged track
    TaskSucceeded {
        /// Vessel identifier
        vessel_id: String,
        /// Number of data rows in the merged track
        rows: usize,
    },

    /// A vessel task exhausted all attempts
    TaskFailed {
        /// Vessel identifier
        vessel_id: String,
        /// Human-readable failure reason
        reason: String,
    },

    /// Pacing before the next vessel (one event per remaining second)
    PacingWaiting {
        /// Vessel that just succeeded
        vessel_id: String,
        /// Vessel that starts after the wait
        next_vessel_id: String,
        /// Whole seconds left in the pacing wait
        seconds_remaining: u64,
    },

    /// The batch finished
    BatchComplete {
        /// Number of vessels that succeeded
        succeeded: usize,
        /// Number of vessels that failed
        failed: usize,
    },
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn job() -> BatchJob {
        BatchJob {
            api_key: "key".to_string(),
            vessels: vec!["416123456".to_string()],
            range: DateRange {
                start: date("2023-01-01"),
                end: date("2023-01-05"),
            },
            pacing: Duration::from_secs(30),
        }
    }

    #[test]
    fn valid_job_passes_validation() {
        assert!(job().validate().is_ok());
    }

    #[test]
    fn empty_vessel_list_is_rejected() {
        let mut j = job();
        j.vessels.clear();
        assert!(matches!(j.validate(), Err(Error::InvalidJob(_))));
    }

    #[test]
    fn blank_vessel_identifier_is_rejected() {
        let mut j = job();
        j.vessels.push("   ".to_string());
        assert!(matches!(j.validate(), Err(Error::InvalidJob(_))));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let mut j = job();
        j.range.start = date("2023-02-01");
        j.range.end = date("2023-01-01");
        assert!(matches!(j.validate(), Err(Error::InvalidJob(_))));
    }

    #[test]
    fn zero_pacing_is_rejected() {
        let mut j = job();
        j.pacing = Duration::ZERO;
        assert!(matches!(j.validate(), Err(Error::InvalidJob(_))));
    }

    #[test]
    fn duplicate_vessels_are_allowed() {
        let mut j = job();
        j.vessels.push(j.vessels[0].clone());
        assert!(j.validate().is_ok());
    }

    #[test]
    fn date_range_constructor_rejects_inversion() {
        assert!(DateRange::new(date("2023-01-05"), date("2023-01-01")).is_err());
        assert!(DateRange::new(date("2023-01-01"), date("2023-01-01")).is_ok());
    }

    #[test]
    fn events_serialize_with_snake_case_tag() {
        let event = Event::RetryWaiting {
            vessel_id: "111".to_string(),
            seconds_remaining: 120,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "retry_waiting");
        assert_eq!(json["seconds_remaining"], 120);
    }

    #[test]
    fn task_outcome_serializes_failure_reason() {
        let outcome = TaskOutcome::Failed {
            reason: "no data".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "no data");
    }
}
