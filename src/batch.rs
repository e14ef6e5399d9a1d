//! Batch download orchestration
//!
//! [`BatchDownloader`] drives one fetch-retry-merge cycle per vessel, strictly
//! sequentially, pacing between successful fetches to respect the provider's
//! rate limits. All progress is reported through a broadcast event channel;
//! presentation layers subscribe and render however they like.
//!
//! The orchestrator performs no network I/O itself. The injected
//! [`TrackFetcher`] owns the provider call and stages segment files; this
//! module only decides when to call it, when to wait, and how to fold the
//! staged segments into a per-vessel merged track.

use crate::config::Config;
use crate::error::{Error, MergeError, Result};
use crate::fetcher::{segment_dir, TrackFetcher};
use crate::merge::{merge_segments, MergedTrack};
use crate::pacing::PacingPolicy;
use crate::retry::RetryPolicy;
use crate::types::{BatchJob, BatchOutcome, Event, TaskOutcome, VesselResult};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Failure reason used when every attempt produced no usable segments
const NO_DATA_REASON: &str = "no data";

/// Batch download orchestrator (cloneable - all fields are Arc-backed)
#[derive(Clone, Debug)]
pub struct BatchDownloader {
    /// Configuration (wrapped in Arc for sharing across tasks)
    config: Arc<Config>,
    /// Event broadcast channel sender (multiple subscribers supported)
    event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Cooperative cancellation, checked between attempts and between wait ticks
    cancel: CancellationToken,
}

impl BatchDownloader {
    /// Create a new orchestrator after validating the configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        // Buffered channel; a subscriber lagging behind 1000 events sees
        // RecvError::Lagged rather than blocking the run
        let (event_tx, _rx) = tokio::sync::broadcast::channel(1000);

        Ok(Self {
            config: Arc::new(config),
            event_tx,
            cancel: CancellationToken::new(),
        })
    }

    /// Subscribe to batch events
    ///
    /// Multiple subscribers are supported; each receives all events
    /// independently. Subscribing after `run` has started misses the events
    /// already emitted.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Token for cooperatively cancelling a running batch
    ///
    /// Cancelling interrupts the run between attempts and between wait ticks;
    /// `run` then returns [`Error::Cancelled`]. A multi-hour batch stops
    /// within a second of the signal.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Run one batch job to completion
    ///
    /// Vessels are processed strictly one at a time, in list order. Per-vessel
    /// failures are folded into the returned [`BatchOutcome`]; the only error
    /// returns are an invalid job (rejected before any fetch) and
    /// cancellation.
    pub async fn run(&self, job: &BatchJob, fetcher: &dyn TrackFetcher) -> Result<BatchOutcome> {
        job.validate()?;

        let retry = RetryPolicy::new(&self.config.retry);
        let pacing = PacingPolicy::new(&self.config.pacing);
        let total = job.vessels.len();
        let mut outcome = BatchOutcome::default();

        tracing::info!(
            vessels = total,
            pacing_secs = job.pacing.as_secs(),
            "Starting batch download"
        );

        for (index, vessel_id) in job.vessels.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            self.emit(Event::TaskStarted {
                index: index + 1,
                total,
                vessel_id: vessel_id.clone(),
            });
            tracing::info!(vessel_id = %vessel_id, position = index + 1, total, "Processing vessel");

            let result = self
                .run_vessel_task(job, fetcher, vessel_id, index, &retry)
                .await?;
            let succeeded = result.outcome.is_success();
            if succeeded {
                outcome.succeeded += 1;
            } else {
                outcome.failed += 1;
            }
            outcome.results.push(result);

            // Pacing follows a success only, and never the last vessel
            let is_last = index + 1 == total;
            if succeeded && !is_last {
                let wait = pacing.wait_for(job.pacing);
                let next_vessel_id = job.vessels[index + 1].clone();
                self.countdown_wait(wait, |seconds_remaining| Event::PacingWaiting {
                    vessel_id: vessel_id.clone(),
                    next_vessel_id: next_vessel_id.clone(),
                    seconds_remaining,
                })
                .await?;
            }
        }

        self.emit(Event::BatchComplete {
            succeeded: outcome.succeeded,
            failed: outcome.failed,
        });
        tracing::info!(
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "Batch download complete"
        );
        Ok(outcome)
    }

    /// Drive one vessel through its attempt/cooldown cycle
    ///
    /// Returns `Err` only on cancellation; every fetch or merge failure is
    /// absorbed into the vessel's outcome.
    async fn run_vessel_task(
        &self,
        job: &BatchJob,
        fetcher: &dyn TrackFetcher,
        vessel_id: &str,
        index: usize,
        retry: &RetryPolicy,
    ) -> Result<VesselResult> {
        let mut attempts = 0;
        let mut last_error = NO_DATA_REASON.to_string();

        loop {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            attempts += 1;

            match self.attempt_fetch(job, fetcher, vessel_id).await {
                Ok(track) => {
                    tracing::info!(vessel_id = %vessel_id, attempts, rows = track.row_count(), "Vessel succeeded");
                    self.emit(Event::TaskSucceeded {
                        vessel_id: vessel_id.to_string(),
                        rows: track.row_count(),
                    });
                    return Ok(VesselResult {
                        vessel_id: vessel_id.to_string(),
                        index,
                        attempts,
                        outcome: TaskOutcome::Succeeded,
                        track: Some(track),
                    });
                }
                Err(e) => {
                    last_error = e.to_string();
                    tracing::warn!(vessel_id = %vessel_id, attempt = attempts, error = %last_error, "Fetch attempt failed");
                    self.emit(Event::AttemptFailed {
                        vessel_id: vessel_id.to_string(),
                        attempt: attempts,
                        error: last_error.clone(),
                    });
                }
            }

            if !retry.should_retry(attempts) {
                break;
            }
            // Cooldown applies uniformly, transport error or empty result alike
            self.countdown_wait(retry.cooldown(), |seconds_remaining| Event::RetryWaiting {
                vessel_id: vessel_id.to_string(),
                seconds_remaining,
            })
            .await?;
        }

        tracing::warn!(vessel_id = %vessel_id, attempts, reason = %last_error, "Vessel failed");
        self.emit(Event::TaskFailed {
            vessel_id: vessel_id.to_string(),
            reason: last_error.clone(),
        });
        Ok(VesselResult {
            vessel_id: vessel_id.to_string(),
            index,
            attempts,
            outcome: TaskOutcome::Failed { reason: last_error },
            track: None,
        })
    }

    /// One fetch attempt: call the collaborator, then merge whatever it staged
    ///
    /// An attempt succeeds only when the fetcher reports success *and* the
    /// staged directory yields at least one parseable segment.
    async fn attempt_fetch(
        &self,
        job: &BatchJob,
        fetcher: &dyn TrackFetcher,
        vessel_id: &str,
    ) -> Result<MergedTrack> {
        let staging_root = &self.config.staging.staging_dir;
        let staged = fetcher
            .fetch(&job.api_key, vessel_id, job.range, staging_root)
            .await?;
        if !staged {
            return Err(Error::NoData(vessel_id.to_string()));
        }

        let dir = segment_dir(vessel_id, staging_root);
        merge_segments(&dir).map_err(|e| match e {
            // Fetch claimed success but staged nothing usable
            MergeError::MissingDirectory(_) | MergeError::NoSegments(_) => {
                Error::NoData(vessel_id.to_string())
            }
            other => Error::Merge(other),
        })
    }

    /// Cancellation-aware wait, emitting one countdown event per second
    async fn countdown_wait<F>(&self, total: Duration, mut event_for: F) -> Result<()>
    where
        F: FnMut(u64) -> Event,
    {
        let mut remaining = total;
        while !remaining.is_zero() {
            let seconds_remaining =
                remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
            self.emit(event_for(seconds_remaining));

            let tick = remaining.min(Duration::from_secs(1));
            tokio::select! {
                _ = self.cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(tick) => {}
            }
            remaining -= tick;
        }
        Ok(())
    }

    /// Emit an event to all subscribers
    ///
    /// If there are no active subscribers the event is silently dropped; the
    /// batch never depends on anyone listening.
    fn emit(&self, event: Event) {
        self.event_tx.send(event).ok();
    }
}
