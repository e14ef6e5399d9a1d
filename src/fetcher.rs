//! Fetch collaborator seam
//!
//! The orchestrator never performs network I/O itself. A [`TrackFetcher`]
//! implementation owns the authenticated provider call for one vessel and date
//! range, and stages whatever segment files the provider returns under the
//! vessel's staging directory. The library only consumes those files.
//!
//! Staging layout is fixed: segments for a vessel live in
//! `<staging_root>/vessel_<id>`, resolved by [`segment_dir`].

use crate::error::Result;
use crate::types::DateRange;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// One authenticated fetch of a vessel's positional history
///
/// # Contract
///
/// - `Ok(true)` means segments were staged under
///   [`segment_dir`]`(vessel_id, staging_root)`; the result may still turn
///   out to be empty, which the orchestrator treats as a failed attempt.
/// - `Ok(false)` means the provider had nothing for this vessel/range.
/// - `Err` is a transport or provider failure. It is caught at the task
///   boundary, reported through the event stream, and counted as a failed
///   attempt; it never terminates the batch.
#[async_trait]
pub trait TrackFetcher: Send + Sync {
    /// Fetch one vessel's track history for the date range, staging segment
    /// files under the vessel's staging directory as a side effect.
    async fn fetch(
        &self,
        api_key: &str,
        vessel_id: &str,
        range: DateRange,
        staging_root: &Path,
    ) -> Result<bool>;
}

/// Resolve the staging directory for one vessel's raw segments
pub fn segment_dir(vessel_id: &str, staging_root: &Path) -> PathBuf {
    staging_root.join(format!("vessel_{vessel_id}"))
}
