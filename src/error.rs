//! Error types for vessel-dl
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (Fetch, Merge, Config, etc.)
//! - Merge errors that the orchestrator treats as attempt-level failures
//! - Context information (vessel identifier, staging path, config key)

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vessel-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vessel-dl
///
/// Per-vessel errors (fetch, no-data, merge) are caught at the task boundary
/// by the orchestrator and folded into a failed outcome for that vessel; they
/// never abort the batch. Batch-fatal variants exist only before orchestration
/// starts (invalid configuration, invalid job) and for cooperative cancellation.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "retry.max_attempts")
        key: Option<String>,
    },

    /// Job rejected before orchestration (empty vessel list, inverted date range)
    #[error("invalid job: {0}")]
    InvalidJob(String),

    /// Transport or provider failure during a fetch attempt
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Fetch reported success but produced zero usable segments
    #[error("no data staged for vessel {0}")]
    NoData(String),

    /// Segment merge failed
    #[error("merge error: {0}")]
    Merge(#[from] MergeError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse or write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error (outcome manifest)
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Archive packaging error
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Run cancelled via the cancellation token
    #[error("batch run cancelled")]
    Cancelled,
}

/// Segment merge errors
///
/// Both `MissingDirectory` and `NoSegments` are attempt-level failures from
/// the orchestrator's point of view: the vessel's attempt failed, the batch
/// continues.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The staging directory for the vessel does not exist
    #[error("segment directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    /// The staging directory exists but contains no parseable segment files
    #[error("no parseable segment files in {0}")]
    NoSegments(PathBuf),

    /// Failed to list the staging directory
    #[error("failed to read segment directory: {0}")]
    Io(#[from] std::io::Error),
}
