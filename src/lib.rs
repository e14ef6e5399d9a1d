//! # vessel-dl
//!
//! Backend library for batch-downloading per-vessel positional history from a
//! rate-limited tracking provider.
//!
//! ## Design Philosophy
//!
//! vessel-dl is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Consumers subscribe to progress events, no polling
//! - **Provider-friendly** - One vessel at a time, fixed cooldowns, paced
//!   between fetches; sequential by policy, not by accident
//! - **Collaborator-injected** - The HTTP fetch is a trait the embedder
//!   implements; the library orchestrates, merges, and packages
//!
//! ## Quick Start
//!
//! ```no_run
//! use vessel_dl::{BatchDownloader, BatchJob, Config, DateRange};
//! use std::time::Duration;
//!
//! # struct MyFetcher;
//! # #[async_trait::async_trait]
//! # impl vessel_dl::TrackFetcher for MyFetcher {
//! #     async fn fetch(&self, _: &str, _: &str, _: DateRange, _: &std::path::Path)
//! #         -> vessel_dl::Result<bool> { Ok(true) }
//! # }
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = BatchDownloader::new(Config::default())?;
//!
//!     // Subscribe to progress events
//!     let mut events = downloader.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let job = BatchJob {
//!         api_key: "secret".to_string(),
//!         vessels: vec!["416123456".to_string(), "416987654".to_string()],
//!         range: DateRange::new("2023-01-01".parse()?, "2023-01-05".parse()?)?,
//!         pacing: Duration::from_secs(30),
//!     };
//!     let outcome = downloader.run(&job, &MyFetcher).await?;
//!     println!("{} succeeded, {} failed", outcome.succeeded, outcome.failed);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Result persistence and delivery packaging
pub mod archive;
/// Batch download orchestration
pub mod batch;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Fetch collaborator seam
pub mod fetcher;
/// Segment merging
pub mod merge;
/// Pacing policy between successful vessel fetches
pub mod pacing;
/// Retry policy for failed fetch attempts
pub mod retry;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use archive::{pack_archive, write_results};
pub use batch::BatchDownloader;
pub use config::{Config, PacingConfig, RetryConfig, StagingConfig};
pub use error::{Error, MergeError, Result};
pub use fetcher::{segment_dir, TrackFetcher};
pub use merge::{merge_segments, MergedTrack};
pub use pacing::PacingPolicy;
pub use retry::RetryPolicy;
pub use types::{BatchJob, BatchOutcome, DateRange, Event, TaskOutcome, VesselResult};
