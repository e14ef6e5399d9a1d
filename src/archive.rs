//! Result persistence and delivery packaging
//!
//! Two ways to hand a finished batch to the operator:
//!
//! - [`write_results`] persists one combined CSV per succeeded vessel under
//!   the results directory, recreating each vessel's subdirectory.
//! - [`pack_archive`] writes a single zip with one CSV entry per succeeded
//!   vessel plus a `manifest.json` describing every vessel's outcome.

use crate::error::Result;
use crate::types::{BatchOutcome, TaskOutcome, VesselResult};
use serde::Serialize;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Manifest entry for one vessel in the delivery archive
#[derive(Debug, Serialize)]
struct ManifestEntry<'a> {
    vessel_id: &'a str,
    attempts: u32,
    #[serde(flatten)]
    outcome: &'a TaskOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<usize>,
}

/// Top-level manifest for the delivery archive
#[derive(Debug, Serialize)]
struct Manifest<'a> {
    succeeded: usize,
    failed: usize,
    vessels: Vec<ManifestEntry<'a>>,
}

fn manifest_entry(result: &VesselResult) -> ManifestEntry<'_> {
    ManifestEntry {
        vessel_id: &result.vessel_id,
        attempts: result.attempts,
        outcome: &result.outcome,
        rows: result.track.as_ref().map(|t| t.row_count()),
    }
}

/// Persist one combined CSV per succeeded vessel under `results_dir`
///
/// Layout: `<results_dir>/vessel_<id>/vessel_track_<id>_combined.csv`. An
/// existing per-vessel directory is removed first so stale segments from a
/// previous run cannot leak into the new output. Returns the written paths in
/// vessel order.
pub fn write_results(outcome: &BatchOutcome, results_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for result in outcome.succeeded_results() {
        let Some(track) = result.track.as_ref() else {
            continue;
        };
        let vessel_dir = results_dir.join(format!("vessel_{}", result.vessel_id));
        if vessel_dir.exists() {
            std::fs::remove_dir_all(&vessel_dir)?;
        }
        std::fs::create_dir_all(&vessel_dir)?;

        let path = vessel_dir.join(format!("vessel_track_{}_combined.csv", result.vessel_id));
        std::fs::write(&path, track.to_csv_bytes()?)?;
        tracing::debug!(vessel_id = %result.vessel_id, path = %path.display(), "Wrote merged track");
        written.push(path);
    }
    Ok(written)
}

/// Pack the batch outcome into a zip archive for delivery
///
/// One `vessel_<id>.csv` entry per succeeded vessel, plus a `manifest.json`
/// with every vessel's outcome and the aggregate counts. Failed vessels
/// appear in the manifest only.
pub fn pack_archive<W: Write + Seek>(outcome: &BatchOutcome, writer: W) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default();

    for result in outcome.succeeded_results() {
        let Some(track) = result.track.as_ref() else {
            continue;
        };
        zip.start_file(format!("vessel_{}.csv", result.vessel_id), options)?;
        zip.write_all(&track.to_csv_bytes()?)?;
    }

    let manifest = Manifest {
        succeeded: outcome.succeeded,
        failed: outcome.failed,
        vessels: outcome.results.iter().map(manifest_entry).collect(),
    };
    zip.start_file("manifest.json", options)?;
    zip.write_all(&serde_json::to_vec_pretty(&manifest)?)?;

    Ok(zip.finish()?)
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::MergedTrack;
    use std::io::{Cursor, Read};

    fn track(rows: &[&[&str]]) -> MergedTrack {
        MergedTrack {
            header: vec!["mmsi".to_string(), "lat".to_string()],
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    fn outcome() -> BatchOutcome {
        BatchOutcome {
            results: vec![
                VesselResult {
                    vessel_id: "111".to_string(),
                    index: 0,
                    attempts: 1,
                    outcome: TaskOutcome::Succeeded,
                    track: Some(track(&[&["111", "30.0"], &["111", "31.0"]])),
                },
                VesselResult {
                    vessel_id: "222".to_string(),
                    index: 1,
                    attempts: 2,
                    outcome: TaskOutcome::Failed {
                        reason: "no data".to_string(),
                    },
                    track: None,
                },
            ],
            succeeded: 1,
            failed: 1,
        }
    }

    #[test]
    fn write_results_persists_succeeded_vessels_only() {
        let dir = tempfile::tempdir().unwrap();

        let written = write_results(&outcome(), dir.path()).unwrap();

        assert_eq!(written.len(), 1);
        assert!(written[0].ends_with("vessel_111/vessel_track_111_combined.csv"));
        let contents = std::fs::read_to_string(&written[0]).unwrap();
        assert_eq!(contents, "mmsi,lat\n111,30.0\n111,31.0\n");
        assert!(!dir.path().join("vessel_222").exists());
    }

    #[test]
    fn write_results_replaces_a_stale_vessel_directory() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("vessel_111");
        std::fs::create_dir_all(&stale).unwrap();
        std::fs::write(stale.join("leftover.csv"), "old\n").unwrap();

        write_results(&outcome(), dir.path()).unwrap();

        assert!(!stale.join("leftover.csv").exists());
        assert!(stale.join("vessel_track_111_combined.csv").exists());
    }

    #[test]
    fn pack_archive_contains_csv_entries_and_manifest() {
        let cursor = pack_archive(&outcome(), Cursor::new(Vec::new())).unwrap();

        let mut zip = zip::ZipArchive::new(cursor).unwrap();
        let names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["vessel_111.csv", "manifest.json"]);

        let mut csv_text = String::new();
        zip.by_name("vessel_111.csv")
            .unwrap()
            .read_to_string(&mut csv_text)
            .unwrap();
        assert_eq!(csv_text, "mmsi,lat\n111,30.0\n111,31.0\n");
    }

    #[test]
    fn manifest_reports_every_vessel_and_the_counts() {
        let cursor = pack_archive(&outcome(), Cursor::new(Vec::new())).unwrap();

        let mut zip = zip::ZipArchive::new(cursor).unwrap();
        let mut manifest_text = String::new();
        zip.by_name("manifest.json")
            .unwrap()
            .read_to_string(&mut manifest_text)
            .unwrap();
        let manifest: serde_json::Value = serde_json::from_str(&manifest_text).unwrap();

        assert_eq!(manifest["succeeded"], 1);
        assert_eq!(manifest["failed"], 1);
        assert_eq!(manifest["vessels"][0]["vessel_id"], "111");
        assert_eq!(manifest["vessels"][0]["status"], "succeeded");
        assert_eq!(manifest["vessels"][0]["rows"], 2);
        assert_eq!(manifest["vessels"][1]["status"], "failed");
        assert_eq!(manifest["vessels"][1]["reason"], "no data");
        assert_eq!(manifest["vessels"][1]["attempts"], 2);
    }

    #[test]
    fn all_failed_outcome_packs_a_manifest_only_archive() {
        let all_failed = BatchOutcome {
            results: vec![VesselResult {
                vessel_id: "999".to_string(),
                index: 0,
                attempts: 2,
                outcome: TaskOutcome::Failed {
                    reason: "connection reset".to_string(),
                },
                track: None,
            }],
            succeeded: 0,
            failed: 1,
        };

        let cursor = pack_archive(&all_failed, Cursor::new(Vec::new())).unwrap();

        let mut zip = zip::ZipArchive::new(cursor).unwrap();
        assert_eq!(zip.len(), 1);
        assert_eq!(zip.by_index(0).unwrap().name(), "manifest.json");
    }
}
