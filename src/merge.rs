//! Segment merging
//!
//! The upstream fetch may split one vessel's track history into several CSV
//! segment files in the vessel's staging directory. This module concatenates
//! them into a single logical table: one header row, then every segment's data
//! rows in ascending filename order. Filenames are chosen upstream so that
//! lexicographic order equals chronological order.
//!
//! Parsing is deliberately tolerant: an empty or unreadable segment
//! contributes zero rows and never aborts the merge. Headers of later
//! segments are discarded without being compared to the first, so divergent
//! headers across a vessel's segments pass through silently. Providers
//! reorder columns between pages often enough that rejecting them would
//! drop real data.

use crate::error::MergeError;
use std::path::{Path, PathBuf};

/// File extension of staged segment files
const SEGMENT_EXTENSION: &str = "csv";

/// One vessel's merged track: a single header plus all data rows in order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergedTrack {
    /// Header row, taken from the first segment that has one
    pub header: Vec<String>,
    /// Data rows from every segment, segment order then row order preserved
    pub rows: Vec<Vec<String>>,
}

impl MergedTrack {
    /// Number of data rows (header excluded)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Serialize as CSV bytes: header once, then every data row
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, csv::Error> {
        let mut buf = Vec::new();
        {
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .from_writer(&mut buf);
            writer.write_record(&self.header)?;
            for row in &self.rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }
        Ok(buf)
    }
}

/// Merge every segment file in `dir` into one [`MergedTrack`]
///
/// Fails with [`MergeError::MissingDirectory`] if `dir` does not exist, and
/// with [`MergeError::NoSegments`] if no segment file yields a header. The
/// caller treats both as a failed attempt for the vessel, not a crash.
pub fn merge_segments(dir: &Path) -> Result<MergedTrack, MergeError> {
    if !dir.is_dir() {
        return Err(MergeError::MissingDirectory(dir.to_path_buf()));
    }

    let mut segment_paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(SEGMENT_EXTENSION))
        })
        .collect();
    // Filename order governs row order
    segment_paths.sort();

    let mut merged = MergedTrack::default();
    let mut header_saved = false;

    for path in &segment_paths {
        let Some((header, rows)) = read_segment(path) else {
            tracing::debug!(segment = %path.display(), "Skipping unreadable segment");
            continue;
        };
        if !header_saved {
            merged.header = header;
            header_saved = true;
        }
        merged.rows.extend(rows);
    }

    if !header_saved {
        return Err(MergeError::NoSegments(dir.to_path_buf()));
    }
    Ok(merged)
}

/// Read one segment file as (header, data rows)
///
/// Returns `None` for files that are empty, unreadable, or fail to parse;
/// such segments contribute nothing to the merge.
fn read_segment(path: &Path) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .ok()?;

    let mut records = reader.records();
    let header: Vec<String> = records.next()?.ok()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in records {
        // A malformed record poisons the whole segment, not the merge
        let record = record.ok()?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Some((header, rows))
}
