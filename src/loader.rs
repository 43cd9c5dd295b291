//! Loading tracking tables and caption queries from a dataset tree.
//!
//! Expected layout, mirroring the MOT-style datasets this crate targets:
//!
//! ```text
//! <data_dir>/<box_prefix>/**/*.txt      comma-delimited MOT17 rows
//! <data_dir>/<query_prefix>/**/*.json   arrays of query records
//! ```
//!
//! Malformed ground-truth files (ragged rows, fewer than six columns,
//! non-numeric fields) are rejected here with a warning so the metric
//! engine only ever sees clean rectangular data.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use nalgebra::DMatrix;

use crate::tracking::{QueryRecord, TrackingTable, MIN_COLUMNS};
use crate::{Error, Result};

/// Normalize a path into a join key by stripping everything up to and
/// including the `prefix` segment.
///
/// Returns an empty string when the prefix segment does not appear, the
/// same sentinel the reference loaders used.
///
/// ```
/// use trackstats::normalize_track_path;
/// assert_eq!(normalize_track_path("dataset/box_gt/mot/v1.txt", "box_gt"), "mot/v1.txt");
/// assert_eq!(normalize_track_path("dataset/other/v1.txt", "box_gt"), "");
/// ```
pub fn normalize_track_path(path: &str, prefix: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    match segments.iter().position(|&s| s == prefix) {
        Some(idx) => segments[idx + 1..].join("/"),
        None => String::new(),
    }
}

/// Load every ground-truth tracking table under `data_dir/box_prefix`.
///
/// Files are visited in sorted path order so the returned collection is
/// deterministic. Files that fail to parse are skipped with a warning
/// rather than aborting the load.
pub fn load_tracking_gt<P: AsRef<Path>>(data_dir: P, box_prefix: &str) -> Result<Vec<TrackingTable>> {
    let root = data_dir.as_ref().join(box_prefix);
    let files = collect_files_sorted(&root, "txt")?;

    let mut tables = Vec::with_capacity(files.len());
    for file in &files {
        let track_name = normalize_track_path(&path_to_key(file), box_prefix);
        match load_table(file, &track_name) {
            Ok(table) => tables.push(table),
            Err(e) => log::warn!("skipping {}: {}", file.display(), e),
        }
    }
    Ok(tables)
}

/// Load every query record under `data_dir/query_prefix`.
///
/// Each JSON file holds an array of records. Every record's `track_path`
/// is normalized with `box_prefix` so it joins exactly against
/// [`TrackingTable::track_name`]; records without a caption are kept with
/// a warning.
pub fn load_tracking_query<P: AsRef<Path>>(
    data_dir: P,
    box_prefix: &str,
    query_prefix: &str,
) -> Result<Vec<QueryRecord>> {
    let root = data_dir.as_ref().join(query_prefix);
    let files = collect_files_sorted(&root, "json")?;

    let mut queries = Vec::new();
    for file in &files {
        let contents = fs::read_to_string(file)?;
        let records: Vec<QueryRecord> = serde_json::from_str(&contents)?;
        for mut record in records {
            record.track_path = normalize_track_path(&record.track_path, box_prefix);
            if record.caption.is_none() {
                log::warn!(
                    "caption not found in query for track {} ({})",
                    record.track_path,
                    file.display()
                );
            }
            queries.push(record);
        }
    }
    Ok(queries)
}

/// Parse one comma-delimited MOT17 file into a tracking table.
fn load_table(path: &Path, track_name: &str) -> Result<TrackingTable> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut flat: Vec<f64> = Vec::new();
    let mut ncols = 0usize;
    let mut nrows = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let mut row = Vec::new();
        for field in line.split(',') {
            let value: f64 = field.trim().parse().map_err(|_| {
                Error::InvalidInput(format!(
                    "non-numeric field '{}' at line {}",
                    field.trim(),
                    line_no + 1
                ))
            })?;
            row.push(value);
        }

        if nrows == 0 {
            if row.len() < MIN_COLUMNS {
                return Err(Error::InvalidInput(format!(
                    "{} columns at line {}, expected at least {}",
                    row.len(),
                    line_no + 1,
                    MIN_COLUMNS
                )));
            }
            ncols = row.len();
        } else if row.len() != ncols {
            return Err(Error::InvalidInput(format!(
                "ragged row at line {}: {} columns, expected {}",
                line_no + 1,
                row.len(),
                ncols
            )));
        }

        flat.extend_from_slice(&row);
        nrows += 1;
    }

    let data = if nrows == 0 {
        DMatrix::zeros(0, MIN_COLUMNS)
    } else {
        DMatrix::from_row_slice(nrows, ncols, &flat)
    };
    TrackingTable::new(track_name, data)
}

/// Recursively collect files with the given extension, sorted by path.
fn collect_files_sorted(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_into(root, extension, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_into(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_into(&path, extension, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            out.push(path);
        }
    }
    Ok(())
}

/// Render a path with forward slashes so prefix stripping behaves the
/// same on every platform.
fn path_to_key(path: &Path) -> String {
    path.iter()
        .map(|c| c.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
