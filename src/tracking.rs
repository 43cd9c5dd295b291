//! Data model for tracking ground truth and caption queries.

use crate::{Error, Result};
use nalgebra::DMatrix;
use serde::Deserialize;

/// Number of mandatory columns in a MOT17-style ground-truth row:
/// `frame, object, x, y, width, height`. Extra columns are carried but
/// ignored by every metric.
pub const MIN_COLUMNS: usize = 6;

/// Ground-truth tracking data for one video/sequence.
///
/// Rows are per-frame bounding-box records in MOT17 column order. Frame
/// and object identifiers are float-encoded integers; observations for a
/// given frame or object may be non-contiguous in storage order, so all
/// grouping in the metrics compares identifier values exactly rather than
/// relying on row order.
#[derive(Debug, Clone)]
pub struct TrackingTable {
    /// Identifier derived from the source file path, with everything up to
    /// and including the configured prefix segment stripped. Join key
    /// against [`QueryRecord::track_path`].
    pub track_name: String,
    /// Rectangular numeric record matrix, at least [`MIN_COLUMNS`] wide.
    /// An empty table keeps a 0 x 6 shape.
    pub data: DMatrix<f64>,
}

impl TrackingTable {
    /// Create a tracking table, validating the record shape.
    ///
    /// # Errors
    /// `InvalidInput` if a non-empty matrix has fewer than six columns.
    pub fn new(track_name: impl Into<String>, data: DMatrix<f64>) -> Result<Self> {
        let track_name = track_name.into();

        if data.nrows() == 0 {
            log::warn!("track {} has no data", track_name);
            return Ok(Self {
                track_name,
                data: DMatrix::zeros(0, MIN_COLUMNS),
            });
        }

        if data.ncols() < MIN_COLUMNS {
            return Err(Error::InvalidInput(format!(
                "track {} has {} columns, expected at least {} (MOT17 order)",
                track_name,
                data.ncols(),
                MIN_COLUMNS
            )));
        }

        Ok(Self { track_name, data })
    }

    /// Number of box records in the table.
    pub fn num_rows(&self) -> usize {
        self.data.nrows()
    }

    /// Distinct values of one column, sorted ascending.
    pub(crate) fn unique_column(&self, col: usize) -> Vec<f64> {
        let mut values: Vec<f64> = self.data.column(col).iter().copied().collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup();
        values
    }

    /// Distinct frame ids, sorted ascending.
    pub fn frame_ids(&self) -> Vec<f64> {
        self.unique_column(0)
    }

    /// Distinct object ids, sorted ascending.
    pub fn object_ids(&self) -> Vec<f64> {
        self.unique_column(1)
    }

    /// Indices of rows whose value in `col` equals `value` exactly.
    pub(crate) fn rows_where(&self, col: usize, value: f64) -> Vec<usize> {
        (0..self.data.nrows())
            .filter(|&i| self.data[(i, col)] == value)
            .collect()
    }

    /// Bounding box of row `i` in `(x, y, width, height)` form.
    pub fn bbox(&self, i: usize) -> [f64; 4] {
        [
            self.data[(i, 2)],
            self.data[(i, 3)],
            self.data[(i, 4)],
            self.data[(i, 5)],
        ]
    }
}

/// One caption query annotating a class/track pairing.
///
/// Deserialized from the JSON query files; `track_path` is normalized at
/// load time with the same prefix-stripping rule as
/// [`TrackingTable::track_name`] so the two sides join exactly.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRecord {
    pub class_name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(rename = "type")]
    pub query_type: String,
    pub is_eval: bool,
    pub definition: String,
    pub attributes: Vec<String>,
    pub video_path: String,
    pub track_path: String,
    /// Missing captions are a recoverable condition: the loader warns and
    /// leaves this unset.
    #[serde(default)]
    pub caption: Option<String>,
}
