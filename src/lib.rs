//! # Trackstats - MOT Dataset Statistics
//!
//! Descriptive statistics over multi-object-tracking ground truth in the
//! MOT17 text format, plus the caption queries that annotate each track.
//!
//! The crate turns per-frame bounding-box records into derived
//! distributions (object counts, video lengths, track gap lengths,
//! pairwise IoU ratios) and aggregates frame/object/box counts per class
//! name by joining tracking tables against query records.
//!
//! ## Features
//!
//! - Six selectable metrics, each producing `(histogram, bin edges, average)`
//! - NumPy-compatible histogram binning with probability-mass normalization
//! - Inclusive-pixel IoU matching the reference ground-truth tooling
//! - Per-class aggregation joining tracking tables to caption queries
//! - Loaders for MOT-style directory trees and CSV report writers
//!
//! ## Example
//!
//! ```rust,ignore
//! use trackstats::{load_tracking_gt, compute_stat_by_name, StatsName, BinSpec};
//!
//! let tables = load_tracking_gt("dataset", "box_gt")?;
//! let stat_fn = compute_stat_by_name(StatsName::NumObjPerVideo);
//! let distr = stat_fn(&tables, &BinSpec::Count(10))?;
//! println!("avg objects per video: {}", distr.avg);
//! ```

pub mod geometry;
pub mod distribution;
pub mod tracking;
pub mod stats;
pub mod loader;
pub mod reporter;

// Re-exports for convenience
pub use distribution::{compute_distr_and_avg, BinSpec, Distribution};
pub use geometry::compute_iou;
pub use loader::{load_tracking_gt, load_tracking_query, normalize_track_path};
pub use reporter::{run_stats, StatsReport};
pub use stats::{compute_stat_by_name, compute_stat_per_class_name, ClassNameStats, StatsName};
pub use tracking::{QueryRecord, TrackingTable};

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors that can occur while computing dataset statistics
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Invalid input: {0}")]
        InvalidInput(String),

        #[error("Unsupported metric: {0}")]
        UnsupportedMetric(String),

        #[error("IO error: {0}")]
        IoError(#[from] std::io::Error),

        #[error("JSON error: {0}")]
        JsonError(#[from] serde_json::Error),
    }

    /// Result type for trackstats operations
    pub type Result<T> = std::result::Result<T, Error>;
}
