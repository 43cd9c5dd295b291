//! Metric engine over collections of tracking tables.
//!
//! Each metric reduces every table to scalar observations, concatenates
//! them across tables, and hands the result to the distribution utility,
//! so the output is always `(histogram, bin edges, average)`.

use std::fmt;
use std::str::FromStr;

use crate::distribution::{compute_distr_and_avg, BinSpec, Distribution};
use crate::geometry::compute_iou;
use crate::tracking::TrackingTable;
use crate::{Error, Result};

/// Signature shared by every metric function.
pub type StatFn = fn(&[TrackingTable], &BinSpec) -> Result<Distribution>;

/// The selectable metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatsName {
    NumObjPerVideo,
    NumObjPerFrame,
    VideoLength,
    TrackGapLength,
    IouIntraFrame,
    IouInterFrame,
}

impl StatsName {
    /// All metrics, in the order the standard report evaluates them.
    pub const ALL: [StatsName; 6] = [
        StatsName::NumObjPerVideo,
        StatsName::NumObjPerFrame,
        StatsName::VideoLength,
        StatsName::TrackGapLength,
        StatsName::IouIntraFrame,
        StatsName::IouInterFrame,
    ];

    /// Human-readable label, also used in report rows.
    pub fn label(&self) -> &'static str {
        match self {
            StatsName::NumObjPerVideo => "#objects per video",
            StatsName::NumObjPerFrame => "#objects per frame",
            StatsName::VideoLength => "Video length",
            StatsName::TrackGapLength => "Track gap length",
            StatsName::IouIntraFrame => "IoU intra-frame",
            StatsName::IouInterFrame => "IoU inter-frame",
        }
    }
}

impl fmt::Display for StatsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StatsName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "#objects per video" => Ok(StatsName::NumObjPerVideo),
            "#objects per frame" => Ok(StatsName::NumObjPerFrame),
            "Video length" => Ok(StatsName::VideoLength),
            "Track gap length" => Ok(StatsName::TrackGapLength),
            "IoU intra-frame" => Ok(StatsName::IouIntraFrame),
            "IoU inter-frame" => Ok(StatsName::IouInterFrame),
            _ => Err(Error::UnsupportedMetric(s.to_string())),
        }
    }
}

/// Map a metric name to its implementation.
pub fn compute_stat_by_name(metric: StatsName) -> StatFn {
    match metric {
        StatsName::NumObjPerVideo => count_obj_per_video,
        StatsName::NumObjPerFrame => count_obj_per_frame,
        StatsName::VideoLength => compute_video_length,
        StatsName::TrackGapLength => compute_track_gap_length,
        StatsName::IouIntraFrame => compute_iou_ratio_objects_intra_frame,
        StatsName::IouInterFrame => compute_iou_ratio_track_inter_frame,
    }
}

/// Distribution of the number of distinct objects per video.
pub fn count_obj_per_video(gt_tracking: &[TrackingTable], bins: &BinSpec) -> Result<Distribution> {
    let num_objs: Vec<f64> = gt_tracking
        .iter()
        .map(|gt| gt.object_ids().len() as f64)
        .collect();
    log_max("objects per video", &num_objs);
    compute_distr_and_avg(&num_objs, bins)
}

/// Distribution of the number of box records per frame.
pub fn count_obj_per_frame(gt_tracking: &[TrackingTable], bins: &BinSpec) -> Result<Distribution> {
    let mut num_objs = Vec::new();
    for gt in gt_tracking {
        for frame_id in gt.frame_ids() {
            num_objs.push(gt.rows_where(0, frame_id).len() as f64);
        }
    }
    log_max("objects per frame", &num_objs);
    compute_distr_and_avg(&num_objs, bins)
}

/// Distribution of video lengths, measured as distinct frame-id counts.
pub fn compute_video_length(gt_tracking: &[TrackingTable], bins: &BinSpec) -> Result<Distribution> {
    let video_lengths: Vec<f64> = gt_tracking
        .iter()
        .map(|gt| gt.frame_ids().len() as f64)
        .collect();
    compute_distr_and_avg(&video_lengths, bins)
}

/// Distribution of gap lengths within tracks.
///
/// For each object its frames are sorted ascending; a gap between
/// consecutive frames `a < b` has length `b - a - 1` and is recorded only
/// when positive. Consecutive integer frames therefore contribute nothing.
pub fn compute_track_gap_length(
    gt_tracking: &[TrackingTable],
    bins: &BinSpec,
) -> Result<Distribution> {
    let mut gap_lengths = Vec::new();
    for gt in gt_tracking {
        for obj_id in gt.object_ids() {
            let mut frames: Vec<f64> = gt
                .rows_where(1, obj_id)
                .iter()
                .map(|&i| gt.data[(i, 0)])
                .collect();
            frames.sort_by(|a, b| a.total_cmp(b));
            frames.dedup();
            for pair in frames.windows(2) {
                let gap = pair[1] - pair[0] - 1.0;
                if gap > 0.0 {
                    gap_lengths.push(gap);
                }
            }
        }
    }
    log_max("gap length", &gap_lengths);
    compute_distr_and_avg(&gap_lengths, bins)
}

/// Distribution of pairwise IoU between boxes sharing a frame.
///
/// Every unordered pair of boxes in each frame contributes one
/// observation, including pairs that do not overlap at all. Use
/// [`compute_iou_ratio_objects_intra_frame_filtered`] to drop exact-zero
/// overlaps instead.
pub fn compute_iou_ratio_objects_intra_frame(
    gt_tracking: &[TrackingTable],
    bins: &BinSpec,
) -> Result<Distribution> {
    compute_iou_ratio_objects_intra_frame_filtered(gt_tracking, bins, false)
}

/// Intra-frame pairwise IoU with an optional exact-zero-overlap filter.
pub fn compute_iou_ratio_objects_intra_frame_filtered(
    gt_tracking: &[TrackingTable],
    bins: &BinSpec,
    exclude_zero: bool,
) -> Result<Distribution> {
    let mut iou_ratios = Vec::new();
    for gt in gt_tracking {
        for frame_id in gt.frame_ids() {
            let rows = gt.rows_where(0, frame_id);
            for i in 0..rows.len() {
                for j in (i + 1)..rows.len() {
                    let iou = compute_iou(gt.bbox(rows[i]), gt.bbox(rows[j]));
                    if !exclude_zero || iou > 0.0 {
                        iou_ratios.push(iou);
                    }
                }
            }
        }
    }
    compute_distr_and_avg(&iou_ratios, bins)
}

/// Distribution of IoU between consecutive boxes of the same track.
///
/// Rows of each object are sorted by frame id ascending; each consecutive
/// row pair contributes one observation, whether or not the frame numbers
/// are adjacent.
pub fn compute_iou_ratio_track_inter_frame(
    gt_tracking: &[TrackingTable],
    bins: &BinSpec,
) -> Result<Distribution> {
    let mut iou_ratios = Vec::new();
    for gt in gt_tracking {
        for obj_id in gt.object_ids() {
            let mut rows = gt.rows_where(1, obj_id);
            rows.sort_by(|&a, &b| gt.data[(a, 0)].total_cmp(&gt.data[(b, 0)]));
            for pair in rows.windows(2) {
                iou_ratios.push(compute_iou(gt.bbox(pair[0]), gt.bbox(pair[1])));
            }
        }
    }
    compute_distr_and_avg(&iou_ratios, bins)
}

fn log_max(what: &str, values: &[f64]) {
    if let Some(max) = values.iter().copied().reduce(f64::max) {
        log::debug!("max {}: {}", what, max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    fn table(name: &str, rows: &[[f64; 6]]) -> TrackingTable {
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        TrackingTable::new(name, DMatrix::from_row_slice(rows.len(), 6, &flat)).unwrap()
    }

    fn row(frame: f64, obj: f64) -> [f64; 6] {
        [frame, obj, 0.0, 0.0, 10.0, 10.0]
    }

    fn box_row(frame: f64, obj: f64, bbox: [f64; 4]) -> [f64; 6] {
        [frame, obj, bbox[0], bbox[1], bbox[2], bbox[3]]
    }

    #[test]
    fn test_count_obj_per_video() {
        let tables = vec![
            table("a", &[row(1.0, 1.0), row(1.0, 2.0), row(2.0, 1.0)]),
            table("b", &[row(1.0, 7.0)]),
        ];
        let d = count_obj_per_video(&tables, &BinSpec::Count(2)).unwrap();
        // Observations [2, 1].
        assert_relative_eq!(d.avg, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_count_obj_per_frame_observations() {
        // frame 1 holds two objects, frame 2 one.
        let tables = vec![table("a", &[row(1.0, 1.0), row(1.0, 2.0), row(2.0, 1.0)])];
        let d = count_obj_per_frame(&tables, &BinSpec::Count(2)).unwrap();
        assert_relative_eq!(d.avg, 1.5, epsilon = 1e-12);
        assert_relative_eq!(d.hist.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_count_obj_per_frame_skips_empty_table() {
        let empty = TrackingTable::new("empty", DMatrix::zeros(0, 6)).unwrap();
        let tables = vec![empty, table("a", &[row(1.0, 1.0)])];
        let d = count_obj_per_frame(&tables, &BinSpec::Count(1)).unwrap();
        assert_relative_eq!(d.avg, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_video_length_counts_distinct_frames() {
        let tables = vec![table(
            "a",
            &[row(1.0, 1.0), row(1.0, 2.0), row(5.0, 1.0), row(9.0, 1.0)],
        )];
        let d = compute_video_length(&tables, &BinSpec::Count(1)).unwrap();
        assert_relative_eq!(d.avg, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_track_gap_length_excludes_zero_gaps() {
        // Frames [1, 2, 3, 7, 8]: the only break is 3 -> 7, gap 3.
        let tables = vec![table(
            "a",
            &[
                row(1.0, 1.0),
                row(2.0, 1.0),
                row(3.0, 1.0),
                row(7.0, 1.0),
                row(8.0, 1.0),
            ],
        )];
        let d = compute_track_gap_length(&tables, &BinSpec::Count(1)).unwrap();
        assert_relative_eq!(d.avg, 3.0, epsilon = 1e-12);
        assert_eq!(d.hist.len(), 1);
        assert_relative_eq!(d.hist[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_track_gap_length_unsorted_storage_order() {
        // Same track stored out of frame order still yields one gap of 3.
        let tables = vec![table(
            "a",
            &[
                row(7.0, 1.0),
                row(1.0, 1.0),
                row(8.0, 1.0),
                row(3.0, 1.0),
                row(2.0, 1.0),
            ],
        )];
        let d = compute_track_gap_length(&tables, &BinSpec::Count(1)).unwrap();
        assert_relative_eq!(d.avg, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_track_gap_length_no_gaps_is_invalid_input() {
        let tables = vec![table("a", &[row(1.0, 1.0), row(2.0, 1.0)])];
        let err = compute_track_gap_length(&tables, &BinSpec::Count(5));
        assert!(matches!(err, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_intra_frame_iou_includes_zero_pairs_by_default() {
        let tables = vec![table(
            "a",
            &[
                box_row(1.0, 1.0, [0.0, 0.0, 10.0, 10.0]),
                box_row(1.0, 2.0, [5.0, 5.0, 10.0, 10.0]),
                box_row(1.0, 3.0, [500.0, 500.0, 10.0, 10.0]),
            ],
        )];
        // Three pairs, two of them zero-overlap.
        let d = compute_iou_ratio_objects_intra_frame(&tables, &BinSpec::Count(2)).unwrap();
        assert_relative_eq!(d.hist.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        let expected = 36.0 / (121.0 + 121.0 - 36.0);
        assert_relative_eq!(d.avg, expected / 3.0, epsilon = 1e-6);

        let filtered =
            compute_iou_ratio_objects_intra_frame_filtered(&tables, &BinSpec::Count(1), true)
                .unwrap();
        assert_relative_eq!(filtered.avg, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_inter_frame_iou_follows_frame_order() {
        // A box that jumps away and back; consecutive-in-frame-order pairs
        // are (1,2) and (2,9) regardless of storage order.
        let tables = vec![table(
            "a",
            &[
                box_row(9.0, 1.0, [0.0, 0.0, 10.0, 10.0]),
                box_row(1.0, 1.0, [0.0, 0.0, 10.0, 10.0]),
                box_row(2.0, 1.0, [500.0, 500.0, 10.0, 10.0]),
            ],
        )];
        let d = compute_iou_ratio_track_inter_frame(&tables, &BinSpec::Count(2)).unwrap();
        // Both pairs involve the far-away box, so both observations are 0.
        assert_relative_eq!(d.avg, 0.0, epsilon = 1e-6);
        assert_eq!(d.hist.len(), 1);
    }

    #[test]
    fn test_dispatch_covers_every_metric() {
        let tables = vec![table(
            "a",
            &[row(1.0, 1.0), row(2.0, 1.0), row(4.0, 2.0), row(4.0, 1.0)],
        )];
        for name in StatsName::ALL {
            let result = compute_stat_by_name(name)(&tables, &BinSpec::Count(3));
            assert!(result.is_ok(), "metric {} failed: {:?}", name, result.err());
        }
    }

    #[test]
    fn test_unknown_metric_name_rejected() {
        let err = "Mean pixel value".parse::<StatsName>();
        assert!(matches!(err, Err(Error::UnsupportedMetric(_))));
    }

    #[test]
    fn test_labels_round_trip() {
        for name in StatsName::ALL {
            assert_eq!(name.label().parse::<StatsName>().unwrap(), name);
        }
    }
}
