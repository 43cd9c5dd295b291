//! Per-class aggregation joining tracking tables to caption queries.

use std::collections::BTreeMap;

use crate::tracking::{QueryRecord, TrackingTable};

/// Per-class totals accumulated over every matched tracking table.
///
/// All three maps share the same key set, created lazily as class names
/// are first seen. Ordered keys keep report output deterministic.
#[derive(Debug, Clone, Default)]
pub struct ClassNameStats {
    /// Distinct frame ids summed per class.
    pub num_frames: BTreeMap<String, usize>,
    /// Distinct object ids summed per class.
    pub num_objects: BTreeMap<String, usize>,
    /// Box records summed per class.
    pub num_boxes: BTreeMap<String, usize>,
}

impl ClassNameStats {
    /// Class names with at least one matched table.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.num_frames.keys().map(String::as_str)
    }
}

/// Accumulate frame/object/box counts per class name.
///
/// Each tracking table is matched to the first query record whose
/// normalized `track_path` equals the table's `track_name`; the linear
/// scan is fine at dataset scale. Tables with no matching record are
/// warned about and excluded from all three totals.
pub fn compute_stat_per_class_name(
    gt_tracking: &[TrackingTable],
    gt_text_query: &[QueryRecord],
) -> ClassNameStats {
    let mut stats = ClassNameStats::default();

    for gt in gt_tracking {
        let matched = gt_text_query
            .iter()
            .find(|query| query.track_path == gt.track_name);

        let query = match matched {
            Some(q) => q,
            None => {
                log::warn!("{} not found in query records, skipping", gt.track_name);
                continue;
            }
        };

        let class_name = query.class_name.clone();
        *stats.num_frames.entry(class_name.clone()).or_insert(0) += gt.frame_ids().len();
        *stats.num_objects.entry(class_name.clone()).or_insert(0) += gt.object_ids().len();
        *stats.num_boxes.entry(class_name).or_insert(0) += gt.num_rows();
    }

    stats
}
