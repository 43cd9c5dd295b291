//! Tracking statistics module.
//!
//! This module hosts the metric engine and the class-aggregation join:
//!
//! - `StatsName` / `compute_stat_by_name` - metric selection and dispatch
//! - Six metric functions over collections of tracking tables
//! - `compute_stat_per_class_name` - per-class frame/object/box totals

mod engine;
mod class_aggregation;

pub use class_aggregation::{compute_stat_per_class_name, ClassNameStats};
pub use engine::{
    compute_iou_ratio_objects_intra_frame, compute_iou_ratio_objects_intra_frame_filtered,
    compute_iou_ratio_track_inter_frame, compute_stat_by_name, compute_track_gap_length,
    compute_video_length, count_obj_per_frame, count_obj_per_video, StatFn, StatsName,
};
