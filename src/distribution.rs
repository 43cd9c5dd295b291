//! Histogram and average computation for metric observations.
//!
//! Binning follows NumPy `histogram` semantics so results line up with
//! reference fixtures: equal-width buckets are half-open except the last,
//! which includes its right edge, and a degenerate observed range expands
//! by half a unit on each side.

use crate::{Error, Result};

/// Bin specification for [`compute_distr_and_avg`].
#[derive(Debug, Clone, PartialEq)]
pub enum BinSpec {
    /// Equal-width bins spanning the observed min/max. The count is
    /// clamped to the number of distinct observed values, so callers must
    /// re-derive the actual bucket count from the returned edges.
    Count(usize),
    /// Explicit ascending bin edges. Observations outside the outermost
    /// edges are not counted.
    Edges(Vec<f64>),
}

/// A normalized histogram over a set of observations.
#[derive(Debug, Clone)]
pub struct Distribution {
    /// Probability mass per bucket (counts divided by total counted
    /// observations; sums to 1).
    pub hist: Vec<f64>,
    /// Bucket edges, `hist.len() + 1` entries.
    pub bin_edges: Vec<f64>,
    /// Arithmetic mean of the raw observations.
    pub avg: f64,
}

/// Compute a normalized histogram and the mean of a sequence of observations.
///
/// # Arguments
/// * `values` - Observations; must be non-empty
/// * `bins` - Bucket count or explicit edges
///
/// # Returns
/// A [`Distribution`] whose histogram is a probability mass.
///
/// # Errors
/// `InvalidInput` if `values` is empty, if explicit edges are not strictly
/// ascending or fewer than two, or if explicit edges capture none of the
/// observations (normalization would divide by zero).
pub fn compute_distr_and_avg(values: &[f64], bins: &BinSpec) -> Result<Distribution> {
    if values.is_empty() {
        return Err(Error::InvalidInput(
            "cannot compute a distribution over an empty observation sequence".to_string(),
        ));
    }

    let bin_edges = match bins {
        BinSpec::Count(n) => equal_width_edges(values, *n)?,
        BinSpec::Edges(edges) => {
            if edges.len() < 2 {
                return Err(Error::InvalidInput(format!(
                    "bin edges need at least 2 entries, got {}",
                    edges.len()
                )));
            }
            if edges.windows(2).any(|w| w[1] <= w[0]) {
                return Err(Error::InvalidInput(
                    "bin edges must be strictly ascending".to_string(),
                ));
            }
            edges.clone()
        }
    };

    let n_buckets = bin_edges.len() - 1;
    let mut counts = vec![0usize; n_buckets];
    let last = n_buckets - 1;
    for &v in values {
        if v < bin_edges[0] || v > bin_edges[n_buckets] {
            continue;
        }
        // Last bucket is right-inclusive, all others half-open.
        let mut idx = last;
        for i in 0..last {
            if v < bin_edges[i + 1] {
                idx = i;
                break;
            }
        }
        counts[idx] += 1;
    }

    let total: usize = counts.iter().sum();
    if total == 0 {
        return Err(Error::InvalidInput(
            "no observations fall within the provided bin edges".to_string(),
        ));
    }

    let hist = counts.iter().map(|&c| c as f64 / total as f64).collect();
    let avg = values.iter().sum::<f64>() / values.len() as f64;

    Ok(Distribution { hist, bin_edges, avg })
}

/// Equal-width edges over the observed range, with the bucket count
/// clamped to the number of distinct values so the data is never split
/// finer than it can distinguish.
fn equal_width_edges(values: &[f64], requested: usize) -> Result<Vec<f64>> {
    if requested == 0 {
        return Err(Error::InvalidInput("bin count must be positive".to_string()));
    }

    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted.dedup();
    let n = requested.min(sorted.len());

    let mut lo = sorted[0];
    let mut hi = sorted[sorted.len() - 1];
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / n as f64;
    let mut edges: Vec<f64> = (0..n).map(|i| lo + width * i as f64).collect();
    edges.push(hi);
    Ok(edges)
}
