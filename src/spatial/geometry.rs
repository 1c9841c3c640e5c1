//! Derived geometry of a cluster: centroid, extents, radius
//!
//! On a toroidal grid a cluster can straddle the seam, in which case the
//! naive mean lands in the middle of the grid instead of on the cluster.
//! Split detection finds the seam gap per axis, translates the minority
//! side by the axis size so the points are contiguous, and recomputes the
//! mean and radius from the rebased coordinates.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::config::GridConfig;
use crate::core::types::Point;

/// Read-only summary of one cluster's shape for the current round.
///
/// Split and majority flags are meaningful only on a toroidal grid; on a
/// flat grid they are always false. When an axis is split its radius comes
/// from the rebased sub-clusters, never from the naive extents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterGeometry {
    pub centroid: Point,
    /// Naive (untranslated) extents
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
    pub x_radius: f32,
    pub y_radius: f32,
    /// Whether the cluster straddles the seam on this axis
    pub x_split: bool,
    pub y_split: bool,
    /// When split: whether the majority of members sits on the
    /// low-coordinate side of the gap (ties count as low)
    pub x_majority_low: bool,
    pub y_majority_low: bool,
}

/// Per-axis reduction shared by both axes.
struct AxisSummary {
    mean: f32,
    min: f32,
    max: f32,
    radius: f32,
    split: bool,
    majority_low: bool,
}

fn summarize_axis(coords: &[f32], max_gap: f32, axis_size: f32, toroidal: bool) -> AxisSummary {
    debug_assert!(!coords.is_empty());
    let n = coords.len();
    let naive_mean = coords.iter().sum::<f32>() / n as f32;
    let naive_min = coords.iter().cloned().fold(f32::INFINITY, f32::min);
    let naive_max = coords.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

    let mut summary = AxisSummary {
        mean: naive_mean,
        min: naive_min,
        max: naive_max,
        radius: (naive_max - naive_mean).max(naive_mean - naive_min),
        split: false,
        majority_low: false,
    };

    if !toroidal || n < 2 {
        // With a single member no adjacent pair exists, so gap detection
        // never fires and extents collapse to the point itself.
        return summary;
    }

    let mut sorted: Vec<f32> = coords.to_vec();
    sorted.sort_by_key(|c| OrderedFloat(*c));

    let gap_at = (0..n - 1).find(|&i| sorted[i + 1] - sorted[i] > max_gap);
    let Some(gap) = gap_at else {
        return summary;
    };

    let low = &sorted[..=gap];
    let high = &sorted[gap + 1..];
    // Strict majority; a tie counts as majority-low.
    let majority_low = !(high.len() * 2 > n);

    // Translate the minority side by the axis size so all coordinates are
    // contiguous in absolute space, then recompute mean and radius.
    let rebased: Vec<f32> = if majority_low {
        low.iter()
            .cloned()
            .chain(high.iter().map(|c| c - axis_size))
            .collect()
    } else {
        low.iter()
            .map(|c| c + axis_size)
            .chain(high.iter().cloned())
            .collect()
    };

    let mean = rebased.iter().sum::<f32>() / n as f32;
    let rebased_min = rebased.iter().cloned().fold(f32::INFINITY, f32::min);
    let rebased_max = rebased.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

    summary.split = true;
    summary.majority_low = majority_low;
    summary.radius = (rebased_max - mean).max(mean - rebased_min);
    summary.mean = mean.rem_euclid(axis_size);
    summary
}

impl ClusterGeometry {
    /// Summarize a non-empty set of member points.
    ///
    /// `max_gap` is the split-detection threshold, normally the clusterer's
    /// maximum intra-cluster distance. Returns None on an empty slice.
    pub fn compute(points: &[Point], max_gap: f32, grid: &GridConfig) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let xs: Vec<f32> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f32> = points.iter().map(|p| p.y).collect();
        let x = summarize_axis(&xs, max_gap, grid.width, grid.toroidal);
        let y = summarize_axis(&ys, max_gap, grid.height, grid.toroidal);

        Some(Self {
            centroid: Point::new(x.mean, y.mean),
            x_min: x.min,
            x_max: x.max,
            y_min: y.min,
            y_max: y.max,
            x_radius: x.radius,
            y_radius: y.radius,
            x_split: x.split,
            y_split: y.split,
            x_majority_low: x.majority_low,
            y_majority_low: y.majority_low,
        })
    }

    /// Overall radius: the larger of the two axis radii.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.x_radius.max(self.y_radius)
    }
}
