//! Shortest-path distance on a wrap-around grid
//!
//! On a toroidal grid the path across the seam may be shorter than the
//! direct difference. Each axis independently picks the smaller of the
//! direct and wrapped displacement; the corrected components compose into
//! a Euclidean length and remain available for downstream geometry.

use crate::core::config::GridConfig;
use crate::core::types::Point;

/// Shortest displacement from one point to another, with wrap correction
/// applied per axis when the grid is toroidal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceVector {
    pub dx: f32,
    pub dy: f32,
    pub dz: f32,
    pub length: f32,
}

/// Per-axis correction: direct displacement, or the wrapped one if shorter.
/// `axis_size <= 0` disables wrapping for that axis.
#[inline]
fn corrected_axis(from: f32, to: f32, axis_size: f32, toroidal: bool) -> f32 {
    let direct = to - from;
    if !toroidal || axis_size <= 0.0 {
        return direct;
    }
    let wrapped = axis_size - direct.abs();
    if wrapped < direct.abs() {
        // Crossing the seam is shorter; orientation flips.
        if direct > 0.0 {
            -wrapped
        } else {
            wrapped
        }
    } else {
        direct
    }
}

/// Shortest displacement vector from `from` to `to` under the grid's
/// wrapping semantics.
pub fn distance_vector(from: &Point, to: &Point, grid: &GridConfig) -> DistanceVector {
    let dx = corrected_axis(from.x, to.x, grid.width, grid.toroidal);
    let dy = corrected_axis(from.y, to.y, grid.height, grid.toroidal);
    let dz = match grid.depth {
        Some(depth) => corrected_axis(from.z, to.z, depth, grid.toroidal),
        None => to.z - from.z,
    };
    DistanceVector {
        dx,
        dy,
        dz,
        length: (dx * dx + dy * dy + dz * dz).sqrt(),
    }
}

/// Shortest scalar distance between two points under the grid's wrapping
/// semantics.
pub fn distance(a: &Point, b: &Point, grid: &GridConfig) -> f32 {
    distance_vector(a, b, grid).length
}
