//! Ear-clipping triangulation of simple polygons.
//!
//! Purpose
//! - Turn an ordered point sequence (vertices of a simple polygon, convex or
//!   concave, either winding) into index triangles over the deduplicated
//!   vertex list.
//!
//! Pipeline
//! - `prepare`: exact dedup, trivial (<3) and all-collinear short-circuits.
//! - `clip`: bounded greedy loop over an index ring, rescanning from the start
//!   after each removal; `ear` decides each candidate.
//!
//! Degenerate input never errors; it yields fewer triangles than `n − 2`.
//! Worst case is O(n³) (O(ring) ear test × O(ring) scan × n removals).

mod clip;
mod ear;
mod prepare;

pub use clip::{clip_ears, ClipOutcome};
pub use ear::is_ear;
pub use prepare::{dedup_points, is_degenerate_line};

use serde::{Deserialize, Serialize};

use crate::geometry::{signed_area, Point, Triangle};

/// Deduplicated vertices plus the triangles referencing them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Triangulation {
    pub vertices: Vec<Point>,
    pub triangles: Vec<Triangle>,
}

impl Triangulation {
    /// True when the polygon was fully reduced (`n ≥ 3` and `n − 2` triangles).
    pub fn is_complete(&self) -> bool {
        let n = self.vertices.len();
        n >= 3 && self.triangles.len() == n - 2
    }

    /// Sum of the unsigned triangle areas. Indices must be in range, as
    /// `compute_triangulation` and `decode_triangulation` guarantee.
    pub fn area(&self) -> f64 {
        self.triangles.iter().map(|t| t.area(&self.vertices)).sum()
    }

    /// Absolute shoelace area of the vertex ring (what a complete result must cover).
    pub fn polygon_area(&self) -> f64 {
        signed_area(&self.vertices).abs()
    }
}

/// Triangulate `points` as the ordered vertices of a simple polygon.
///
/// Pure and deterministic: the emitted triangle order depends only on the input
/// order and geometry.
pub fn compute_triangulation(points: &[Point]) -> Triangulation {
    let vertices = dedup_points(points);
    if vertices.len() < 3 {
        tracing::debug!(unique = vertices.len(), "fewer than 3 unique points");
        return Triangulation {
            vertices,
            triangles: Vec::new(),
        };
    }
    if is_degenerate_line(&vertices) {
        tracing::debug!(unique = vertices.len(), "all points collinear");
        return Triangulation {
            vertices,
            triangles: Vec::new(),
        };
    }
    let outcome = clip_ears(&vertices);
    tracing::debug!(
        unique = vertices.len(),
        triangles = outcome.triangles.len(),
        passes = outcome.passes,
        "clipped"
    );
    Triangulation {
        vertices,
        triangles: outcome.triangles,
    }
}
