use crate::geometry::{Point, Triangle, Winding};

use super::ear::is_ear;

/// Result of one clipping run.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipOutcome {
    /// Triangles in emission order, over original vertex indices.
    pub triangles: Vec<Triangle>,
    /// Scan passes spent (each pass removes at most one ear).
    pub passes: usize,
    /// Whether the ring was reduced to its final triangle.
    pub complete: bool,
}

/// Clip ears off `vertices` (a simple polygon, n ≥ 3, not all collinear).
///
/// Every pass rescans the ring from position 0 and clips the first ear found.
/// At most `n²` passes run; a pass without an ear ends the run early and the
/// triangles found so far are returned.
pub fn clip_ears(vertices: &[Point]) -> ClipOutcome {
    let n = vertices.len();
    if n < 3 {
        return ClipOutcome {
            triangles: Vec::new(),
            passes: 0,
            complete: false,
        };
    }
    let winding = Winding::of(vertices);
    let mut ring: Vec<usize> = (0..n).collect();
    let mut triangles: Vec<Triangle> = Vec::with_capacity(n - 2);

    let max_passes = n.saturating_mul(n);
    let mut passes = 0usize;
    while ring.len() > 3 && passes < max_passes {
        passes += 1;
        let Some(pos) = (0..ring.len()).find(|&pos| is_ear(&ring, vertices, pos, winding)) else {
            tracing::warn!(
                remaining = ring.len(),
                emitted = triangles.len(),
                "no ear found; returning partial triangulation"
            );
            break;
        };
        let m = ring.len();
        triangles.push(Triangle::new(
            ring[(pos + m - 1) % m],
            ring[pos],
            ring[(pos + 1) % m],
        ));
        ring.remove(pos);
    }

    let complete = ring.len() == 3;
    if complete {
        triangles.push(Triangle::new(ring[0], ring[1], ring[2]));
    }
    ClipOutcome {
        triangles,
        passes,
        complete,
    }
}
