//! Planar value types and the eps-aware predicates used by ear clipping.
//!
//! Sign conventions
//! - `orientation(o, a, b) > 0` is a counter-clockwise turn o→a→b.
//! - `signed_area > 0` is a counter-clockwise polygon.
//! - Every comparison against zero goes through `EPS`, never exact `0.0`.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Collinearity / sidedness tolerance shared by all predicates.
pub const EPS: f64 = 1e-9;

/// A point in the plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_vec2(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Triangle as three indices into the deduplicated vertex list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl Triangle {
    #[inline]
    pub const fn new(a: usize, b: usize, c: usize) -> Self {
        Self { a, b, c }
    }

    #[inline]
    pub fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }

    /// Unsigned area of the triangle over `vertices`.
    ///
    /// Pre: all three indices are `< vertices.len()`.
    pub fn area(&self, vertices: &[Point]) -> f64 {
        0.5 * orientation(vertices[self.a], vertices[self.b], vertices[self.c]).abs()
    }
}

/// Vertex order of a polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

impl Winding {
    /// Winding from the sign of the shoelace area. Zero area counts as counter-clockwise.
    pub fn of(vertices: &[Point]) -> Self {
        if signed_area(vertices) < 0.0 {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }
}

/// 2D cross product `(a − o) × (b − o)`.
#[inline]
pub fn orientation(o: Point, a: Point, b: Point) -> f64 {
    let oa = a.to_vec2() - o.to_vec2();
    let ob = b.to_vec2() - o.to_vec2();
    oa.perp(&ob)
}

#[inline]
pub fn is_collinear(a: Point, b: Point, c: Point) -> bool {
    orientation(a, b, c).abs() < EPS
}

/// Shoelace signed area. Returns 0 for fewer than 3 vertices.
pub fn signed_area(vertices: &[Point]) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let p = vertices[i];
        let q = vertices[(i + 1) % n];
        twice += p.x * q.y;
        twice -= q.x * p.y;
    }
    twice / 2.0
}

/// Containment of `p` in triangle `t1 t2 t3`, inclusive of the boundary within `EPS`.
///
/// `p` is rejected only when its edge orientations carry both a clearly negative
/// and a clearly positive value. Works for either triangle winding.
pub fn point_in_triangle(p: Point, t1: Point, t2: Point, t3: Point) -> bool {
    let d = [orientation(p, t1, t2), orientation(p, t2, t3), orientation(p, t3, t1)];
    let has_neg = d.iter().any(|&v| v < -EPS);
    let has_pos = d.iter().any(|&v| v > EPS);
    !(has_neg && has_pos)
}

/// Whether `curr` turns convexly relative to the polygon winding.
#[inline]
pub fn is_convex_vertex(prev: Point, curr: Point, next: Point, winding: Winding) -> bool {
    let turn = orientation(prev, curr, next);
    match winding {
        Winding::Clockwise => turn < -EPS,
        Winding::CounterClockwise => turn > EPS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn orientation_signs() {
        assert!(orientation(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)) > 0.0);
        assert!(orientation(p(0.0, 0.0), p(0.0, 1.0), p(1.0, 0.0)) < 0.0);
        assert!(is_collinear(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)));
        assert!(!is_collinear(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.1)));
    }

    #[test]
    fn orientation_matches_explicit_formula_seeded() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..32 {
            let o = p(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));
            let a = p(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));
            let b = p(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));
            let expected = (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x);
            assert!((orientation(o, a, b) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn signed_area_tracks_winding() {
        let ccw = [p(0.0, 0.0), p(2.0, 0.0), p(2.0, 1.0), p(0.0, 1.0)];
        let cw: Vec<Point> = ccw.iter().rev().copied().collect();
        assert!((signed_area(&ccw) - 2.0).abs() < 1e-12);
        assert!((signed_area(&cw) + 2.0).abs() < 1e-12);
        assert_eq!(Winding::of(&ccw), Winding::CounterClockwise);
        assert_eq!(Winding::of(&cw), Winding::Clockwise);
        assert_eq!(signed_area(&ccw[..2]), 0.0);
    }

    #[test]
    fn point_in_triangle_interior_boundary_exterior() {
        let (a, b, c) = (p(0.0, 0.0), p(4.0, 0.0), p(0.0, 4.0));
        assert!(point_in_triangle(p(1.0, 1.0), a, b, c));
        // Same answer for the reversed triangle.
        assert!(point_in_triangle(p(1.0, 1.0), a, c, b));
        // On an edge and on a corner count as inside.
        assert!(point_in_triangle(p(2.0, 0.0), a, b, c));
        assert!(point_in_triangle(p(2.0, 2.0), a, b, c));
        assert!(point_in_triangle(a, a, b, c));
        assert!(!point_in_triangle(p(3.0, 3.0), a, b, c));
        assert!(!point_in_triangle(p(-0.5, 1.0), a, b, c));
    }

    #[test]
    fn convexity_respects_winding() {
        let (prev, curr, next) = (p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0));
        assert!(is_convex_vertex(prev, curr, next, Winding::CounterClockwise));
        assert!(!is_convex_vertex(prev, curr, next, Winding::Clockwise));
        assert!(is_convex_vertex(next, curr, prev, Winding::Clockwise));
        // Straight angle is neither.
        let straight = (p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0));
        assert!(!is_convex_vertex(straight.0, straight.1, straight.2, Winding::Clockwise));
        assert!(!is_convex_vertex(
            straight.0,
            straight.1,
            straight.2,
            Winding::CounterClockwise
        ));
    }

    #[test]
    fn triangle_area_is_unsigned() {
        let verts = [p(0.0, 0.0), p(2.0, 0.0), p(0.0, 3.0)];
        assert!((Triangle::new(0, 1, 2).area(&verts) - 3.0).abs() < 1e-12);
        assert!((Triangle::new(0, 2, 1).area(&verts) - 3.0).abs() < 1e-12);
    }
}
