//! Input cleanup ahead of clipping.

use std::collections::HashSet;

use crate::geometry::{is_collinear, Point};

/// Bit-pattern key with `-0.0` folded onto `0.0`, so equal coordinates hash equal.
#[inline]
fn coord_key(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

/// Drop exact repeats, keeping the first occurrence of each point in place.
///
/// No tolerance is applied: points differing by less than `EPS` both survive.
pub fn dedup_points(points: &[Point]) -> Vec<Point> {
    let mut seen: HashSet<(u64, u64)> = HashSet::with_capacity(points.len());
    points
        .iter()
        .filter(|p| seen.insert((coord_key(p.x), coord_key(p.y))))
        .copied()
        .collect()
}

/// Whether every point lies on the line through the first two.
///
/// Callers pass at least 3 deduplicated points; shorter inputs are reported as degenerate.
pub fn is_degenerate_line(points: &[Point]) -> bool {
    if points.len() < 3 {
        return true;
    }
    let (a, b) = (points[0], points[1]);
    points[2..].iter().all(|&p| is_collinear(a, b, p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let pts = [
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        assert_eq!(
            dedup_points(&pts),
            vec![Point::new(1.0, 1.0), Point::new(0.0, 0.0), Point::new(2.0, 0.0)]
        );
    }

    #[test]
    fn dedup_is_exact_and_folds_signed_zero() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(-0.0, 0.0),
            Point::new(1e-12, 0.0),
        ];
        let out = dedup_points(&pts);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1], Point::new(1e-12, 0.0));
    }

    #[test]
    fn collinear_detection() {
        let line: Vec<Point> = (0..6).map(|i| Point::new(i as f64, 2.0 * i as f64)).collect();
        assert!(is_degenerate_line(&line));
        let mut bent = line.clone();
        bent.push(Point::new(0.0, 1.0));
        assert!(!is_degenerate_line(&bent));
    }
}
