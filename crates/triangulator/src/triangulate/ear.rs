use crate::geometry::{is_convex_vertex, point_in_triangle, Point, Winding};

/// Whether ring position `pos` is a clippable ear.
///
/// Pre: `pos < ring.len()`, ring entries index into `vertices`.
/// Post: true iff the vertex is convex for `winding` and no other ring vertex
/// lies in the triangle (prev, curr, next), boundary included within `EPS`.
pub fn is_ear(ring: &[usize], vertices: &[Point], pos: usize, winding: Winding) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let prev = (pos + n - 1) % n;
    let next = (pos + 1) % n;
    let a = vertices[ring[prev]];
    let b = vertices[ring[pos]];
    let c = vertices[ring[next]];

    if !is_convex_vertex(a, b, c, winding) {
        return false;
    }
    ring.iter()
        .enumerate()
        .filter(|&(k, _)| k != prev && k != pos && k != next)
        .all(|(_, &vi)| !point_in_triangle(vertices[vi], a, b, c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 2.0),
            Point::new(0.0, 2.0),
        ]
    }

    #[test]
    fn reflex_vertex_is_not_an_ear() {
        let v = l_shape();
        let ring: Vec<usize> = (0..v.len()).collect();
        assert!(!is_ear(&ring, &v, 3, Winding::CounterClockwise));
    }

    #[test]
    fn convex_vertex_blocked_by_reflex_vertex() {
        // Triangle (5, 0, 1) contains the reflex corner (1, 1) on its hypotenuse.
        let v = l_shape();
        let ring: Vec<usize> = (0..v.len()).collect();
        assert!(!is_ear(&ring, &v, 0, Winding::CounterClockwise));
        assert!(is_ear(&ring, &v, 1, Winding::CounterClockwise));
    }

    #[test]
    fn wraps_around_ring_ends() {
        let v = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        let ring = vec![0, 1, 2, 3];
        assert!(is_ear(&ring, &v, 0, Winding::CounterClockwise));
        assert!(is_ear(&ring, &v, 3, Winding::CounterClockwise));
        assert!(!is_ear(&ring[..2], &v, 0, Winding::CounterClockwise));
    }
}
