//! Geometric predicates with explicit tolerance.

use crate::primitives::{Point2, Segment2};
use num_traits::Float;

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Points are counter-clockwise (positive area).
    CounterClockwise,
    /// Points are clockwise (negative area).
    Clockwise,
    /// Points are collinear (within tolerance).
    Collinear,
}

/// Computes the orientation of the triangle `a`, `b`, `c`.
///
/// `eps` is compared against the absolute cross product (twice the signed
/// area), so it scales with the input coordinates.
#[inline]
pub fn orient2d<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>, eps: F) -> Orientation {
    let cross = (b - a).cross(c - a);

    if cross > eps {
        Orientation::CounterClockwise
    } else if cross < -eps {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Returns `true` if `p` is within distance `eps` of the segment.
#[inline]
pub fn point_on_segment<F: Float>(p: Point2<F>, segment: Segment2<F>, eps: F) -> bool {
    segment.distance_squared_to_point(p) <= eps * eps
}

/// Tests whether two segments share at least one point, within `eps`.
///
/// Proper crossings are detected from strict orientation signs; touching,
/// T-junctions and collinear overlaps are caught by the endpoint distance
/// test, which keeps the predicate usable on shared (welded) edges.
///
/// # Example
///
/// ```
/// use seamline::primitives::{Point2, Segment2};
/// use seamline::tolerance::segments_touch;
///
/// // Collinear, overlapping along x in [1, 2]
/// let a = Segment2::new(Point2::new(0.0_f64, 0.0), Point2::new(2.0, 0.0));
/// let b = Segment2::new(Point2::new(1.0, 0.0), Point2::new(3.0, 0.0));
/// assert!(segments_touch(a, b, 1e-9));
///
/// let c = Segment2::new(Point2::new(0.0, 1.0), Point2::new(2.0, 1.0));
/// assert!(!segments_touch(a, c, 1e-9));
/// ```
pub fn segments_touch<F: Float>(s1: Segment2<F>, s2: Segment2<F>, eps: F) -> bool {
    let zero = F::zero();
    let o1 = orient2d(s1.start, s1.end, s2.start, zero);
    let o2 = orient2d(s1.start, s1.end, s2.end, zero);
    let o3 = orient2d(s2.start, s2.end, s1.start, zero);
    let o4 = orient2d(s2.start, s2.end, s1.end, zero);

    let straddles = |a: Orientation, b: Orientation| {
        matches!(
            (a, b),
            (Orientation::CounterClockwise, Orientation::Clockwise)
                | (Orientation::Clockwise, Orientation::CounterClockwise)
        )
    };

    if straddles(o1, o2) && straddles(o3, o4) {
        return true;
    }

    point_on_segment(s2.start, s1, eps)
        || point_on_segment(s2.end, s1, eps)
        || point_on_segment(s1.start, s2, eps)
        || point_on_segment(s1.end, s2, eps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment2<f64> {
        Segment2::new(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    #[test]
    fn test_orient2d() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        assert_eq!(
            orient2d(a, b, Point2::new(0.5, 1.0), 1e-12),
            Orientation::CounterClockwise
        );
        assert_eq!(
            orient2d(a, b, Point2::new(0.5, -1.0), 1e-12),
            Orientation::Clockwise
        );
        assert_eq!(
            orient2d(a, b, Point2::new(3.0, 1e-14), 1e-12),
            Orientation::Collinear
        );
    }

    #[test]
    fn test_proper_crossing() {
        assert!(segments_touch(seg(0.0, 0.0, 2.0, 2.0), seg(0.0, 2.0, 2.0, 0.0), 1e-9));
    }

    #[test]
    fn test_endpoint_touch_and_t_junction() {
        assert!(segments_touch(seg(0.0, 0.0, 1.0, 0.0), seg(1.0, 0.0, 1.0, 1.0), 1e-9));
        assert!(segments_touch(seg(0.0, 0.0, 2.0, 0.0), seg(1.0, 0.0, 1.0, 1.0), 1e-9));
    }

    #[test]
    fn test_disjoint() {
        assert!(!segments_touch(seg(0.0, 0.0, 1.0, 0.0), seg(2.0, 0.0, 3.0, 0.0), 1e-9));
        assert!(!segments_touch(seg(0.0, 0.0, 1.0, 1.0), seg(1.0, 0.0, 2.0, -1.0), 1e-9));
    }

    #[test]
    fn test_tolerance_gap() {
        let a = seg(0.0, 0.0, 1.0, 0.0);
        let b = seg(0.5, 0.05, 0.5, 1.0);
        assert!(!segments_touch(a, b, 0.01));
        assert!(segments_touch(a, b, 0.1));
    }
}
