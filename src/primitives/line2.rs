//! 2D infinite line type.

use super::{Point2, Vec2};
use num_traits::Float;

/// A 2D infinite line through `origin` along `direction`.
///
/// # Example
///
/// ```
/// use seamline::primitives::{Line2, Point2, Vec2};
///
/// let horizontal: Line2<f64> = Line2::new(Point2::new(0.0, 1.0), Vec2::new(1.0, 0.0));
/// let vertical = Line2::new(Point2::new(2.0, 0.0), Vec2::new(0.0, 1.0));
/// let (p, _, _) = horizontal.intersect_line(&vertical, 1e-9).unwrap();
/// assert_eq!(p, Point2::new(2.0, 1.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2<F> {
    /// A point on the line
    pub origin: Point2<F>,
    /// Direction vector of the line (not necessarily normalized)
    pub direction: Vec2<F>,
}

impl<F: Float> Line2<F> {
    /// Creates a new line from a point and direction.
    #[inline]
    pub fn new(origin: Point2<F>, direction: Vec2<F>) -> Self {
        Self { origin, direction }
    }

    /// Creates a line passing through two points.
    #[inline]
    pub fn from_points(p1: Point2<F>, p2: Point2<F>) -> Self {
        Self {
            origin: p1,
            direction: p2 - p1,
        }
    }

    /// Intersects this line with another line.
    ///
    /// Returns `Some((point, t_self, t_other))`, or `None` when the cross
    /// product of the two directions is within `eps` of zero.
    pub fn intersect_line(&self, other: &Line2<F>, eps: F) -> Option<(Point2<F>, F, F)> {
        let cross = self.direction.cross(other.direction);
        if cross.abs() <= eps {
            return None;
        }

        let delta = other.origin - self.origin;
        let t_self = delta.cross(other.direction) / cross;
        let t_other = delta.cross(self.direction) / cross;

        Some((self.origin + self.direction * t_self, t_self, t_other))
    }
}
