//! Fixed-precision integer point.

use super::Point2;

/// A point on the fixed-precision integer grid used by merge passes.
///
/// World coordinates are multiplied by a scale factor and rounded; welding
/// and cleanup then compare coordinates exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct IntPoint {
    pub x: i64,
    pub y: i64,
}

impl IntPoint {
    /// Largest coordinate magnitude accepted by [`from_scaled`](Self::from_scaled).
    ///
    /// Grid values up to this bound are exact as `f64`, and products of
    /// coordinate differences fit in `i128`.
    pub const MAX_COORD: i64 = 1 << 53;

    #[inline]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Snaps a floating-point position onto the grid (`round(v * scale)`).
    ///
    /// Returns `None` when a scaled coordinate is not finite or lies beyond
    /// [`MAX_COORD`](Self::MAX_COORD).
    ///
    /// # Example
    ///
    /// ```
    /// use seamline::{IntPoint, Point2};
    ///
    /// let p = IntPoint::from_scaled(Point2::new(0.5, -2.0), 1e6).unwrap();
    /// assert_eq!(p, IntPoint::new(500_000, -2_000_000));
    /// assert!(IntPoint::from_scaled(Point2::new(1e13, 0.0), 1e6).is_none());
    /// ```
    #[inline]
    pub fn from_scaled(p: Point2<f64>, scale: f64) -> Option<Self> {
        let snap = |v: f64| {
            let v = (v * scale).round();
            (v.is_finite() && v.abs() <= Self::MAX_COORD as f64).then_some(v as i64)
        };
        Some(Self {
            x: snap(p.x)?,
            y: snap(p.y)?,
        })
    }

    /// Maps the grid point back to floating point (`v / scale`).
    #[inline]
    pub fn to_scaled(self, scale: f64) -> Point2<f64> {
        Point2::new(self.x as f64 / scale, self.y as f64 / scale)
    }

    /// Squared distance in `i128`, saturating at `i128::MAX`.
    #[inline]
    pub fn distance_squared(self, other: Self) -> i128 {
        let dx = i128::from(other.x) - i128::from(self.x);
        let dy = i128::from(other.y) - i128::from(self.y);
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    /// Cross product of `(b - self)` and `(c - self)`, saturating at the
    /// `i128` range.
    #[inline]
    pub fn cross(self, b: Self, c: Self) -> i128 {
        let abx = i128::from(b.x) - i128::from(self.x);
        let aby = i128::from(b.y) - i128::from(self.y);
        let acx = i128::from(c.x) - i128::from(self.x);
        let acy = i128::from(c.y) - i128::from(self.y);
        abx.saturating_mul(acy).saturating_sub(aby.saturating_mul(acx))
    }

    #[inline]
    pub fn to_f64(self) -> Point2<f64> {
        Point2::new(self.x as f64, self.y as f64)
    }
}
