//! Axis-aligned bounding box.

use crate::primitives::{Affine2, Point2, Vec2};
use num_traits::Float;

/// A 2D axis-aligned bounding box defined by its minimum and maximum corners.
///
/// Used both for the cached rectangles of outline partitions and for the
/// culling rectangle (frustum) a render batch exposes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2<F> {
    /// Minimum corner (smallest x and y values).
    pub min: Point2<F>,
    /// Maximum corner (largest x and y values).
    pub max: Point2<F>,
}

impl<F: Float> Aabb2<F> {
    /// Creates a new AABB from min and max corners.
    ///
    /// Does not validate that min <= max.
    #[inline]
    pub fn new(min: Point2<F>, max: Point2<F>) -> Self {
        Self { min, max }
    }

    /// Creates an AABB containing a single point.
    #[inline]
    pub fn from_point(p: Point2<F>) -> Self {
        Self { min: p, max: p }
    }

    /// Creates an AABB from an iterator of points.
    ///
    /// Returns `None` if the iterator is empty.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point2<F>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(first), Self::expand_to_include))
    }

    /// Returns a new AABB expanded to include the given point.
    #[inline]
    pub fn expand_to_include(self, p: Point2<F>) -> Self {
        Self {
            min: Point2::new(self.min.x.min(p.x), self.min.y.min(p.y)),
            max: Point2::new(self.max.x.max(p.x), self.max.y.max(p.y)),
        }
    }

    /// Grows the box by `margin` on every side.
    #[inline]
    pub fn inflated(self, margin: F) -> Self {
        let m = Vec2::new(margin, margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Returns `true` if the two boxes overlap or touch.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Maps the four corners through `transform` and returns their bounds.
    ///
    /// The result is conservative under rotation: it covers the rotated box.
    pub fn transformed(self, transform: &Affine2<F>) -> Self {
        let corners = [
            self.min,
            Point2::new(self.max.x, self.min.y),
            self.max,
            Point2::new(self.min.x, self.max.y),
        ];
        let first = transform.apply_point(corners[0]);
        corners[1..]
            .iter()
            .fold(Self::from_point(first), |acc, &c| {
                acc.expand_to_include(transform.apply_point(c))
            })
    }
}
