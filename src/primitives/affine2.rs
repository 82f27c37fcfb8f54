//! 2D affine transformation type.

use super::{Point2, Vec2};
use num_traits::Float;

/// A 2D affine transformation matrix in row-major order:
/// ```text
/// | a  b  tx |
/// | c  d  ty |
/// ```
///
/// Outlines place their local loop in the world with
/// [`Affine2::similarity`]: scale first, then rotate, then translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2<F> {
    pub a: F,
    pub b: F,
    pub c: F,
    pub d: F,
    pub tx: F,
    pub ty: F,
}

impl<F: Float> Affine2<F> {
    /// Creates the identity transform.
    #[inline]
    pub fn identity() -> Self {
        Self {
            a: F::one(),
            b: F::zero(),
            c: F::zero(),
            d: F::one(),
            tx: F::zero(),
            ty: F::zero(),
        }
    }

    /// Creates a translation transform.
    #[inline]
    pub fn translation(offset: Vec2<F>) -> Self {
        Self {
            tx: offset.x,
            ty: offset.y,
            ..Self::identity()
        }
    }

    /// Creates a counter-clockwise rotation around the origin (radians).
    #[inline]
    pub fn rotation(angle: F) -> Self {
        let (sin_a, cos_a) = angle.sin_cos();
        Self {
            a: cos_a,
            b: -sin_a,
            c: sin_a,
            d: cos_a,
            tx: F::zero(),
            ty: F::zero(),
        }
    }

    /// Creates a uniform scaling transform around the origin.
    #[inline]
    pub fn scale(factor: F) -> Self {
        Self {
            a: factor,
            d: factor,
            ..Self::identity()
        }
    }

    /// Scale, then rotate, then translate.
    pub fn similarity(scale: F, rotation: F, translation: Vec2<F>) -> Self {
        Self::scale(scale)
            .then(Self::rotation(rotation))
            .then(Self::translation(translation))
    }

    /// Composes this transform with another (`self * other`): `other` applies first.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            tx: self.a * other.tx + self.b * other.ty + self.tx,
            ty: self.c * other.tx + self.d * other.ty + self.ty,
        }
    }

    /// Returns a transform that applies `self` first, then `other`.
    #[inline]
    pub fn then(&self, other: Self) -> Self {
        other.compose(self)
    }

    /// Applies this transform to a point.
    #[inline]
    pub fn apply_point(&self, p: Point2<F>) -> Point2<F> {
        Point2::new(
            self.a * p.x + self.b * p.y + self.tx,
            self.c * p.x + self.d * p.y + self.ty,
        )
    }

    /// Applies this transform to every point of a slice.
    pub fn apply_points(&self, points: &[Point2<F>]) -> Vec<Point2<F>> {
        points.iter().map(|p| self.apply_point(*p)).collect()
    }
}
