//! Geometric primitives: floating-point points, vectors and transforms, plus the
//! integer grid point used by merge passes.

mod affine2;
mod int_point;
mod line2;
mod point2;
mod segment2;
mod vec2;

pub use affine2::Affine2;
pub use int_point::IntPoint;
pub use line2::Line2;
pub use point2::Point2;
pub use segment2::Segment2;
pub use vec2::Vec2;
