//! Core polygon measurements: signed area, winding, centroid and edges.

use crate::bounds::Aabb2;
use crate::primitives::{Point2, Segment2};
use num_traits::Float;

/// Traversal direction of a vertex loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Winding {
    /// Positive signed area. Zero-area loops are reported as CCW.
    #[default]
    CounterClockwise,
    /// Negative signed area.
    Clockwise,
}

impl Winding {
    /// `1` for CCW, `-1` for CW.
    #[inline]
    pub fn sign<F: Float>(self) -> F {
        match self {
            Winding::CounterClockwise => F::one(),
            Winding::Clockwise => -F::one(),
        }
    }
}

/// Computes the signed area of a loop using the shoelace formula.
///
/// Positive for CCW winding, negative for CW winding.
pub fn polygon_signed_area<F: Float>(vertices: &[Point2<F>]) -> F {
    if vertices.len() < 3 {
        return F::zero();
    }

    let n = vertices.len();
    let twice = (0..n).fold(F::zero(), |acc, i| {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        acc + a.x * b.y - b.x * a.y
    });

    twice / (F::one() + F::one())
}

/// Winding direction of a loop, treating it as closed.
///
/// Self-intersecting loops report the sign of their net signed area.
pub fn polygon_winding<F: Float>(vertices: &[Point2<F>]) -> Winding {
    if polygon_signed_area(vertices) < F::zero() {
        Winding::Clockwise
    } else {
        Winding::CounterClockwise
    }
}

/// Computes the centroid of a loop.
///
/// Uses the area-weighted formula; zero-area loops fall back to the vertex
/// average. Returns `None` only for an empty slice.
pub fn polygon_centroid<F: Float>(vertices: &[Point2<F>]) -> Option<Point2<F>> {
    if vertices.is_empty() {
        return None;
    }

    let area = polygon_signed_area(vertices);
    if area.abs() <= F::epsilon() {
        let count = F::from(vertices.len())?;
        let sum = vertices
            .iter()
            .fold(Point2::origin(), |acc: Point2<F>, v| Point2::new(acc.x + v.x, acc.y + v.y));
        return Some(Point2::new(sum.x / count, sum.y / count));
    }

    let n = vertices.len();
    let mut cx = F::zero();
    let mut cy = F::zero();
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let cross = a.x * b.y - b.x * a.y;
        cx = cx + (a.x + b.x) * cross;
        cy = cy + (a.y + b.y) * cross;
    }

    let six = F::from(6.0)?;
    Some(Point2::new(cx / (six * area), cy / (six * area)))
}

/// Iterates the edges of a vertex sequence.
///
/// Closed loops include the edge from the last vertex back to the first.
pub fn polygon_edges<F: Float>(
    vertices: &[Point2<F>],
    closed: bool,
) -> impl Iterator<Item = Segment2<F>> + '_ {
    let n = vertices.len();
    let count = match n {
        0 | 1 => 0,
        2 => 1,
        _ if closed => n,
        _ => n - 1,
    };
    (0..count).map(move |i| Segment2::new(vertices[i], vertices[(i + 1) % n]))
}

/// Bounding box of a vertex sequence.
pub fn polygon_bounds<F: Float>(vertices: &[Point2<F>]) -> Option<Aabb2<F>> {
    Aabb2::from_points(vertices.iter().copied())
}
