//! Cleanup of floating-point vertex loops.

use crate::primitives::Point2;
use num_traits::Float;

/// Removes consecutive vertices closer than `epsilon`.
///
/// For closed loops the last vertex is also compared against the first.
pub fn remove_duplicate_vertices<F: Float>(
    points: &[Point2<F>],
    epsilon: F,
    closed: bool,
) -> Vec<Point2<F>> {
    let eps_sq = epsilon * epsilon;
    let mut result: Vec<Point2<F>> = Vec::with_capacity(points.len());

    for &p in points {
        match result.last() {
            Some(&last) if last.distance_squared(p) <= eps_sq => {}
            _ => result.push(p),
        }
    }

    if closed {
        while result.len() > 1 && result[0].distance_squared(result[result.len() - 1]) <= eps_sq {
            result.pop();
        }
    }

    result
}
