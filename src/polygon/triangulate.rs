//! Triangulation adapter over `earcutr`.

use crate::error::{OutlineError, Result};
use crate::primitives::Point2;

/// Triangulates a simple loop with ear clipping.
///
/// Returns index triples into `vertices`. Loops with fewer than three
/// vertices produce no triangles.
///
/// # Example
///
/// ```
/// use seamline::polygon::triangulate_loop;
/// use seamline::Vertex2;
///
/// let square = [
///     Vertex2::new(0.0, 0.0),
///     Vertex2::new(1.0, 0.0),
///     Vertex2::new(1.0, 1.0),
///     Vertex2::new(0.0, 1.0),
/// ];
/// assert_eq!(triangulate_loop(&square).unwrap().len(), 2);
/// ```
pub fn triangulate_loop(vertices: &[Point2<f32>]) -> Result<Vec<[usize; 3]>> {
    if vertices.len() < 3 {
        return Ok(Vec::new());
    }

    let coords: Vec<f64> = vertices
        .iter()
        .flat_map(|v| [f64::from(v.x), f64::from(v.y)])
        .collect();

    let indices = earcutr::earcut(&coords, &[], 2).map_err(|_| OutlineError::Triangulation)?;

    Ok(indices
        .chunks_exact(3)
        .map(|tri| [tri[0], tri[1], tri[2]])
        .collect())
}
