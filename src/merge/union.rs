//! Polygon union on the integer grid.

use crate::primitives::IntPoint;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

/// Unions closed integer loops with the non-zero fill rule.
///
/// The first loop is the subject and the rest are clipped against it. Every
/// output contour is returned, outer boundaries and holes alike, with
/// coordinates rounded back onto the grid.
pub(crate) fn union_paths(paths: &[Vec<IntPoint>]) -> Vec<Vec<IntPoint>> {
    let Some((first, rest)) = paths.split_first() else {
        return Vec::new();
    };

    let subject: Vec<Vec<[f64; 2]>> = vec![to_contour(first)];
    let clip: Vec<Vec<[f64; 2]>> = rest.iter().map(|path| to_contour(path)).collect();

    let shapes = subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero);

    shapes
        .into_iter()
        .flatten()
        .map(|contour| {
            contour
                .into_iter()
                .map(|[x, y]| IntPoint::new(x.round() as i64, y.round() as i64))
                .collect()
        })
        .collect()
}

fn to_contour(path: &[IntPoint]) -> Vec<[f64; 2]> {
    path.iter().map(|p| [p.x as f64, p.y as f64]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: i64, y0: i64, x1: i64, y1: i64) -> Vec<IntPoint> {
        vec![
            IntPoint::new(x0, y0),
            IntPoint::new(x1, y0),
            IntPoint::new(x1, y1),
            IntPoint::new(x0, y1),
        ]
    }

    fn twice_area(path: &[IntPoint]) -> i128 {
        let n = path.len();
        (0..n)
            .map(|i| {
                let (a, b) = (path[i], path[(i + 1) % n]);
                i128::from(a.x) * i128::from(b.y) - i128::from(b.x) * i128::from(a.y)
            })
            .sum()
    }

    #[test]
    fn test_union_of_overlapping_rects() {
        let out = union_paths(&[rect(0, 0, 100, 100), rect(50, 0, 150, 100)]);
        assert_eq!(out.len(), 1);
        assert_eq!(twice_area(&out[0]).abs(), 2 * 150 * 100);
    }

    #[test]
    fn test_disjoint_rects_stay_apart() {
        let out = union_paths(&[rect(0, 0, 10, 10), rect(20, 0, 30, 10)]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_ring_yields_hole_contour() {
        // Four bars around a 10x10 hole.
        let out = union_paths(&[
            rect(0, 0, 30, 10),
            rect(20, 0, 30, 30),
            rect(0, 20, 30, 30),
            rect(0, 0, 10, 30),
        ]);
        assert_eq!(out.len(), 2);
        let mut areas: Vec<i128> = out.iter().map(|c| twice_area(c).abs()).collect();
        areas.sort_unstable();
        assert_eq!(areas, vec![2 * 100, 2 * 900]);
    }

    #[test]
    fn test_empty_input() {
        assert!(union_paths(&[]).is_empty());
    }
}
