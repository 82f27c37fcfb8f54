//! The merge pass: union overlapping outlines and hand their drawing to a
//! synthesized parent outline per region.

use super::options::MergeOptions;
use super::region::{MergeReport, MergedRegion, DEBUG_PALETTE};
use super::union::union_paths;
use crate::bounds::Aabb2;
use crate::error::Result;
use crate::outline::{OutlineArena, OutlineBuilder, OutlineId, OutlineStyle};
use crate::polygon::{polygon_bounds, polygon_edges, remove_duplicate_vertices};
use crate::primitives::{IntPoint, Point2, Segment2, Vec2};
use crate::tolerance::{clean_int_loop, segments_touch, IntWelder};
use crate::Vertex2;
use log::{debug, warn};

impl OutlineArena {
    /// Merges a batch of outlines that overlap or share edges.
    ///
    /// World-space loops are snapped onto an integer grid, welded so nearly
    /// shared points become identical, and unioned. Each resulting contour
    /// that touches two or more of the batch's loops gets a new parent
    /// outline; the members then forward their draws to it, so shared edges
    /// are stroked once.
    ///
    /// Running a pass again over the same outlines replaces their previous
    /// parents. Unknown ids fail the pass before anything changes.
    ///
    /// # Example
    ///
    /// ```
    /// use seamline::merge::MergeOptions;
    /// use seamline::outline::{OutlineArena, OutlineStyle};
    /// use seamline::Vertex2;
    ///
    /// let unit = |x: f32| {
    ///     [
    ///         Vertex2::new(x, 0.0),
    ///         Vertex2::new(x + 1.0, 0.0),
    ///         Vertex2::new(x + 1.0, 1.0),
    ///         Vertex2::new(x, 1.0),
    ///     ]
    /// };
    /// let mut arena = OutlineArena::new();
    /// let a = arena.add(&unit(0.0), OutlineStyle::default()).unwrap();
    /// let b = arena.add(&unit(1.0), OutlineStyle::default()).unwrap();
    ///
    /// let report = arena.merge_outlines(&[a, b], &MergeOptions::default()).unwrap();
    /// assert_eq!(report.parents.len(), 1);
    /// assert_eq!(report.regions[0].vertices.len(), 4);
    /// ```
    pub fn merge_outlines(
        &mut self,
        batch: &[OutlineId],
        options: &MergeOptions,
    ) -> Result<MergeReport> {
        options.validate()?;
        for &id in batch {
            self.builder(id)?;
        }
        if batch.is_empty() {
            return Ok(MergeReport::default());
        }

        let mut ids: Vec<OutlineId> = Vec::with_capacity(batch.len());
        for &id in batch {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        for &id in &ids {
            self.clear_parents(id)?;
        }

        let scale = options.fixed_point_scale;
        let mut report = MergeReport::default();
        let mut sources: Vec<OutlineId> = Vec::with_capacity(ids.len());
        let mut paths: Vec<Vec<IntPoint>> = Vec::with_capacity(ids.len());
        for &id in &ids {
            let world = self.builder(id)?.get_vertices_rotated_and_translated();
            let path: Option<Vec<IntPoint>> = world
                .iter()
                .map(|v| IntPoint::from_scaled(Point2::new(f64::from(v.x), f64::from(v.y)), scale))
                .collect();
            let Some(mut path) = path else {
                warn!("outline {} does not fit on the merge grid, skipped", id.index());
                report.skipped.push(id);
                continue;
            };

            let area = match twice_area(&path) {
                Some(area) if area != 0 => area,
                _ => {
                    warn!("outline {} has no area on the merge grid, skipped", id.index());
                    report.skipped.push(id);
                    continue;
                }
            };
            // Same orientation everywhere so non-zero filling never cancels.
            if area < 0 {
                path.reverse();
            }
            sources.push(id);
            paths.push(path);
        }

        let mut welder = IntWelder::with_cell_size(options.weld_tolerance, options.weld_cell_size());
        report.welded_points = paths.iter_mut().map(|path| welder.weld_path(path)).sum();

        let regions: Vec<Vec<IntPoint>> = union_paths(&paths)
            .iter()
            .map(|contour| clean_int_loop(contour, options.weld_tolerance))
            .filter(|contour| twice_area(contour).is_some_and(|area| area != 0))
            .collect();

        let loops: Vec<Vec<Point2<f64>>> = paths.iter().map(|path| to_f64(path)).collect();
        let eps = options.intersection_epsilon;
        let loop_bounds: Vec<Option<Aabb2<f64>>> = loops
            .iter()
            .map(|l| polygon_bounds(l).map(|b| b.inflated(eps)))
            .collect();

        for (index, region) in regions.iter().enumerate() {
            let outline = to_f64(region);
            let Some(bounds) = polygon_bounds(&outline) else {
                continue;
            };

            let members: Vec<OutlineId> = sources
                .iter()
                .zip(&loops)
                .zip(&loop_bounds)
                .filter(|((_, l), b)| {
                    b.is_some_and(|b| b.intersects(bounds)) && loops_touch(l, &outline, eps)
                })
                .map(|((&id, _), _)| id)
                .collect();

            // Grid points far from the origin can land on the same f32.
            let vertices: Vec<Vertex2> = region
                .iter()
                .map(|p| {
                    let w = p.to_scaled(scale);
                    Point2::new(w.x as f32, w.y as f32)
                })
                .collect();
            let vertices = remove_duplicate_vertices(&vertices, 0.0, true);

            let parent = match members.as_slice() {
                [] => {
                    warn!("merged region {} touches no outline, discarded", index);
                    None
                }
                [_] => None,
                [first, ..] => {
                    let parent = self.synthesize_parent(&vertices, *first, &members)?;
                    report.parents.push(parent);
                    Some(parent)
                }
            };

            report.regions.push(MergedRegion {
                vertices,
                members,
                parent,
                debug_color: DEBUG_PALETTE[index % DEBUG_PALETTE.len()],
            });
        }

        debug!(
            "merged {} outlines into {} regions: {} parents, {} skipped, {} points welded",
            sources.len(),
            report.regions.len(),
            report.parents.len(),
            report.skipped.len(),
            report.welded_points
        );
        Ok(report)
    }

    /// Creates the parent outline of a region and links its members.
    ///
    /// The region is already in world space, so the parent takes the style
    /// of `template` with its scale folded into the half-width and an
    /// identity transform.
    fn synthesize_parent(
        &mut self,
        vertices: &[Vertex2],
        template: OutlineId,
        members: &[OutlineId],
    ) -> Result<OutlineId> {
        let template = self.builder(template)?.style();
        let style = OutlineStyle {
            half_width: template.half_width * template.scale,
            scale: 1.0,
            rotation: 0.0,
            translation: Vec2::zero(),
            ..template.clone()
        };

        let parent = self.insert(OutlineBuilder::synthesized(vertices, style)?);
        for &member in members {
            self.link(parent, member)?;
        }
        Ok(parent)
    }
}

/// Twice the signed area of a closed integer loop, or `None` if the sum
/// overflows `i128`.
fn twice_area(path: &[IntPoint]) -> Option<i128> {
    let n = path.len();
    if n < 3 {
        return Some(0);
    }
    (0..n).try_fold(0_i128, |sum, i| {
        let (a, b) = (path[i], path[(i + 1) % n]);
        let term = i128::from(a.x)
            .checked_mul(i128::from(b.y))?
            .checked_sub(i128::from(b.x).checked_mul(i128::from(a.y))?)?;
        sum.checked_add(term)
    })
}

fn to_f64(path: &[IntPoint]) -> Vec<Point2<f64>> {
    path.iter().map(|p| p.to_f64()).collect()
}

/// `true` if any edge of `a` comes within `eps` of any edge of `b`.
fn loops_touch(a: &[Point2<f64>], b: &[Point2<f64>], eps: f64) -> bool {
    let b_edges: Vec<(Segment2<f64>, Aabb2<f64>)> = polygon_edges(b, true)
        .map(|s| (s, segment_bounds(s, eps)))
        .collect();

    polygon_edges(a, true).any(|sa| {
        let bounds = segment_bounds(sa, 0.0);
        b_edges
            .iter()
            .any(|&(sb, sb_bounds)| sb_bounds.intersects(bounds) && segments_touch(sa, sb, eps))
    })
}

fn segment_bounds(s: Segment2<f64>, margin: f64) -> Aabb2<f64> {
    Aabb2::from_point(s.start)
        .expand_to_include(s.end)
        .inflated(margin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OutlineError;
    use crate::outline::{DrawOutcome, RecordingBatch};
    use approx::assert_relative_eq;

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Vertex2> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ]
    }

    fn arena_with(loops: &[Vec<Vertex2>]) -> (OutlineArena, Vec<OutlineId>) {
        let mut arena = OutlineArena::new();
        let ids = loops
            .iter()
            .map(|l| arena.add(l, OutlineStyle::default()).unwrap())
            .collect();
        (arena, ids)
    }

    #[test]
    fn test_disjoint_outlines_get_no_parent() {
        let (mut arena, ids) =
            arena_with(&[rect(0.0, 0.0, 1.0, 1.0), rect(3.0, 0.0, 4.0, 1.0)]);
        let report = arena.merge_outlines(&ids, &MergeOptions::default()).unwrap();

        assert_eq!(report.regions.len(), 2);
        assert!(report.parents.is_empty());
        assert_eq!(report.discarded().count(), 2);
        for region in &report.regions {
            assert_eq!(region.members.len(), 1);
        }
        assert_eq!(arena.len(), 2);
        for id in ids {
            assert!(arena.get(id).unwrap().parents().is_empty());
        }
    }

    #[test]
    fn test_identical_squares_share_one_parent() {
        let square = rect(0.0, 0.0, 1.0, 1.0);
        let (mut arena, ids) = arena_with(&[square.clone(), square]);
        let report = arena.merge_outlines(&ids, &MergeOptions::default()).unwrap();

        assert_eq!(report.parents.len(), 1);
        let parent = report.parents[0];
        let children: Vec<_> = arena.get(parent).unwrap().children().iter().copied().collect();
        assert_eq!(children, ids);
        assert!(arena.get(parent).unwrap().is_synthesized());
        for &id in &ids {
            let parents: Vec<_> = arena.get(id).unwrap().parents().iter().copied().collect();
            assert_eq!(parents, vec![parent]);
        }
    }

    #[test]
    fn test_edge_sharing_squares_merge_into_rectangle() {
        let (mut arena, ids) =
            arena_with(&[rect(0.0, 0.0, 1.0, 1.0), rect(1.0, 0.0, 2.0, 1.0)]);
        let report = arena.merge_outlines(&ids, &MergeOptions::default()).unwrap();

        assert_eq!(report.regions.len(), 1);
        let region = &report.regions[0];
        assert_eq!(region.vertices.len(), 4);
        assert_eq!(region.members, ids);
        assert!(region.is_merged());

        let bounds = polygon_bounds(&region.vertices).unwrap();
        assert_relative_eq!(bounds.min.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(bounds.max.x, 2.0, epsilon = 1e-6);
        assert_relative_eq!(bounds.max.y, 1.0, epsilon = 1e-6);
        assert_eq!(region.fill_triangles().unwrap().len(), 2);
    }

    #[test]
    fn test_nearly_shared_edge_is_welded() {
        let gap = 5e-6;
        let (mut arena, ids) = arena_with(&[
            rect(0.0, 0.0, 1.0, 1.0),
            rect(1.0 + gap, 0.0, 2.0, 1.0),
        ]);
        let report = arena.merge_outlines(&ids, &MergeOptions::default()).unwrap();

        assert_eq!(report.welded_points, 2);
        assert_eq!(report.regions.len(), 1);
        assert_eq!(report.regions[0].vertices.len(), 4);
        assert_eq!(report.parents.len(), 1);
    }

    #[test]
    fn test_gap_wider_than_tolerance_stays_split() {
        let (mut arena, ids) =
            arena_with(&[rect(0.0, 0.0, 1.0, 1.0), rect(1.001, 0.0, 2.0, 1.0)]);
        let report = arena.merge_outlines(&ids, &MergeOptions::default()).unwrap();
        assert_eq!(report.welded_points, 0);
        assert_eq!(report.regions.len(), 2);
        assert!(report.parents.is_empty());
    }

    #[test]
    fn test_chain_of_three() {
        let (mut arena, ids) = arena_with(&[
            rect(0.0, 0.0, 1.0, 1.0),
            rect(1.0, 0.0, 2.0, 1.0),
            rect(2.0, 0.0, 3.0, 1.0),
        ]);
        let report = arena.merge_outlines(&ids, &MergeOptions::default()).unwrap();
        assert_eq!(report.regions.len(), 1);
        assert_eq!(report.regions[0].members, ids);
        assert_eq!(arena.get(report.parents[0]).unwrap().children().len(), 3);
    }

    #[test]
    fn test_merged_outlines_forward_to_parent() {
        let (mut arena, ids) =
            arena_with(&[rect(0.0, 0.0, 1.0, 1.0), rect(0.5, 0.0, 1.5, 1.0)]);
        arena.merge_outlines(&ids, &MergeOptions::default()).unwrap();

        let mut batch = RecordingBatch::unbounded();
        for _frame in 0..2 {
            batch.clear();
            arena.draw_frame(&mut batch).unwrap();
            assert_eq!(batch.calls().len(), 2);
            let outside = batch
                .calls()
                .iter()
                .find(|c| c.side == crate::outline::StripSide::Outside)
                .unwrap();
            let max_x = outside.entries.iter().map(|e| e.position.x).fold(f32::MIN, f32::max);
            assert!(max_x > 1.5);
        }
        assert_eq!(
            arena.draw(ids[0], &mut batch).unwrap(),
            DrawOutcome::Forwarded
        );
    }

    #[test]
    fn test_parent_style_is_world_space() {
        let mut arena = OutlineArena::new();
        let style = OutlineStyle::default()
            .with_half_width(0.1)
            .with_scale(2.0)
            .with_translation(Vec2::new(5.0, 5.0));
        let a = arena.add(&rect(0.0, 0.0, 1.0, 1.0), style.clone()).unwrap();
        let b = arena.add(&rect(1.0, 0.0, 2.0, 1.0), style).unwrap();
        let report = arena.merge_outlines(&[a, b], &MergeOptions::default()).unwrap();

        let parent = arena.get(report.parents[0]).unwrap();
        assert_relative_eq!(parent.style().half_width, 0.2, epsilon = 1e-6);
        assert_eq!(parent.style().scale, 1.0);
        assert_eq!(parent.style().translation, Vec2::zero());

        let bounds = parent.local_bounds().unwrap();
        assert_relative_eq!(bounds.min.x, 5.0, epsilon = 1e-5);
        assert_relative_eq!(bounds.max.x, 9.0, epsilon = 1e-5);
        assert_relative_eq!(bounds.max.y, 7.0, epsilon = 1e-5);
    }

    #[test]
    fn test_second_pass_replaces_parents() {
        let (mut arena, ids) =
            arena_with(&[rect(0.0, 0.0, 1.0, 1.0), rect(1.0, 0.0, 2.0, 1.0)]);
        let first = arena.merge_outlines(&ids, &MergeOptions::default()).unwrap();
        let second = arena.merge_outlines(&ids, &MergeOptions::default()).unwrap();

        let old = first.parents[0];
        let new = second.parents[0];
        assert_ne!(old, new);
        assert!(arena.get(old).unwrap().children().is_empty());
        for &id in &ids {
            let parents: Vec<_> = arena.get(id).unwrap().parents().iter().copied().collect();
            assert_eq!(parents, vec![new]);
        }
    }

    #[test]
    fn test_degenerate_outline_is_skipped() {
        let flat = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        let (mut arena, ids) = arena_with(&[rect(0.0, 0.0, 1.0, 1.0), flat]);
        let report = arena.merge_outlines(&ids, &MergeOptions::default()).unwrap();
        assert_eq!(report.skipped, vec![ids[1]]);
        assert_eq!(report.regions.len(), 1);
        assert!(report.parents.is_empty());
    }

    #[test]
    fn test_outline_off_the_grid_is_skipped() {
        let huge = rect(-1e13, -1e13, 1e13, 1e13);
        let (mut arena, ids) = arena_with(&[
            rect(0.0, 0.0, 1.0, 1.0),
            huge,
            rect(1.0, 0.0, 2.0, 1.0),
        ]);
        let report = arena.merge_outlines(&ids, &MergeOptions::default()).unwrap();
        assert_eq!(report.skipped, vec![ids[1]]);
        assert_eq!(report.regions.len(), 1);
        assert_eq!(report.regions[0].members, vec![ids[0], ids[2]]);
        assert!(arena.get(ids[1]).unwrap().parents().is_empty());
    }

    #[test]
    fn test_twice_area_overflow() {
        let (lo, hi) = (i64::MIN, i64::MAX);
        let square = [
            IntPoint::new(lo, lo),
            IntPoint::new(hi, lo),
            IntPoint::new(hi, hi),
            IntPoint::new(lo, hi),
        ];
        assert_eq!(twice_area(&square), None);
        let unit = [IntPoint::new(0, 0), IntPoint::new(2, 0), IntPoint::new(0, 2)];
        assert_eq!(twice_area(&unit), Some(4));
    }

    #[test]
    fn test_outline_inside_another_keeps_drawing_itself() {
        let (mut arena, ids) =
            arena_with(&[rect(0.0, 0.0, 4.0, 4.0), rect(1.0, 1.0, 2.0, 2.0)]);
        let report = arena.merge_outlines(&ids, &MergeOptions::default()).unwrap();
        assert_eq!(report.regions.len(), 1);
        assert_eq!(report.regions[0].members, vec![ids[0]]);
        assert!(report.parents.is_empty());

        let mut batch = RecordingBatch::unbounded();
        arena.draw_frame(&mut batch).unwrap();
        assert_eq!(batch.calls().len(), 4);
    }

    #[test]
    fn test_contained_outline_stays_out_of_merged_parent() {
        let (mut arena, ids) = arena_with(&[
            rect(0.0, 0.0, 4.0, 4.0),
            rect(1.0, 1.0, 2.0, 2.0),
            rect(4.0, 0.0, 5.0, 4.0),
        ]);
        let report = arena.merge_outlines(&ids, &MergeOptions::default()).unwrap();
        assert_eq!(report.parents.len(), 1);
        assert_eq!(report.regions[0].members, vec![ids[0], ids[2]]);
        assert!(arena.get(ids[1]).unwrap().parents().is_empty());

        // The merged parent and the inner outline each draw once.
        let mut batch = RecordingBatch::unbounded();
        arena.draw_frame(&mut batch).unwrap();
        assert_eq!(batch.calls().len(), 4);
    }

    #[test]
    fn test_remerge_dissolves_old_parent() {
        let (mut arena, ids) = arena_with(&[
            rect(0.0, 0.0, 1.0, 1.0),
            rect(1.0, 0.0, 2.0, 1.0),
            rect(0.0, 1.0, 1.0, 2.0),
        ]);
        let (a, b, c) = (ids[0], ids[1], ids[2]);
        let first = arena.merge_outlines(&[a, b], &MergeOptions::default()).unwrap();
        let second = arena.merge_outlines(&[a, c], &MergeOptions::default()).unwrap();

        let old = first.parents[0];
        assert!(arena.get(old).unwrap().children().is_empty());
        assert!(arena.get(b).unwrap().parents().is_empty());
        let children: Vec<_> = arena
            .get(second.parents[0])
            .unwrap()
            .children()
            .iter()
            .copied()
            .collect();
        assert_eq!(children, vec![a, c]);

        // b strokes its own square again; a and c share the new parent.
        let mut batch = RecordingBatch::unbounded();
        arena.draw_frame(&mut batch).unwrap();
        assert_eq!(batch.calls().len(), 4);
        assert!(matches!(
            arena.draw(b, &mut batch).unwrap(),
            DrawOutcome::Rendered { .. }
        ));
    }

    #[test]
    fn test_clockwise_member_does_not_cancel() {
        let mut cw = rect(0.0, 0.0, 1.0, 1.0);
        cw.reverse();
        let (mut arena, ids) = arena_with(&[rect(0.0, 0.0, 1.0, 1.0), cw]);
        let report = arena.merge_outlines(&ids, &MergeOptions::default()).unwrap();
        assert_eq!(report.regions.len(), 1);
        assert_eq!(report.parents.len(), 1);
    }

    #[test]
    fn test_empty_batch_and_unknown_ids() {
        let (mut arena, ids) = arena_with(&[rect(0.0, 0.0, 1.0, 1.0)]);
        let report = arena.merge_outlines(&[], &MergeOptions::default()).unwrap();
        assert_eq!(report, MergeReport::default());

        let ghost = arena.ids().count() + 7;
        let err = arena
            .merge_outlines(&[ids[0], OutlineId(ghost)], &MergeOptions::default())
            .unwrap_err();
        assert_eq!(err, OutlineError::UnknownOutline(ghost));
        assert_eq!(arena.len(), 1);

        let bad = MergeOptions::default().with_weld_tolerance(-3);
        assert!(arena.merge_outlines(&ids, &bad).is_err());
    }

    #[test]
    fn test_duplicate_ids_count_once() {
        let (mut arena, ids) = arena_with(&[rect(0.0, 0.0, 1.0, 1.0)]);
        let report = arena
            .merge_outlines(&[ids[0], ids[0]], &MergeOptions::default())
            .unwrap();
        assert_eq!(report.regions.len(), 1);
        assert_eq!(report.regions[0].members, vec![ids[0]]);
        assert!(report.parents.is_empty());
    }

    #[test]
    fn test_debug_colors_cycle() {
        let loops: Vec<_> = (0..8)
            .map(|i| {
                let x = i as f32 * 3.0;
                rect(x, 0.0, x + 1.0, 1.0)
            })
            .collect();
        let (mut arena, ids) = arena_with(&loops);
        let report = arena.merge_outlines(&ids, &MergeOptions::default()).unwrap();
        assert_eq!(report.regions.len(), 8);
        assert_eq!(report.regions[6].debug_color, DEBUG_PALETTE[0]);
        assert_eq!(report.regions[1].debug_color, DEBUG_PALETTE[1]);
    }
}
