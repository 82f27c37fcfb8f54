//! Outline storage and the per-frame draw forwarding between merged
//! outlines and their parents.

use super::builder::{DrawOutcome, OutlineBuilder};
use super::render::RenderBatch;
use super::style::OutlineStyle;
use crate::error::{OutlineError, Result};
use crate::Vertex2;
use log::debug;
use std::collections::BTreeSet;

/// Handle to an outline stored in an [`OutlineArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OutlineId(pub(crate) usize);

impl OutlineId {
    /// Position of the outline in its arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Owns every outline and the parent/child links between them.
///
/// An outline with parents never renders itself: its draw requests are
/// forwarded to each parent. A parent renders once per frame, after as many
/// draw requests as it has children.
///
/// # Example
///
/// ```
/// use seamline::outline::{DrawOutcome, OutlineArena, OutlineStyle, RecordingBatch};
/// use seamline::Vertex2;
///
/// let square = [
///     Vertex2::new(0.0, 0.0),
///     Vertex2::new(1.0, 0.0),
///     Vertex2::new(1.0, 1.0),
///     Vertex2::new(0.0, 1.0),
/// ];
/// let mut arena = OutlineArena::new();
/// let a = arena.add(&square, OutlineStyle::default()).unwrap();
/// let b = arena.add(&square, OutlineStyle::default()).unwrap();
/// let parent = arena.add(&square, OutlineStyle::default()).unwrap();
/// arena.link(parent, a).unwrap();
/// arena.link(parent, b).unwrap();
///
/// let mut batch = RecordingBatch::unbounded();
/// assert_eq!(arena.draw(a, &mut batch).unwrap(), DrawOutcome::Forwarded);
/// assert!(batch.calls().is_empty());
/// arena.draw(b, &mut batch).unwrap();
/// assert_eq!(batch.calls().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutlineArena {
    outlines: Vec<OutlineBuilder>,
}

impl OutlineArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a builder and returns its handle.
    pub fn insert(&mut self, builder: OutlineBuilder) -> OutlineId {
        let id = OutlineId(self.outlines.len());
        self.outlines.push(builder);
        id
    }

    /// Creates and stores an outline.
    pub fn add(&mut self, vertices: &[Vertex2], style: OutlineStyle) -> Result<OutlineId> {
        Ok(self.insert(OutlineBuilder::new(vertices, style)?))
    }

    /// The outline behind `id`, if it belongs to this arena.
    #[inline]
    pub fn get(&self, id: OutlineId) -> Option<&OutlineBuilder> {
        self.outlines.get(id.0)
    }

    /// Mutable access to the outline behind `id`.
    ///
    /// Setters called through it take effect at the outline's next draw.
    #[inline]
    pub fn get_mut(&mut self, id: OutlineId) -> Option<&mut OutlineBuilder> {
        self.outlines.get_mut(id.0)
    }

    pub(crate) fn builder(&self, id: OutlineId) -> Result<&OutlineBuilder> {
        self.get(id).ok_or(OutlineError::UnknownOutline(id.0))
    }

    pub(crate) fn builder_mut(&mut self, id: OutlineId) -> Result<&mut OutlineBuilder> {
        self.outlines
            .get_mut(id.0)
            .ok_or(OutlineError::UnknownOutline(id.0))
    }

    /// Number of stored outlines, synthesized parents included.
    #[inline]
    pub fn len(&self) -> usize {
        self.outlines.len()
    }

    /// `true` if the arena holds no outlines.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.outlines.is_empty()
    }

    /// Handles of every stored outline, in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = OutlineId> {
        (0..self.outlines.len()).map(OutlineId)
    }

    /// Makes `child` forward its draws to `parent`.
    ///
    /// Fails with [`OutlineError::LinkCycle`] when `parent` is `child` or
    /// already forwards its draws, through any chain of parents, to `child`.
    pub fn link(&mut self, parent: OutlineId, child: OutlineId) -> Result<()> {
        self.builder(child)?;
        self.builder(parent)?;
        if self.forwards_to(parent, child) {
            return Err(OutlineError::LinkCycle {
                parent: parent.0,
                child: child.0,
            });
        }
        self.builder_mut(parent)?.children.insert(child);
        self.builder_mut(child)?.parents.insert(parent);
        Ok(())
    }

    /// `true` if draw requests for `from` reach `to`, counting `from` itself.
    fn forwards_to(&self, from: OutlineId, to: OutlineId) -> bool {
        let mut seen = BTreeSet::new();
        let mut pending = vec![from];
        while let Some(id) = pending.pop() {
            if id == to {
                return true;
            }
            if !seen.insert(id) {
                continue;
            }
            if let Some(outline) = self.get(id) {
                pending.extend(outline.parents.iter().copied());
            }
        }
        false
    }

    /// Detaches `id` from all of its parents, in both directions.
    ///
    /// A parent made by a merge pass outlines the union of all its children,
    /// so losing one dissolves it: the remaining children are detached as
    /// well and draw themselves again.
    pub fn clear_parents(&mut self, id: OutlineId) -> Result<()> {
        let parents = std::mem::take(&mut self.builder_mut(id)?.parents);
        for parent in parents {
            let Some(p) = self.outlines.get_mut(parent.0) else {
                continue;
            };
            p.children.remove(&id);
            p.draw_invocations = 0;
            if !p.is_synthesized() {
                continue;
            }
            let orphans = std::mem::take(&mut p.children);
            if !orphans.is_empty() {
                debug!(
                    "dissolved merged outline {}, {} outlines draw themselves again",
                    parent.0,
                    orphans.len()
                );
            }
            for orphan in orphans {
                if let Some(o) = self.outlines.get_mut(orphan.0) {
                    o.parents.remove(&parent);
                }
            }
        }
        Ok(())
    }

    /// Handles one draw request for `id`.
    ///
    /// Outlines with parents forward the request to every parent. Otherwise
    /// the request is counted; once the count reaches the number of
    /// children (or immediately, without children) the counter resets and
    /// the outline renders.
    pub fn draw<B: RenderBatch + ?Sized>(
        &mut self,
        id: OutlineId,
        batch: &mut B,
    ) -> Result<DrawOutcome> {
        let builder = self.builder_mut(id)?;
        if !builder.parents.is_empty() {
            let parents: Vec<OutlineId> = builder.parents.iter().copied().collect();
            for parent in parents {
                self.draw(parent, batch)?;
            }
            return Ok(DrawOutcome::Forwarded);
        }

        builder.draw_invocations += 1;
        if builder.draw_invocations < builder.children.len() {
            return Ok(DrawOutcome::Deferred);
        }
        builder.draw_invocations = 0;
        builder.render(batch)
    }

    /// Issues one draw request for every outline the application owns, that
    /// is every outline not synthesized by a merge pass.
    ///
    /// Outlines without vertices are passed over.
    pub fn draw_frame<B: RenderBatch + ?Sized>(&mut self, batch: &mut B) -> Result<()> {
        for id in self.ids().collect::<Vec<_>>() {
            let builder = self.builder(id)?;
            if builder.is_synthesized() {
                continue;
            }
            if builder.vertex_count() == 0 {
                debug!("outline {} has no vertices, not drawn", id.0);
                continue;
            }
            self.draw(id, batch)?;
        }
        Ok(())
    }

    /// Clears partial draw counts, e.g. after a frame was abandoned.
    pub fn reset_frame(&mut self) {
        for outline in &mut self.outlines {
            outline.draw_invocations = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::RecordingBatch;
    use crate::primitives::Point2;

    fn square(x: f32) -> Vec<Vertex2> {
        vec![
            Point2::new(x, 0.0),
            Point2::new(x + 1.0, 0.0),
            Point2::new(x + 1.0, 1.0),
            Point2::new(x, 1.0),
        ]
    }

    fn family() -> (OutlineArena, [OutlineId; 3]) {
        let mut arena = OutlineArena::new();
        let a = arena.add(&square(0.0), OutlineStyle::default()).unwrap();
        let b = arena.add(&square(1.0), OutlineStyle::default()).unwrap();
        let parent = arena.add(&square(0.0), OutlineStyle::default()).unwrap();
        arena.link(parent, a).unwrap();
        arena.link(parent, b).unwrap();
        (arena, [a, b, parent])
    }

    #[test]
    fn test_child_never_renders_parent_once_per_frame() {
        let (mut arena, [a, b, parent]) = family();
        let mut batch = RecordingBatch::unbounded();

        for _frame in 0..3 {
            batch.clear();
            assert_eq!(arena.draw(a, &mut batch).unwrap(), DrawOutcome::Forwarded);
            assert!(batch.calls().is_empty());
            assert_eq!(arena.draw(b, &mut batch).unwrap(), DrawOutcome::Forwarded);
            assert_eq!(batch.calls().len(), 2);
            assert_eq!(arena.get(parent).unwrap().draw_invocations(), 0);
        }
        assert!(arena.get(a).unwrap().last_drawn().is_none());
        assert!(arena.get(parent).unwrap().last_drawn().is_some());
    }

    #[test]
    fn test_parent_defers_until_all_children_report() {
        let (mut arena, [_, _, parent]) = family();
        let mut batch = RecordingBatch::unbounded();
        assert_eq!(arena.draw(parent, &mut batch).unwrap(), DrawOutcome::Deferred);
        assert!(matches!(
            arena.draw(parent, &mut batch).unwrap(),
            DrawOutcome::Rendered { .. }
        ));
    }

    #[test]
    fn test_draw_frame_renders_merged_parent_each_frame() {
        let mut arena = OutlineArena::new();
        let a = arena.add(&square(0.0), OutlineStyle::default()).unwrap();
        let b = arena.add(&square(1.0), OutlineStyle::default()).unwrap();
        let parent = arena.insert(
            OutlineBuilder::synthesized(&square(0.0), OutlineStyle::default()).unwrap(),
        );
        arena.link(parent, a).unwrap();
        arena.link(parent, b).unwrap();

        let mut batch = RecordingBatch::unbounded();
        for _frame in 0..3 {
            batch.clear();
            arena.draw_frame(&mut batch).unwrap();
            assert_eq!(batch.calls().len(), 2);
        }
    }

    #[test]
    fn test_reset_frame_drops_partial_counts() {
        let (mut arena, [a, b, parent]) = family();
        let mut batch = RecordingBatch::unbounded();
        arena.draw(a, &mut batch).unwrap();
        assert_eq!(arena.get(parent).unwrap().draw_invocations(), 1);
        arena.reset_frame();
        assert_eq!(arena.get(parent).unwrap().draw_invocations(), 0);
        arena.draw(b, &mut batch).unwrap();
        assert!(batch.calls().is_empty());
    }

    #[test]
    fn test_clear_parents_detaches_both_ways() {
        let (mut arena, [a, b, parent]) = family();
        arena.clear_parents(a).unwrap();
        assert!(arena.get(a).unwrap().parents().is_empty());
        let children: Vec<_> = arena.get(parent).unwrap().children().iter().copied().collect();
        assert_eq!(children, vec![b]);

        let mut batch = RecordingBatch::unbounded();
        assert!(matches!(
            arena.draw(a, &mut batch).unwrap(),
            DrawOutcome::Rendered { .. }
        ));
    }

    #[test]
    fn test_clear_parents_dissolves_merged_parent() {
        let mut arena = OutlineArena::new();
        let a = arena.add(&square(0.0), OutlineStyle::default()).unwrap();
        let b = arena.add(&square(1.0), OutlineStyle::default()).unwrap();
        let parent = arena.insert(
            OutlineBuilder::synthesized(&square(0.0), OutlineStyle::default()).unwrap(),
        );
        arena.link(parent, a).unwrap();
        arena.link(parent, b).unwrap();

        arena.clear_parents(a).unwrap();
        assert!(arena.get(parent).unwrap().children().is_empty());
        assert!(arena.get(b).unwrap().parents().is_empty());

        // Both outlines are on their own again.
        let mut batch = RecordingBatch::unbounded();
        arena.draw_frame(&mut batch).unwrap();
        assert_eq!(batch.calls().len(), 4);
    }

    #[test]
    fn test_link_rejects_cycles() {
        let (mut arena, [a, b, parent]) = family();
        assert_eq!(
            arena.link(a, a),
            Err(OutlineError::LinkCycle { parent: 0, child: 0 })
        );
        assert_eq!(
            arena.link(a, parent),
            Err(OutlineError::LinkCycle { parent: 0, child: 2 })
        );

        let top = arena.add(&square(5.0), OutlineStyle::default()).unwrap();
        arena.link(top, parent).unwrap();
        assert_eq!(
            arena.link(b, top),
            Err(OutlineError::LinkCycle {
                parent: b.index(),
                child: top.index()
            })
        );
        assert!(arena.get(a).unwrap().children().is_empty());
        assert!(arena.get(top).unwrap().parents().is_empty());

        // The graph is untouched, so forwarding still ends at the top.
        let mut batch = RecordingBatch::unbounded();
        assert_eq!(arena.draw(a, &mut batch).unwrap(), DrawOutcome::Forwarded);
        assert_eq!(batch.calls().len(), 2);
    }

    #[test]
    fn test_unknown_ids() {
        let (mut arena, [a, ..]) = family();
        let ghost = OutlineId(42);
        let mut batch = RecordingBatch::unbounded();
        assert_eq!(
            arena.draw(ghost, &mut batch),
            Err(OutlineError::UnknownOutline(42))
        );
        assert_eq!(arena.link(ghost, a), Err(OutlineError::UnknownOutline(42)));
        assert_eq!(arena.link(a, ghost), Err(OutlineError::UnknownOutline(42)));
        assert!(arena.get(a).unwrap().children().is_empty());
    }

    #[test]
    fn test_ids_in_insertion_order() {
        let (arena, ids) = family();
        assert_eq!(arena.ids().collect::<Vec<_>>(), ids.to_vec());
        assert_eq!(arena.len(), 3);
        assert_eq!(ids[2].index(), 2);
    }
}
