//! Splitting a vertex loop into bounding boxes for culling and incremental
//! refresh.
//!
//! A box covers a contiguous run of user vertices. Its strip range includes
//! one pair past its last vertex so consecutive boxes share exactly one pair,
//! and the strips drawn box by box stay seamless.

use super::strip::ROUND_CAP_SEGMENTS;
use crate::bounds::Aabb2;
use std::ops::Range;

/// Vertices per bounding box unless configured otherwise.
pub const DEFAULT_VERTICES_PER_BOX: usize = 64;

/// Pair layout of one strip side.
///
/// Open loops are laid out as `[start cap][one pair per vertex][end cap]`;
/// closed loops as `[one pair per vertex][copy of pair 0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLayout {
    pub vertex_count: usize,
    pub closed: bool,
}

impl StripLayout {
    pub fn new(vertex_count: usize, closed: bool) -> Self {
        Self {
            vertex_count,
            closed,
        }
    }

    /// Pairs in each round cap (zero for closed loops).
    #[inline]
    pub fn cap_pairs(&self) -> usize {
        if self.closed || self.vertex_count == 0 {
            0
        } else {
            ROUND_CAP_SEGMENTS
        }
    }

    /// Total pairs per side.
    pub fn total_pairs(&self) -> usize {
        match (self.vertex_count, self.closed) {
            (0, _) => 0,
            (n, true) => n + 1,
            (n, false) => n + 2 * ROUND_CAP_SEGMENTS,
        }
    }

    /// Total entries per side (two per pair).
    #[inline]
    pub fn total_entries(&self) -> usize {
        self.total_pairs() * 2
    }

    /// Pair index holding user vertex `i`.
    #[inline]
    pub fn pair_of_vertex(&self, i: usize) -> usize {
        self.cap_pairs() + i
    }
}

/// A contiguous run of vertices with its cached strip rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    start: usize,
    count: usize,
    rect: Option<Aabb2<f32>>,
    dirty: bool,
}

impl BoundingBox {
    /// Index of the first vertex.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of vertices.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Local-space rectangle of the box's strip entries, `None` until first
    /// computed or when no side is enabled.
    #[inline]
    pub fn rect(&self) -> Option<Aabb2<f32>> {
        self.rect
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn set_rect(&mut self, rect: Option<Aabb2<f32>>) {
        self.rect = rect;
        self.dirty = false;
    }
}

/// Ordered bounding boxes plus the work list of boxes awaiting refresh.
#[derive(Debug, Clone)]
pub struct Partition {
    boxes: Vec<BoundingBox>,
    vertices_per_box: usize,
    dirty: Vec<usize>,
    stale: bool,
}

impl Partition {
    /// An empty partition that rebuilds on first use.
    pub fn new(vertices_per_box: usize) -> Self {
        Self {
            boxes: Vec::new(),
            vertices_per_box: vertices_per_box.max(1),
            dirty: Vec::new(),
            stale: true,
        }
    }

    #[inline]
    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    #[inline]
    pub fn vertices_per_box(&self) -> usize {
        self.vertices_per_box
    }

    /// `true` when the boxes no longer match the vertex loop.
    #[inline]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub(crate) fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Re-splits `vertex_count` vertices into boxes and queues all of them.
    pub(crate) fn rebuild(&mut self, vertex_count: usize) {
        let per_box = self.vertices_per_box;
        self.boxes = (0..vertex_count)
            .step_by(per_box)
            .map(|start| BoundingBox {
                start,
                count: per_box.min(vertex_count - start),
                rect: None,
                dirty: true,
            })
            .collect();
        self.dirty = (0..self.boxes.len()).collect();
        self.stale = false;
    }

    /// Index of the box holding vertex `v`.
    #[inline]
    pub fn box_of_vertex(&self, v: usize) -> usize {
        (v / self.vertices_per_box).min(self.boxes.len().saturating_sub(1))
    }

    /// Strip pair range submitted for box `b`.
    ///
    /// The first box of an open loop starts at pair 0 so it owns the start
    /// cap; the last box always runs to the end of the strip.
    pub fn pair_range(&self, b: usize, layout: StripLayout) -> Range<usize> {
        let bx = &self.boxes[b];
        let cap = layout.cap_pairs();
        let total = layout.total_pairs();
        let first = if b == 0 { 0 } else { cap + bx.start };
        let last = if b + 1 == self.boxes.len() {
            total
        } else {
            (cap + bx.start + bx.count + 1).min(total)
        };
        first..last
    }

    /// Entry range (two entries per pair) submitted for box `b`.
    pub fn entry_range(&self, b: usize, layout: StripLayout) -> Range<usize> {
        let pairs = self.pair_range(b, layout);
        pairs.start * 2..pairs.end * 2
    }

    /// Pairs just outside box `b`'s range that its rectangle also covers.
    pub(crate) fn adjacent_pairs(&self, b: usize, layout: StripLayout) -> [Option<usize>; 2] {
        let range = self.pair_range(b, layout);
        let total = layout.total_pairs();
        let n = layout.vertex_count;
        let before = match (range.start, layout.closed) {
            (0, true) if n > 1 => Some(n - 1),
            (0, _) => None,
            (s, _) => Some(s - 1),
        };
        let after = if range.end < total {
            Some(range.end)
        } else if layout.closed && total > 1 {
            Some(1)
        } else {
            None
        };
        [before, after]
    }

    /// Queues the boxes whose rectangles cover the pair of vertex `v`.
    ///
    /// A box rectangle reaches one pair past each end of its range, so the
    /// pair is seen by the boxes holding vertices `v - 2 ..= v + 1`.
    pub(crate) fn mark_vertex_dirty(&mut self, v: usize, layout: StripLayout) {
        let n = layout.vertex_count;
        if n == 0 || self.boxes.is_empty() {
            return;
        }
        for offset in -2_isize..=1 {
            let u = v as isize + offset;
            let u = if layout.closed {
                u.rem_euclid(n as isize) as usize
            } else if u < 0 || u >= n as isize {
                continue;
            } else {
                u as usize
            };
            self.mark_box_dirty(self.box_of_vertex(u));
        }
    }

    pub(crate) fn mark_all_dirty(&mut self) {
        for b in 0..self.boxes.len() {
            self.mark_box_dirty(b);
        }
    }

    fn mark_box_dirty(&mut self, b: usize) {
        self.boxes[b].dirty = true;
        if !self.dirty.contains(&b) {
            self.dirty.push(b);
        }
    }

    /// Drains the work list in ascending box order.
    pub(crate) fn take_dirty(&mut self) -> Vec<usize> {
        let mut dirty = std::mem::take(&mut self.dirty);
        dirty.sort_unstable();
        dirty.dedup();
        dirty
    }

    pub(crate) fn box_mut(&mut self, b: usize) -> &mut BoundingBox {
        &mut self.boxes[b]
    }
}
