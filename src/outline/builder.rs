//! A single anti-aliased outline: the vertex loop, its style, both strips
//! and the partition that culls and refreshes them box by box.

use super::arena::OutlineId;
use super::partition::{Partition, StripLayout, DEFAULT_VERTICES_PER_BOX};
use super::render::{OutlineDrawCall, RenderBatch};
use super::strip::{StripGeometry, StripSide, StripVertexEntry};
use super::style::{
    validate_half_width, validate_opacity, validate_scale, validate_transform, validate_weight,
    OutlineStyle, Rgba,
};
use crate::bounds::Aabb2;
use crate::error::{OutlineError, Result};
use crate::polygon::{polygon_bounds, polygon_centroid, polygon_winding, Winding};
use crate::primitives::{Point2, Vec2};
use crate::Vertex2;
use log::{debug, trace};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// What a draw request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// The outline has parents; the request went to them instead.
    Forwarded,
    /// Waiting for more children to report this frame.
    Deferred,
    /// Nothing would be visible, so nothing was submitted.
    Skipped,
    /// Strips were submitted for the boxes inside the frustum.
    Rendered {
        boxes_submitted: usize,
        boxes_culled: usize,
    },
}

/// Builds and draws the inside and outside strips of one vertex loop.
///
/// Geometry is regenerated lazily: setters only flag vertices and boxes, and
/// the next [`render`](Self::render) (or strip query) refreshes whatever was
/// flagged.
///
/// # Example
///
/// ```
/// use seamline::outline::{OutlineBuilder, OutlineStyle, StripSide};
/// use seamline::Vertex2;
///
/// let square = [
///     Vertex2::new(-1.0, -1.0),
///     Vertex2::new(1.0, -1.0),
///     Vertex2::new(1.0, 1.0),
///     Vertex2::new(-1.0, 1.0),
/// ];
/// let mut outline = OutlineBuilder::new(&square, OutlineStyle::with_half_width_of(0.1)).unwrap();
/// let outer = outline.auxiliary_bounds(StripSide::Outside).unwrap();
/// assert!((outer.max.x - 1.1).abs() < 1e-5);
/// ```
#[derive(Debug, Clone)]
pub struct OutlineBuilder {
    vertices: Vec<Vertex2>,
    style: OutlineStyle,
    winding: Winding,
    inside: Vec<StripVertexEntry>,
    outside: Vec<StripVertexEntry>,
    needs_update: Vec<bool>,
    partition: Partition,
    pub(crate) parents: BTreeSet<OutlineId>,
    pub(crate) children: BTreeSet<OutlineId>,
    pub(crate) draw_invocations: usize,
    last_drawn: Option<Instant>,
    synthesized: bool,
}

impl OutlineBuilder {
    /// Creates an outline from a copy of `vertices`.
    ///
    /// An empty loop is accepted; vertices can be supplied later with
    /// [`set_vertices`](Self::set_vertices).
    pub fn new(vertices: &[Vertex2], style: OutlineStyle) -> Result<Self> {
        style.validate()?;
        Ok(Self {
            vertices: vertices.to_vec(),
            winding: polygon_winding(vertices),
            style,
            inside: Vec::new(),
            outside: Vec::new(),
            needs_update: vec![true; vertices.len()],
            partition: Partition::new(DEFAULT_VERTICES_PER_BOX),
            parents: BTreeSet::new(),
            children: BTreeSet::new(),
            draw_invocations: 0,
            last_drawn: None,
            synthesized: false,
        })
    }

    /// Creates the parent outline of a merged region.
    pub(crate) fn synthesized(vertices: &[Vertex2], style: OutlineStyle) -> Result<Self> {
        let mut builder = Self::new(vertices, style)?;
        builder.synthesized = true;
        Ok(builder)
    }

    /// Changes how many vertices each culling box holds.
    pub fn with_vertices_per_box(mut self, vertices_per_box: usize) -> Result<Self> {
        if vertices_per_box == 0 {
            return Err(OutlineError::InvalidVerticesPerBox);
        }
        self.partition = Partition::new(vertices_per_box);
        Ok(self)
    }

    /// The local-space vertex loop.
    #[inline]
    pub fn vertices(&self) -> &[Vertex2] {
        &self.vertices
    }

    /// Number of vertices in the loop.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Current stroke style.
    #[inline]
    pub fn style(&self) -> &OutlineStyle {
        &self.style
    }

    /// Winding of the loop, which decides the inside side of the strips.
    #[inline]
    pub fn winding(&self) -> Winding {
        self.winding
    }

    /// Current pair layout of each strip side.
    #[inline]
    pub fn layout(&self) -> StripLayout {
        StripLayout::new(self.vertices.len(), self.style.closed)
    }

    /// Culling boxes, as of the last refresh.
    #[inline]
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Outlines this one forwards its draws to.
    #[inline]
    pub fn parents(&self) -> &BTreeSet<OutlineId> {
        &self.parents
    }

    /// Outlines that forward their draws to this one.
    #[inline]
    pub fn children(&self) -> &BTreeSet<OutlineId> {
        &self.children
    }

    /// `true` for parents created by a merge pass.
    #[inline]
    pub fn is_synthesized(&self) -> bool {
        self.synthesized
    }

    /// Draw requests counted so far this frame.
    #[inline]
    pub fn draw_invocations(&self) -> usize {
        self.draw_invocations
    }

    /// When this outline last rendered or was skipped.
    #[inline]
    pub fn last_drawn(&self) -> Option<Instant> {
        self.last_drawn
    }

    /// `true` if the outline was last drawn no longer than `max_age` before `now`.
    pub fn was_drawn_within(&self, now: Instant, max_age: Duration) -> bool {
        self.last_drawn
            .is_some_and(|t| now.saturating_duration_since(t) <= max_age)
    }

    /// Replaces the vertex loop with a copy of `vertices`.
    ///
    /// An empty slice leaves the outline unchanged.
    pub fn set_vertices(&mut self, vertices: &[Vertex2]) {
        if vertices.is_empty() {
            debug!("ignoring empty vertex loop");
            return;
        }
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
        self.winding = polygon_winding(&self.vertices);
        self.needs_update = vec![true; self.vertices.len()];
        self.partition.mark_stale();
    }

    /// Moves a single vertex.
    ///
    /// Only the pairs whose auxiliary vertices depend on it are regenerated,
    /// and only the boxes that can see those pairs are re-measured.
    pub fn set_vertex(&mut self, index: usize, vertex: Vertex2) -> Result<()> {
        let n = self.vertices.len();
        if index >= n {
            return Err(OutlineError::VertexOutOfRange { index, len: n });
        }
        self.vertices[index] = vertex;

        let winding = polygon_winding(&self.vertices);
        if winding != self.winding {
            self.winding = winding;
            self.invalidate_geometry();
            return Ok(());
        }

        let changed = StripGeometry::new(
            &self.vertices,
            self.style.closed,
            self.winding,
            self.style.half_width,
        )
        .dependents(index);
        let layout = self.layout();
        let track_boxes = !self.partition.is_stale();
        for j in changed {
            self.needs_update[j] = true;
            if track_boxes {
                self.partition.mark_vertex_dirty(j, layout);
            }
        }
        Ok(())
    }

    /// Replaces the whole style. Leaves the outline unchanged on error.
    pub fn set_style(&mut self, style: OutlineStyle) -> Result<()> {
        style.validate()?;
        if style.closed != self.style.closed {
            self.partition.mark_stale();
        }
        self.style = style;
        self.invalidate_geometry();
        Ok(())
    }

    /// Changes the half-width and regenerates both strips.
    pub fn set_half_width(&mut self, half_width: f32) -> Result<()> {
        validate_half_width(half_width)?;
        self.style.half_width = half_width;
        self.invalidate_geometry();
        Ok(())
    }

    /// Changes the stroke weight. Strips are unaffected.
    pub fn set_weight(&mut self, weight: f32) -> Result<()> {
        validate_weight(weight)?;
        self.style.weight = weight;
        Ok(())
    }

    /// Changes the uniform scale.
    pub fn set_scale(&mut self, scale: f32) -> Result<()> {
        validate_scale(scale)?;
        self.style.scale = scale;
        Ok(())
    }

    /// Changes the opacity, which must lie in `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f32) -> Result<()> {
        validate_opacity(opacity)?;
        self.style.opacity = opacity;
        Ok(())
    }

    /// Changes the stroke color.
    pub fn set_color(&mut self, color: Rgba) {
        self.style.color = color;
    }

    /// Changes the rotation. Strips stay in local space, so nothing is
    /// regenerated.
    pub fn set_rotation(&mut self, rotation: f32) -> Result<()> {
        validate_transform(rotation, self.style.translation)?;
        self.style.rotation = rotation;
        Ok(())
    }

    /// Changes the translation.
    ///
    /// # Example
    ///
    /// ```
    /// use seamline::outline::{OutlineBuilder, OutlineStyle};
    /// use seamline::{Vec2, Vertex2};
    ///
    /// let mut outline =
    ///     OutlineBuilder::new(&[Vertex2::new(1.0, 1.0)], OutlineStyle::default()).unwrap();
    /// outline.set_translation(Vec2::new(2.0, 0.0)).unwrap();
    /// assert_eq!(outline.get_vertices_rotated_and_translated(), vec![Vertex2::new(3.0, 1.0)]);
    /// assert!(outline.set_translation(Vec2::new(f32::NAN, 0.0)).is_err());
    /// ```
    pub fn set_translation(&mut self, translation: Vec2<f32>) -> Result<()> {
        validate_transform(self.style.rotation, translation)?;
        self.style.translation = translation;
        Ok(())
    }

    /// Enables or disables the inside strip.
    pub fn set_draw_inside(&mut self, draw_inside: bool) {
        self.style.draw_inside = draw_inside;
        self.invalidate_geometry();
    }

    /// Enables or disables the outside strip.
    pub fn set_draw_outside(&mut self, draw_outside: bool) {
        self.style.draw_outside = draw_outside;
        self.invalidate_geometry();
    }

    /// Switches between a closed loop and an open polyline. Rebuilds the partition.
    pub fn set_closed(&mut self, closed: bool) {
        if closed != self.style.closed {
            self.style.closed = closed;
            self.partition.mark_stale();
            self.invalidate_geometry();
        }
    }

    fn invalidate_geometry(&mut self) {
        self.needs_update.fill(true);
        self.partition.mark_all_dirty();
    }

    /// Entries of one strip side, refreshed.
    pub fn strip(&mut self, side: StripSide) -> &[StripVertexEntry] {
        self.refresh();
        self.entries(side)
    }

    fn entries(&self, side: StripSide) -> &[StripVertexEntry] {
        match side {
            StripSide::Inside => &self.inside,
            StripSide::Outside => &self.outside,
        }
    }

    /// Rectangle of one side's auxiliary vertices, in local space.
    pub fn auxiliary_bounds(&mut self, side: StripSide) -> Option<Aabb2<f32>> {
        self.refresh();
        Aabb2::from_points(
            self.entries(side)
                .iter()
                .filter(|e| e.alpha() == 0.0)
                .map(|e| e.position),
        )
    }

    /// Rectangle of the user vertices, in local space.
    pub fn local_bounds(&self) -> Option<Aabb2<f32>> {
        polygon_bounds(&self.vertices)
    }

    /// The loop in world space: scaled, rotated, then translated.
    pub fn get_vertices_rotated_and_translated(&self) -> Vec<Vertex2> {
        self.style.transform().apply_points(&self.vertices)
    }

    /// Local-space centroid of the loop.
    pub fn centroid(&self) -> Option<Vertex2> {
        polygon_centroid(&self.vertices)
    }

    /// Brings strips and box rectangles up to date with every pending change.
    pub fn refresh(&mut self) {
        let n = self.vertices.len();
        if n == 0 {
            return;
        }
        let layout = self.layout();

        if self.partition.is_stale() {
            self.partition.rebuild(n);
            let placeholder = StripVertexEntry::user(Point2::origin());
            for buf in [&mut self.inside, &mut self.outside] {
                buf.clear();
                buf.resize(layout.total_entries(), placeholder);
            }
            self.needs_update.clear();
            self.needs_update.resize(n, true);
            debug!(
                "rebuilt outline partition: {} vertices in {} boxes",
                n,
                self.partition.len()
            );
        }

        if self.needs_update.iter().any(|&flag| flag) {
            self.regenerate_strips(layout);
        }

        for b in self.partition.take_dirty() {
            let rect = self.box_rect(b, layout);
            self.partition.box_mut(b).set_rect(rect);
        }
    }

    fn regenerate_strips(&mut self, layout: StripLayout) {
        let Self {
            vertices,
            style,
            winding,
            inside,
            outside,
            needs_update,
            ..
        } = self;
        let n = vertices.len();
        let geometry = StripGeometry::new(vertices, layout.closed, *winding, style.half_width);

        for (side, buf) in [(StripSide::Inside, inside), (StripSide::Outside, outside)] {
            for i in (0..n).filter(|&i| needs_update[i]) {
                let aux = geometry.auxiliary(i, side);
                write_pair(buf, layout.pair_of_vertex(i), vertices[i], aux);
                if layout.closed && i == 0 {
                    write_pair(buf, n, vertices[0], aux);
                }
            }
            if !layout.closed {
                for (k, fan) in geometry.start_cap(side).into_iter().enumerate() {
                    write_pair(buf, k, vertices[0], fan);
                }
                let end = layout.pair_of_vertex(n);
                for (k, fan) in geometry.end_cap(side).into_iter().enumerate() {
                    write_pair(buf, end + k, vertices[n - 1], fan);
                }
            }
        }
        needs_update.fill(false);
    }

    /// Rectangle over the enabled sides' entries in box `b`'s range plus the
    /// adjacent pair on each end.
    fn box_rect(&self, b: usize, layout: StripLayout) -> Option<Aabb2<f32>> {
        let mut pairs: Vec<usize> = self.partition.pair_range(b, layout).collect();
        pairs.extend(self.partition.adjacent_pairs(b, layout).into_iter().flatten());

        StripSide::ALL
            .into_iter()
            .filter(|&side| self.style.draws(side))
            .flat_map(|side| {
                let entries = self.entries(side);
                pairs
                    .iter()
                    .flat_map(move |&p| &entries[2 * p..2 * p + 2])
                    .map(|e| e.position)
            })
            .fold(None, |rect: Option<Aabb2<f32>>, p| {
                Some(rect.map_or_else(|| Aabb2::from_point(p), |r| r.expand_to_include(p)))
            })
    }

    /// Refreshes the outline and submits the strips of every box that
    /// overlaps the batch frustum.
    ///
    /// This ignores the merge graph; use [`OutlineArena::draw`] to honor
    /// parents and children.
    ///
    /// [`OutlineArena::draw`]: super::OutlineArena::draw
    pub fn render<B: RenderBatch + ?Sized>(&mut self, batch: &mut B) -> Result<DrawOutcome> {
        if self.vertices.is_empty() {
            return Err(OutlineError::NoVertices);
        }
        self.last_drawn = Some(Instant::now());
        if !self.style.is_drawable() {
            return Ok(DrawOutcome::Skipped);
        }

        self.refresh();
        let layout = self.layout();
        let frustum = batch.frustum();
        let transform = self.style.transform();
        let style = &self.style;

        let mut boxes_submitted = 0;
        let mut boxes_culled = 0;
        for (b, bx) in self.partition.boxes().iter().enumerate() {
            let visible = bx
                .rect()
                .is_some_and(|rect| rect.transformed(&transform).intersects(frustum));
            if !visible {
                trace!("culled outline box {} (vertices {}..)", b, bx.start());
                boxes_culled += 1;
                continue;
            }

            let range = self.partition.entry_range(b, layout);
            for side in StripSide::ALL.into_iter().filter(|&s| style.draws(s)) {
                batch.draw_outline(OutlineDrawCall {
                    entries: self.entries(side),
                    range: range.clone(),
                    side,
                    color: style.color,
                    scale: style.scale,
                    rotation: style.rotation,
                    translation: style.translation,
                    weight: style.weight,
                    opacity: style.opacity,
                });
            }
            boxes_submitted += 1;
        }

        Ok(DrawOutcome::Rendered {
            boxes_submitted,
            boxes_culled,
        })
    }
}

fn write_pair(buf: &mut [StripVertexEntry], pair: usize, user: Vertex2, aux: Vertex2) {
    buf[2 * pair] = StripVertexEntry::user(user);
    buf[2 * pair + 1] = StripVertexEntry::auxiliary(aux);
}
