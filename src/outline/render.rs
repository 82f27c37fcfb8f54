//! The seam between outline builders and a GPU batch.

use super::strip::{StripSide, StripVertexEntry};
use super::style::Rgba;
use crate::bounds::Aabb2;
use crate::primitives::{Point2, Vec2};
use std::ops::Range;

/// One strip submission: a contiguous entry range of one side's strip plus
/// the uniforms needed to place and color it.
#[derive(Debug, Clone)]
pub struct OutlineDrawCall<'a> {
    /// The side's full entry buffer.
    pub entries: &'a [StripVertexEntry],
    /// Entry indices to draw as a triangle strip.
    pub range: Range<usize>,
    pub side: StripSide,
    pub color: Rgba,
    pub scale: f32,
    pub rotation: f32,
    pub translation: Vec2<f32>,
    pub weight: f32,
    pub opacity: f32,
}

impl<'a> OutlineDrawCall<'a> {
    /// The entries inside `range`.
    #[inline]
    pub fn submitted(&self) -> &'a [StripVertexEntry] {
        &self.entries[self.range.clone()]
    }
}

/// A sink for outline strips.
///
/// Implementations upload the submitted entries as a triangle strip and apply
/// the call's transform, color, weight and opacity.
pub trait RenderBatch {
    /// World-space culling rectangle. Boxes that miss it are not submitted.
    fn frustum(&self) -> Aabb2<f32>;

    fn draw_outline(&mut self, call: OutlineDrawCall<'_>);
}

/// An owned copy of a submitted [`OutlineDrawCall`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub side: StripSide,
    pub range: Range<usize>,
    pub entries: Vec<StripVertexEntry>,
    pub color: Rgba,
    pub scale: f32,
    pub rotation: f32,
    pub translation: Vec2<f32>,
    pub weight: f32,
    pub opacity: f32,
}

/// A [`RenderBatch`] that records every call, for tests and tooling.
///
/// # Example
///
/// ```
/// use seamline::outline::{OutlineBuilder, OutlineStyle, RecordingBatch};
/// use seamline::Vertex2;
///
/// let square = [
///     Vertex2::new(0.0, 0.0),
///     Vertex2::new(1.0, 0.0),
///     Vertex2::new(1.0, 1.0),
///     Vertex2::new(0.0, 1.0),
/// ];
/// let mut outline = OutlineBuilder::new(&square, OutlineStyle::default()).unwrap();
/// let mut batch = RecordingBatch::unbounded();
/// outline.render(&mut batch).unwrap();
/// assert_eq!(batch.calls().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RecordingBatch {
    frustum: Aabb2<f32>,
    calls: Vec<RecordedCall>,
}

impl RecordingBatch {
    /// An empty batch culling against `frustum`.
    pub fn new(frustum: Aabb2<f32>) -> Self {
        Self {
            frustum,
            calls: Vec::new(),
        }
    }

    /// A batch whose frustum covers the whole plane.
    pub fn unbounded() -> Self {
        Self::new(Aabb2::new(
            Point2::new(f32::MIN, f32::MIN),
            Point2::new(f32::MAX, f32::MAX),
        ))
    }

    /// Calls recorded since the last [`clear`](Self::clear).
    #[inline]
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    /// Replaces the culling rectangle used by later draws.
    pub fn set_frustum(&mut self, frustum: Aabb2<f32>) {
        self.frustum = frustum;
    }

    /// Forgets every recorded call.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl RenderBatch for RecordingBatch {
    fn frustum(&self) -> Aabb2<f32> {
        self.frustum
    }

    fn draw_outline(&mut self, call: OutlineDrawCall<'_>) {
        self.calls.push(RecordedCall {
            side: call.side,
            range: call.range.clone(),
            entries: call.submitted().to_vec(),
            color: call.color,
            scale: call.scale,
            rotation: call.rotation,
            translation: call.translation,
            weight: call.weight,
            opacity: call.opacity,
        });
    }
}
