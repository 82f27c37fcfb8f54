//! seamline - Anti-aliased polygon outlines with seamless merging
//!
//! Outlines are stroked as two triangle strips per vertex loop, one toward the
//! interior and one toward the exterior, each fading from the stroke color to
//! full transparency. Outlines that overlap or share edges can be merged so a
//! single parent outline strokes their united boundary.
//!
//! - [`outline`]: strip construction, culling partition, draw forwarding
//! - [`merge`]: weld, union and parent synthesis for groups of outlines
//! - [`polygon`], [`tolerance`], [`bounds`], [`primitives`]: supporting
//!   geometry
//!
//! # Example
//!
//! ```
//! use seamline::merge::MergeOptions;
//! use seamline::outline::{OutlineArena, OutlineStyle, RecordingBatch};
//! use seamline::Vertex2;
//!
//! let square = |x: f32| {
//!     [
//!         Vertex2::new(x, 0.0),
//!         Vertex2::new(x + 1.0, 0.0),
//!         Vertex2::new(x + 1.0, 1.0),
//!         Vertex2::new(x, 1.0),
//!     ]
//! };
//!
//! let mut arena = OutlineArena::new();
//! let style = OutlineStyle::default().with_half_width(0.02);
//! let left = arena.add(&square(0.0), style.clone()).unwrap();
//! let right = arena.add(&square(1.0), style).unwrap();
//! arena.merge_outlines(&[left, right], &MergeOptions::default()).unwrap();
//!
//! // Only the merged parent submits strips: one call per side.
//! let mut batch = RecordingBatch::unbounded();
//! arena.draw_frame(&mut batch).unwrap();
//! assert_eq!(batch.calls().len(), 2);
//! ```

pub mod bounds;
pub mod error;
pub mod merge;
pub mod outline;
pub mod polygon;
pub mod primitives;
pub mod tolerance;

pub use error::{OutlineError, Result};
pub use primitives::{Affine2, IntPoint, Point2, Segment2, Vec2};

/// A vertex of an outline loop.
pub type Vertex2 = Point2<f32>;
