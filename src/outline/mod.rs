//! Anti-aliased polygon outlines.
//!
//! An outline is drawn as two triangle strips running along the vertex
//! loop, one toward the interior and one toward the exterior. Each strip
//! alternates opaque user vertices with transparent auxiliary vertices
//! offset by the stroke half-width, so the GPU interpolates a soft edge.
//!
//! - [`OutlineBuilder`]: one loop, its style, strips and culling partition
//! - [`OutlineArena`]: storage plus draw forwarding for merged outlines
//! - [`RenderBatch`]: the sink strips are submitted to

mod arena;
mod builder;
mod partition;
mod render;
mod strip;
mod style;

pub use arena::{OutlineArena, OutlineId};
pub use builder::{DrawOutcome, OutlineBuilder};
pub use partition::{BoundingBox, Partition, StripLayout, DEFAULT_VERTICES_PER_BOX};
pub use render::{OutlineDrawCall, RecordedCall, RecordingBatch, RenderBatch};
pub use strip::{
    flatten_entries, EdgeFlag, StripSide, StripVertexEntry, DEGENERATE_EPSILON, MITER_LIMIT,
    PARALLEL_EPSILON, ROUND_CAP_SEGMENTS,
};
pub use style::{OutlineStyle, Rgba};
