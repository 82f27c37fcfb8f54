//! Error types for outline construction and merging.

use thiserror::Error;

/// Errors reported by outline builders, the outline arena and merge passes.
///
/// Degenerate geometry is never an error: it is recovered locally so stroke
/// rendering stays best-effort. Errors mark invalid configuration or misuse.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OutlineError {
    /// Stroke half-width must be finite and positive.
    #[error("invalid stroke half-width {0}: must be finite and > 0")]
    InvalidHalfWidth(f32),

    /// Stroke weight must be finite and positive.
    #[error("invalid stroke weight {0}: must be finite and > 0")]
    InvalidWeight(f32),

    /// Uniform scale must be finite and positive.
    #[error("invalid scale {0}: must be finite and > 0")]
    InvalidScale(f32),

    /// Opacity must lie in `[0, 1]`.
    #[error("invalid opacity {0}: must be within [0, 1]")]
    InvalidOpacity(f32),

    /// Rotation or translation is not finite.
    #[error("invalid transform: rotation and translation must be finite")]
    InvalidTransform,

    /// Partition boxes must hold at least one vertex.
    #[error("vertices per bounding box must be at least 1")]
    InvalidVerticesPerBox,

    /// The outline was drawn before any vertices were set.
    #[error("outline has no vertices")]
    NoVertices,

    /// A vertex index past the end of the loop.
    #[error("vertex index {index} out of range for loop of {len} vertices")]
    VertexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current loop length.
        len: usize,
    },

    /// An outline id that does not belong to the arena.
    #[error("unknown outline id {0}")]
    UnknownOutline(usize),

    /// The link would make draw requests forward in a circle.
    #[error("linking outline {child} under {parent} would form a cycle")]
    LinkCycle {
        /// Requested parent.
        parent: usize,
        /// Requested child.
        child: usize,
    },

    /// Merge options failed validation.
    #[error("invalid merge options: {0}")]
    InvalidMergeOptions(&'static str),

    /// Ear clipping failed on a merged region.
    #[error("triangulation failed")]
    Triangulation,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OutlineError>;
