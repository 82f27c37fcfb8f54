//! Merging outlines that overlap or share edges.
//!
//! Adjacent outlines each stroke their shared edge, so the edge comes out
//! darker than the rest of the boundary. A merge pass replaces such groups
//! with one parent outline per united region; the member outlines keep
//! receiving draw requests but forward them to the parent.
//!
//! The pass runs on a fixed-precision integer grid: loops are scaled and
//! rounded, welded ([`crate::tolerance::IntWelder`]), unioned and cleaned
//! before regions are matched back to the outlines that produced them.

mod merger;
mod options;
mod region;
mod union;

pub use options::{MergeOptions, DEFAULT_FIXED_POINT_SCALE, DEFAULT_WELD_TOLERANCE};
pub use region::{MergeReport, MergedRegion, DEBUG_PALETTE};
