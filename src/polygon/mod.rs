//! Geometry utilities shared by outline construction and merging.
//!
//! - Signed area, winding and centroid of vertex loops
//! - Edge extraction and bounds
//! - Duplicate vertex cleanup
//! - Triangulation of simple loops (for debug overlays)

mod core;
mod simplify;
mod triangulate;

pub use core::{
    polygon_bounds, polygon_centroid, polygon_edges, polygon_signed_area, polygon_winding,
    Winding,
};
pub use simplify::remove_duplicate_vertices;
pub use triangulate::triangulate_loop;
