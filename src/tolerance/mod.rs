//! Epsilon-aware geometric predicates and integer welding.
//!
//! All functions in this module take explicit tolerance parameters.
//! No hidden epsilons are used.

mod predicates;
mod weld;

pub use predicates::{orient2d, point_on_segment, segments_touch, Orientation};
pub use weld::{clean_int_loop, weld_paths, IntWelder};
