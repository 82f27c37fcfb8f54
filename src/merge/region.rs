//! Merge pass output.

use crate::error::Result;
use crate::outline::{OutlineId, Rgba};
use crate::polygon::triangulate_loop;
use crate::Vertex2;

/// Colors cycled through by [`MergedRegion::debug_color`].
pub const DEBUG_PALETTE: [Rgba; 6] = [
    Rgba::new(0.90, 0.30, 0.24, 0.35),
    Rgba::new(0.18, 0.80, 0.44, 0.35),
    Rgba::new(0.20, 0.60, 0.86, 0.35),
    Rgba::new(0.95, 0.77, 0.06, 0.35),
    Rgba::new(0.61, 0.35, 0.71, 0.35),
    Rgba::new(0.10, 0.74, 0.61, 0.35),
];

/// One contour of the union of a merge batch.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRegion {
    /// Contour in world space.
    pub vertices: Vec<Vertex2>,
    /// Outlines whose loops touch this contour.
    pub members: Vec<OutlineId>,
    /// Parent created for the members, if there were at least two.
    pub parent: Option<OutlineId>,
    pub debug_color: Rgba,
}

impl MergedRegion {
    /// `true` when a parent outline now draws this region.
    #[inline]
    pub fn is_merged(&self) -> bool {
        self.parent.is_some()
    }

    /// Triangles (indices into `vertices`) filling the region, for a
    /// translucent overlay.
    pub fn fill_triangles(&self) -> Result<Vec<[usize; 3]>> {
        triangulate_loop(&self.vertices)
    }
}

/// Everything a merge pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    /// Every region, merged or not, in union output order.
    pub regions: Vec<MergedRegion>,
    /// Parents created by this pass.
    pub parents: Vec<OutlineId>,
    /// Outlines left out because their loops had no area.
    pub skipped: Vec<OutlineId>,
    /// Points moved by welding.
    pub welded_points: usize,
}

impl MergeReport {
    /// Regions that got no parent (at most one member).
    pub fn discarded(&self) -> impl Iterator<Item = &MergedRegion> {
        self.regions.iter().filter(|r| !r.is_merged())
    }
}
