//! Merge pass configuration.

use crate::error::{OutlineError, Result};

/// Grid units per world unit when converting loops to integers.
pub const DEFAULT_FIXED_POINT_SCALE: f64 = 1e6;

/// Weld distance in grid units.
pub const DEFAULT_WELD_TOLERANCE: i64 = 20;

/// Options for [`OutlineArena::merge_outlines`].
///
/// # Example
///
/// ```
/// use seamline::merge::MergeOptions;
///
/// let options = MergeOptions::default()
///     .with_fixed_point_scale(1e4)
///     .with_weld_tolerance(2);
/// assert!(options.validate().is_ok());
/// assert_eq!(options.weld_cell_size(), 2);
/// ```
///
/// [`OutlineArena::merge_outlines`]: crate::outline::OutlineArena::merge_outlines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeOptions {
    /// World-to-grid multiplier (default: 1e6).
    pub fixed_point_scale: f64,
    /// Points of later loops closer than this to a point of an earlier loop
    /// snap onto it, in grid units (default: 20).
    pub weld_tolerance: i64,
    /// Distance in grid units under which a loop counts as touching a merged
    /// region's boundary (default: 1.0).
    pub intersection_epsilon: f64,
    /// Weld bucket size in grid units. `None` uses the weld tolerance.
    pub cell_size: Option<i64>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            fixed_point_scale: DEFAULT_FIXED_POINT_SCALE,
            weld_tolerance: DEFAULT_WELD_TOLERANCE,
            intersection_epsilon: 1.0,
            cell_size: None,
        }
    }
}

impl MergeOptions {
    /// Sets the world-to-grid multiplier.
    pub fn with_fixed_point_scale(mut self, scale: f64) -> Self {
        self.fixed_point_scale = scale;
        self
    }

    /// Sets the weld radius in grid units.
    pub fn with_weld_tolerance(mut self, tolerance: i64) -> Self {
        self.weld_tolerance = tolerance;
        self
    }

    /// Sets how close, in grid units, a loop must come to a region's
    /// boundary to count as one of its members.
    pub fn with_intersection_epsilon(mut self, epsilon: f64) -> Self {
        self.intersection_epsilon = epsilon;
        self
    }

    /// Overrides the weld bucket size.
    pub fn with_cell_size(mut self, cell_size: i64) -> Self {
        self.cell_size = Some(cell_size);
        self
    }

    /// Bucket size the weld pass will use.
    #[inline]
    pub fn weld_cell_size(&self) -> i64 {
        self.cell_size.unwrap_or(self.weld_tolerance)
    }

    /// Rejects a scale that is not finite and positive, a negative tolerance
    /// or epsilon, and a cell size below one.
    pub fn validate(&self) -> Result<()> {
        if !(self.fixed_point_scale.is_finite() && self.fixed_point_scale > 0.0) {
            return Err(OutlineError::InvalidMergeOptions(
                "fixed-point scale must be finite and > 0",
            ));
        }
        if self.weld_tolerance < 0 {
            return Err(OutlineError::InvalidMergeOptions(
                "weld tolerance must be >= 0",
            ));
        }
        if !(self.intersection_epsilon.is_finite() && self.intersection_epsilon >= 0.0) {
            return Err(OutlineError::InvalidMergeOptions(
                "intersection epsilon must be finite and >= 0",
            ));
        }
        if matches!(self.cell_size, Some(c) if c <= 0) {
            return Err(OutlineError::InvalidMergeOptions("cell size must be > 0"));
        }
        Ok(())
    }
}
