//! Vertex welding on the fixed-precision integer grid.
//!
//! Adjacent polygons that are meant to share an edge rarely produce
//! bit-identical coordinates after transformation. Welding snaps each point
//! onto a point emitted by an earlier polygon when the two lie within a small
//! tolerance, so shared edges become exactly shared before boolean operations.
//!
//! # Example
//!
//! ```
//! use seamline::primitives::IntPoint;
//! use seamline::tolerance::weld_paths;
//!
//! let mut paths = vec![
//!     vec![IntPoint::new(0, 0), IntPoint::new(1000, 0), IntPoint::new(1000, 1000)],
//!     vec![IntPoint::new(1007, -5), IntPoint::new(2000, 0), IntPoint::new(2000, 1000)],
//! ];
//!
//! let moved = weld_paths(&mut paths, 20);
//! assert_eq!(moved, 1);
//! assert_eq!(paths[1][0], IntPoint::new(1000, 0));
//! ```

use crate::primitives::IntPoint;
use std::collections::HashMap;

/// Spatially bucketed set of previously emitted points.
///
/// Buckets are square cells with side `tolerance`, so every candidate within
/// the tolerance lives in the 3x3 block of cells around a query point.
#[derive(Debug, Clone)]
pub struct IntWelder {
    tolerance: i64,
    tolerance_sq: i128,
    cell: i64,
    points: Vec<IntPoint>,
    buckets: HashMap<(i64, i64), Vec<usize>>,
}

impl IntWelder {
    /// Creates an empty welder. Negative tolerances are treated as zero.
    pub fn new(tolerance: i64) -> Self {
        let tolerance = tolerance.max(0);
        Self {
            tolerance,
            tolerance_sq: i128::from(tolerance) * i128::from(tolerance),
            cell: tolerance.max(1),
            points: Vec::new(),
            buckets: HashMap::new(),
        }
    }

    /// Creates an empty welder with an explicit bucket size.
    ///
    /// Cells narrower than the tolerance are widened to it so the 3x3 cell
    /// search still sees every candidate.
    pub fn with_cell_size(tolerance: i64, cell: i64) -> Self {
        let mut welder = Self::new(tolerance);
        welder.cell = cell.max(welder.tolerance).max(1);
        welder
    }

    #[inline]
    pub fn tolerance(&self) -> i64 {
        self.tolerance
    }

    /// Number of distinct points collected so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    fn cell_of(&self, p: IntPoint) -> (i64, i64) {
        (p.x.div_euclid(self.cell), p.y.div_euclid(self.cell))
    }

    /// Returns the nearest collected point within the tolerance.
    ///
    /// Ties go to the point collected first.
    pub fn nearest(&self, p: IntPoint) -> Option<IntPoint> {
        let (cx, cy) = self.cell_of(p);
        let mut best: Option<(i128, usize)> = None;

        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(bucket) = self.buckets.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for &idx in bucket {
                    let d = p.distance_squared(self.points[idx]);
                    if d > self.tolerance_sq {
                        continue;
                    }
                    let better = match best {
                        None => true,
                        Some((best_d, best_idx)) => d < best_d || (d == best_d && idx < best_idx),
                    };
                    if better {
                        best = Some((d, idx));
                    }
                }
            }
        }

        best.map(|(_, idx)| self.points[idx])
    }

    /// Adds a point to the collected set (exact duplicates are ignored).
    pub fn insert(&mut self, p: IntPoint) {
        let key = self.cell_of(p);
        let bucket = self.buckets.entry(key).or_default();
        if bucket.iter().any(|&idx| self.points[idx] == p) {
            return;
        }
        bucket.push(self.points.len());
        self.points.push(p);
    }

    /// Welds one path against every point collected from earlier paths,
    /// then collects the path's own points.
    ///
    /// Returns the number of points whose coordinates changed.
    pub fn weld_path(&mut self, path: &mut [IntPoint]) -> usize {
        let mut moved = 0;
        for p in path.iter_mut() {
            if let Some(target) = self.nearest(*p) {
                if target != *p {
                    *p = target;
                    moved += 1;
                }
            }
        }
        for &p in path.iter() {
            self.insert(p);
        }
        moved
    }
}

/// Welds a batch of paths in order: each point snaps to the nearest point of
/// an earlier path within `tolerance`.
///
/// A single pass reaches a fixed point: running it again on its own output
/// with the same tolerance moves nothing.
///
/// Returns the number of moved points.
pub fn weld_paths(paths: &mut [Vec<IntPoint>], tolerance: i64) -> usize {
    let mut welder = IntWelder::new(tolerance);
    paths
        .iter_mut()
        .map(|path| welder.weld_path(path))
        .sum()
}

/// Cleans a closed integer loop: collapses consecutive points closer than
/// `tolerance` (including across the wrap) and drops points lying within
/// `tolerance` of the line through their neighbours.
///
/// Returns an empty vector when fewer than three points survive.
pub fn clean_int_loop(path: &[IntPoint], tolerance: i64) -> Vec<IntPoint> {
    let tol_sq = i128::from(tolerance.max(0)) * i128::from(tolerance.max(0));

    let mut out: Vec<IntPoint> = Vec::with_capacity(path.len());
    for &p in path {
        match out.last() {
            Some(&last) if last.distance_squared(p) <= tol_sq => {}
            _ => out.push(p),
        }
    }
    while out.len() > 1 && out[0].distance_squared(out[out.len() - 1]) <= tol_sq {
        out.pop();
    }

    // Drop near-collinear points until nothing changes.
    let mut changed = true;
    while changed && out.len() >= 3 {
        changed = false;
        let n = out.len();
        for i in 0..n {
            let prev = out[(i + n - 1) % n];
            let cur = out[i];
            let next = out[(i + 1) % n];
            let base_sq = prev.distance_squared(next);
            if base_sq == 0 {
                continue;
            }
            // distance(cur, line)^2 = cross^2 / |next - prev|^2
            let cross = prev.cross(next, cur);
            if cross.saturating_mul(cross) <= tol_sq.saturating_mul(base_sq)
                && is_between(prev, cur, next)
            {
                out.remove(i);
                changed = true;
                break;
            }
        }
    }

    if out.len() < 3 {
        Vec::new()
    } else {
        out
    }
}

/// `cur` projects inside the span `prev..next` (not a spike back-track).
fn is_between(prev: IntPoint, cur: IntPoint, next: IntPoint) -> bool {
    let delta = |a: i64, b: i64| i128::from(a) - i128::from(b);
    let (ax, ay) = (delta(cur.x, prev.x), delta(cur.y, prev.y));
    let (bx, by) = (delta(next.x, prev.x), delta(next.y, prev.y));
    let dot = ax.saturating_mul(bx).saturating_add(ay.saturating_mul(by));
    dot >= 0 && dot <= prev.distance_squared(next)
}
