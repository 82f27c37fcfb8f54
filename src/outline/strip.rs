//! Triangle-strip entries and auxiliary (offset) vertex construction.
//!
//! Every contributing sample of a strip is a pair of entries: the user
//! vertex, drawn opaque, and an auxiliary vertex offset by the stroke
//! half-width, drawn with zero alpha. Rasterizing the strip interpolates the
//! alpha across the stroke, which gives the anti-aliased falloff.

use crate::polygon::Winding;
use crate::primitives::{Line2, Point2, Vec2};
use crate::Vertex2;
use std::f32::consts::FRAC_PI_2;

/// Longest allowed miter, as a multiple of the half-width.
///
/// Sharper corners keep their auxiliary vertex on the miter direction at
/// this distance instead of following the offset-line intersection.
pub const MITER_LIMIT: f32 = 4.0;

/// Two unit edge directions whose cross product is at most this value are
/// treated as parallel: no line intersection is attempted.
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Consecutive vertices closer than this are treated as one vertex when
/// looking for edge directions.
pub const DEGENERATE_EPSILON: f32 = 1e-6;

/// Extra fan samples per round end cap of an open polyline (per side).
pub const ROUND_CAP_SEGMENTS: usize = 4;

/// Classification of a strip entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeFlag {
    /// A vertex of the user loop, drawn with the stroke color.
    User,
    /// An offset vertex, drawn with the stroke color at zero alpha.
    Auxiliary,
}

impl EdgeFlag {
    /// Numeric flag as uploaded to the GPU: `1.0` for user vertices.
    #[inline]
    pub fn as_f32(self) -> f32 {
        match self {
            EdgeFlag::User => 1.0,
            EdgeFlag::Auxiliary => 0.0,
        }
    }
}

/// One sample of a triangle strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripVertexEntry {
    pub position: Vertex2,
    pub flag: EdgeFlag,
}

impl StripVertexEntry {
    #[inline]
    pub fn user(position: Vertex2) -> Self {
        Self {
            position,
            flag: EdgeFlag::User,
        }
    }

    #[inline]
    pub fn auxiliary(position: Vertex2) -> Self {
        Self {
            position,
            flag: EdgeFlag::Auxiliary,
        }
    }

    /// Alpha multiplier implied by the flag.
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.flag.as_f32()
    }
}

/// Which of the two parallel strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StripSide {
    /// Toward the polygon interior.
    Inside,
    /// Toward the polygon exterior.
    Outside,
}

impl StripSide {
    pub const ALL: [StripSide; 2] = [StripSide::Inside, StripSide::Outside];
}

/// Flattens entries into `(x, y, flag)` triples.
pub fn flatten_entries(entries: &[StripVertexEntry]) -> Vec<f32> {
    entries
        .iter()
        .flat_map(|e| [e.position.x, e.position.y, e.flag.as_f32()])
        .collect()
}

/// Offset-vertex construction over one vertex loop.
pub(crate) struct StripGeometry<'a> {
    vertices: &'a [Vertex2],
    closed: bool,
    winding: Winding,
    half_width: f32,
}

impl<'a> StripGeometry<'a> {
    pub(crate) fn new(
        vertices: &'a [Vertex2],
        closed: bool,
        winding: Winding,
        half_width: f32,
    ) -> Self {
        Self {
            vertices,
            closed,
            winding,
            half_width,
        }
    }

    /// Multiplier for the left (CCW) edge normal that points toward `side`.
    ///
    /// The left normal points inward on a counter-clockwise loop; the sign
    /// flips for clockwise loops and again for the outside strip.
    fn normal_sign(&self, side: StripSide) -> f32 {
        let inward = self.winding.sign::<f32>();
        match side {
            StripSide::Inside => inward,
            StripSide::Outside => -inward,
        }
    }

    /// Index one step before or after `j`, wrapping only on closed loops.
    fn step(&self, j: usize, forward: bool) -> Option<usize> {
        let n = self.vertices.len();
        match (forward, self.closed) {
            (true, _) if j + 1 < n => Some(j + 1),
            (true, true) => Some(0),
            (false, _) if j > 0 => Some(j - 1),
            (false, true) => Some(n - 1),
            _ => None,
        }
    }

    /// Nearest vertex before (`forward == false`) or after `i` that is not a
    /// duplicate of vertex `i`.
    fn distinct_neighbor(&self, i: usize, forward: bool) -> Option<usize> {
        let n = self.vertices.len();
        let origin = self.vertices[i];
        let eps_sq = DEGENERATE_EPSILON * DEGENERATE_EPSILON;
        let mut j = i;
        for _ in 1..n {
            j = self.step(j, forward)?;
            if self.vertices[j].distance_squared(origin) > eps_sq {
                return Some(j);
            }
        }
        None
    }

    /// Sorted indices of the vertices whose auxiliary vertices depend on
    /// vertex `i`.
    ///
    /// Neighbour lookups skip duplicates, so on each side this runs through
    /// the duplicate run next to `i` and on to the first vertex past it.
    pub(crate) fn dependents(&self, i: usize) -> Vec<usize> {
        let n = self.vertices.len();
        let mut out = vec![i];
        for forward in [false, true] {
            let Some(first) = self.step(i, forward) else {
                continue;
            };
            let last = match self.distinct_neighbor(first, forward) {
                Some(last) => Some(last),
                None if self.closed => return (0..n).collect(),
                None => None,
            };
            let mut j = first;
            for _ in 0..n {
                out.push(j);
                if Some(j) == last {
                    break;
                }
                match self.step(j, forward) {
                    Some(next) => j = next,
                    None => break,
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Unit direction of the edge leaving `i` forward (or arriving at `i`).
    fn direction(&self, from: usize, to: usize) -> Option<Vec2<f32>> {
        (self.vertices[to] - self.vertices[from]).normalize()
    }

    /// Auxiliary vertex of user vertex `i` on `side`.
    pub(crate) fn auxiliary(&self, i: usize, side: StripSide) -> Vertex2 {
        let c = self.vertices[i];
        let offset = self.half_width * self.normal_sign(side);

        let prev = self
            .distinct_neighbor(i, false)
            .and_then(|p| self.direction(p, i).map(|d| (p, d)));
        let next = self
            .distinct_neighbor(i, true)
            .and_then(|n| self.direction(i, n).map(|d| (n, d)));

        match (prev, next) {
            (None, None) => c,
            (Some((_, d)), None) | (None, Some((_, d))) => c + d.perpendicular() * offset,
            (Some((p, d1)), Some((_, d2))) => self.join(self.vertices[p], c, d1, d2, offset),
        }
    }

    /// Miter join at `c` between incoming direction `d1` and outgoing `d2`.
    fn join(&self, p: Vertex2, c: Vertex2, d1: Vec2<f32>, d2: Vec2<f32>, offset: f32) -> Vertex2 {
        let o1 = d1.perpendicular() * offset;
        let o2 = d2.perpendicular() * offset;

        if d1.cross(d2).abs() <= PARALLEL_EPSILON {
            if d1.dot(d2) > 0.0 {
                // Straight continuation: offset along the averaged normal.
                let normal = (d1.perpendicular() + d2.perpendicular())
                    .normalize()
                    .unwrap_or_else(|| d1.perpendicular());
                return c + normal * offset;
            }
            // Full reversal: cap the spike just past the tip.
            return c + d1 * self.half_width;
        }

        let incoming = Line2::new(p + o1, d1);
        let outgoing = Line2::new(c + o2, d2);
        match incoming.intersect_line(&outgoing, 0.0) {
            Some((miter, _, _)) => clamp_miter(c, miter, self.half_width),
            None => c + o1,
        }
    }

    /// Start-cap fan samples for an open polyline, ordered from directly
    /// behind the first vertex toward its regular auxiliary vertex.
    pub(crate) fn start_cap(&self, side: StripSide) -> Vec<Vertex2> {
        let c = self.vertices[0];
        let Some(d) = self.distinct_neighbor(0, true).and_then(|n| self.direction(0, n)) else {
            return vec![c; ROUND_CAP_SEGMENTS];
        };
        let normal = d.perpendicular() * self.normal_sign(side);
        (0..ROUND_CAP_SEGMENTS)
            .map(|k| {
                let theta = FRAC_PI_2 * k as f32 / ROUND_CAP_SEGMENTS as f32;
                let (sin, cos) = theta.sin_cos();
                c + (-d * cos + normal * sin) * self.half_width
            })
            .collect()
    }

    /// End-cap fan samples, ordered from just past the last regular
    /// auxiliary vertex to directly ahead of the last vertex.
    pub(crate) fn end_cap(&self, side: StripSide) -> Vec<Vertex2> {
        let last = self.vertices.len() - 1;
        let c = self.vertices[last];
        let Some(d) = self
            .distinct_neighbor(last, false)
            .and_then(|p| self.direction(p, last))
        else {
            return vec![c; ROUND_CAP_SEGMENTS];
        };
        let normal = d.perpendicular() * self.normal_sign(side);
        (1..=ROUND_CAP_SEGMENTS)
            .map(|k| {
                let theta = FRAC_PI_2 * k as f32 / ROUND_CAP_SEGMENTS as f32;
                let (sin, cos) = theta.sin_cos();
                c + (normal * cos + d * sin) * self.half_width
            })
            .collect()
    }
}

/// Pulls a miter point back onto its direction at `MITER_LIMIT * half_width`.
fn clamp_miter(c: Point2<f32>, miter: Point2<f32>, half_width: f32) -> Point2<f32> {
    let offset = miter - c;
    let length = offset.magnitude();
    let limit = MITER_LIMIT * half_width;
    if length > limit && length > 0.0 {
        c + offset * (limit / length)
    } else {
        miter
    }
}
