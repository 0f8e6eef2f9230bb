//! Point-to-segment and point-to-polyline distances.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A straight segment between two world points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start point.
    pub a: DVec2,
    /// End point.
    pub b: DVec2,
}

impl Segment {
    /// Create a segment from its endpoints.
    #[must_use]
    pub const fn new(a: DVec2, b: DVec2) -> Self {
        Self { a, b }
    }

    /// Distance from `p` to this segment.
    #[must_use]
    #[inline]
    pub fn distance(&self, p: DVec2) -> f64 {
        distance_to_segment(p, self.a, self.b)
    }
}

/// Euclidean distance from `p` to the segment `a`-`b`.
///
/// Projects `p` onto the segment with the parameter clamped to `[0, 1]`.
/// A degenerate segment (`a == b`) is treated as a point.
#[must_use]
#[inline]
pub fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Minimum distance from `p` to any segment of `path`.
///
/// A single-point path degrades to the distance to that point and an
/// empty path is infinitely far away.
#[must_use]
pub fn distance_to_polyline(p: DVec2, path: &[DVec2]) -> f64 {
    match path {
        [] => f64::INFINITY,
        [only] => p.distance(*only),
        _ => path
            .windows(2)
            .map(|w| distance_to_segment(p, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}
