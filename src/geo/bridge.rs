//! Oriented bridge rectangles.
//!
//! Both bridges carry the road along the world diagonal (1, 1) across a
//! trench that runs along (1, -1), so the local frame is a fixed 45 degree
//! rotation:
//!
//! ```text
//! along  = (dx + dy) / sqrt(2)
//! across = (dx - dy) / sqrt(2)
//! ```

use std::f64::consts::FRAC_1_SQRT_2;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Which trench a bridge spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeKind {
    /// Crossing over the gorge.
    Gorge,
    /// Crossing over the river.
    River,
}

/// A walkable bridge deck and its railings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bridge {
    /// Trench this bridge crosses.
    pub kind: BridgeKind,
    /// Deck center.
    pub center: DVec2,
    /// Deck half-length along the road.
    pub half_along: f64,
    /// Deck half-width across the road.
    pub half_across: f64,
    /// Railing half-length along the road.
    pub rail_half_along: f64,
    /// Railing half-width across the road (inner walkable width).
    pub rail_half_across: f64,
}

impl Bridge {
    /// Rotate `p` into bridge-local `(along, across)` coordinates.
    #[must_use]
    #[inline]
    pub fn local_coords(&self, p: DVec2) -> (f64, f64) {
        let d = p - self.center;
        ((d.x + d.y) * FRAC_1_SQRT_2, (d.x - d.y) * FRAC_1_SQRT_2)
    }

    /// Rotate bridge-local coordinates back into world space.
    #[must_use]
    #[inline]
    pub fn world_point(&self, along: f64, across: f64) -> DVec2 {
        self.center
            + DVec2::new(
                (along + across) * FRAC_1_SQRT_2,
                (along - across) * FRAC_1_SQRT_2,
            )
    }

    /// Is `p` on the deck footprint?
    #[must_use]
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        let (along, across) = self.local_coords(p);
        along.abs() < self.half_along && across.abs() < self.half_across
    }

    /// Keep a circle of `radius` between the railings.
    ///
    /// Only applies inside the railing span (plus a one-unit margin across).
    /// The along component is left untouched.
    #[must_use]
    pub fn clamp_between_railings(&self, p: DVec2, radius: f64) -> DVec2 {
        let (along, across) = self.local_coords(p);
        if along.abs() >= self.rail_half_along
            || across.abs() >= self.rail_half_across + radius + 1.0
        {
            return p;
        }
        let max_across = (self.rail_half_across - radius).max(0.0);
        if across.abs() <= max_across {
            return p;
        }
        self.world_point(along, across.signum() * max_across)
    }
}
