//! Building boxes and minimum-penetration push-out.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::geo::Footprint;

/// Extra half-extent added around every placed structure.
pub const FOOTPRINT_MARGIN: f64 = 0.5;

/// Static axis-aligned collision box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingBox {
    /// Center x.
    pub cx: f64,
    /// Center y.
    pub cy: f64,
    /// Half extent along x.
    pub half_width: f64,
    /// Half extent along y.
    pub half_depth: f64,
}

impl BuildingBox {
    /// Create a box from its center and half extents.
    #[must_use]
    pub const fn new(cx: f64, cy: f64, half_width: f64, half_depth: f64) -> Self {
        Self {
            cx,
            cy,
            half_width,
            half_depth,
        }
    }

    /// Collision box for a structure of the given full size, with margin.
    #[must_use]
    pub fn around(center: DVec2, width: f64, depth: f64) -> Self {
        Self::new(
            center.x,
            center.y,
            width / 2.0 + FOOTPRINT_MARGIN,
            depth / 2.0 + FOOTPRINT_MARGIN,
        )
    }

    /// Strict containment test for the box grown by `radius`.
    #[must_use]
    #[inline]
    pub fn contains_expanded(&self, p: DVec2, radius: f64) -> bool {
        let hw = self.half_width + radius;
        let hd = self.half_depth + radius;
        p.x > self.cx - hw && p.x < self.cx + hw && p.y > self.cy - hd && p.y < self.cy + hd
    }

    /// Push `p` out of the box grown by `radius` along the shallowest axis.
    ///
    /// Points outside (or exactly on the edge) are returned unchanged.
    /// Ties go left, right, down, up in that order.
    #[must_use]
    pub fn push_out(&self, p: DVec2, radius: f64) -> DVec2 {
        if !self.contains_expanded(p, radius) {
            return p;
        }
        let hw = self.half_width + radius;
        let hd = self.half_depth + radius;
        let min_x = self.cx - hw;
        let max_x = self.cx + hw;
        let min_y = self.cy - hd;
        let max_y = self.cy + hd;

        let left = p.x - min_x;
        let right = max_x - p.x;
        let down = p.y - min_y;
        let up = max_y - p.y;
        let shallowest = left.min(right).min(down).min(up);

        if left <= shallowest {
            DVec2::new(min_x, p.y)
        } else if right <= shallowest {
            DVec2::new(max_x, p.y)
        } else if down <= shallowest {
            DVec2::new(p.x, min_y)
        } else {
            DVec2::new(p.x, max_y)
        }
    }
}

impl From<Footprint> for BuildingBox {
    fn from(f: Footprint) -> Self {
        Self::around(f.center, f.width, f.depth)
    }
}

/// Resolve a circle against every box in order.
///
/// Each box sees the output of the previous one, so a position can be
/// pushed by several boxes in a single call.
#[must_use]
pub fn resolve_against_buildings(boxes: &[BuildingBox], p: DVec2, radius: f64) -> DVec2 {
    boxes.iter().fold(p, |q, b| b.push_out(q, radius))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_is_untouched() {
        let b = BuildingBox::new(0.0, 0.0, 2.0, 2.0);
        let p = DVec2::new(5.0, 0.0);
        assert!(b.push_out(p, 0.5).distance(p) < 1e-12);
    }

    #[test]
    fn test_edge_is_not_inside() {
        let b = BuildingBox::new(0.0, 0.0, 2.0, 2.0);
        assert!(!b.contains_expanded(DVec2::new(2.5, 0.0), 0.5));
    }

    #[test]
    fn test_pushes_along_shallowest_axis() {
        let b = BuildingBox::new(0.0, 0.0, 2.0, 2.0);
        let out = b.push_out(DVec2::new(2.2, 0.3), 0.5);
        assert!((out.x - 2.5).abs() < 1e-12);
        assert!((out.y - 0.3).abs() < 1e-12);

        let out = b.push_out(DVec2::new(0.1, -2.3), 0.5);
        assert!((out.y + 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_center_tie_goes_left() {
        let b = BuildingBox::new(10.0, 10.0, 1.0, 1.0);
        let out = b.push_out(DVec2::new(10.0, 10.0), 0.0);
        assert!((out.x - 9.0).abs() < 1e-12);
        assert!((out.y - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_sequential_boxes() {
        // Two adjacent boxes: the first pushes right into the second,
        // which pushes further along its own shallow axis.
        let boxes = [
            BuildingBox::new(0.0, 0.0, 1.0, 1.0),
            BuildingBox::new(2.0, 0.0, 1.0, 5.0),
        ];
        let out = resolve_against_buildings(&boxes, DVec2::new(0.8, 0.0), 0.2);
        for b in &boxes[1..] {
            assert!(!b.contains_expanded(out, 0.2));
        }
    }

    #[test]
    fn test_footprint_margin() {
        let b = BuildingBox::from(Footprint::new(1.0, 2.0, 8.0, 6.0));
        assert!((b.half_width - 4.5).abs() < 1e-12);
        assert!((b.half_depth - 3.5).abs() < 1e-12);
    }
}
