//! Uniform height lattice with bilinear sampling.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use glam::DVec2;

/// Side length of the sampled square.
pub const LATTICE_SIZE: f64 = 700.0;
/// Cells per side.
pub const LATTICE_SEGMENTS: usize = 100;

/// Heights pre-evaluated on a `(segments + 1)²` grid centered on the origin.
///
/// Row `iy`, column `ix` sits at `(-size/2 + ix*step, -size/2 + iy*step)`.
#[derive(Debug, Clone)]
pub struct Lattice {
    half_size: f64,
    segments: usize,
    step: f64,
    heights: Vec<f64>,
}

impl Lattice {
    /// Sample `height` on a lattice of the given size and resolution.
    ///
    /// `segments` is raised to at least 1.
    pub fn sample_from(size: f64, segments: usize, height: impl Fn(DVec2) -> f64) -> Self {
        let segments = segments.max(1);
        let half_size = size / 2.0;
        let step = size / segments as f64;
        let side = segments + 1;
        let mut heights = Vec::with_capacity(side * side);
        for iy in 0..side {
            for ix in 0..side {
                let p = DVec2::new(-half_size + ix as f64 * step, -half_size + iy as f64 * step);
                heights.push(height(p));
            }
        }
        Self {
            half_size,
            segments,
            step,
            heights,
        }
    }

    /// Cells per side.
    #[must_use]
    pub const fn segments(&self) -> usize {
        self.segments
    }

    /// Distance between neighbouring vertices.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// Height stored at vertex `(ix, iy)`, clamped to the grid.
    #[must_use]
    #[inline]
    pub fn vertex(&self, ix: usize, iy: usize) -> f64 {
        let side = self.segments + 1;
        let ix = ix.min(self.segments);
        let iy = iy.min(self.segments);
        self.heights[iy * side + ix]
    }

    /// Bilinear interpolation at `p`; points outside the grid use the edge.
    #[must_use]
    pub fn bilinear(&self, p: DVec2) -> f64 {
        let max = self.segments as f64;
        let fx = ((p.x + self.half_size) / self.step).clamp(0.0, max);
        let fy = ((p.y + self.half_size) / self.step).clamp(0.0, max);
        let ix = (fx.floor() as usize).min(self.segments - 1);
        let iy = (fy.floor() as usize).min(self.segments - 1);
        let tx = fx - ix as f64;
        let ty = fy - iy as f64;

        let h00 = self.vertex(ix, iy);
        let h10 = self.vertex(ix + 1, iy);
        let h01 = self.vertex(ix, iy + 1);
        let h11 = self.vertex(ix + 1, iy + 1);
        let bottom = h00 + (h10 - h00) * tx;
        let top = h01 + (h11 - h01) * tx;
        bottom + (top - bottom) * ty
    }
}
