//! Height field: one terrain surface shared by rendering and gameplay.
//!
//! Two exact queries and one fast query:
//!
//! ```text
//! visual(p)    base + gorge cut + river cut       trenches always visible
//! gameplay(p)  deck height on a bridge, else visual(p)
//! at(p)        bridge test, else bilinear over the visual lattice
//! ```
//!
//! The deck height of each bridge is the base terrain (no trench cut) at
//! the bridge center plus a small clearance, fixed when the field is built.

mod lattice;
mod layers;

use glam::DVec2;

use crate::geo::{BridgeKind, Geography};

pub use lattice::{Lattice, LATTICE_SEGMENTS, LATTICE_SIZE};
pub use layers::{band_influence, smoothstep};

/// Clearance of a bridge deck above the base terrain at its center.
pub const DECK_CLEARANCE: f64 = 0.1;

/// Deterministic terrain height over the world plane.
#[derive(Debug, Clone)]
pub struct HeightField {
    geo: Geography,
    clearings: [DVec2; 2],
    deck_heights: [f64; 2],
    lattice: Lattice,
}

impl HeightField {
    /// Build the field for `geo` at the standard lattice resolution.
    #[must_use]
    pub fn new(geo: Geography) -> Self {
        Self::with_resolution(geo, LATTICE_SIZE, LATTICE_SEGMENTS)
    }

    /// Build the field with a custom lattice.
    #[must_use]
    pub fn with_resolution(geo: Geography, size: f64, segments: usize) -> Self {
        let clearings = [geo.settlements.palace, geo.settlements.elf_village];
        let mut field = Self {
            geo,
            clearings,
            deck_heights: [0.0; 2],
            lattice: Lattice::sample_from(1.0, 1, |_| 0.0),
        };
        field.deck_heights = field
            .geo
            .bridges
            .map(|b| field.base(b.center) + DECK_CLEARANCE);
        field.lattice = Lattice::sample_from(size, segments, |p| field.visual(p));
        tracing::debug!(
            segments,
            gorge_deck = field.deck_heights[0],
            river_deck = field.deck_heights[1],
            "height field built"
        );
        field
    }

    /// The geography this field was built from.
    #[must_use]
    pub const fn geography(&self) -> &Geography {
        &self.geo
    }

    /// The pre-evaluated visual lattice.
    #[must_use]
    pub const fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Fixed deck height of a bridge.
    #[must_use]
    pub const fn deck_height(&self, kind: BridgeKind) -> f64 {
        match kind {
            BridgeKind::Gorge => self.deck_heights[0],
            BridgeKind::River => self.deck_heights[1],
        }
    }

    /// Additive layers only: rolling hills, dark mountain, perimeter ring.
    #[must_use]
    pub fn base(&self, p: DVec2) -> f64 {
        layers::rolling(p)
            + layers::mountain(p, self.geo.mountain_center)
            + layers::perimeter(p, &self.clearings)
    }

    /// Terrain as drawn: trenches cut everywhere, including under bridges.
    #[must_use]
    pub fn visual(&self, p: DVec2) -> f64 {
        self.base(p)
            + layers::gorge_cut(p, self.geo.gorge_distance(p))
            + layers::river_cut(self.geo.river_distance(p))
    }

    /// Walkable height: the flat deck on a bridge, otherwise [`Self::visual`].
    #[must_use]
    pub fn gameplay(&self, p: DVec2) -> f64 {
        match self.geo.bridge_at(p) {
            Some(b) => self.deck_height(b.kind),
            None => self.visual(p),
        }
    }

    /// Runtime height query used by moving entities.
    ///
    /// Bridge decks are tested directly; everything else is interpolated
    /// from the lattice.
    #[must_use]
    pub fn at(&self, p: DVec2) -> f64 {
        match self.geo.bridge_at(p) {
            Some(b) => self.deck_height(b.kind),
            None => self.lattice.bilinear(p),
        }
    }
}
