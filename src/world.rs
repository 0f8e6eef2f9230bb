//! The static world: terrain, geography and building boxes.
//!
//! Built once per seed and never mutated afterwards. Every collision and
//! height query made by the simulation goes through a shared `&World`.

mod hazards;
mod structures;
mod zones;

use glam::DVec2;

use crate::collision::{resolve_against_buildings, BuildingBox};
use crate::geo::Geography;
use crate::rng::SimRng;
use crate::terrain::HeightField;

pub use hazards::{gorge_influence, hazard_at, river_influence, Hazard, HAZARD_THRESHOLD};
pub use structures::building_boxes;
pub use zones::Zone;

/// Immutable world context.
#[derive(Debug, Clone)]
pub struct World {
    terrain: HeightField,
    buildings: Vec<BuildingBox>,
}

impl World {
    /// Generate the standard world, drawing structure sizes from `rng`.
    #[must_use]
    pub fn generate(rng: &mut SimRng) -> Self {
        Self::from_geography(Geography::standard(), rng)
    }

    /// Generate a world for a custom layout.
    #[must_use]
    pub fn from_geography(geo: Geography, rng: &mut SimRng) -> Self {
        let buildings = building_boxes(&geo, rng);
        let terrain = HeightField::new(geo);
        tracing::info!(buildings = buildings.len(), "world generated");
        Self { terrain, buildings }
    }

    /// Replace the building boxes, keeping terrain and geography.
    #[must_use]
    pub fn with_buildings(mut self, buildings: Vec<BuildingBox>) -> Self {
        self.buildings = buildings;
        self
    }

    /// Terrain height field.
    #[must_use]
    pub const fn terrain(&self) -> &HeightField {
        &self.terrain
    }

    /// Static geography.
    #[must_use]
    pub const fn geography(&self) -> &Geography {
        self.terrain.geography()
    }

    /// All building collision boxes.
    #[must_use]
    pub fn buildings(&self) -> &[BuildingBox] {
        &self.buildings
    }

    /// Walkable ground height at `p`.
    #[must_use]
    #[inline]
    pub fn height(&self, p: DVec2) -> f64 {
        self.terrain.at(p)
    }

    /// Push a circle out of every building.
    #[must_use]
    #[inline]
    pub fn resolve_buildings(&self, p: DVec2, radius: f64) -> DVec2 {
        resolve_against_buildings(&self.buildings, p, radius)
    }

    /// Keep a circle between bridge railings.
    #[must_use]
    #[inline]
    pub fn clamp_railings(&self, p: DVec2, radius: f64) -> DVec2 {
        self.geography().clamp_to_bridge_decks(p, radius)
    }

    /// Fatal trench at `p`, if any.
    #[must_use]
    pub fn hazard_at(&self, p: DVec2) -> Option<Hazard> {
        hazard_at(self.geography(), p)
    }

    /// Zone containing `p`.
    #[must_use]
    pub fn zone_at(&self, p: DVec2) -> Zone {
        Zone::at(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_is_deterministic() {
        let a = World::generate(&mut SimRng::from_seed_u64(3));
        let b = World::generate(&mut SimRng::from_seed_u64(3));
        assert_eq!(a.buildings(), b.buildings());
        let p = DVec2::new(12.5, -40.25);
        assert!((a.height(p) - b.height(p)).abs() < 1e-12);
    }

    #[test]
    fn test_resolve_buildings_clears_town_house() {
        let world = World::generate(&mut SimRng::default());
        let p = world.resolve_buildings(DVec2::new(-54.0, 70.0), 0.5);
        assert!((p.x + 50.0).abs() < 1e-9);
        assert!(world.buildings().iter().all(|b| !b.contains_expanded(p, 0.5)));
    }

    #[test]
    fn test_bridge_height_is_flat() {
        let world = World::generate(&mut SimRng::default());
        let bridge = world.geography().bridges[1];
        let a = world.height(bridge.world_point(-10.0, 1.0));
        let b = world.height(bridge.world_point(12.0, -2.0));
        assert!((a - b).abs() < 1e-12);
    }
}
