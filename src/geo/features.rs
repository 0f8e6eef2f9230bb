//! Authored world features: settlements, road, river, gorge, bridges.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::{distance_to_polyline, Bridge, BridgeKind, Segment};

/// Half the side length of the square world.
pub const MAP_HALF_SIZE: f64 = 350.0;
/// Full width of the main road.
pub const ROAD_WIDTH: f64 = 8.0;
/// Half-width of the river trench.
pub const RIVER_HALF_WIDTH: f64 = 10.0;
/// Maximum river trench depth.
pub const RIVER_DEPTH: f64 = 8.0;
/// Half-width of the gorge trench.
pub const GORGE_HALF_WIDTH: f64 = 18.0;
/// Maximum gorge trench depth.
pub const GORGE_DEPTH: f64 = 45.0;
/// Radius of the dark mountain footprint.
pub const DARK_MOUNTAIN_RADIUS: f64 = 45.0;
/// Height of the dark mountain peak above base terrain.
pub const DARK_MOUNTAIN_PEAK: f64 = 55.0;

/// Radius of the road ring around the fort.
const FORT_RING_RADIUS: f64 = 75.0;
/// Ring waypoint bearings in degrees, walked west to east.
const FORT_RING_ANGLES: [f64; 6] = [213.0, 180.0, 145.0, 104.0, 59.0, 24.0];
/// Distance of the road end south of the palace wall.
const PALACE_ROAD_GAP: f64 = 15.0;

const RIVER_OFFSETS: [(f64, f64); 11] = [
    (-150.0, 150.0),
    (-120.0, 125.0),
    (-90.0, 95.0),
    (-60.0, 65.0),
    (-30.0, 35.0),
    (0.0, 0.0),
    (35.0, -30.0),
    (65.0, -60.0),
    (95.0, -90.0),
    (125.0, -120.0),
    (150.0, -150.0),
];

const TOWN_BUILDINGS: [(f64, f64, f64, f64); 10] = [
    (52.0, -18.0, 8.0, 7.0),
    (-70.0, -45.0, 7.0, 9.0),
    (58.0, 12.0, 6.0, 6.0),
    (-65.0, -15.0, 10.0, 8.0),
    (-70.0, 5.0, 7.0, 7.0),
    (-18.0, -55.0, 9.0, 6.0),
    (18.0, -40.0, 8.0, 10.0),
    (-60.0, -50.0, 6.0, 8.0),
    (55.0, -28.0, 7.0, 7.0),
    (-55.0, 70.0, 8.0, 6.0),
];

const ELF_HOUSES: [(f64, f64); 7] = [
    (-270.0, -265.0),
    (-230.0, -270.0),
    (-265.0, -225.0),
    (-245.0, -215.0),
    (-250.0, -280.0),
    (-218.0, -260.0),
    (-280.0, -245.0),
];

/// Rectangular footprint of an authored structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    /// Center in world space.
    pub center: DVec2,
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub depth: f64,
}

impl Footprint {
    /// Create a footprint.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, depth: f64) -> Self {
        Self {
            center: DVec2::new(x, y),
            width,
            depth,
        }
    }
}

/// Settlement anchors and the wall layout derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settlements {
    /// Palace center.
    pub palace: DVec2,
    /// Distance from the palace center to each wall.
    pub palace_wall_offset: f64,
    /// Palace wall thickness.
    pub palace_wall_thickness: f64,
    /// Dark fort center.
    pub fort: DVec2,
    /// Distance from the fort center to each corner tower.
    pub fort_tower_offset: f64,
    /// Fort tower side length.
    pub fort_tower_width: f64,
    /// Elf village center.
    pub elf_village: DVec2,
}

impl Default for Settlements {
    fn default() -> Self {
        Self {
            palace: DVec2::new(230.0, 230.0),
            palace_wall_offset: 16.0,
            palace_wall_thickness: 2.5,
            fort: DVec2::new(20.0, 20.0),
            fort_tower_offset: 40.0,
            fort_tower_width: 6.0,
            elf_village: DVec2::new(-250.0, -250.0),
        }
    }
}

impl Settlements {
    /// Player start south of the palace walls.
    #[must_use]
    pub fn palace_spawn(&self) -> DVec2 {
        let wall_outer = self.palace_wall_offset + self.palace_wall_thickness / 2.0;
        DVec2::new(self.palace.x, self.palace.y - wall_outer - 4.0)
    }

    /// Last road waypoint, just south of the palace.
    #[must_use]
    pub fn palace_road_end(&self) -> DVec2 {
        DVec2::new(
            self.palace.x,
            self.palace.y - self.palace_wall_offset - PALACE_ROAD_GAP,
        )
    }

    /// Player start outside the fort's south-west tower.
    #[must_use]
    pub fn fort_spawn(&self) -> DVec2 {
        let d = self.fort_tower_offset + self.fort_tower_width + 1.0;
        self.fort - DVec2::splat(d)
    }

    /// Fort gate in the middle of the south wall.
    #[must_use]
    pub fn fort_gate(&self) -> DVec2 {
        DVec2::new(self.fort.x, self.fort.y - self.fort_tower_offset)
    }

    /// Player start in the elf village.
    #[must_use]
    pub const fn elf_spawn(&self) -> DVec2 {
        self.elf_village
    }
}

/// The complete static geography of the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geography {
    /// Settlement anchors.
    pub settlements: Settlements,
    /// Dark mountain center.
    pub mountain_center: DVec2,
    /// Main road waypoints, elf village to palace.
    pub road: Vec<DVec2>,
    /// River centerline.
    pub river: Vec<DVec2>,
    /// Gorge centerline.
    pub gorge: Segment,
    /// Gorge and river bridges, in that order.
    pub bridges: [Bridge; 2],
    /// Town building footprints.
    pub town_buildings: Vec<Footprint>,
    /// Elf house centers; sizes are rolled at world build.
    pub elf_houses: Vec<DVec2>,
}

impl Default for Geography {
    fn default() -> Self {
        Self::standard()
    }
}

impl Geography {
    /// Build the authored world layout.
    #[must_use]
    pub fn standard() -> Self {
        let settlements = Settlements::default();
        let gorge_bridge = Bridge {
            kind: BridgeKind::Gorge,
            center: DVec2::new(-115.0, -115.0),
            half_along: 36.0,
            half_across: 9.0,
            rail_half_along: 24.0,
            rail_half_across: 5.0,
        };
        let river_bridge = Bridge {
            kind: BridgeKind::River,
            center: DVec2::new(145.0, 145.0),
            half_along: 26.0,
            half_across: 8.0,
            rail_half_along: 17.0,
            rail_half_across: 4.0,
        };

        let mut road = vec![
            settlements.elf_village,
            DVec2::new(-210.0, -215.0),
            DVec2::new(-170.0, -175.0),
            DVec2::new(-130.0, -128.0),
            gorge_bridge.center,
            DVec2::new(-90.0, -95.0),
            DVec2::new(-50.0, -45.0),
        ];
        road.extend(FORT_RING_ANGLES.iter().map(|deg| {
            let a = deg.to_radians();
            DVec2::new(
                (settlements.fort.x + FORT_RING_RADIUS * a.cos()).round(),
                (settlements.fort.y + FORT_RING_RADIUS * a.sin()).round(),
            )
        }));
        road.extend([
            DVec2::new(75.0, 80.0),
            DVec2::new(110.0, 115.0),
            river_bridge.center,
            DVec2::new(180.0, 178.0),
            DVec2::new(205.0, 205.0),
            settlements.palace_road_end(),
        ]);

        let river = RIVER_OFFSETS
            .iter()
            .map(|&(dx, dy)| river_bridge.center + DVec2::new(dx, dy))
            .collect();

        Self {
            settlements,
            mountain_center: settlements.fort,
            road,
            river,
            gorge: Segment::new(DVec2::new(-335.0, 105.0), DVec2::new(105.0, -335.0)),
            bridges: [gorge_bridge, river_bridge],
            town_buildings: TOWN_BUILDINGS
                .iter()
                .map(|&(x, y, w, d)| Footprint::new(x, y, w, d))
                .collect(),
            elf_houses: ELF_HOUSES.iter().map(|&(x, y)| DVec2::new(x, y)).collect(),
        }
    }

    /// The bridge of the given kind.
    #[must_use]
    pub fn bridge(&self, kind: BridgeKind) -> &Bridge {
        match kind {
            BridgeKind::Gorge => &self.bridges[0],
            BridgeKind::River => &self.bridges[1],
        }
    }

    /// The bridge whose deck contains `p`, if any.
    #[must_use]
    pub fn bridge_at(&self, p: DVec2) -> Option<&Bridge> {
        self.bridges.iter().find(|b| b.contains(p))
    }

    /// Is `p` on any bridge deck?
    #[must_use]
    #[inline]
    pub fn on_bridge(&self, p: DVec2) -> bool {
        self.bridge_at(p).is_some()
    }

    /// Clamp a circle of `radius` between the railings of every bridge.
    #[must_use]
    pub fn clamp_to_bridge_decks(&self, p: DVec2, radius: f64) -> DVec2 {
        self.bridges
            .iter()
            .fold(p, |q, b| b.clamp_between_railings(q, radius))
    }

    /// Distance from `p` to the river centerline.
    #[must_use]
    #[inline]
    pub fn river_distance(&self, p: DVec2) -> f64 {
        distance_to_polyline(p, &self.river)
    }

    /// Distance from `p` to the gorge centerline.
    #[must_use]
    #[inline]
    pub fn gorge_distance(&self, p: DVec2) -> f64 {
        self.gorge.distance(p)
    }

    /// Distance from `p` to the road centerline.
    #[must_use]
    #[inline]
    pub fn road_distance(&self, p: DVec2) -> f64 {
        distance_to_polyline(p, &self.road)
    }

    /// Is `p` on the road surface?
    #[must_use]
    pub fn on_road(&self, p: DVec2) -> bool {
        self.road_distance(p) < ROAD_WIDTH / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_road_has_nineteen_waypoints() {
        let geo = Geography::standard();
        assert_eq!(geo.road.len(), 19);
        assert!(geo.road[0].distance(geo.settlements.elf_village) < 1e-9);
        assert!(geo.road[18].distance(DVec2::new(230.0, 199.0)) < 1e-9);
    }

    #[test]
    fn test_fort_ring_is_rounded() {
        let geo = Geography::standard();
        assert!(geo.road[7].distance(DVec2::new(-43.0, -21.0)) < 1e-9);
        assert!(geo.road[8].distance(DVec2::new(-55.0, 20.0)) < 1e-9);
        assert!(geo.road[12].distance(DVec2::new(89.0, 51.0)) < 1e-9);
    }

    #[test]
    fn test_bridges_sit_on_road_and_trench() {
        let geo = Geography::standard();
        for b in &geo.bridges {
            assert!(geo.on_road(b.center));
        }
        let gorge = geo.bridge(BridgeKind::Gorge);
        assert!(geo.gorge_distance(gorge.center) < 1.0);
        let river = geo.bridge(BridgeKind::River);
        assert!(geo.river_distance(river.center) < 1e-9);
    }

    #[test]
    fn test_settlement_spawns() {
        let s = Settlements::default();
        assert!(s.palace_spawn().distance(DVec2::new(230.0, 208.75)) < 1e-9);
        assert!(s.fort_spawn().distance(DVec2::new(-27.0, -27.0)) < 1e-9);
        assert!(s.fort_gate().distance(DVec2::new(20.0, -20.0)) < 1e-9);
    }

    #[test]
    fn test_bridge_lookup() {
        let geo = Geography::standard();
        assert_eq!(
            geo.bridge_at(DVec2::new(-115.0, -115.0)).map(|b| b.kind),
            Some(BridgeKind::Gorge)
        );
        assert!(geo.bridge_at(DVec2::ZERO).is_none());
    }
}
