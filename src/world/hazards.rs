//! River and gorge death zones.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::geo::{Geography, GORGE_HALF_WIDTH, RIVER_HALF_WIDTH};
use crate::terrain::band_influence;

/// Influence above which standing in a trench is fatal.
pub const HAZARD_THRESHOLD: f64 = 0.5;

/// How a trench killed the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hazard {
    /// Deep in the river.
    Drowned,
    /// Deep in the gorge.
    Fell,
}

impl Hazard {
    /// Short description used in logs.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Drowned => "drowned in the river",
            Self::Fell => "fell into the gorge",
        }
    }
}

/// Linear depth into the river, 1 at the centerline. Zero on any bridge deck.
#[must_use]
pub fn river_influence(geo: &Geography, p: DVec2) -> f64 {
    if geo.on_bridge(p) {
        return 0.0;
    }
    band_influence(geo.river_distance(p), RIVER_HALF_WIDTH)
}

/// Linear depth into the gorge, 1 at the centerline. Zero on any bridge deck.
#[must_use]
pub fn gorge_influence(geo: &Geography, p: DVec2) -> f64 {
    if geo.on_bridge(p) {
        return 0.0;
    }
    band_influence(geo.gorge_distance(p), GORGE_HALF_WIDTH)
}

/// The hazard that kills an actor standing at `p`. The river is checked first.
#[must_use]
pub fn hazard_at(geo: &Geography, p: DVec2) -> Option<Hazard> {
    if river_influence(geo, p) > HAZARD_THRESHOLD {
        Some(Hazard::Drowned)
    } else if gorge_influence(geo, p) > HAZARD_THRESHOLD {
        Some(Hazard::Fell)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_river_center_is_fatal_off_bridge() {
        let geo = Geography::standard();
        let p = DVec2::new(115.0, 180.0);
        assert!((river_influence(&geo, p) - 1.0).abs() < 1e-9);
        assert_eq!(hazard_at(&geo, p), Some(Hazard::Drowned));
    }

    #[test]
    fn test_bridges_are_safe() {
        let geo = Geography::standard();
        for bridge in &geo.bridges {
            assert!(river_influence(&geo, bridge.center).abs() < f64::EPSILON);
            assert!(gorge_influence(&geo, bridge.center).abs() < f64::EPSILON);
            assert_eq!(hazard_at(&geo, bridge.center), None);
        }
    }

    #[test]
    fn test_river_hazard_tracks_terrain_band() {
        let geo = Geography::standard();
        let p = DVec2::new(118.0, 180.0);
        let expected = band_influence(geo.river_distance(p), RIVER_HALF_WIDTH);
        assert!((river_influence(&geo, p) - expected).abs() < 1e-12);
        assert!(expected > 0.0 && expected < 1.0);
    }

    #[test]
    fn test_gorge_edge_is_survivable() {
        let geo = Geography::standard();
        // 12 units off the gorge line along its normal (1, 1) / sqrt 2.
        let on_line = DVec2::new(-200.0, -30.0);
        let edge = on_line + DVec2::new(1.0, 1.0).normalize() * 12.0;
        assert!(gorge_influence(&geo, edge) < HAZARD_THRESHOLD);
        assert_eq!(hazard_at(&geo, edge), None);
        assert_eq!(hazard_at(&geo, on_line), Some(Hazard::Fell));
    }
}
