//! Primitive height layers.
//!
//! Additive layers (rolling noise, dark mountain, perimeter ring) make up
//! the base terrain. Trench layers (gorge, river) are subtracted on top.

use glam::DVec2;

use crate::geo::{
    DARK_MOUNTAIN_PEAK, DARK_MOUNTAIN_RADIUS, GORGE_DEPTH, GORGE_HALF_WIDTH, MAP_HALF_SIZE,
    RIVER_DEPTH, RIVER_HALF_WIDTH,
};

/// Width of the perimeter mountain band.
const PERIMETER_BAND: f64 = 100.0;
/// Radius around a settlement where perimeter mountains are suppressed.
const SETTLEMENT_CLEARING: f64 = 80.0;

/// Cubic smoothstep on `[0, 1]`.
#[must_use]
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear falloff `1 - d / half_width` inside the band, 0 outside.
#[must_use]
#[inline]
pub fn band_influence(distance: f64, half_width: f64) -> f64 {
    if distance < half_width {
        1.0 - distance / half_width
    } else {
        0.0
    }
}

/// Sinusoidal rolling hills; calmer inside the palace and elf quadrants.
#[must_use]
pub(crate) fn rolling(p: DVec2) -> f64 {
    let DVec2 { x, y } = p;
    if x > 130.0 && y > 130.0 {
        (x * 0.018).sin() * (y * 0.018).cos() * 0.35
    } else if x < -130.0 && y < -130.0 {
        (x * 0.018).sin() * (y * 0.018).cos() * 0.40
    } else {
        (x * 0.012).sin() * (y * 0.012).cos() + (x * 0.025 + 1.0).sin() * (y * 0.020).sin() * 0.5
    }
}

/// Dark mountain peak with a little surface noise.
#[must_use]
pub(crate) fn mountain(p: DVec2, center: DVec2) -> f64 {
    let d = p.distance(center);
    if d >= DARK_MOUNTAIN_RADIUS {
        return 0.0;
    }
    let peak = smoothstep(1.0 - d / DARK_MOUNTAIN_RADIUS);
    let noise = (p.x * 0.15).sin() * 0.15 + (p.y * 0.12 + p.x * 0.08).sin() * 0.1;
    peak * (DARK_MOUNTAIN_PEAK + noise * 8.0)
}

/// Mountain ring along the map edge, cleared around the given settlements.
#[must_use]
pub(crate) fn perimeter(p: DVec2, clearings: &[DVec2]) -> f64 {
    let edge = (MAP_HALF_SIZE - p.x.abs()).min(MAP_HALF_SIZE - p.y.abs());
    if edge > PERIMETER_BAND {
        return 0.0;
    }
    let suppress = clearings
        .iter()
        .map(|c| band_influence(p.distance(*c), SETTLEMENT_CLEARING))
        .fold(0.0, f64::max);
    if suppress > 0.95 {
        return 0.0;
    }
    let f = 1.0 - edge / PERIMETER_BAND;
    let steep = smoothstep(f);
    let DVec2 { x, y } = p;
    let noise = (x * 0.06 + y * 0.04).sin() * 0.4
        + (x * 0.12 - y * 0.08).sin() * 0.25
        + (x * 0.25 + y * 0.18).sin() * 0.1;
    let raw = steep * (55.0 + noise * 25.0) + f * f * f * 30.0;
    raw * (1.0 - suppress)
}

/// Signed height change from the gorge at distance `d` from its centerline.
///
/// Mostly a cut, with rock texture added on the walls.
#[must_use]
pub(crate) fn gorge_cut(p: DVec2, d: f64) -> f64 {
    let inf = band_influence(d, GORGE_HALF_WIDTH);
    if inf <= 0.0 {
        return 0.0;
    }
    let mut h = -smoothstep(inf) * GORGE_DEPTH;
    if inf > 0.15 && inf < 0.85 {
        h += (p.x * 0.8).sin() * (p.y * 0.6).cos() * 1.5 + (p.x * 1.5 + p.y * 1.2).sin() * 0.8;
    }
    h
}

/// Height change from the river at distance `d` from its centerline.
#[must_use]
pub(crate) fn river_cut(d: f64) -> f64 {
    let inf = band_influence(d, RIVER_HALF_WIDTH);
    if inf <= 0.0 {
        return 0.0;
    }
    -smoothstep(inf) * RIVER_DEPTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothstep_endpoints() {
        assert!(smoothstep(0.0).abs() < 1e-12);
        assert!((smoothstep(1.0) - 1.0).abs() < 1e-12);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-12);
        assert!((smoothstep(2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mountain_peak_and_rim() {
        let c = DVec2::new(20.0, 20.0);
        let top = mountain(c, c);
        assert!(top > 50.0 && top < 60.0, "peak {top}");
        assert!(mountain(DVec2::new(66.0, 20.0), c).abs() < 1e-12);
    }

    #[test]
    fn test_perimeter_zero_in_interior() {
        assert!(perimeter(DVec2::ZERO, &[]).abs() < 1e-12);
        assert!(perimeter(DVec2::new(200.0, -240.0), &[]).abs() < 1e-12);
    }

    #[test]
    fn test_perimeter_suppressed_at_settlement() {
        let palace = DVec2::new(230.0, 230.0);
        assert!(perimeter(palace, &[palace]).abs() < 1e-12);
        assert!(perimeter(DVec2::new(345.0, 0.0), &[palace]) > 40.0);
    }

    #[test]
    fn test_trench_cuts_are_bounded() {
        assert!((river_cut(0.0) + RIVER_DEPTH).abs() < 1e-12);
        assert!(river_cut(RIVER_HALF_WIDTH).abs() < 1e-12);
        let floor = gorge_cut(DVec2::ZERO, 0.0);
        assert!((floor + GORGE_DEPTH).abs() < 1e-12);
        assert!(gorge_cut(DVec2::ZERO, 30.0).abs() < 1e-12);
    }
}
