//! Pairwise separation steering.
//!
//! Two members closer than `radius` are pushed apart symmetrically by
//! `min((radius - d) * factor, dt * rate)`. Inactive members neither push nor
//! get pushed.

use glam::DVec2;

use crate::config::{SeparationMode, SeparationParams};

/// Direction used when two members sit on the exact same point.
const COINCIDENT_AXIS: DVec2 = DVec2::X;

/// Push direction from `b` toward `a` and the distance between them.
fn apart(a: DVec2, b: DVec2) -> (DVec2, f64) {
    let delta = a - b;
    let dist = delta.length();
    if dist > 0.0 {
        (delta / dist, dist)
    } else {
        (COINCIDENT_AXIS, 0.0)
    }
}

/// Run one separation pass over `points`, in place.
///
/// [`SeparationMode::Sequential`] moves each pair as soon as it is visited,
/// so later pairs see earlier pushes. [`SeparationMode::DoubleBuffered`]
/// computes every push from the positions at entry and applies them all at
/// the end, making the result independent of member order.
pub fn separate(
    points: &mut [DVec2],
    active: &[bool],
    params: SeparationParams,
    dt: f64,
    mode: SeparationMode,
) {
    let is_active = |i: usize| active.get(i).copied().unwrap_or(false);
    match mode {
        SeparationMode::Sequential => {
            for i in 0..points.len() {
                if !is_active(i) {
                    continue;
                }
                for j in (i + 1)..points.len() {
                    if !is_active(j) {
                        continue;
                    }
                    let (dir, dist) = apart(points[i], points[j]);
                    let push = params.push(dist, dt);
                    if push > 0.0 {
                        points[i] += dir * push;
                        points[j] -= dir * push;
                    }
                }
            }
        }
        SeparationMode::DoubleBuffered => {
            let mut offsets = vec![DVec2::ZERO; points.len()];
            for i in 0..points.len() {
                if !is_active(i) {
                    continue;
                }
                for j in (i + 1)..points.len() {
                    if !is_active(j) {
                        continue;
                    }
                    let (dir, dist) = apart(points[i], points[j]);
                    let push = params.push(dist, dt);
                    if push > 0.0 {
                        offsets[i] += dir * push;
                        offsets[j] -= dir * push;
                    }
                }
            }
            for (p, offset) in points.iter_mut().zip(offsets) {
                *p += offset;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENEMY: SeparationParams = SeparationParams {
        radius: 1.2,
        factor: 0.3,
        rate: 2.0,
    };

    #[test]
    fn test_pair_pushed_symmetrically() {
        let mut pts = [DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0)];
        separate(&mut pts, &[true, true], ENEMY, 0.1, SeparationMode::DoubleBuffered);
        // min((1.2 - 1.0) * 0.3, 0.2) = 0.06
        assert!((pts[0].x + 0.06).abs() < 1e-12);
        assert!((pts[1].x - 1.06).abs() < 1e-12);
    }

    #[test]
    fn test_rate_caps_push() {
        let mut pts = [DVec2::ZERO, DVec2::new(0.1, 0.0)];
        separate(&mut pts, &[true, true], ENEMY, 0.01, SeparationMode::Sequential);
        assert!((pts[0].x + 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_inactive_members_ignored() {
        let mut pts = [DVec2::ZERO, DVec2::new(0.5, 0.0)];
        separate(&mut pts, &[true, false], ENEMY, 0.1, SeparationMode::Sequential);
        assert!(pts[0].length() < 1e-12);
        assert!((pts[1].x - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_coincident_members_split_without_nan() {
        let mut pts = [DVec2::new(3.0, 3.0); 2];
        separate(&mut pts, &[true, true], ENEMY, 0.1, SeparationMode::DoubleBuffered);
        assert!(pts.iter().all(|p| p.is_finite()));
        assert!(pts[0].distance(pts[1]) > 0.0);
    }

    #[test]
    fn test_double_buffered_is_order_independent() {
        let pts = [
            DVec2::new(0.0, 0.0),
            DVec2::new(0.7, 0.1),
            DVec2::new(1.1, -0.3),
        ];
        let mut forward = pts;
        separate(&mut forward, &[true; 3], ENEMY, 0.05, SeparationMode::DoubleBuffered);
        let mut reversed = [pts[2], pts[1], pts[0]];
        separate(&mut reversed, &[true; 3], ENEMY, 0.05, SeparationMode::DoubleBuffered);
        for (a, b) in forward.iter().zip(reversed.iter().rev()) {
            assert!(a.distance(*b) < 1e-12);
        }
    }
}
