//! Stuck detection and perpendicular side-stepping around obstacles.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::{resolve_against_buildings, BuildingBox};

/// Position change below which a collision correction is ignored.
pub const BLOCK_EPSILON: f64 = 0.01;
/// Seconds of blocked movement before an actor counts as stuck.
pub const STUCK_TIMEOUT: f64 = 0.5;

/// Did collision resolution move the proposal noticeably?
#[must_use]
#[inline]
pub fn was_blocked(proposal: DVec2, resolved: DVec2) -> bool {
    (proposal.x - resolved.x).abs() > BLOCK_EPSILON || (proposal.y - resolved.y).abs() > BLOCK_EPSILON
}

/// Accumulates time spent blocked or barely moving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StuckTracker {
    timer: f64,
}

impl StuckTracker {
    /// Feed one tick and report whether the actor is now stuck.
    ///
    /// The timer grows while the move was blocked or covered less than a
    /// tenth of `expected_move`; any free tick resets it.
    pub fn update(
        &mut self,
        dt: f64,
        blocked: bool,
        real_move: f64,
        expected_move: f64,
        timeout: f64,
    ) -> bool {
        if blocked || real_move < expected_move * 0.1 {
            self.timer += dt;
        } else {
            self.timer = 0.0;
        }
        self.timer > timeout
    }

    /// Forget accumulated stuck time.
    pub fn reset(&mut self) {
        self.timer = 0.0;
    }

    /// Seconds accumulated so far.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.timer
    }
}

/// Side-step a blocked circle perpendicular to its movement.
///
/// Uses the resolved movement `resolved - from`, or the intended one when
/// the actor did not move at all. Tries the left-hand side first and keeps
/// it if it is free; otherwise steps the other way and re-resolves. With no
/// movement direction at all, `resolved` is returned.
#[must_use]
pub fn slide_around(
    boxes: &[BuildingBox],
    from: DVec2,
    resolved: DVec2,
    intended: DVec2,
    distance: f64,
    radius: f64,
) -> DVec2 {
    let mut dir = resolved - from;
    if dir.length_squared() <= f64::EPSILON {
        dir = intended - from;
    }
    let perp = dir.perp().normalize_or_zero();
    if perp.length_squared() < f64::EPSILON {
        return resolved;
    }

    let attempt = resolved + perp * distance;
    let attempt_resolved = resolve_against_buildings(boxes, attempt, radius);
    if !was_blocked(attempt, attempt_resolved) {
        return attempt;
    }
    resolve_against_buildings(boxes, resolved - perp * distance, radius)
}
