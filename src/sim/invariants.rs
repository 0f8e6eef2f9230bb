//! World invariants: sanity checks that detect simulation bugs.
//!
//! None of these can fail through normal play. A violation means some
//! system wrote state the others do not expect.

use super::state::GameState;
use crate::body::PartStatus;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check all world invariants.
///
/// Returns every violation found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for part in state.player.body.parts() {
        match part.status() {
            PartStatus::Severed if part.hp() != 0 => violations.push(violation(format!(
                "Severed {} has {} hp",
                part.id(),
                part.hp()
            ))),
            PartStatus::Severed if part.id().is_vital() => {
                violations.push(violation(format!("Vital part {} is severed", part.id())));
            }
            PartStatus::Prosthetic if part.prosthetic().is_none() => violations.push(violation(
                format!("Prosthetic {} has no prosthetic fitted", part.id()),
            )),
            _ => {}
        }
    }

    let p = state.player.pos;
    if !p.is_finite() || !state.player.z.is_finite() {
        violations.push(violation(format!("Player position {p} is not finite")));
    }
    let bound = state.config.player_bound;
    if p.x.abs() > bound + 1e-9 || p.y.abs() > bound + 1e-9 {
        violations.push(violation(format!("Player at {p} is outside ±{bound}")));
    }

    for (index, enemy) in state.enemies.iter().enumerate() {
        if enemy.id.0 != index {
            violations.push(violation(format!("{} stored at index {index}", enemy.id)));
        }
        if !enemy.pos.is_finite() || !enemy.z.is_finite() {
            violations.push(violation(format!(
                "{} position {} is not finite",
                enemy.id, enemy.pos
            )));
        }
        if enemy.is_dead() && enemy.hp() != 0 {
            violations.push(violation(format!(
                "Dead {} still has {} hp",
                enemy.id,
                enemy.hp()
            )));
        }
        if let Some(escort) = enemy.escort_of() {
            if state.korovans.get(escort.korovan.0).is_none() {
                violations.push(violation(format!(
                    "{} guards missing {}",
                    enemy.id, escort.korovan
                )));
            }
        }
    }

    for korovan in &state.korovans {
        if !korovan.pos.is_finite() {
            violations.push(violation(format!(
                "{} position {} is not finite",
                korovan.id, korovan.pos
            )));
        }
        if korovan.is_looted() && (korovan.is_alive() || korovan.hp() != 0) {
            violations.push(violation(format!(
                "Looted {} is alive={} with {} hp",
                korovan.id,
                korovan.is_alive(),
                korovan.hp()
            )));
        }
        for guard in &korovan.guards {
            if state.enemies.get(guard.0).is_none() {
                violations.push(violation(format!(
                    "{} lists missing guard {guard}",
                    korovan.id
                )));
            }
        }
    }

    violations
}

/// Assert all world invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with every violation message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("World invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}
