//! Stateless attack resolution: dodge, crit, damage, body-part targeting.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use serde::{Deserialize, Serialize};

use crate::body::BodyPartId;
use crate::config::AimWeights;
use crate::rng::SimRng;

/// Dodge probability cap.
pub const MAX_DODGE_CHANCE: f64 = 0.4;
/// Aimed-hit probability cap.
pub const MAX_AIM_CHANCE: f64 = 0.35;
/// Dodge and aim chance gained per agility point.
const CHANCE_PER_AGILITY: f64 = 0.03;
/// Flat critical-hit probability.
pub const CRIT_CHANCE: f64 = 0.10;
/// Damage multiplier on a critical hit.
pub const CRIT_MULTIPLIER: f64 = 2.0;
/// Spread added to every landed hit.
const DAMAGE_JITTER: i32 = 3;

/// Untargeted hits favour the torso 3:1 over any other part.
const UNAIMED_PARTS: [BodyPartId; 8] = [
    BodyPartId::Torso,
    BodyPartId::Torso,
    BodyPartId::Torso,
    BodyPartId::Head,
    BodyPartId::RightArm,
    BodyPartId::LeftArm,
    BodyPartId::RightLeg,
    BodyPartId::LeftLeg,
];

/// Operands of one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttackRoll {
    /// Raw damage of the attacker.
    pub attacker_damage: u32,
    /// Attacker agility; raises the aimed-hit chance.
    pub attacker_agility: u32,
    /// Flat damage reduction of the defender.
    pub defender_armor: u32,
    /// Defender agility; raises the dodge chance.
    pub defender_agility: u32,
}

/// Outcome of one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResult {
    /// Landed (not dodged).
    pub hit: bool,
    /// Critical hit.
    pub crit: bool,
    /// Damage dealt; at least 1 on a hit, 0 on a dodge.
    pub damage: u32,
    /// Struck part; `None` on a dodge.
    pub target_part: Option<BodyPartId>,
}

impl AttackResult {
    /// A dodged attack.
    pub const DODGED: Self = Self {
        hit: false,
        crit: false,
        damage: 0,
        target_part: None,
    };
}

fn agility_chance(agility: u32, cap: f64) -> f64 {
    (f64::from(agility) * CHANCE_PER_AGILITY).min(cap)
}

fn pick_part(rng: &mut SimRng, attacker_agility: u32, aim: &AimWeights) -> BodyPartId {
    if rng.chance(agility_chance(attacker_agility, MAX_AIM_CHANCE)) {
        if let Some(i) = rng.weighted_index(&aim.table()) {
            return BodyPartId::ALL[i];
        }
    }
    UNAIMED_PARTS[rng.index(UNAIMED_PARTS.len())]
}

/// Resolve one attack.
///
/// 1. Dodge with probability `min(0.4, defender_agility * 0.03)`; a dodge
///    stops here and picks no part.
/// 2. Crit with probability 0.1, doubling the raw damage.
/// 3. `damage = max(1, floor(raw * mult - armor + jitter))`, jitter in `[-3, 3]`.
/// 4. Aimed hit with probability `min(0.35, attacker_agility * 0.03)` uses
///    `aim`; otherwise the torso-heavy table.
pub fn resolve_attack(rng: &mut SimRng, roll: AttackRoll, aim: &AimWeights) -> AttackResult {
    if rng.chance(agility_chance(roll.defender_agility, MAX_DODGE_CHANCE)) {
        return AttackResult::DODGED;
    }

    let crit = rng.chance(CRIT_CHANCE);
    let mult = if crit { CRIT_MULTIPLIER } else { 1.0 };
    let jitter = rng.range_i32(-DAMAGE_JITTER, DAMAGE_JITTER);
    let raw = f64::from(roll.attacker_damage) * mult - f64::from(roll.defender_armor)
        + f64::from(jitter);
    let damage = raw.floor().max(1.0) as u32;

    AttackResult {
        hit: true,
        crit,
        damage,
        target_part: Some(pick_part(rng, roll.attacker_agility, aim)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roll(damage: u32, armor: u32, agility: u32) -> AttackRoll {
        AttackRoll {
            attacker_damage: damage,
            attacker_agility: 0,
            defender_armor: armor,
            defender_agility: agility,
        }
    }

    #[test]
    fn test_no_dodge_without_agility() {
        let mut rng = SimRng::from_seed_u64(1);
        let aim = AimWeights::default();
        for _ in 0..2000 {
            let r = resolve_attack(&mut rng, roll(10, 0, 0), &aim);
            assert!(r.hit);
            assert!(r.damage >= 1);
            assert!(r.target_part.is_some());
        }
    }

    #[test]
    fn test_damage_bounds() {
        let mut rng = SimRng::from_seed_u64(2);
        let aim = AimWeights::default();
        for _ in 0..2000 {
            let r = resolve_attack(&mut rng, roll(20, 5, 0), &aim);
            let (lo, hi) = if r.crit { (32, 38) } else { (12, 18) };
            assert!((lo..=hi).contains(&r.damage), "{r:?}");
        }
    }

    #[test]
    fn test_armor_floors_at_one() {
        let mut rng = SimRng::from_seed_u64(3);
        let aim = AimWeights::default();
        for _ in 0..500 {
            let r = resolve_attack(&mut rng, roll(2, 50, 0), &aim);
            assert_eq!(r.damage, 1);
        }
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_dodge_rate_caps_at_forty_percent() {
        let mut rng = SimRng::from_seed_u64(4);
        let aim = AimWeights::default();
        let trials = 20_000;
        let dodged = (0..trials)
            .filter(|_| !resolve_attack(&mut rng, roll(10, 0, 30), &aim).hit)
            .count();
        let rate = dodged as f64 / f64::from(trials);
        assert!((rate - 0.4).abs() < 0.02, "dodge rate {rate}");
    }

    #[test]
    fn test_dodge_selects_no_part() {
        assert_eq!(AttackResult::DODGED.target_part, None);
        assert_eq!(AttackResult::DODGED.damage, 0);
    }

    #[test]
    fn test_unaimed_hits_never_reach_eyes() {
        let mut rng = SimRng::from_seed_u64(5);
        let aim = AimWeights::default();
        for _ in 0..2000 {
            let r = resolve_attack(&mut rng, roll(10, 0, 0), &aim);
            assert!(!matches!(
                r.target_part,
                Some(BodyPartId::LeftEye | BodyPartId::RightEye)
            ));
        }
    }

    #[test]
    fn test_aimed_hits_skip_torso() {
        let mut rng = SimRng::from_seed_u64(6);
        let aim = AimWeights::default();
        let attack = AttackRoll {
            attacker_damage: 10,
            attacker_agility: 12,
            ..AttackRoll::default()
        };
        let eyes = (0..5000)
            .filter_map(|_| resolve_attack(&mut rng, attack, &aim).target_part)
            .filter(|p| matches!(p, BodyPartId::LeftEye | BodyPartId::RightEye))
            .count();
        // Aim 0.35 * eye share 20/120.
        assert!(eyes > 150, "eyes {eyes}");
    }
}
