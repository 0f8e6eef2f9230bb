//! Body damage model.
//!
//! Eight independent parts, each with its own HP state machine (see
//! [`BodyPart::hit`]). Whole-body capabilities are derived from the parts:
//!
//! ```text
//! alive        no vital part at 0 HP
//! total_hp     head + torso only
//! movement     legs functional: 2 -> 1.0, 1 -> 0.5, 0 -> 0.1
//! vision       eyes functional: 2 -> 1.0, 1 -> 0.6, 0 -> 0.2
//! can_fight    at least one functional arm
//! ```

mod part;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::items::ItemId;
use crate::rng::SimRng;

pub use part::{BodyEvent, BodyEventKind, BodyPart, BodyPartId, PartStatus};

/// HP lost per bleeding part on each bleed tick.
pub const BLEED_PER_PART: u32 = 2;

/// Relative chance of each part being struck by an untargeted hit.
const HIT_WEIGHTS: [(BodyPartId, f64); 8] = [
    (BodyPartId::Head, 12.0),
    (BodyPartId::Torso, 40.0),
    (BodyPartId::RightArm, 10.0),
    (BodyPartId::LeftArm, 10.0),
    (BodyPartId::RightLeg, 10.0),
    (BodyPartId::LeftLeg, 10.0),
    (BodyPartId::RightEye, 4.0),
    (BodyPartId::LeftEye, 4.0),
];

/// Stored state of one part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSnapshot {
    /// Current HP.
    pub hp: u32,
    /// Status.
    pub status: PartStatus,
    /// Fitted prosthetic.
    #[serde(default)]
    pub prosthetic: Option<ItemId>,
    /// Bleeding flag.
    #[serde(default)]
    pub bleeding: bool,
}

/// Stored state of a whole body, keyed by part.
pub type BodySnapshot = BTreeMap<BodyPartId, PartSnapshot>;

/// All eight parts of a humanoid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    parts: [BodyPart; 8],
}

impl Default for Body {
    fn default() -> Self {
        Self::new()
    }
}

impl Body {
    /// A body with every part healthy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parts: BodyPartId::ALL.map(BodyPart::new),
        }
    }

    /// All parts in canonical order.
    #[must_use]
    pub const fn parts(&self) -> &[BodyPart; 8] {
        &self.parts
    }

    /// One part.
    #[must_use]
    pub const fn part(&self, id: BodyPartId) -> &BodyPart {
        &self.parts[id.index()]
    }

    /// One part, mutably.
    pub const fn part_mut(&mut self, id: BodyPartId) -> &mut BodyPart {
        &mut self.parts[id.index()]
    }

    /// Pick a part for an untargeted hit, skipping severed parts.
    pub fn random_hit_part(&self, rng: &mut SimRng) -> BodyPartId {
        let weights: Vec<f64> = HIT_WEIGHTS
            .iter()
            .map(|&(id, w)| {
                if self.part(id).status() == PartStatus::Severed {
                    0.0
                } else {
                    w
                }
            })
            .collect();
        rng.weighted_index(&weights)
            .and_then(|i| HIT_WEIGHTS.get(i))
            .map_or(BodyPartId::Torso, |&(id, _)| id)
    }

    /// Hit `target`, or a random weighted part when `target` is `None`.
    pub fn take_hit(
        &mut self,
        damage: u32,
        target: Option<BodyPartId>,
        rng: &mut SimRng,
    ) -> (BodyPartId, Vec<BodyEvent>) {
        let id = target.unwrap_or_else(|| self.random_hit_part(rng));
        (id, self.part_mut(id).hit(damage))
    }

    /// Total bleed damage due this tick.
    #[must_use]
    pub fn bleed_tick(&self) -> u32 {
        let bleeding = self.parts.iter().filter(|p| p.is_bleeding()).count();
        u32::try_from(bleeding).unwrap_or(u32::MAX) * BLEED_PER_PART
    }

    /// Blood loss drains the torso.
    pub fn apply_bleed(&mut self, amount: u32) -> Vec<BodyEvent> {
        if amount == 0 {
            return Vec::new();
        }
        self.part_mut(BodyPartId::Torso).hit(amount)
    }

    /// Heal every injured or bleeding part by `amount`.
    pub fn apply_treatment(&mut self, amount: u32) {
        for part in &mut self.parts {
            if part.status() == PartStatus::Injured || part.is_bleeding() {
                part.heal(amount);
            }
        }
    }

    /// Fit `item` on the first severed part that accepts it.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NoSeveredPartFor`] if no part qualifies.
    pub fn fit_prosthetic(&mut self, item: ItemId) -> Result<BodyPartId, ActionError> {
        let part = self
            .parts
            .iter_mut()
            .find(|p| p.status() == PartStatus::Severed && p.id().accepts(item))
            .ok_or(ActionError::NoSeveredPartFor(item))?;
        part.fit_prosthetic(item)?;
        Ok(part.id())
    }

    /// No vital part is at 0 HP.
    #[must_use]
    pub fn alive(&self) -> bool {
        !self.parts.iter().any(|p| p.id().is_vital() && p.hp() == 0)
    }

    /// Sum of vital-part HP.
    #[must_use]
    pub fn total_hp(&self) -> u32 {
        self.parts
            .iter()
            .filter(|p| p.id().is_vital())
            .map(BodyPart::hp)
            .sum()
    }

    /// Sum of vital-part maximum HP.
    #[must_use]
    pub fn max_total_hp(&self) -> u32 {
        self.parts
            .iter()
            .filter(|p| p.id().is_vital())
            .map(BodyPart::max_hp)
            .sum()
    }

    fn functional_count(&self, pair: [BodyPartId; 2]) -> usize {
        pair.iter().filter(|&&id| self.part(id).functional()).count()
    }

    /// Speed factor from working legs.
    #[must_use]
    pub fn movement_multiplier(&self) -> f64 {
        match self.functional_count([BodyPartId::RightLeg, BodyPartId::LeftLeg]) {
            2 => 1.0,
            1 => 0.5,
            _ => 0.1,
        }
    }

    /// Sight factor from working eyes.
    #[must_use]
    pub fn vision_multiplier(&self) -> f64 {
        match self.functional_count([BodyPartId::RightEye, BodyPartId::LeftEye]) {
            2 => 1.0,
            1 => 0.6,
            _ => 0.2,
        }
    }

    /// At least one working arm.
    #[must_use]
    pub fn can_fight(&self) -> bool {
        self.functional_count([BodyPartId::RightArm, BodyPartId::LeftArm]) > 0
    }

    /// Any part bleeding.
    #[must_use]
    pub fn any_bleeding(&self) -> bool {
        self.parts.iter().any(BodyPart::is_bleeding)
    }

    /// Capture per-part state.
    #[must_use]
    pub fn to_snapshot(&self) -> BodySnapshot {
        self.parts
            .iter()
            .map(|p| {
                (
                    p.id(),
                    PartSnapshot {
                        hp: p.hp(),
                        status: p.status(),
                        prosthetic: p.prosthetic(),
                        bleeding: p.is_bleeding(),
                    },
                )
            })
            .collect()
    }

    /// Rebuild a body; parts missing from the snapshot start healthy.
    #[must_use]
    pub fn from_snapshot(snapshot: &BodySnapshot) -> Self {
        Self {
            parts: BodyPartId::ALL.map(|id| match snapshot.get(&id) {
                Some(s) => BodyPart::restore(id, s.hp, s.status, s.prosthetic, s.bleeding),
                None => BodyPart::new(id),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_hp_counts_vital_parts_only() {
        let mut body = Body::new();
        body.part_mut(BodyPartId::Torso).hit(50);
        for id in [
            BodyPartId::RightArm,
            BodyPartId::LeftArm,
            BodyPartId::RightLeg,
            BodyPartId::LeftLeg,
            BodyPartId::RightEye,
            BodyPartId::LeftEye,
        ] {
            body.part_mut(id).hit(1000);
        }
        assert_eq!(body.total_hp(), 230);
        assert_eq!(body.max_total_hp(), 280);
        assert!(body.alive());
    }

    #[test]
    fn test_capabilities_degrade() {
        let mut body = Body::new();
        assert!((body.movement_multiplier() - 1.0).abs() < 1e-12);
        body.part_mut(BodyPartId::LeftLeg).hit(100);
        assert!((body.movement_multiplier() - 0.5).abs() < 1e-12);
        body.part_mut(BodyPartId::RightLeg).hit(100);
        assert!((body.movement_multiplier() - 0.1).abs() < 1e-12);

        body.part_mut(BodyPartId::LeftEye).hit(30);
        assert!((body.vision_multiplier() - 0.6).abs() < 1e-12);
        body.part_mut(BodyPartId::RightEye).hit(30);
        assert!((body.vision_multiplier() - 0.2).abs() < 1e-12);

        body.part_mut(BodyPartId::LeftArm).hit(70);
        assert!(body.can_fight());
        body.part_mut(BodyPartId::RightArm).hit(70);
        assert!(!body.can_fight());
    }

    #[test]
    fn test_prosthetic_restores_capability() {
        let mut body = Body::new();
        body.part_mut(BodyPartId::LeftLeg).hit(100);
        body.part_mut(BodyPartId::RightLeg).hit(100);
        assert_eq!(body.fit_prosthetic(ItemId::WoodenLeg), Ok(BodyPartId::RightLeg));
        assert!((body.movement_multiplier() - 0.5).abs() < 1e-12);
        assert_eq!(
            body.fit_prosthetic(ItemId::GlassEye),
            Err(ActionError::NoSeveredPartFor(ItemId::GlassEye))
        );
    }

    #[test]
    fn test_bleed_tick_and_drain() {
        let mut body = Body::new();
        assert_eq!(body.bleed_tick(), 0);
        body.part_mut(BodyPartId::LeftArm).hit(70);
        body.part_mut(BodyPartId::RightEye).hit(25);
        assert_eq!(body.bleed_tick(), 4);
        body.apply_bleed(4);
        assert_eq!(body.part(BodyPartId::Torso).hp(), 196);
    }

    #[test]
    fn test_treatment_heals_injured_and_bleeding_only() {
        let mut body = Body::new();
        body.part_mut(BodyPartId::Head).hit(60); // 20/80, injured
        body.part_mut(BodyPartId::RightArm).hit(70); // severed
        body.apply_treatment(50);
        assert_eq!(body.part(BodyPartId::Head).hp(), 70);
        assert!(!body.part(BodyPartId::Head).is_bleeding());
        assert_eq!(body.part(BodyPartId::RightArm).hp(), 0);
        assert_eq!(body.part(BodyPartId::Torso).hp(), 200);
    }

    #[test]
    fn test_random_hits_skip_severed_parts() {
        let mut body = Body::new();
        for id in [
            BodyPartId::RightArm,
            BodyPartId::LeftArm,
            BodyPartId::RightLeg,
            BodyPartId::LeftLeg,
            BodyPartId::RightEye,
            BodyPartId::LeftEye,
        ] {
            body.part_mut(id).hit(1000);
        }
        let mut rng = SimRng::from_seed_u64(11);
        for _ in 0..500 {
            let id = body.random_hit_part(&mut rng);
            assert!(id.is_vital());
        }
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut body = Body::new();
        body.part_mut(BodyPartId::LeftArm).hit(70);
        body.fit_prosthetic(ItemId::IronArm).unwrap();
        body.part_mut(BodyPartId::Torso).hit(160);
        body.part_mut(BodyPartId::RightEye).hit(12);
        let snap = body.to_snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let back: BodySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(Body::from_snapshot(&back), body);
    }

    #[test]
    fn test_snapshot_missing_parts_start_healthy() {
        let mut snap = Body::new().to_snapshot();
        snap.remove(&BodyPartId::Head);
        let body = Body::from_snapshot(&snap);
        assert_eq!(body.part(BodyPartId::Head).hp(), 80);
    }
}
