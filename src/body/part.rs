//! A single body part and its HP state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::items::{ItemId, ProstheticSlot};

/// The eight tracked body parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum BodyPartId {
    Head,
    Torso,
    RightArm,
    LeftArm,
    RightLeg,
    LeftLeg,
    RightEye,
    LeftEye,
}

impl BodyPartId {
    /// All parts in canonical order.
    pub const ALL: [Self; 8] = [
        Self::Head,
        Self::Torso,
        Self::RightArm,
        Self::LeftArm,
        Self::RightLeg,
        Self::LeftLeg,
        Self::RightEye,
        Self::LeftEye,
    ];

    /// Position in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Full HP of the part.
    #[must_use]
    pub const fn max_hp(self) -> u32 {
        match self {
            Self::Head => 80,
            Self::Torso => 200,
            Self::RightArm | Self::LeftArm => 70,
            Self::RightLeg | Self::LeftLeg => 80,
            Self::RightEye | Self::LeftEye => 30,
        }
    }

    /// Losing a vital part kills the owner.
    #[must_use]
    pub const fn is_vital(self) -> bool {
        matches!(self, Self::Head | Self::Torso)
    }

    /// Prosthetic slot that can replace this part.
    #[must_use]
    pub const fn prosthetic_slot(self) -> Option<ProstheticSlot> {
        match self {
            Self::Head | Self::Torso => None,
            Self::RightArm | Self::LeftArm => Some(ProstheticSlot::Arm),
            Self::RightLeg | Self::LeftLeg => Some(ProstheticSlot::Leg),
            Self::RightEye | Self::LeftEye => Some(ProstheticSlot::Eye),
        }
    }

    /// Can `item` be fitted here?
    #[must_use]
    pub fn accepts(self, item: ItemId) -> bool {
        match (self.prosthetic_slot(), item.prosthetic_slot()) {
            (Some(want), Some(have)) => want == have,
            _ => false,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Torso => "torso",
            Self::RightArm => "right arm",
            Self::LeftArm => "left arm",
            Self::RightLeg => "right leg",
            Self::LeftLeg => "left leg",
            Self::RightEye => "right eye",
            Self::LeftEye => "left eye",
        }
    }
}

impl fmt::Display for BodyPartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Condition of a body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartStatus {
    /// Working normally.
    Healthy,
    /// Below 40% HP but still working.
    Injured,
    /// Lost; only a prosthetic restores function.
    Severed,
    /// Replaced by a prosthetic.
    Prosthetic,
}

/// What a hit did to a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyEventKind {
    /// HP dropped below a quarter; the part started bleeding.
    Bleeding,
    /// The part is injured.
    Injured,
    /// A non-vital part reached 0 HP and was lost.
    Severed,
    /// A vital part reached 0 HP.
    Death,
}

/// A body event tagged with the part it happened to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyEvent {
    /// Affected part.
    pub part: BodyPartId,
    /// What happened.
    pub kind: BodyEventKind,
}

/// HP, status, bleeding and prosthetic state of one part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyPart {
    id: BodyPartId,
    hp: u32,
    status: PartStatus,
    prosthetic: Option<ItemId>,
    bleeding: bool,
}

impl BodyPart {
    /// A healthy part at full HP.
    #[must_use]
    pub const fn new(id: BodyPartId) -> Self {
        Self {
            id,
            hp: id.max_hp(),
            status: PartStatus::Healthy,
            prosthetic: None,
            bleeding: false,
        }
    }

    /// Rebuild a part from stored state, clamping HP to its maximum.
    #[must_use]
    pub fn restore(
        id: BodyPartId,
        hp: u32,
        status: PartStatus,
        prosthetic: Option<ItemId>,
        bleeding: bool,
    ) -> Self {
        Self {
            id,
            hp: hp.min(id.max_hp()),
            status,
            prosthetic,
            bleeding,
        }
    }

    /// Which part this is.
    #[must_use]
    pub const fn id(&self) -> BodyPartId {
        self.id
    }

    /// Current HP.
    #[must_use]
    pub const fn hp(&self) -> u32 {
        self.hp
    }

    /// Maximum HP.
    #[must_use]
    pub const fn max_hp(&self) -> u32 {
        self.id.max_hp()
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> PartStatus {
        self.status
    }

    /// Fitted prosthetic, if any.
    #[must_use]
    pub const fn prosthetic(&self) -> Option<ItemId> {
        self.prosthetic
    }

    /// Is the part bleeding?
    #[must_use]
    pub const fn is_bleeding(&self) -> bool {
        self.bleeding
    }

    /// Does the part still work (healthy, injured or prosthetic)?
    #[must_use]
    pub const fn functional(&self) -> bool {
        matches!(
            self.status,
            PartStatus::Healthy | PartStatus::Injured | PartStatus::Prosthetic
        )
    }

    fn event(&self, kind: BodyEventKind) -> BodyEvent {
        BodyEvent {
            part: self.id,
            kind,
        }
    }

    /// Apply `damage` and report the resulting events.
    ///
    /// Severed parts ignore hits. Bleeding starts once, when HP first drops
    /// below a quarter. At 0 HP a vital part reports death and a non-vital
    /// part is severed; otherwise HP under 40% marks the part injured.
    /// A prosthetic sits at 0 HP, so a hit knocks it off again.
    pub fn hit(&mut self, damage: u32) -> Vec<BodyEvent> {
        let mut events = Vec::new();
        if self.status == PartStatus::Severed {
            return events;
        }
        let max = self.max_hp();
        let prev = self.hp;
        self.hp = self.hp.saturating_sub(damage);

        if self.hp * 4 < max && prev * 4 >= max {
            self.bleeding = true;
            events.push(self.event(BodyEventKind::Bleeding));
        }

        if self.hp == 0 {
            if self.id.is_vital() {
                events.push(self.event(BodyEventKind::Death));
            } else {
                self.status = PartStatus::Severed;
                self.prosthetic = None;
                self.bleeding = true;
                events.push(self.event(BodyEventKind::Severed));
            }
        } else if self.hp * 5 < max * 2 {
            self.status = PartStatus::Injured;
            events.push(self.event(BodyEventKind::Injured));
        }
        events
    }

    /// Restore up to `amount` HP and stop bleeding.
    ///
    /// Severed parts cannot be healed and return `false`. Status becomes
    /// healthy at 90% HP and injured at 40%; below that it is left alone.
    /// A prosthetic keeps its status.
    pub fn heal(&mut self, amount: u32) -> bool {
        if self.status == PartStatus::Severed {
            return false;
        }
        let max = self.max_hp();
        self.hp = self.hp.saturating_add(amount).min(max);
        self.bleeding = false;
        if self.status != PartStatus::Prosthetic {
            if self.hp * 10 >= max * 9 {
                self.status = PartStatus::Healthy;
            } else if self.hp * 5 >= max * 2 {
                self.status = PartStatus::Injured;
            }
        }
        true
    }

    /// Fit a prosthetic onto a severed part.
    ///
    /// # Errors
    ///
    /// Returns an error and leaves the part untouched if it is not severed
    /// or does not accept `item`.
    pub fn fit_prosthetic(&mut self, item: ItemId) -> Result<(), ActionError> {
        if self.status != PartStatus::Severed {
            return Err(ActionError::PartNotSevered(self.id));
        }
        if !self.id.accepts(item) {
            return Err(ActionError::ProstheticNotAllowed {
                part: self.id,
                item,
            });
        }
        self.status = PartStatus::Prosthetic;
        self.prosthetic = Some(item);
        self.bleeding = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(events: &[BodyEvent]) -> Vec<BodyEventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_bleeding_is_edge_triggered() {
        let mut arm = BodyPart::new(BodyPartId::LeftArm);
        // 70 -> 10: crosses both 40% and 25%.
        let first = arm.hit(60);
        assert_eq!(kinds(&first), vec![BodyEventKind::Bleeding, BodyEventKind::Injured]);
        let second = arm.hit(5);
        assert_eq!(kinds(&second), vec![BodyEventKind::Injured]);
        assert!(arm.is_bleeding());
    }

    #[test]
    fn test_limb_is_severed_at_zero() {
        let mut leg = BodyPart::new(BodyPartId::RightLeg);
        let events = leg.hit(500);
        assert_eq!(kinds(&events), vec![BodyEventKind::Bleeding, BodyEventKind::Severed]);
        assert_eq!(leg.status(), PartStatus::Severed);
        assert_eq!(leg.hp(), 0);
    }

    #[test]
    fn test_severed_part_ignores_hits() {
        let mut eye = BodyPart::new(BodyPartId::LeftEye);
        eye.hit(30);
        assert!(eye.hit(10).is_empty());
        assert_eq!(eye.hp(), 0);
        assert_eq!(eye.status(), PartStatus::Severed);
    }

    #[test]
    fn test_vital_part_reports_death_not_severance() {
        let mut head = BodyPart::new(BodyPartId::Head);
        let events = head.hit(80);
        assert!(kinds(&events).contains(&BodyEventKind::Death));
        assert_ne!(head.status(), PartStatus::Severed);
    }

    #[test]
    fn test_heal_thresholds() {
        let mut torso = BodyPart::new(BodyPartId::Torso);
        torso.hit(170); // 30 HP, injured and bleeding
        assert_eq!(torso.status(), PartStatus::Injured);
        assert!(torso.heal(20)); // 50 HP: still under 40%
        assert_eq!(torso.status(), PartStatus::Injured);
        assert!(!torso.is_bleeding());
        torso.heal(40); // 90 HP: 45%
        assert_eq!(torso.status(), PartStatus::Injured);
        torso.heal(100); // 190 HP: 95%
        assert_eq!(torso.status(), PartStatus::Healthy);
        torso.heal(100);
        assert_eq!(torso.hp(), 200);
    }

    #[test]
    fn test_heal_does_nothing_on_severed() {
        let mut arm = BodyPart::new(BodyPartId::RightArm);
        arm.hit(70);
        assert!(!arm.heal(50));
        assert_eq!(arm.hp(), 0);
        assert!(arm.is_bleeding());
    }

    #[test]
    fn test_prosthetic_requires_severed_and_matching_slot() {
        let mut arm = BodyPart::new(BodyPartId::LeftArm);
        assert_eq!(
            arm.fit_prosthetic(ItemId::WoodenArm),
            Err(ActionError::PartNotSevered(BodyPartId::LeftArm))
        );
        arm.hit(100);
        let before = arm;
        assert!(arm.fit_prosthetic(ItemId::GlassEye).is_err());
        assert_eq!(arm, before);
        arm.fit_prosthetic(ItemId::IronArm).unwrap();
        assert_eq!(arm.status(), PartStatus::Prosthetic);
        assert_eq!(arm.prosthetic(), Some(ItemId::IronArm));
        assert!(!arm.is_bleeding());
        assert!(arm.functional());
    }

    #[test]
    fn test_head_accepts_nothing() {
        for item in ItemId::ALL {
            assert!(!BodyPartId::Head.accepts(item));
        }
    }
}
