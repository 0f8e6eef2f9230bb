//! The player character: stats, body, inventory and timers.
//!
//! Movement and collision live in the simulation step; this type owns what
//! belongs to the character itself.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::forward_of;
use crate::body::{Body, BodyEvent, BodyPartId, BodySnapshot};
use crate::combat::{resolve_attack, AttackResult, AttackRoll};
use crate::config::AimWeights;
use crate::error::ActionError;
use crate::faction::{Faction, START_ELEVATION};
use crate::geo::Settlements;
use crate::items::{Inventory, InventorySnapshot, ItemId};
use crate::rng::SimRng;
use crate::world::Hazard;

/// Height of the player's origin above the ground.
pub const GROUND_OFFSET: f64 = 0.3;
/// Seconds between two player attacks.
pub const PLAYER_ATTACK_COOLDOWN: f64 = 0.8;

const BASE_SPEED: f64 = 10.0;
const SNEAK_FACTOR: f64 = 0.4;
const JUMP_VELOCITY: f64 = 14.0;
const GRAVITY: f64 = 30.0;
const JUMP_MIN_MOBILITY: f64 = 0.15;
const STRENGTH_BASELINE: i64 = 5;
const DAMAGE_JITTER: (i32, i32) = (-3, 3);

/// One frame of player intent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// World-space movement direction; normalized before use, zero to stand.
    pub movement: DVec2,
    /// New facing in degrees, if the view turned.
    pub heading: Option<f64>,
    /// Sneak this frame.
    pub sneak: bool,
    /// Start a jump.
    pub jump: bool,
    /// Swing the weapon.
    pub attack: bool,
}

/// Why the player died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// A vital part was destroyed in combat.
    Slain,
    /// Blood loss emptied the torso.
    BledOut,
    /// Walked into the river.
    Drowned,
    /// Walked into the gorge.
    Fell,
}

impl From<Hazard> for DeathCause {
    fn from(hazard: Hazard) -> Self {
        match hazard {
            Hazard::Drowned => Self::Drowned,
            Hazard::Fell => Self::Fell,
        }
    }
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Slain => "slain",
            Self::BledOut => "bled out",
            Self::Drowned => "drowned",
            Self::Fell => "fell into the gorge",
        })
    }
}

/// An incoming attack after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerHit {
    /// The roll.
    pub result: AttackResult,
    /// Part that took the damage, if the attack landed.
    pub part: Option<BodyPartId>,
    /// Body events it caused.
    pub events: Vec<BodyEvent>,
}

/// Stored player state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Chosen faction.
    pub faction: Faction,
    /// Position.
    pub pos: DVec2,
    /// Elevation.
    pub z: f64,
    /// Heading in degrees.
    #[serde(default)]
    pub heading: f64,
    /// Enemies killed.
    #[serde(default)]
    pub kills: u32,
    /// Seconds played.
    #[serde(default)]
    pub play_time: f64,
    /// Body parts.
    pub body: BodySnapshot,
    /// Inventory.
    pub inventory: InventorySnapshot,
    /// Cause of death, if dead.
    #[serde(default)]
    pub death: Option<DeathCause>,
}

/// The player.
#[derive(Debug, Clone)]
pub struct Player {
    faction: Faction,
    /// Horizontal position.
    pub pos: DVec2,
    /// Elevation.
    pub z: f64,
    /// Facing in degrees.
    pub heading: f64,
    strength: u32,
    agility: u32,
    intelligence: u32,
    base_armor: u32,
    /// Body parts.
    pub body: Body,
    /// Items and gold.
    pub inventory: Inventory,
    death: Option<DeathCause>,
    /// Sneaking slows movement.
    pub sneaking: bool,
    jump_velocity: Option<f64>,
    attack_cooldown: f64,
    bleed_timer: f64,
    /// Enemies killed.
    pub kills: u32,
    play_time: f64,
}

impl Player {
    /// A fresh character of `faction` at its start position.
    #[must_use]
    pub fn new(faction: Faction, settlements: &Settlements) -> Self {
        let profile = faction.profile();
        Self {
            faction,
            pos: faction.start_position(settlements),
            z: START_ELEVATION,
            heading: 0.0,
            strength: profile.strength,
            agility: profile.agility,
            intelligence: profile.intelligence,
            base_armor: profile.armor,
            body: Body::new(),
            inventory: Inventory::new(profile.gold, Some(profile.weapon)),
            death: None,
            sneaking: false,
            jump_velocity: None,
            attack_cooldown: 0.0,
            bleed_timer: 0.0,
            kills: 0,
            play_time: 0.0,
        }
    }

    /// Chosen faction.
    #[must_use]
    pub const fn faction(&self) -> Faction {
        self.faction
    }

    /// Strength.
    #[must_use]
    pub const fn strength(&self) -> u32 {
        self.strength
    }

    /// Base agility, before equipment.
    #[must_use]
    pub const fn agility(&self) -> u32 {
        self.agility
    }

    /// Intelligence.
    #[must_use]
    pub const fn intelligence(&self) -> u32 {
        self.intelligence
    }

    /// Seconds played.
    #[must_use]
    pub const fn play_time(&self) -> f64 {
        self.play_time
    }

    /// Remaining attack cooldown.
    #[must_use]
    pub const fn attack_cooldown(&self) -> f64 {
        self.attack_cooldown
    }

    /// Cause of death, if dead.
    #[must_use]
    pub const fn death(&self) -> Option<DeathCause> {
        self.death
    }

    /// Dead?
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.death.is_some()
    }

    /// In the air?
    #[must_use]
    pub const fn is_airborne(&self) -> bool {
        self.jump_velocity.is_some()
    }

    /// Unit vector the player faces.
    #[must_use]
    pub fn forward(&self) -> DVec2 {
        forward_of(self.heading)
    }

    /// Mark dead. The first cause sticks.
    pub fn kill(&mut self, cause: DeathCause) {
        if self.death.is_none() {
            tracing::info!(%cause, x = self.pos.x, y = self.pos.y, "player died");
            self.death = Some(cause);
        }
    }

    /// Walking speed in units per second.
    #[must_use]
    pub fn move_speed(&self) -> f64 {
        let mut speed = BASE_SPEED * (f64::from(self.agility) / 10.0);
        speed *= self.body.movement_multiplier();
        if self.sneaking {
            speed *= SNEAK_FACTOR;
        }
        speed
    }

    /// Natural armor plus equipped armor.
    #[must_use]
    pub fn effective_armor(&self) -> u32 {
        self.base_armor + self.inventory.armor_defense()
    }

    /// Agility plus any armor bonus; used for dodge and aim.
    #[must_use]
    pub fn effective_agility(&self) -> u32 {
        self.agility + self.inventory.agility_bonus()
    }

    /// Alive, armed with at least one arm and off cooldown.
    #[must_use]
    pub fn can_attack(&self) -> bool {
        self.attack_cooldown <= 0.0 && self.body.can_fight() && !self.is_dead()
    }

    /// Raw damage of one swing.
    pub fn attack_damage(&self, rng: &mut SimRng) -> u32 {
        let jitter = i64::from(rng.range_i32(DAMAGE_JITTER.0, DAMAGE_JITTER.1));
        let raw = i64::from(self.inventory.weapon_damage())
            + (i64::from(self.strength) - STRENGTH_BASELINE) * 2
            + jitter;
        u32::try_from(raw.max(1)).unwrap_or(u32::MAX)
    }

    /// Roll a swing's damage and start the cooldown.
    pub fn swing(&mut self, rng: &mut SimRng) -> u32 {
        self.attack_cooldown = PLAYER_ATTACK_COOLDOWN;
        self.attack_damage(rng)
    }

    /// Start a jump if grounded and the legs allow it.
    pub fn try_jump(&mut self) -> bool {
        if self.jump_velocity.is_some() || self.body.movement_multiplier() <= JUMP_MIN_MOBILITY {
            return false;
        }
        self.jump_velocity = Some(JUMP_VELOCITY);
        true
    }

    /// Integrate the jump or snap to the ground.
    pub fn update_vertical(&mut self, dt: f64, ground: f64) {
        let floor = ground + GROUND_OFFSET;
        let Some(velocity) = self.jump_velocity else {
            self.z = floor;
            return;
        };
        self.z += velocity * dt;
        if self.z < floor {
            self.z = floor;
            self.jump_velocity = None;
        } else {
            self.jump_velocity = Some(velocity - GRAVITY * dt);
        }
    }

    /// Advance timers and apply bleeding once per `bleed_interval`.
    ///
    /// Returns the bleed damage applied this tick and the body events it
    /// caused.
    pub fn tick(&mut self, dt: f64, bleed_interval: f64) -> (u32, Vec<BodyEvent>) {
        self.play_time += dt;
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        if self.is_dead() {
            return (0, Vec::new());
        }
        self.bleed_timer += dt;
        if self.bleed_timer < bleed_interval {
            return (0, Vec::new());
        }
        self.bleed_timer = 0.0;
        let bleed = self.body.bleed_tick();
        let events = self.body.apply_bleed(bleed);
        if !self.body.alive() {
            self.kill(DeathCause::BledOut);
        }
        (bleed, events)
    }

    /// Resolve an enemy attack against this player's armor and agility and
    /// apply it to the body.
    pub fn defend(
        &mut self,
        rng: &mut SimRng,
        attacker_damage: u32,
        attacker_agility: u32,
        aim: &AimWeights,
    ) -> PlayerHit {
        let result = resolve_attack(
            rng,
            AttackRoll {
                attacker_damage,
                attacker_agility,
                defender_armor: self.effective_armor(),
                defender_agility: self.effective_agility(),
            },
            aim,
        );
        if !result.hit || self.is_dead() {
            return PlayerHit {
                result,
                part: None,
                events: Vec::new(),
            };
        }
        let (part, events) = self.body.take_hit(result.damage, result.target_part, rng);
        if !self.body.alive() {
            self.kill(DeathCause::Slain);
        }
        PlayerHit {
            result,
            part: Some(part),
            events,
        }
    }

    /// Fit a prosthetic from the inventory, consuming it.
    ///
    /// # Errors
    ///
    /// Fails without changes when dead, when the item is not held, or when no
    /// severed part accepts it.
    pub fn fit_prosthetic(&mut self, item: ItemId) -> Result<BodyPartId, ActionError> {
        if self.is_dead() {
            return Err(ActionError::Dead);
        }
        let held = self.inventory.count(item);
        if held == 0 {
            return Err(ActionError::NotEnough {
                item,
                wanted: 1,
                held,
            });
        }
        let part = self.body.fit_prosthetic(item)?;
        self.inventory.remove(item, 1)?;
        Ok(part)
    }

    /// Drink or apply a consumable. Returns the heal amount.
    ///
    /// # Errors
    ///
    /// Fails without changes when dead, when the item is not a consumable,
    /// or when it is not held.
    pub fn use_item(&mut self, item: ItemId) -> Result<u32, ActionError> {
        if self.is_dead() {
            return Err(ActionError::Dead);
        }
        self.inventory.use_consumable(item, &mut self.body)
    }

    /// Capture for persistence.
    #[must_use]
    pub fn to_snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            faction: self.faction,
            pos: self.pos,
            z: self.z,
            heading: self.heading,
            kills: self.kills,
            play_time: self.play_time,
            body: self.body.to_snapshot(),
            inventory: self.inventory.to_snapshot(),
            death: self.death,
        }
    }

    /// Rebuild from persistence. Attributes come from the faction profile.
    #[must_use]
    pub fn from_snapshot(snapshot: &PlayerSnapshot, settlements: &Settlements) -> Self {
        let mut player = Self::new(snapshot.faction, settlements);
        player.pos = snapshot.pos;
        player.z = snapshot.z;
        player.heading = snapshot.heading;
        player.kills = snapshot.kills;
        player.play_time = snapshot.play_time.max(0.0);
        player.body = Body::from_snapshot(&snapshot.body);
        player.inventory = Inventory::from_snapshot(&snapshot.inventory);
        player.death = snapshot.death;
        if player.death.is_none() && !player.body.alive() {
            player.death = Some(DeathCause::Slain);
        }
        player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::PartStatus;
    use crate::geo::Geography;

    fn player(faction: Faction) -> Player {
        Player::new(faction, &Geography::standard().settlements)
    }

    #[test]
    fn test_start_loadout() {
        let p = player(Faction::Guards);
        assert_eq!(p.inventory.weapon(), Some(ItemId::Sword));
        assert_eq!(p.inventory.gold, 100);
        assert!((p.z - START_ELEVATION).abs() < f64::EPSILON);
        assert_eq!(p.effective_armor(), 12);
    }

    #[test]
    fn test_move_speed_factors() {
        let mut p = player(Faction::Elves);
        assert!((p.move_speed() - 10.0).abs() < 1e-12);
        p.sneaking = true;
        assert!((p.move_speed() - 4.0).abs() < 1e-12);
        p.sneaking = false;
        p.body.part_mut(BodyPartId::LeftLeg).hit(1000);
        assert!((p.move_speed() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_attack_damage_bounds() {
        // Sword 14 + (9 - 5) * 2 = 22, +-3.
        let p = player(Faction::Guards);
        let mut rng = SimRng::from_seed_u64(1);
        for _ in 0..500 {
            assert!((19..=25).contains(&p.attack_damage(&mut rng)));
        }
    }

    #[test]
    fn test_swing_starts_cooldown() {
        let mut p = player(Faction::Guards);
        assert!(p.can_attack());
        p.swing(&mut SimRng::from_seed_u64(2));
        assert!(!p.can_attack());
        p.tick(PLAYER_ATTACK_COOLDOWN, 1.0);
        assert!(p.can_attack());
    }

    #[test]
    fn test_jump_arc_lands() {
        let mut p = player(Faction::Elves);
        p.update_vertical(0.016, 2.0);
        assert!(p.try_jump());
        assert!(!p.try_jump());
        let mut peak: f64 = 0.0;
        for _ in 0..200 {
            p.update_vertical(0.016, 2.0);
            peak = peak.max(p.z);
        }
        assert!(!p.is_airborne());
        assert!((p.z - 2.3).abs() < 1e-12);
        assert!(peak > 5.0);
    }

    #[test]
    fn test_no_jump_without_legs() {
        let mut p = player(Faction::Elves);
        p.body.part_mut(BodyPartId::LeftLeg).hit(1000);
        p.body.part_mut(BodyPartId::RightLeg).hit(1000);
        assert!(!p.try_jump());
    }

    #[test]
    fn test_bleeding_drains_torso_each_interval() {
        let mut p = player(Faction::Villain);
        p.body.part_mut(BodyPartId::LeftArm).hit(1000);
        let torso = p.body.part(BodyPartId::Torso).hp();
        let (bleed, _) = p.tick(0.5, 1.0);
        assert_eq!(bleed, 0);
        let (bleed, _) = p.tick(0.5, 1.0);
        assert_eq!(bleed, 2);
        assert_eq!(p.body.part(BodyPartId::Torso).hp(), torso - 2);
    }

    #[test]
    fn test_bleeding_can_kill() {
        let mut p = player(Faction::Villain);
        p.body.part_mut(BodyPartId::Torso).hit(199);
        for _ in 0..5 {
            p.tick(1.0, 1.0);
        }
        assert_eq!(p.death(), Some(DeathCause::BledOut));
    }

    #[test]
    fn test_prosthetic_consumes_item() {
        let mut p = player(Faction::Guards);
        assert!(matches!(
            p.fit_prosthetic(ItemId::WoodenArm),
            Err(ActionError::NotEnough { .. })
        ));
        p.inventory.add(ItemId::WoodenArm, 1);
        assert_eq!(
            p.fit_prosthetic(ItemId::WoodenArm),
            Err(ActionError::NoSeveredPartFor(ItemId::WoodenArm))
        );
        assert!(p.inventory.has(ItemId::WoodenArm, 1));
        p.body.part_mut(BodyPartId::RightArm).hit(1000);
        assert_eq!(p.fit_prosthetic(ItemId::WoodenArm), Ok(BodyPartId::RightArm));
        assert!(!p.inventory.has(ItemId::WoodenArm, 1));
        assert_eq!(
            p.body.part(BodyPartId::RightArm).status(),
            PartStatus::Prosthetic
        );
    }

    #[test]
    fn test_defend_applies_resolved_damage() {
        let mut p = player(Faction::Guards);
        let mut rng = SimRng::from_seed_u64(5);
        let before = p.body.parts().iter().map(|part| part.hp()).sum::<u32>();
        let mut landed = 0;
        for _ in 0..20 {
            let hit = p.defend(&mut rng, 20, 5, &AimWeights::default());
            if hit.result.hit {
                landed += hit.result.damage;
                assert!(hit.part.is_some());
            }
        }
        let after = p.body.parts().iter().map(|part| part.hp()).sum::<u32>();
        assert!(landed > 0);
        assert!(before - after <= landed);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let settlements = Geography::standard().settlements;
        let mut p = Player::new(Faction::Elves, &settlements);
        p.pos = DVec2::new(12.0, -4.0);
        p.kills = 3;
        p.inventory.add(ItemId::Gems, 2);
        p.body.part_mut(BodyPartId::LeftEye).hit(1000);
        let restored = Player::from_snapshot(&p.to_snapshot(), &settlements);
        assert_eq!(restored.kills, 3);
        assert_eq!(restored.body, p.body);
        assert_eq!(restored.inventory.count(ItemId::Gems), 2);
        assert!(restored.pos.distance(p.pos) < 1e-12);
    }
}
