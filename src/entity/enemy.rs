//! Enemy AI: an explicit state machine driven by [`Stimulus`] values.
//!
//! ```text
//!            spotted / damaged / alerted
//!   Idle ─┐ ──────────────────────────────▶ Chase
//!  Patrol ┘ ◀────────────────────────────── Chase
//!            player lost (too far or dead)
//!
//!   any ── killed ──▶ Dead   (terminal)
//! ```
//!
//! Attacking is not a state: a chasing enemy in range and off cooldown
//! emits an attack from [`Enemy::think`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::{heading_of, EnemyId, EnemyKind, EnemyStats, KorovanId, Loot};
use crate::collision::StuckTracker;
use crate::combat::{resolve_attack, AttackResult, AttackRoll};
use crate::config::AimWeights;
use crate::faction::Faction;
use crate::rng::SimRng;

/// Seconds between two attacks of one enemy.
pub const ATTACK_COOLDOWN: f64 = 1.1;
/// A chaser stops at this fraction of its attack range.
pub const CHASE_STOP_FACTOR: f64 = 0.85;
/// A chaser gives up beyond this multiple of its detect range.
pub const CHASE_GIVE_UP_FACTOR: f64 = 2.5;
/// Patrol walking speed as a fraction of full speed.
const PATROL_SPEED_FACTOR: f64 = 0.5;
/// Distance at which a patrol target counts as reached.
const PATROL_ARRIVAL: f64 = 1.0;
/// Patrol radius range for ordinary spawns.
const PATROL_RADIUS: (f64, f64) = (8.0, 20.0);
/// Patrol radius of caravan escorts.
const ESCORT_PATROL_RADIUS: f64 = 5.0;
/// Spread added to every enemy attack.
const ATTACK_JITTER: (i32, i32) = (-2, 4);

/// AI state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyState {
    /// Standing still.
    Idle,
    /// Wandering inside the patrol circle.
    #[default]
    Patrol,
    /// Closing on the player and attacking.
    Chase,
    /// Terminal.
    Dead,
}

/// Events that can move an enemy between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stimulus {
    /// A hostile, living player came within detect range.
    PlayerSpotted,
    /// The player died or got too far away.
    PlayerLost,
    /// Took damage from any source.
    Damaged,
    /// Ordered to attack, e.g. by a caravan under attack.
    Alerted,
    /// HP reached zero.
    Killed,
}

impl EnemyState {
    /// The single transition function of the enemy AI.
    #[must_use]
    pub const fn next(self, stimulus: Stimulus) -> Self {
        match (self, stimulus) {
            (Self::Dead, _) | (_, Stimulus::Killed) => Self::Dead,
            (_, Stimulus::Damaged | Stimulus::Alerted)
            | (Self::Idle | Self::Patrol, Stimulus::PlayerSpotted) => Self::Chase,
            (Self::Chase, Stimulus::PlayerLost) => Self::Patrol,
            (state, _) => state,
        }
    }

    /// Not actively hunting the player.
    #[must_use]
    pub const fn is_calm(self) -> bool {
        !matches!(self, Self::Chase)
    }

    /// Stable identifier.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Patrol => "patrol",
            Self::Chase => "chase",
            Self::Dead => "dead",
        }
    }
}

/// What an enemy knows about the player this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSighting {
    /// Player position.
    pub pos: DVec2,
    /// Player is alive.
    pub alive: bool,
    /// The enemy's faction hates the player's.
    pub hostile: bool,
}

/// Circle an enemy wanders in, and its current goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatrolArea {
    /// Circle center.
    pub anchor: DVec2,
    /// Circle radius.
    pub radius: f64,
    /// Current walk target.
    pub target: DVec2,
}

impl PatrolArea {
    fn new(anchor: DVec2, radius: f64, rng: &mut SimRng) -> Self {
        let mut area = Self {
            anchor,
            radius,
            target: anchor,
        };
        area.retarget(rng);
        area
    }

    /// Pick a new target: uniform angle, uniform radius in `[0, radius]`.
    pub fn retarget(&mut self, rng: &mut SimRng) {
        let angle = rng.range_f64(0.0, std::f64::consts::TAU);
        let r = rng.range_f64(0.0, self.radius);
        self.target = self.anchor + DVec2::new(angle.cos(), angle.sin()) * r;
    }
}

/// Link from a caravan guard to its caravan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Escort {
    /// Escorted caravan.
    pub korovan: KorovanId,
    /// Patrol anchor relative to the caravan.
    pub offset: DVec2,
}

/// Result of one AI tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnemyTick {
    /// Switched into chase this tick.
    pub aggro: bool,
    /// Gave up a chase this tick.
    pub calmed: bool,
    /// Damage of an attack swung this tick.
    pub attack: Option<u32>,
}

/// Stored enemy state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    /// Template key.
    pub kind: String,
    /// Horizontal position.
    pub pos: DVec2,
    /// Elevation.
    pub z: f64,
    /// Heading in degrees.
    pub heading: f64,
    /// Current HP.
    pub hp: u32,
    /// AI state.
    pub state: EnemyState,
    /// Patrol circle center.
    pub patrol_anchor: DVec2,
    /// Remaining attack cooldown.
    #[serde(default)]
    pub cooldown: f64,
}

/// One AI-controlled enemy.
#[derive(Debug, Clone)]
pub struct Enemy {
    /// Index in the simulation.
    pub id: EnemyId,
    kind: EnemyKind,
    /// Horizontal position.
    pub pos: DVec2,
    /// Elevation.
    pub z: f64,
    /// Heading in degrees.
    pub heading: f64,
    hp: u32,
    state: EnemyState,
    cooldown: f64,
    /// Patrol circle.
    pub patrol: PatrolArea,
    escort: Option<Escort>,
    /// Stuck detection for obstacle recovery.
    pub stuck: StuckTracker,
    loot: Loot,
}

impl Enemy {
    /// Spawn a patrolling enemy at `pos`.
    #[must_use]
    pub fn new(id: EnemyId, kind: EnemyKind, pos: DVec2, z: f64, rng: &mut SimRng) -> Self {
        let heading = rng.range_f64(0.0, 360.0);
        let radius = rng.range_f64(PATROL_RADIUS.0, PATROL_RADIUS.1);
        Self {
            id,
            kind,
            pos,
            z,
            heading,
            hp: kind.stats().hp,
            state: EnemyState::Patrol,
            cooldown: 0.0,
            patrol: PatrolArea::new(pos, radius, rng),
            escort: None,
            stuck: StuckTracker::default(),
            loot: kind.loot(),
        }
    }

    /// Spawn a caravan guard that keeps near `korovan_pos + offset`.
    #[must_use]
    pub fn escort(
        id: EnemyId,
        korovan: KorovanId,
        korovan_pos: DVec2,
        offset: DVec2,
        z: f64,
        rng: &mut SimRng,
    ) -> Self {
        let mut guard = Self::new(id, EnemyKind::KorovanGuard, korovan_pos + offset, z, rng);
        guard.patrol.radius = ESCORT_PATROL_RADIUS;
        guard.patrol.retarget(rng);
        guard.escort = Some(Escort { korovan, offset });
        guard
    }

    /// Template.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Template stats.
    #[must_use]
    pub const fn stats(&self) -> EnemyStats {
        self.kind.stats()
    }

    /// Allegiance.
    #[must_use]
    pub const fn faction(&self) -> Faction {
        self.kind.stats().faction
    }

    /// Current HP.
    #[must_use]
    pub const fn hp(&self) -> u32 {
        self.hp
    }

    /// AI state.
    #[must_use]
    pub const fn state(&self) -> EnemyState {
        self.state
    }

    /// Remaining attack cooldown.
    #[must_use]
    pub const fn cooldown(&self) -> f64 {
        self.cooldown
    }

    /// Caravan link for escorts.
    #[must_use]
    pub const fn escort_of(&self) -> Option<Escort> {
        self.escort
    }

    /// Dead?
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.state == EnemyState::Dead
    }

    /// Feed a stimulus through the transition function. Returns whether the
    /// state changed.
    pub fn apply(&mut self, stimulus: Stimulus) -> bool {
        let next = self.state.next(stimulus);
        let changed = next != self.state;
        if changed {
            tracing::debug!(
                enemy = self.id.0,
                from = self.state.key(),
                to = next.key(),
                ?stimulus,
                "enemy state change"
            );
        }
        self.state = next;
        changed
    }

    /// Order a living enemy into chase. Returns whether the state changed.
    pub fn alert(&mut self) -> bool {
        self.apply(Stimulus::Alerted)
    }

    /// Move the patrol circle along with the escorted caravan.
    pub fn follow(&mut self, korovan_pos: DVec2) {
        if let Some(escort) = self.escort {
            let anchor = korovan_pos + escort.offset;
            self.patrol.target += anchor - self.patrol.anchor;
            self.patrol.anchor = anchor;
        }
    }

    /// One AI tick: cooldown, detection, movement and attack.
    ///
    /// Only moves `pos` toward the goal; collision is left to the caller.
    pub fn think(&mut self, dt: f64, player: PlayerSighting, rng: &mut SimRng) -> EnemyTick {
        let mut tick = EnemyTick::default();
        if self.is_dead() {
            return tick;
        }
        self.cooldown = (self.cooldown - dt).max(0.0);

        let stats = self.stats();
        let to_player = player.pos - self.pos;
        let dist = to_player.length();

        if player.hostile && player.alive && dist < stats.detect_range {
            tick.aggro = self.apply(Stimulus::PlayerSpotted);
        }
        if self.state == EnemyState::Chase && !player.alive {
            tick.calmed = self.apply(Stimulus::PlayerLost);
        }

        match self.state {
            EnemyState::Patrol => self.walk_patrol(dt, stats.speed, rng),
            EnemyState::Chase => tick.attack = self.chase(dt, &stats, to_player, dist, rng),
            EnemyState::Idle | EnemyState::Dead => {}
        }

        if self.state == EnemyState::Chase && dist > stats.detect_range * CHASE_GIVE_UP_FACTOR {
            tick.calmed = self.apply(Stimulus::PlayerLost);
        }
        tick
    }

    fn walk_patrol(&mut self, dt: f64, speed: f64, rng: &mut SimRng) {
        let delta = self.patrol.target - self.pos;
        let dist = delta.length();
        if dist < PATROL_ARRIVAL {
            self.patrol.retarget(rng);
            return;
        }
        self.pos += delta / dist * (speed * PATROL_SPEED_FACTOR * dt);
        self.heading = heading_of(delta);
    }

    fn chase(
        &mut self,
        dt: f64,
        stats: &EnemyStats,
        to_player: DVec2,
        dist: f64,
        rng: &mut SimRng,
    ) -> Option<u32> {
        let stop = stats.attack_range * CHASE_STOP_FACTOR;
        if dist > stop {
            let step = (stats.speed * dt).min(dist - stop);
            self.pos += to_player / dist * step;
            self.heading = heading_of(to_player);
        }
        if dist <= stats.attack_range && self.cooldown <= 0.0 {
            self.cooldown = ATTACK_COOLDOWN;
            let jitter = rng.range_i32(ATTACK_JITTER.0, ATTACK_JITTER.1);
            return Some(stats.damage.saturating_add_signed(jitter));
        }
        None
    }

    /// Distance the AI expects to cover this tick; used for stuck detection.
    #[must_use]
    pub fn expected_move(&self, dt: f64) -> f64 {
        let factor = if self.state == EnemyState::Patrol {
            PATROL_SPEED_FACTOR
        } else {
            1.0
        };
        self.stats().speed * dt * factor * 0.3
    }

    /// Resolve an incoming attack against this enemy's armor and agility.
    /// Returns the roll and whether it killed.
    pub fn defend(
        &mut self,
        rng: &mut SimRng,
        attacker_damage: u32,
        attacker_agility: u32,
        aim: &AimWeights,
    ) -> (AttackResult, bool) {
        let stats = self.stats();
        let result = resolve_attack(
            rng,
            AttackRoll {
                attacker_damage,
                attacker_agility,
                defender_armor: stats.armor,
                defender_agility: stats.agility,
            },
            aim,
        );
        let killed = result.hit && self.take_damage(result.damage);
        (result, killed)
    }

    /// Subtract HP. Any damage aggroes; reaching zero kills. Returns whether
    /// this call killed the enemy.
    pub fn take_damage(&mut self, damage: u32) -> bool {
        if self.is_dead() || damage == 0 {
            return false;
        }
        self.hp = self.hp.saturating_sub(damage);
        if self.hp == 0 {
            self.apply(Stimulus::Killed)
        } else {
            self.apply(Stimulus::Damaged);
            false
        }
    }

    /// Hand over the drop. Empty on every call after the first.
    pub fn take_loot(&mut self) -> Loot {
        std::mem::take(&mut self.loot)
    }

    /// Capture for persistence.
    #[must_use]
    pub fn to_snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            kind: self.kind.key().to_string(),
            pos: self.pos,
            z: self.z,
            heading: self.heading,
            hp: self.hp,
            state: self.state,
            patrol_anchor: self.patrol.anchor,
            cooldown: self.cooldown,
        }
    }

    /// Overwrite state from persistence. Dead enemies have already dropped
    /// their loot.
    pub fn restore(&mut self, snapshot: &EnemySnapshot) {
        let kind = EnemyKind::from_key_or_default(&snapshot.kind);
        if kind != self.kind {
            tracing::warn!(
                enemy = self.id.0,
                expected = self.kind.key(),
                found = kind.key(),
                "enemy kind differs from the generated world"
            );
            self.kind = kind;
            self.loot = kind.loot();
        }
        self.pos = snapshot.pos;
        self.z = snapshot.z;
        self.heading = snapshot.heading;
        self.hp = snapshot.hp.min(kind.stats().hp);
        self.state = snapshot.state;
        if self.hp == 0 {
            self.state = EnemyState::Dead;
        }
        self.patrol.target += snapshot.patrol_anchor - self.patrol.anchor;
        self.patrol.anchor = snapshot.patrol_anchor;
        self.cooldown = snapshot.cooldown.max(0.0);
        self.stuck.reset();
        if self.is_dead() {
            self.loot = Loot::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy(kind: EnemyKind) -> Enemy {
        Enemy::new(EnemyId(0), kind, DVec2::ZERO, 0.0, &mut SimRng::from_seed_u64(1))
    }

    fn hostile_at(pos: DVec2) -> PlayerSighting {
        PlayerSighting {
            pos,
            alive: true,
            hostile: true,
        }
    }

    #[test]
    fn test_transition_table() {
        use EnemyState::{Chase, Dead, Idle, Patrol};
        assert_eq!(Patrol.next(Stimulus::PlayerSpotted), Chase);
        assert_eq!(Idle.next(Stimulus::PlayerSpotted), Chase);
        assert_eq!(Chase.next(Stimulus::PlayerLost), Patrol);
        assert_eq!(Patrol.next(Stimulus::PlayerLost), Patrol);
        assert_eq!(Idle.next(Stimulus::Damaged), Chase);
        assert_eq!(Chase.next(Stimulus::Killed), Dead);
        assert_eq!(Dead.next(Stimulus::Damaged), Dead);
        assert_eq!(Dead.next(Stimulus::Alerted), Dead);
    }

    #[test]
    fn test_spotting_starts_chase() {
        let mut e = enemy(EnemyKind::ElfWarrior);
        let mut rng = SimRng::from_seed_u64(2);
        let tick = e.think(0.016, hostile_at(DVec2::new(10.0, 0.0)), &mut rng);
        assert!(tick.aggro);
        assert_eq!(e.state(), EnemyState::Chase);
    }

    #[test]
    fn test_neutral_ignores_player_until_hit() {
        let mut e = enemy(EnemyKind::NeutralBandit);
        let mut rng = SimRng::from_seed_u64(2);
        let sighting = PlayerSighting {
            hostile: false,
            ..hostile_at(DVec2::new(3.0, 0.0))
        };
        e.think(0.016, sighting, &mut rng);
        assert_eq!(e.state(), EnemyState::Patrol);
        assert!(!e.take_damage(5));
        assert_eq!(e.state(), EnemyState::Chase);
    }

    #[test]
    fn test_attack_in_range() {
        let mut e = enemy(EnemyKind::ElfWarrior);
        e.apply(Stimulus::Alerted);
        let mut rng = SimRng::from_seed_u64(3);
        let tick = e.think(0.016, hostile_at(DVec2::new(2.0, 0.0)), &mut rng);
        let damage = tick.attack.unwrap();
        assert!((14..=20).contains(&damage));
        assert!((e.cooldown() - ATTACK_COOLDOWN).abs() < 1e-12);
        // Inside the stop distance, so no movement.
        assert!(e.pos.length() < 1e-12);
        let tick = e.think(0.016, hostile_at(DVec2::new(2.0, 0.0)), &mut rng);
        assert_eq!(tick.attack, None);
    }

    #[test]
    fn test_chase_stops_short_of_player() {
        let mut e = enemy(EnemyKind::PalaceGuard);
        e.apply(Stimulus::Alerted);
        let mut rng = SimRng::from_seed_u64(4);
        // Full speed step while far away.
        e.think(1.0, hostile_at(DVec2::new(10.0, 0.0)), &mut rng);
        assert!((e.pos.x - 4.0).abs() < 1e-9);
        // Then only up to the stop distance.
        e.think(1.0, hostile_at(DVec2::new(8.0, 0.0)), &mut rng);
        assert!((e.pos.x - (8.0 - 2.5 * CHASE_STOP_FACTOR)).abs() < 1e-9);
    }

    #[test]
    fn test_chase_gives_up_far_away() {
        let mut e = enemy(EnemyKind::ElfWarrior);
        e.apply(Stimulus::Alerted);
        let mut rng = SimRng::from_seed_u64(5);
        let tick = e.think(0.016, hostile_at(DVec2::new(100.0, 0.0)), &mut rng);
        assert!(tick.calmed);
        assert_eq!(e.state(), EnemyState::Patrol);
    }

    #[test]
    fn test_dead_player_ends_chase() {
        let mut e = enemy(EnemyKind::ElfWarrior);
        e.apply(Stimulus::Alerted);
        let mut rng = SimRng::from_seed_u64(6);
        let player = PlayerSighting {
            alive: false,
            ..hostile_at(DVec2::new(1.0, 0.0))
        };
        let tick = e.think(0.016, player, &mut rng);
        assert_eq!(tick.attack, None);
        assert_eq!(e.state(), EnemyState::Patrol);
    }

    #[test]
    fn test_patrol_stays_near_anchor() {
        let mut e = enemy(EnemyKind::DarkSoldier);
        let mut rng = SimRng::from_seed_u64(7);
        let far = PlayerSighting {
            hostile: false,
            ..hostile_at(DVec2::new(500.0, 0.0))
        };
        for _ in 0..2000 {
            e.think(0.05, far, &mut rng);
            assert!(e.pos.distance(e.patrol.anchor) <= e.patrol.radius + 1.0);
        }
    }

    #[test]
    fn test_kill_and_loot_once() {
        let mut e = enemy(EnemyKind::PalaceGuard);
        assert!(e.take_damage(500));
        assert!(e.is_dead());
        assert_eq!(e.hp(), 0);
        assert!(!e.take_damage(10));
        let loot = e.take_loot();
        assert_eq!(loot.gold, 20);
        assert!(e.take_loot().is_empty());
    }

    #[test]
    fn test_escort_follows_caravan() {
        let mut rng = SimRng::from_seed_u64(8);
        let mut g = Enemy::escort(
            EnemyId(3),
            KorovanId(0),
            DVec2::new(10.0, 10.0),
            DVec2::new(3.0, 2.0),
            0.0,
            &mut rng,
        );
        assert!((g.patrol.radius - ESCORT_PATROL_RADIUS).abs() < f64::EPSILON);
        g.follow(DVec2::new(20.0, 10.0));
        assert!(g.patrol.anchor.distance(DVec2::new(23.0, 12.0)) < 1e-12);
        assert!(g.patrol.target.distance(g.patrol.anchor) <= ESCORT_PATROL_RADIUS + 1e-9);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut e = enemy(EnemyKind::DarkSpy);
        e.take_damage(20);
        let snap = e.to_snapshot();
        let mut fresh = enemy(EnemyKind::DarkSpy);
        fresh.restore(&snap);
        assert_eq!(fresh.hp(), 35);
        assert_eq!(fresh.state(), EnemyState::Chase);
        assert!(fresh.pos.distance(e.pos) < 1e-12);
    }
}
