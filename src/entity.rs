//! Moving actors: the player, enemies and caravans.
//!
//! Entities only decide where they want to go. Collision against the static
//! world, separation and cross-entity effects are applied by the simulation
//! step that owns them all.

mod enemy;
mod kinds;
mod korovan;
mod player;

use std::collections::BTreeMap;
use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::items::{Inventory, ItemId};

pub use enemy::{
    Enemy, EnemySnapshot, EnemyState, EnemyTick, Escort, PatrolArea, PlayerSighting, Stimulus,
    ATTACK_COOLDOWN, CHASE_GIVE_UP_FACTOR, CHASE_STOP_FACTOR,
};
pub use kinds::{EnemyKind, EnemyStats};
pub use korovan::{
    Korovan, KorovanHit, KorovanRoute, KorovanSnapshot, KOROVAN_HP, KOROVAN_ROUTES,
    WAYPOINT_REACHED,
};
pub use player::{
    DeathCause, Player, PlayerHit, PlayerInput, PlayerSnapshot, GROUND_OFFSET, PLAYER_ATTACK_COOLDOWN,
};

/// Index of an enemy in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnemyId(pub usize);

/// Index of a caravan in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KorovanId(pub usize);

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enemy#{}", self.0)
    }
}

impl fmt::Display for KorovanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "korovan#{}", self.0)
    }
}

/// Heading in degrees for a movement delta: 0 is +y, 90 is +x.
#[must_use]
#[inline]
pub fn heading_of(delta: DVec2) -> f64 {
    delta.x.atan2(delta.y).to_degrees()
}

/// Unit vector a heading points along.
#[must_use]
#[inline]
pub fn forward_of(heading: f64) -> DVec2 {
    let h = heading.to_radians();
    DVec2::new(h.sin(), h.cos())
}

/// Gold and items handed over by a kill or a looted caravan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loot {
    /// Gold coins.
    pub gold: u32,
    /// Items by count.
    pub items: BTreeMap<ItemId, u32>,
}

impl Loot {
    /// Nothing to hand over?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gold == 0 && self.items.values().all(|&n| n == 0)
    }

    /// Move everything into `inventory`.
    pub fn grant(self, inventory: &mut Inventory) {
        inventory.gold = inventory.gold.saturating_add(self.gold);
        for (item, count) in self.items {
            inventory.add(item, count);
        }
    }
}
