//! Map zones and the items each zone's market lists.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::items::ItemId;

/// Radius around the origin that belongs to the villain.
const VILLAIN_RADIUS: f64 = 70.0;
/// Corner zones start past this coordinate on both axes.
const CORNER_EDGE: f64 = 100.0;

/// Region of the map, deciding which market the player can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// The human heartland between the settlements.
    Human,
    /// Around the emperor's palace.
    Palace,
    /// The elven forest.
    Elf,
    /// The dark lands around the mountain.
    Villain,
}

const PALACE_ITEMS: [ItemId; 6] = [
    ItemId::Sword,
    ItemId::Axe,
    ItemId::ChainMail,
    ItemId::PlateArmor,
    ItemId::HealingPotion,
    ItemId::Bandage,
];

const ELF_ITEMS: [ItemId; 7] = [
    ItemId::ElvenBlade,
    ItemId::ElvenArmor,
    ItemId::Bow,
    ItemId::HealingPotion,
    ItemId::Antidote,
    ItemId::Furs,
    ItemId::Timber,
];

const VILLAIN_ITEMS: [ItemId; 5] = [
    ItemId::DarkSword,
    ItemId::DarkArmor,
    ItemId::StrongPotion,
    ItemId::IronOre,
    ItemId::Gems,
];

impl Zone {
    /// Every zone, each with its own market.
    pub const ALL: [Self; 4] = [Self::Human, Self::Palace, Self::Elf, Self::Villain];

    /// Zone containing `p`.
    #[must_use]
    pub fn at(p: DVec2) -> Self {
        if p.x < -CORNER_EDGE && p.y < -CORNER_EDGE {
            Self::Elf
        } else if p.x > CORNER_EDGE && p.y > CORNER_EDGE {
            Self::Palace
        } else if p.length() < VILLAIN_RADIUS {
            Self::Villain
        } else {
            Self::Human
        }
    }

    /// Items the local market lists.
    #[must_use]
    pub const fn market_items(self) -> &'static [ItemId] {
        match self {
            Self::Human => &ItemId::ALL,
            Self::Palace => &PALACE_ITEMS,
            Self::Elf => &ELF_ITEMS,
            Self::Villain => &VILLAIN_ITEMS,
        }
    }

    /// Stable key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Palace => "palace",
            Self::Elf => "elf",
            Self::Villain => "villain",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
