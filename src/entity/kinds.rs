//! Enemy templates.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Loot;
use crate::faction::Faction;
use crate::items::ItemId;

/// Every enemy template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum EnemyKind {
    ElfWarrior,
    ElfArcher,
    PalaceGuard,
    PalaceCaptain,
    DarkSoldier,
    DarkSpy,
    DarkLordMinion,
    NeutralBandit,
    KorovanGuard,
}

/// Fixed stats of a template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    /// Display name.
    pub name: &'static str,
    /// Allegiance.
    pub faction: Faction,
    /// Starting and maximum HP.
    pub hp: u32,
    /// Base damage per attack.
    pub damage: u32,
    /// Flat damage reduction.
    pub armor: u32,
    /// Dodge chance source.
    pub agility: u32,
    /// Full movement speed, units per second.
    pub speed: f64,
    /// Distance at which a hostile player is noticed.
    pub detect_range: f64,
    /// Distance from which attacks land.
    pub attack_range: f64,
    /// Gold dropped on death.
    pub loot_gold: u32,
    /// Items dropped on death.
    pub loot_items: &'static [(ItemId, u32)],
}

impl EnemyKind {
    /// Every template.
    pub const ALL: [Self; 9] = [
        Self::ElfWarrior,
        Self::ElfArcher,
        Self::PalaceGuard,
        Self::PalaceCaptain,
        Self::DarkSoldier,
        Self::DarkSpy,
        Self::DarkLordMinion,
        Self::NeutralBandit,
        Self::KorovanGuard,
    ];

    /// Template stats.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        match self {
            Self::ElfWarrior => EnemyStats {
                name: "elf warrior",
                faction: Faction::Elves,
                hp: 90,
                damage: 16,
                armor: 5,
                agility: 9,
                speed: 6.0,
                detect_range: 18.0,
                attack_range: 2.5,
                loot_gold: 0,
                loot_items: &[(ItemId::Furs, 1), (ItemId::Timber, 1)],
            },
            Self::ElfArcher => EnemyStats {
                name: "elf archer",
                faction: Faction::Elves,
                hp: 60,
                damage: 14,
                armor: 3,
                agility: 11,
                speed: 5.0,
                detect_range: 35.0,
                attack_range: 30.0,
                loot_gold: 0,
                loot_items: &[(ItemId::Bow, 1)],
            },
            Self::PalaceGuard => EnemyStats {
                name: "palace guard",
                faction: Faction::Guards,
                hp: 120,
                damage: 18,
                armor: 12,
                agility: 5,
                speed: 4.0,
                detect_range: 15.0,
                attack_range: 2.5,
                loot_gold: 20,
                loot_items: &[(ItemId::Sword, 1)],
            },
            Self::PalaceCaptain => EnemyStats {
                name: "guard captain",
                faction: Faction::Guards,
                hp: 200,
                damage: 24,
                armor: 16,
                agility: 6,
                speed: 4.5,
                detect_range: 20.0,
                attack_range: 3.0,
                loot_gold: 80,
                loot_items: &[(ItemId::ChainMail, 1)],
            },
            Self::DarkSoldier => EnemyStats {
                name: "dark soldier",
                faction: Faction::Villain,
                hp: 100,
                damage: 20,
                armor: 8,
                agility: 7,
                speed: 5.0,
                detect_range: 16.0,
                attack_range: 2.5,
                loot_gold: 0,
                loot_items: &[(ItemId::IronOre, 2)],
            },
            Self::DarkSpy => EnemyStats {
                name: "spy",
                faction: Faction::Villain,
                hp: 55,
                damage: 16,
                armor: 4,
                agility: 10,
                speed: 7.0,
                detect_range: 25.0,
                attack_range: 2.0,
                loot_gold: 30,
                loot_items: &[(ItemId::Dagger, 1)],
            },
            Self::DarkLordMinion => EnemyStats {
                name: "dark lord's minion",
                faction: Faction::Villain,
                hp: 180,
                damage: 26,
                armor: 14,
                agility: 8,
                speed: 5.0,
                detect_range: 20.0,
                attack_range: 2.5,
                loot_gold: 50,
                loot_items: &[(ItemId::DarkArmor, 1)],
            },
            Self::NeutralBandit => EnemyStats {
                name: "bandit",
                faction: Faction::Neutral,
                hp: 70,
                damage: 12,
                armor: 3,
                agility: 7,
                speed: 4.0,
                detect_range: 14.0,
                attack_range: 2.5,
                loot_gold: 25,
                loot_items: &[(ItemId::Dagger, 1)],
            },
            Self::KorovanGuard => EnemyStats {
                name: "caravan guard",
                faction: Faction::Neutral,
                hp: 80,
                damage: 14,
                armor: 8,
                agility: 6,
                speed: 6.0,
                detect_range: 20.0,
                attack_range: 2.5,
                loot_gold: 10,
                loot_items: &[],
            },
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ElfWarrior => "elf_warrior",
            Self::ElfArcher => "elf_archer",
            Self::PalaceGuard => "palace_guard",
            Self::PalaceCaptain => "palace_captain",
            Self::DarkSoldier => "dark_soldier",
            Self::DarkSpy => "dark_spy",
            Self::DarkLordMinion => "dark_lord_minion",
            Self::NeutralBandit => "neutral_bandit",
            Self::KorovanGuard => "korovan_guard",
        }
    }

    /// Look up a template by key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    /// Look up a template, falling back to the bandit for unknown keys.
    #[must_use]
    pub fn from_key_or_default(key: &str) -> Self {
        Self::from_key(key).unwrap_or_else(|| {
            tracing::warn!(kind = key, "unknown enemy kind, using bandit");
            Self::NeutralBandit
        })
    }

    /// Fresh copy of the template's drop.
    #[must_use]
    pub fn loot(self) -> Loot {
        let stats = self.stats();
        Loot {
            gold: stats.loot_gold,
            items: stats.loot_items.iter().copied().collect(),
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stats().name)
    }
}
