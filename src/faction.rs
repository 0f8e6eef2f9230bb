//! Factions, their hostility and the player's starting loadout.

use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::geo::Settlements;
use crate::items::ItemId;

/// Elevation the player spawns at before the first ground snap.
pub const START_ELEVATION: f64 = 5.0;

/// A faction. The first three are playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    /// Forest elves.
    Elves,
    /// Palace guard.
    Guards,
    /// The dark lord's forces.
    Villain,
    /// Bandits and caravan escorts; not playable.
    Neutral,
}

/// Starting attributes of a playable faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactionProfile {
    /// Strength: adds to melee damage.
    pub strength: u32,
    /// Agility: movement speed, dodge and aim.
    pub agility: u32,
    /// Intelligence.
    pub intelligence: u32,
    /// Natural armor before equipment.
    pub armor: u32,
    /// Starting gold.
    pub gold: u32,
    /// Starting weapon, equipped.
    pub weapon: ItemId,
}

impl Faction {
    /// Playable factions.
    pub const PLAYABLE: [Self; 3] = [Self::Elves, Self::Guards, Self::Villain];

    /// Stable identifier.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Elves => "elves",
            Self::Guards => "guards",
            Self::Villain => "villain",
            Self::Neutral => "neutral",
        }
    }

    /// Factions this one attacks on sight.
    #[must_use]
    pub const fn enemies(self) -> &'static [Self] {
        match self {
            Self::Elves => &[Self::Guards, Self::Villain],
            Self::Guards => &[Self::Villain, Self::Elves],
            Self::Villain => &[Self::Guards],
            Self::Neutral => &[],
        }
    }

    /// Is `other` on this faction's enemy list?
    #[must_use]
    pub fn is_hostile_to(self, other: Self) -> bool {
        self.enemies().contains(&other)
    }

    /// Starting attributes; the neutral faction borrows the guards' profile.
    #[must_use]
    pub const fn profile(self) -> FactionProfile {
        match self {
            Self::Elves => FactionProfile {
                strength: 7,
                agility: 10,
                intelligence: 8,
                armor: 4,
                gold: 50,
                weapon: ItemId::ElvenBlade,
            },
            Self::Guards | Self::Neutral => FactionProfile {
                strength: 9,
                agility: 6,
                intelligence: 6,
                armor: 12,
                gold: 100,
                weapon: ItemId::Sword,
            },
            Self::Villain => FactionProfile {
                strength: 10,
                agility: 8,
                intelligence: 9,
                armor: 8,
                gold: 200,
                weapon: ItemId::DarkSword,
            },
        }
    }

    /// Where a new player of this faction starts.
    #[must_use]
    pub fn start_position(self, settlements: &Settlements) -> DVec2 {
        match self {
            Self::Elves => settlements.elf_spawn(),
            Self::Guards | Self::Neutral => settlements.palace_spawn(),
            Self::Villain => settlements.fort_spawn(),
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Faction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "elves" => Ok(Self::Elves),
            "guards" => Ok(Self::Guards),
            "villain" => Ok(Self::Villain),
            "neutral" => Ok(Self::Neutral),
            other => Err(format!("unknown faction `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostility_is_one_sided_for_villain() {
        assert!(Faction::Villain.is_hostile_to(Faction::Guards));
        assert!(!Faction::Villain.is_hostile_to(Faction::Elves));
        assert!(Faction::Elves.is_hostile_to(Faction::Villain));
    }

    #[test]
    fn test_neutral_is_never_hostile_by_sight() {
        for f in Faction::PLAYABLE {
            assert!(!f.is_hostile_to(Faction::Neutral));
        }
        assert!(Faction::Neutral.enemies().is_empty());
    }

    #[test]
    fn test_start_positions() {
        let s = Settlements::default();
        assert!(Faction::Villain.start_position(&s).distance(DVec2::new(-27.0, -27.0)) < 1e-9);
        assert!(Faction::Elves.start_position(&s).distance(s.elf_village) < 1e-9);
    }

    #[test]
    fn test_parse() {
        assert_eq!("guards".parse::<Faction>(), Ok(Faction::Guards));
        assert!("orcs".parse::<Faction>().is_err());
    }
}
