//! Discrete simulation events for presentation layers.

use serde::Serialize;

use crate::body::{BodyEvent, BodyEventKind, BodyPartId};
use crate::combat::{LogLine, LogSource};
use crate::entity::{DeathCause, EnemyId, EnemyKind, KorovanId, Loot};
use crate::world::Hazard;

/// Something that happened during a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    /// An enemy started chasing the player.
    Aggro {
        /// Who.
        enemy: EnemyId,
        /// Template.
        kind: EnemyKind,
    },
    /// An enemy gave up the chase.
    ChaseAbandoned {
        /// Who.
        enemy: EnemyId,
        /// Template.
        kind: EnemyKind,
    },
    /// An enemy swung at the player.
    EnemySwing {
        /// Who.
        enemy: EnemyId,
        /// Template.
        kind: EnemyKind,
        /// Raw damage before resolution.
        damage: u32,
    },
    /// An enemy attack landed on the player.
    PlayerHit {
        /// Attacker.
        enemy: EnemyId,
        /// Template.
        kind: EnemyKind,
        /// Resolved damage.
        damage: u32,
        /// Critical hit.
        crit: bool,
        /// Part struck.
        part: BodyPartId,
    },
    /// The player dodged an enemy attack.
    PlayerDodged {
        /// Attacker.
        enemy: EnemyId,
        /// Template.
        kind: EnemyKind,
    },
    /// A player attack landed on an enemy.
    EnemyHit {
        /// Target.
        enemy: EnemyId,
        /// Template.
        kind: EnemyKind,
        /// Resolved damage.
        damage: u32,
        /// Critical hit.
        crit: bool,
        /// Part aimed at.
        part: Option<BodyPartId>,
    },
    /// An enemy dodged the player.
    EnemyDodged {
        /// Target.
        enemy: EnemyId,
        /// Template.
        kind: EnemyKind,
    },
    /// An enemy died.
    EnemyKilled {
        /// Who.
        enemy: EnemyId,
        /// Template.
        kind: EnemyKind,
    },
    /// Gold and items went into the player's inventory.
    LootGained(Loot),
    /// A caravan took damage.
    KorovanHit {
        /// Which caravan.
        korovan: KorovanId,
        /// Damage dealt.
        damage: u32,
        /// HP left.
        hp: u32,
    },
    /// A caravan broke and was robbed.
    KorovanLooted {
        /// Which caravan.
        korovan: KorovanId,
    },
    /// A caravan halted and its escort turned on the player.
    KorovanAlerted {
        /// Which caravan.
        korovan: KorovanId,
    },
    /// Something happened to one of the player's body parts.
    Body(BodyEvent),
    /// Blood loss this tick.
    Bleed {
        /// HP lost.
        damage: u32,
    },
    /// The player walked into a trench.
    HazardDeath {
        /// Which trench.
        hazard: Hazard,
    },
    /// The player died.
    PlayerDied {
        /// Why.
        cause: DeathCause,
    },
    /// A kill count worth announcing.
    Killstreak {
        /// Kills without taking damage.
        count: u32,
    },
}

impl SimEvent {
    /// Stable snake_case name, matching the serialized tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Aggro { .. } => "aggro",
            Self::ChaseAbandoned { .. } => "chase_abandoned",
            Self::EnemySwing { .. } => "enemy_swing",
            Self::PlayerHit { .. } => "player_hit",
            Self::PlayerDodged { .. } => "player_dodged",
            Self::EnemyHit { .. } => "enemy_hit",
            Self::EnemyDodged { .. } => "enemy_dodged",
            Self::EnemyKilled { .. } => "enemy_killed",
            Self::LootGained(_) => "loot_gained",
            Self::KorovanHit { .. } => "korovan_hit",
            Self::KorovanLooted { .. } => "korovan_looted",
            Self::KorovanAlerted { .. } => "korovan_alerted",
            Self::Body(_) => "body",
            Self::Bleed { .. } => "bleed",
            Self::HazardDeath { .. } => "hazard_death",
            Self::PlayerDied { .. } => "player_died",
            Self::Killstreak { .. } => "killstreak",
        }
    }

    /// The combat log line mirroring this event, if it is worth one.
    #[must_use]
    pub fn log_line(&self) -> Option<LogLine> {
        let (msg, source) = match self {
            Self::Aggro { kind, .. } => (format!("{kind} spotted you"), LogSource::Enemy),
            Self::ChaseAbandoned { .. } | Self::EnemySwing { .. } => return None,
            Self::PlayerHit {
                kind,
                damage,
                crit,
                part,
                ..
            } => {
                let crit = if *crit { " (critical)" } else { "" };
                (
                    format!("{kind} hits your {part} for {damage}{crit}"),
                    LogSource::Enemy,
                )
            }
            Self::PlayerDodged { kind, .. } => {
                (format!("you dodge the {kind}"), LogSource::Enemy)
            }
            Self::EnemyHit {
                kind, damage, crit, ..
            } => {
                let crit = if *crit { " (critical)" } else { "" };
                (
                    format!("you hit the {kind} for {damage}{crit}"),
                    LogSource::Player,
                )
            }
            Self::EnemyDodged { kind, .. } => {
                (format!("the {kind} dodges"), LogSource::Player)
            }
            Self::EnemyKilled { kind, .. } => (format!("{kind} killed"), LogSource::Player),
            Self::LootGained(loot) => {
                let items: u32 = loot.items.values().sum();
                (
                    format!("+{} gold, {items} items", loot.gold),
                    LogSource::Loot,
                )
            }
            Self::KorovanHit { korovan, damage, hp } => (
                format!("{korovan} takes {damage} ({hp}/{} HP)", crate::entity::KOROVAN_HP),
                LogSource::Korovan,
            ),
            Self::KorovanLooted { korovan } => {
                (format!("{korovan} robbed"), LogSource::Korovan)
            }
            Self::KorovanAlerted { korovan } => {
                (format!("{korovan} escort raises the alarm"), LogSource::Korovan)
            }
            Self::Body(event) => {
                let what = match event.kind {
                    BodyEventKind::Bleeding => "is bleeding",
                    BodyEventKind::Injured => "is injured",
                    BodyEventKind::Severed => "was severed",
                    BodyEventKind::Death => "was destroyed",
                };
                (format!("your {} {what}", event.part), LogSource::Body)
            }
            Self::Bleed { damage } => (format!("bleeding: -{damage} HP"), LogSource::Body),
            Self::HazardDeath { hazard } => {
                (format!("you {}", hazard.describe()), LogSource::System)
            }
            Self::PlayerDied { cause } => (format!("you died: {cause}"), LogSource::System),
            Self::Killstreak { count } => (format!("killstreak: {count}"), LogSource::Player),
        };
        Some(LogLine { msg, source })
    }
}
