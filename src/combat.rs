//! Combat resolution and the combat log.
//!
//! One resolver serves every pairing (player on enemy, enemy on player,
//! player on caravan); only the operands differ.

mod log;
mod resolve;

pub use log::{CombatLog, LogLine, LogSource};
pub use resolve::{
    resolve_attack, AttackResult, AttackRoll, CRIT_CHANCE, CRIT_MULTIPLIER, MAX_AIM_CHANCE,
    MAX_DODGE_CHANCE,
};
