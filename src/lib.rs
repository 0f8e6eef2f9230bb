// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Korovany: a deterministic open-world simulation core.
//!
//! A seeded world of rolling terrain, a road, a river and a gorge, populated
//! by patrolling enemies and escorted caravans. The player moves, jumps,
//! fights and robs caravans; every hit lands on a specific body part.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  sim: GameState::step, autopilot, snapshot  │
//! ├─────────────────────────────────────────────┤
//! │  entity: player, enemy AI, caravans         │
//! │  combat + body: hit resolution, parts       │
//! ├─────────────────────────────────────────────┤
//! │  world: terrain, geo, collision, hazards    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The world is built once from the seed and never changes. Everything
//! random flows through [`rng::SimRng`], so a seed plus an input sequence
//! replays bit for bit.

pub mod body;
pub mod collision;
pub mod combat;
pub mod config;
pub mod entity;
pub mod error;
pub mod faction;
pub mod geo;
pub mod items;
pub mod rng;
pub mod sim;
pub mod terrain;
pub mod world;

pub use config::SimConfig;
pub use error::{ActionError, ConfigError, SnapshotError};
pub use faction::Faction;
pub use sim::{Autopilot, AutopilotMode, GameSnapshot, GameState, SimEvent};
