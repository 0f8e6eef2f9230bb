//! Versioned save format.
//!
//! World geometry is not stored: it is rebuilt from the seed and the stored
//! entity state is laid over it.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::invariants::check_invariants;
use super::state::GameState;
use crate::body::PartStatus;
use crate::combat::LogSource;
use crate::config::SimConfig;
use crate::entity::{EnemySnapshot, EnemyState, KorovanSnapshot, Player, PlayerSnapshot};
use crate::error::SnapshotError;
use crate::items::Market;
use crate::rng::SimRng;

/// Format version written and accepted by this build.
pub const SNAPSHOT_VERSION: &str = "1.0";

const RESEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Everything needed to resume a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Format version.
    pub version: String,
    /// World seed.
    pub seed: u64,
    /// Frames stepped.
    #[serde(default)]
    pub steps: u64,
    /// Kills since the player was last hurt.
    #[serde(default)]
    pub killstreak: u32,
    /// Player state, including faction and play time.
    pub player: PlayerSnapshot,
    /// Enemies in id order.
    pub enemies: Vec<EnemySnapshot>,
    /// Caravans in id order.
    pub korovans: Vec<KorovanSnapshot>,
    /// Market stock per zone.
    #[serde(default)]
    pub markets: Vec<Market>,
}

impl GameSnapshot {
    /// Write as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        tracing::debug!(path = %path.display(), "snapshot written");
        Ok(())
    }

    /// Read, version-check and validate a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a snapshot, was
    /// written by an unsupported version, or holds contradictory state.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        snapshot.check_version()?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reject stored entities whose fields contradict each other.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Invalid`] naming the first bad entry.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if !self.player.pos.is_finite() || !self.player.z.is_finite() {
            return Err(invalid(format!("player position {} is not finite", self.player.pos)));
        }
        for (id, part) in &self.player.body {
            if part.hp > id.max_hp() {
                return Err(invalid(format!(
                    "{id} has {} hp over its {} max",
                    part.hp,
                    id.max_hp()
                )));
            }
            match part.status {
                PartStatus::Severed if part.hp != 0 => {
                    return Err(invalid(format!("severed {id} has {} hp", part.hp)));
                }
                PartStatus::Severed if id.is_vital() => {
                    return Err(invalid(format!("vital {id} is severed")));
                }
                PartStatus::Prosthetic if part.prosthetic.is_none() => {
                    return Err(invalid(format!("{id} is prosthetic with nothing fitted")));
                }
                _ => {}
            }
        }
        for (index, enemy) in self.enemies.iter().enumerate() {
            if !enemy.pos.is_finite() {
                return Err(invalid(format!("enemy {index} position is not finite")));
            }
            if enemy.state == EnemyState::Dead && enemy.hp != 0 {
                return Err(invalid(format!("dead enemy {index} has {} hp", enemy.hp)));
            }
        }
        for (index, korovan) in self.korovans.iter().enumerate() {
            if !korovan.pos.is_finite() {
                return Err(invalid(format!("caravan {index} position is not finite")));
            }
            if korovan.looted && (korovan.alive || korovan.hp != 0) {
                return Err(invalid(format!(
                    "looted caravan {index} is alive={} with {} hp",
                    korovan.alive, korovan.hp
                )));
            }
        }
        Ok(())
    }

    fn check_version(&self) -> Result<(), SnapshotError> {
        if self.version == SNAPSHOT_VERSION {
            Ok(())
        } else {
            Err(SnapshotError::Version {
                found: self.version.clone(),
                expected: SNAPSHOT_VERSION,
            })
        }
    }
}

fn invalid(reason: String) -> SnapshotError {
    SnapshotError::Invalid(reason)
}

impl GameState {
    /// Capture the mutable part of the session.
    #[must_use]
    pub fn to_snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            seed: self.seed,
            steps: self.steps,
            killstreak: self.killstreak,
            player: self.player.to_snapshot(),
            enemies: self.enemies.iter().map(crate::entity::Enemy::to_snapshot).collect(),
            korovans: self.korovans.iter().map(crate::entity::Korovan::to_snapshot).collect(),
            markets: self.markets.clone(),
        }
    }

    /// Rebuild the world from the snapshot seed and restore entity state.
    ///
    /// Entities missing from the snapshot keep their freshly generated
    /// state; extra entries are ignored. The random stream restarts from a
    /// value derived from the seed and step count.
    ///
    /// # Errors
    ///
    /// Fails on a version mismatch, contradictory entity state, or an
    /// invalid `config`.
    pub fn from_snapshot(config: SimConfig, snapshot: &GameSnapshot) -> Result<Self, SnapshotError> {
        snapshot.check_version()?;
        snapshot.validate()?;
        let mut state = Self::new(config, snapshot.player.faction, snapshot.seed)?;

        state.player = Player::from_snapshot(&snapshot.player, &state.world.geography().settlements);
        if snapshot.enemies.len() != state.enemies.len() {
            tracing::warn!(
                stored = snapshot.enemies.len(),
                generated = state.enemies.len(),
                "enemy count differs from the generated world"
            );
        }
        for (enemy, stored) in state.enemies.iter_mut().zip(&snapshot.enemies) {
            enemy.restore(stored);
        }
        if snapshot.korovans.len() != state.korovans.len() {
            tracing::warn!(
                stored = snapshot.korovans.len(),
                generated = state.korovans.len(),
                "caravan count differs from the generated world"
            );
        }
        let road_len = state.world.geography().road.len();
        for (korovan, stored) in state.korovans.iter_mut().zip(&snapshot.korovans) {
            korovan.restore(stored, road_len);
        }
        for market in &snapshot.markets {
            if let Some(slot) = state.markets.iter_mut().find(|m| m.zone() == market.zone()) {
                *slot = market.clone();
            }
        }

        if let Some(v) = check_invariants(&state).into_iter().next() {
            return Err(invalid(v.message));
        }

        state.killstreak = snapshot.killstreak;
        state.steps = snapshot.steps;
        state.rng = SimRng::from_seed_u64(snapshot.seed ^ snapshot.steps.wrapping_mul(RESEED_MIX));
        state.log.add("game loaded", LogSource::Save);
        tracing::info!(seed = snapshot.seed, steps = snapshot.steps, "session restored");
        Ok(state)
    }
}
