//! Simulation tunables.
//!
//! Everything here has a sensible default; a JSON file only needs the
//! fields it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::body::BodyPartId;
use crate::error::ConfigError;

/// How the separation passes read neighbour positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparationMode {
    /// Every push is computed from the positions at the start of the pass.
    #[default]
    DoubleBuffered,
    /// Each entity sees the pushes already applied earlier in the pass.
    Sequential,
}

/// Pairwise repulsion between entities of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeparationParams {
    /// Pairs closer than this push apart.
    pub radius: f64,
    /// Fraction of the overlap resolved per push.
    pub factor: f64,
    /// Largest push per second of frame time.
    pub rate: f64,
}

impl SeparationParams {
    /// Distance each member of a pair at `dist` moves apart this frame.
    /// Zero outside the radius.
    #[must_use]
    #[inline]
    pub fn push(&self, dist: f64, dt: f64) -> f64 {
        if dist >= self.radius {
            return 0.0;
        }
        ((self.radius - dist) * self.factor).min(dt * self.rate)
    }
}

/// Relative weights of each part for an aimed hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AimWeights {
    /// Head weight.
    pub head: f64,
    /// Torso weight.
    pub torso: f64,
    /// Weight of each arm and each leg.
    pub limb: f64,
    /// Weight of each eye.
    pub eye: f64,
}

impl Default for AimWeights {
    fn default() -> Self {
        Self {
            head: 20.0,
            torso: 0.0,
            limb: 15.0,
            eye: 10.0,
        }
    }
}

impl AimWeights {
    /// Weight of `part`.
    #[must_use]
    pub const fn weight(&self, part: BodyPartId) -> f64 {
        match part {
            BodyPartId::Head => self.head,
            BodyPartId::Torso => self.torso,
            BodyPartId::RightArm
            | BodyPartId::LeftArm
            | BodyPartId::RightLeg
            | BodyPartId::LeftLeg => self.limb,
            BodyPartId::RightEye | BodyPartId::LeftEye => self.eye,
        }
    }

    /// Weights in [`BodyPartId::ALL`] order.
    #[must_use]
    pub fn table(&self) -> [f64; 8] {
        BodyPartId::ALL.map(|p| self.weight(p))
    }
}

/// Every simulation tunable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Largest frame delta a single step will simulate, in seconds.
    pub max_frame_dt: f64,
    /// Lines kept by the combat log.
    pub log_capacity: usize,
    /// Player position is clamped to `[-bound, bound]` on both axes.
    pub player_bound: f64,
    /// Player radius against buildings.
    pub player_radius: f64,
    /// Player radius against bridge railings.
    pub player_railing_radius: f64,
    /// Closest a living enemy may stand to the player.
    pub player_enemy_gap: f64,
    /// Enemy radius against buildings.
    pub enemy_radius: f64,
    /// Caravan radius against buildings.
    pub korovan_radius: f64,
    /// Seconds without progress before an actor counts as stuck.
    pub stuck_timeout: f64,
    /// Enemy-enemy repulsion.
    pub enemy_separation: SeparationParams,
    /// Caravan-caravan repulsion.
    pub korovan_separation: SeparationParams,
    /// Pass semantics shared by both separation passes.
    pub separation_mode: SeparationMode,
    /// Caravans push the player out to this distance.
    pub korovan_push_radius: f64,
    /// Seconds between bleed ticks.
    pub bleed_interval: f64,
    /// Caravans spawned at world build.
    pub korovan_count: usize,
    /// Aimed-hit part weights.
    pub aim_weights: AimWeights,
    /// Kill counts that announce a killstreak.
    pub killstreak_thresholds: Vec<u32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_frame_dt: 0.1,
            log_capacity: 8,
            player_bound: 340.0,
            player_radius: 0.5,
            player_railing_radius: 0.4,
            player_enemy_gap: 0.8,
            enemy_radius: 0.4,
            korovan_radius: 3.0,
            stuck_timeout: 0.5,
            enemy_separation: SeparationParams {
                radius: 1.2,
                factor: 0.3,
                rate: 2.0,
            },
            korovan_separation: SeparationParams {
                radius: 8.0,
                factor: 0.15,
                rate: 3.0,
            },
            separation_mode: SeparationMode::default(),
            korovan_push_radius: 3.5,
            bleed_interval: 1.0,
            korovan_count: 5,
            aim_weights: AimWeights::default(),
            killstreak_thresholds: vec![3, 5, 10],
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be a positive number, got {value}"),
        ))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be zero or more, got {value}"),
        ))
    }
}

impl SimConfig {
    /// Check every value is in range.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_frame_dt", self.max_frame_dt)?;
        if self.log_capacity == 0 {
            return Err(ConfigError::invalid("log_capacity", "must be at least 1"));
        }
        positive("player_bound", self.player_bound)?;
        positive("player_radius", self.player_radius)?;
        positive("player_railing_radius", self.player_railing_radius)?;
        non_negative("player_enemy_gap", self.player_enemy_gap)?;
        positive("enemy_radius", self.enemy_radius)?;
        positive("korovan_radius", self.korovan_radius)?;
        positive("stuck_timeout", self.stuck_timeout)?;
        positive("enemy_separation.radius", self.enemy_separation.radius)?;
        non_negative("enemy_separation.factor", self.enemy_separation.factor)?;
        non_negative("enemy_separation.rate", self.enemy_separation.rate)?;
        positive("korovan_separation.radius", self.korovan_separation.radius)?;
        non_negative("korovan_separation.factor", self.korovan_separation.factor)?;
        non_negative("korovan_separation.rate", self.korovan_separation.rate)?;
        non_negative("korovan_push_radius", self.korovan_push_radius)?;
        positive("bleed_interval", self.bleed_interval)?;

        let weights = self.aim_weights.table();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::invalid(
                "aim_weights",
                "weights must be finite and non-negative",
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(ConfigError::invalid(
                "aim_weights",
                "at least one weight must be positive",
            ));
        }
        if self.killstreak_thresholds.contains(&0) {
            return Err(ConfigError::invalid(
                "killstreak_thresholds",
                "thresholds start at 1",
            ));
        }
        Ok(())
    }

    /// Load a config from a JSON file and validate it.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not valid JSON, or holds
    /// out-of-range values.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Is `kills` one of the announced killstreak counts?
    #[must_use]
    pub fn is_killstreak(&self, kills: u32) -> bool {
        self.killstreak_thresholds.contains(&kills)
    }
}
