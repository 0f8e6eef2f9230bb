//! Scripted player input for headless sessions.

use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::GameState;
use super::step::KOROVAN_REACH;
use crate::entity::{heading_of, PlayerInput};

/// Road waypoints closer than this count as reached.
const WAYPOINT_REACHED: f64 = 3.0;
/// Hostile enemies further away than this are ignored by a raid.
const RAID_ENEMY_RADIUS: f64 = 30.0;
/// A raid closes to this fraction of its reach before swinging.
const REACH_MARGIN: f64 = 0.8;
/// Lookahead used to steer around trenches.
const HAZARD_LOOKAHEAD: f64 = 3.0;

/// What the autopilot is trying to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutopilotMode {
    /// Stand still.
    #[default]
    Idle,
    /// Walk the main road end to end.
    Wander,
    /// Go after the nearest hostile enemy or caravan.
    Raid,
}

impl AutopilotMode {
    /// Stable key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Wander => "wander",
            Self::Raid => "raid",
        }
    }
}

impl fmt::Display for AutopilotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AutopilotMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "idle" => Ok(Self::Idle),
            "wander" => Ok(Self::Wander),
            "raid" => Ok(Self::Raid),
            other => Err(format!("unknown autopilot mode `{other}`")),
        }
    }
}

/// Produces one [`PlayerInput`] per frame from the current state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot {
    mode: AutopilotMode,
    next_wp: Option<usize>,
    forward: bool,
}

impl Autopilot {
    /// A fresh autopilot in `mode`.
    #[must_use]
    pub const fn new(mode: AutopilotMode) -> Self {
        Self {
            mode,
            next_wp: None,
            forward: true,
        }
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> AutopilotMode {
        self.mode
    }

    /// Input for the next frame.
    pub fn input(&mut self, state: &GameState) -> PlayerInput {
        if state.player.is_dead() {
            return PlayerInput::default();
        }
        match self.mode {
            AutopilotMode::Idle => PlayerInput::default(),
            AutopilotMode::Wander => self.wander(state),
            AutopilotMode::Raid => raid(state).unwrap_or_else(|| self.wander(state)),
        }
    }

    fn wander(&mut self, state: &GameState) -> PlayerInput {
        let road = &state.world.geography().road;
        if road.is_empty() {
            return PlayerInput::default();
        }
        let pos = state.player.pos;
        let mut wp = match self.next_wp {
            Some(wp) => wp.min(road.len() - 1),
            None => nearest_index(road, pos),
        };
        if pos.distance(road[wp]) < WAYPOINT_REACHED {
            if self.forward && wp + 1 == road.len() {
                self.forward = false;
            } else if !self.forward && wp == 0 {
                self.forward = true;
            }
            wp = if self.forward {
                (wp + 1).min(road.len() - 1)
            } else {
                wp.saturating_sub(1)
            };
        }
        self.next_wp = Some(wp);
        walk_toward(state, road[wp])
    }
}

fn nearest_index(points: &[DVec2], p: DVec2) -> usize {
    points
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.distance_squared(p).total_cmp(&b.1.distance_squared(p)))
        .map_or(0, |(i, _)| i)
}

fn raid(state: &GameState) -> Option<PlayerInput> {
    let player = &state.player;
    let pos = player.pos;
    let faction = player.faction();

    let enemy = state
        .living_enemies()
        .filter(|e| faction.is_hostile_to(e.faction()))
        .map(|e| (e.pos, e.pos.distance(pos)))
        .filter(|&(_, d)| d < RAID_ENEMY_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    let (target, reach) = if let Some((target, _)) = enemy {
        (target, player.inventory.weapon_range())
    } else {
        let (target, _) = state
            .korovans
            .iter()
            .filter(|k| k.is_alive() && !k.is_looted())
            .map(|k| (k.pos, k.pos.distance(pos)))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        (target, KOROVAN_REACH)
    };

    let delta = target - pos;
    let dist = delta.length();
    if dist < reach * REACH_MARGIN {
        return Some(PlayerInput {
            heading: (dist > 0.0).then(|| heading_of(delta)),
            attack: player.can_attack(),
            ..PlayerInput::default()
        });
    }
    Some(walk_toward(state, target))
}

fn walk_toward(state: &GameState, target: DVec2) -> PlayerInput {
    let pos = state.player.pos;
    let dir = steer_clear(state, pos, (target - pos).normalize_or_zero());
    PlayerInput {
        movement: dir,
        heading: (dir != DVec2::ZERO).then(|| heading_of(dir)),
        ..PlayerInput::default()
    }
}

/// Turn `dir` away from any trench just ahead, or stop if every way is
/// deadly.
fn steer_clear(state: &GameState, pos: DVec2, dir: DVec2) -> DVec2 {
    if dir == DVec2::ZERO {
        return dir;
    }
    let candidates = [dir, dir.perp(), -dir.perp(), -dir];
    candidates
        .into_iter()
        .find(|&d| state.world.hazard_at(pos + d * HAZARD_LOOKAHEAD).is_none())
        .unwrap_or(DVec2::ZERO)
}
