//! The frame-stepped simulation: state, step pipeline and everything that
//! reads or writes a whole session.

mod autopilot;
mod events;
mod invariants;
mod separation;
mod snapshot;
mod spawn;
mod state;
mod step;

pub use autopilot::{Autopilot, AutopilotMode};
pub use events::SimEvent;
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use separation::separate;
pub use snapshot::{GameSnapshot, SNAPSHOT_VERSION};
pub use spawn::{spawn_enemies, spawn_korovans, spawn_table, SpawnGroup, DEFAULT_SPREAD, GUARD_OFFSETS};
pub use state::{EntityView, GameState};
pub use step::{AIM_CONE_DOT, KOROVAN_REACH, RANGED_WEAPON_MIN};
