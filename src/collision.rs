//! Circle-versus-static-geometry collision.
//!
//! Moving entities are circles on the ground plane. Buildings are
//! axis-aligned boxes; bridges clamp the across-deck coordinate (see
//! [`crate::geo::Bridge::clamp_between_railings`]). Nothing here keeps
//! state: callers pass the proposal and get back a corrected position.

mod aabb;
mod slide;

pub use aabb::{resolve_against_buildings, BuildingBox, FOOTPRINT_MARGIN};
pub use slide::{slide_around, was_blocked, StuckTracker, BLOCK_EPSILON, STUCK_TIMEOUT};
