//! Static world geometry and the distance primitives built on it.
//!
//! Everything here is authored data or a pure function of it: the road,
//! river and gorge paths, the two bridges, settlement anchors and the
//! town building footprints. The height field, collision resolver and
//! hazard checks all read the same [`Geography`] so the three stay
//! consistent.

mod bridge;
mod features;
mod path;

pub use bridge::{Bridge, BridgeKind};
pub use features::{
    Footprint, Geography, Settlements, DARK_MOUNTAIN_PEAK, DARK_MOUNTAIN_RADIUS, GORGE_DEPTH,
    GORGE_HALF_WIDTH, MAP_HALF_SIZE, RIVER_DEPTH, RIVER_HALF_WIDTH, ROAD_WIDTH,
};
pub use path::{distance_to_polyline, distance_to_segment, Segment};
