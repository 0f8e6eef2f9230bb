//! Probe command: inspect the world at one point.

use super::{CliError, OutputFormat};
use glam::DVec2;
use korovany::rng::SimRng;
use korovany::world::{gorge_influence, river_influence, World};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Probe {
    x: f64,
    y: f64,
    seed: u64,
    visual_height: f64,
    gameplay_height: f64,
    lattice_height: f64,
    bridge: Option<&'static str>,
    river_influence: f64,
    gorge_influence: f64,
    hazard: Option<&'static str>,
    zone: &'static str,
}

/// Execute the probe command.
///
/// # Errors
///
/// Returns an error if the coordinates are not finite or JSON output fails.
pub(crate) fn execute(x: f64, y: f64, seed: u64, format: OutputFormat) -> Result<(), CliError> {
    if !x.is_finite() || !y.is_finite() {
        return Err(CliError::new("coordinates must be finite"));
    }
    let p = DVec2::new(x, y);
    let world = World::generate(&mut SimRng::from_seed_u64(seed));
    let geo = world.geography();
    let terrain = world.terrain();
    let probe = Probe {
        x,
        y,
        seed,
        visual_height: terrain.visual(p),
        gameplay_height: terrain.gameplay(p),
        lattice_height: terrain.at(p),
        bridge: geo.bridge_at(p).map(|b| match b.kind {
            korovany::geo::BridgeKind::Gorge => "gorge",
            korovany::geo::BridgeKind::River => "river",
        }),
        river_influence: river_influence(geo, p),
        gorge_influence: gorge_influence(geo, p),
        hazard: world.hazard_at(p).map(korovany::world::Hazard::describe),
        zone: world.zone_at(p).key(),
    };

    match format {
        OutputFormat::Text => {
            println!("Probe ({x:.2}, {y:.2}) seed {seed}");
            println!("  Visual height:   {:>8.3}", probe.visual_height);
            println!("  Gameplay height: {:>8.3}", probe.gameplay_height);
            println!("  Lattice height:  {:>8.3}", probe.lattice_height);
            println!("  Bridge:          {}", probe.bridge.unwrap_or("-"));
            println!("  River influence: {:>8.3}", probe.river_influence);
            println!("  Gorge influence: {:>8.3}", probe.gorge_influence);
            println!("  Hazard:          {}", probe.hazard.unwrap_or("-"));
            println!("  Zone:            {}", probe.zone);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&probe)?),
    }
    Ok(())
}
