#![no_main]

//! Simulation step fuzzer.
//!
//! Feeds arbitrary frame deltas and inputs, including non-finite values,
//! through full steps and checks the world invariants afterwards.

use arbitrary::Arbitrary;
use glam::DVec2;
use korovany::entity::PlayerInput;
use korovany::sim::check_invariants;
use korovany::{Faction, GameState, SimConfig};
use libfuzzer_sys::fuzz_target;

/// One frame of input.
#[derive(Arbitrary, Debug)]
struct Frame {
    dt: f64,
    move_x: f64,
    move_y: f64,
    heading: Option<f64>,
    sneak: bool,
    jump: bool,
    attack: bool,
}

/// Structured input for step fuzzing.
#[derive(Arbitrary, Debug)]
struct StepInput {
    seed: u64,
    faction: u8,
    frames: Vec<Frame>,
}

const FACTIONS: [Faction; 4] = [Faction::Elves, Faction::Guards, Faction::Villain, Faction::Neutral];

fuzz_target!(|input: StepInput| {
    let faction = FACTIONS[usize::from(input.faction) % FACTIONS.len()];
    let Ok(mut state) = GameState::new(SimConfig::default(), faction, input.seed) else {
        return;
    };

    for frame in input.frames.iter().take(200) {
        let player_input = PlayerInput {
            movement: DVec2::new(frame.move_x, frame.move_y),
            heading: frame.heading,
            sneak: frame.sneak,
            jump: frame.jump,
            attack: frame.attack,
        };
        let _ = state.step(frame.dt, &player_input);
    }

    let violations = check_invariants(&state);
    assert!(violations.is_empty(), "Invariants violated: {violations:?}");
});
