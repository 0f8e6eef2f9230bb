//! Run command implementation.

use super::output::{format_run_text, RunSummary};
use super::{CliError, OutputFormat};
use korovany::entity::EnemyState;
use korovany::sim::check_invariants;
use korovany::{Autopilot, AutopilotMode, Faction, GameSnapshot, GameState, SimConfig, SimEvent};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Options of the run command.
#[derive(Debug)]
pub(crate) struct RunOptions {
    pub(crate) faction: Faction,
    pub(crate) seed: u64,
    pub(crate) seconds: f64,
    pub(crate) dt: f64,
    pub(crate) autopilot: AutopilotMode,
    pub(crate) format: OutputFormat,
    pub(crate) save: Option<PathBuf>,
    pub(crate) load: Option<PathBuf>,
    pub(crate) config: Option<PathBuf>,
    pub(crate) quiet: bool,
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the config or snapshot cannot be read, or the
/// snapshot cannot be written.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn execute(options: RunOptions) -> Result<(), CliError> {
    if !(options.dt.is_finite() && options.dt > 0.0) {
        return Err(CliError::new(format!("--dt must be positive, got {}", options.dt)));
    }
    if !(options.seconds.is_finite() && options.seconds >= 0.0) {
        return Err(CliError::new(format!(
            "--seconds must be zero or more, got {}",
            options.seconds
        )));
    }

    let config = match &options.config {
        Some(path) => SimConfig::from_json_file(path)?,
        None => SimConfig::default(),
    };

    let mut state = match &options.load {
        Some(path) => {
            let snapshot = GameSnapshot::load(path)?;
            GameState::from_snapshot(config, &snapshot)?
        }
        None => GameState::new(config, options.faction, options.seed)?,
    };

    let text = options.format == OutputFormat::Text;
    if text && !options.quiet {
        println!(
            "Running {} as {} with seed {} ({} autopilot)...",
            fmt_seconds(options.seconds),
            state.player.faction(),
            state.seed(),
            options.autopilot
        );
        println!();
    }

    let frames = (options.seconds / options.dt).ceil() as u64;
    let mut pilot = Autopilot::new(options.autopilot);
    let mut counts: BTreeMap<&'static str, u64> = BTreeMap::new();
    let mut frames_run = 0;
    for _ in 0..frames {
        if state.player.is_dead() {
            break;
        }
        let input = pilot.input(&state);
        let events = state.step(options.dt, &input);
        frames_run += 1;
        for event in &events {
            *counts.entry(event.name()).or_insert(0) += 1;
            if text && !options.quiet {
                print_event(state.time(), event);
            }
        }
    }

    let violations = check_invariants(&state);
    for v in &violations {
        tracing::warn!(%v, "invariant check failed");
    }

    if let Some(path) = &options.save {
        state.to_snapshot().save(path)?;
        if text && !options.quiet {
            println!();
            println!("Snapshot saved to: {}", path.display());
        }
    }

    let summary = RunSummary {
        seed: state.seed(),
        faction: state.player.faction(),
        autopilot: options.autopilot,
        frames: frames_run,
        time: state.time(),
        alive: !state.player.is_dead(),
        death: state.player.death().map(|c| c.to_string()),
        hp: state.player.body.total_hp(),
        kills: state.player.kills,
        gold: state.player.inventory.gold,
        enemies_alive: state.living_enemies().count(),
        enemies_chasing: state
            .enemies
            .iter()
            .filter(|e| e.state() == EnemyState::Chase)
            .count(),
        korovans_looted: state.korovans.iter().filter(|k| k.is_looted()).count(),
        zone: state.current_zone().key(),
        events: counts,
        violations: violations.iter().map(ToString::to_string).collect(),
    };

    match options.format {
        OutputFormat::Text => {
            if !options.quiet {
                println!();
            }
            print!("{}", format_run_text(&summary));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

fn print_event(time: f64, event: &SimEvent) {
    if let Some(line) = event.log_line() {
        println!("[{time:>7.2}s] {:<7} {}", line.source.tag(), line.msg);
    }
}

fn fmt_seconds(seconds: f64) -> String {
    format!("{seconds:.1}s")
}
