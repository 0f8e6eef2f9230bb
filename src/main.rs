//! Korovany CLI - headless sessions, combat statistics and world probes.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use korovany::combat::AttackRoll;
use korovany::rng::DEFAULT_SEED;
use korovany::{AutopilotMode, Faction};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Korovany - a deterministic open-world simulation core
#[derive(Parser, Debug)]
#[command(name = "korovany")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log debug output to stderr (overrides the default `warn` filter)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a headless session driven by the autopilot
    Run {
        /// Player faction: elves, guards, villain or neutral
        #[arg(long, default_value = "guards")]
        faction: Faction,

        /// World seed
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Seconds of game time to simulate
        #[arg(long, default_value = "60")]
        seconds: f64,

        /// Frame delta in seconds
        #[arg(long, default_value = "0.05")]
        dt: f64,

        /// Autopilot mode: idle, wander or raid
        #[arg(short, long, default_value = "wander")]
        autopilot: AutopilotMode,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Save a snapshot when the run ends
        #[arg(long)]
        save: Option<std::path::PathBuf>,

        /// Resume from a snapshot instead of building a new session
        #[arg(long)]
        load: Option<std::path::PathBuf>,

        /// JSON config overriding the default tunables
        #[arg(long)]
        config: Option<std::path::PathBuf>,

        /// Suppress the event stream
        #[arg(short, long)]
        quiet: bool,
    },

    /// Estimate dodge, crit and damage rates of the attack resolver
    CombatStats {
        /// Number of attacks to resolve
        #[arg(short, long, default_value = "100000")]
        trials: u64,

        /// Raw attacker damage
        #[arg(long, default_value = "20")]
        attacker_damage: u32,

        /// Attacker agility
        #[arg(long, default_value = "10")]
        attacker_agility: u32,

        /// Defender armor
        #[arg(long, default_value = "0")]
        defender_armor: u32,

        /// Defender agility
        #[arg(long, default_value = "10")]
        defender_agility: u32,

        /// Base seed
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Print terrain, hazard and zone data at a point
    Probe {
        /// World x
        #[arg(allow_negative_numbers = true)]
        x: f64,

        /// World y
        #[arg(allow_negative_numbers = true)]
        y: f64,

        /// World seed
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Run {
            faction,
            seed,
            seconds,
            dt,
            autopilot,
            format,
            save,
            load,
            config,
            quiet,
        } => cli::run::execute(cli::run::RunOptions {
            faction,
            seed,
            seconds,
            dt,
            autopilot,
            format,
            save,
            load,
            config,
            quiet,
        }),

        Commands::CombatStats {
            trials,
            attacker_damage,
            attacker_agility,
            defender_armor,
            defender_agility,
            seed,
            threads,
            progress,
            format,
        } => cli::stats::execute(
            trials,
            AttackRoll {
                attacker_damage,
                attacker_agility,
                defender_armor,
                defender_agility,
            },
            seed,
            threads,
            progress,
            format,
        ),

        Commands::Probe { x, y, seed, format } => cli::probe::execute(x, y, seed, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
