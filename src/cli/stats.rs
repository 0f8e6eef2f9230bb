//! Combat-stats command: Monte Carlo estimation of the attack resolver.

use super::output::{format_combat_text, CombatStats, JsonCombatStats};
use super::{CliError, OutputFormat};
use indicatif::{ProgressBar, ProgressStyle};
use korovany::combat::{resolve_attack, AttackRoll};
use korovany::config::AimWeights;
use korovany::rng::SimRng;
use rayon::prelude::*;
use std::time::Instant;

/// Trials resolved per parallel work item.
const CHUNK: u64 = 10_000;

/// Execute the combat-stats command.
///
/// # Errors
///
/// Returns an error if the JSON output cannot be produced.
pub(crate) fn execute(
    trials: u64,
    roll: AttackRoll,
    seed: u64,
    threads: Option<usize>,
    progress: bool,
    format: OutputFormat,
) -> Result<(), CliError> {
    if trials == 0 {
        return Err(CliError::new("--trials must be at least 1"));
    }

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if progress {
        let pb = ProgressBar::new(trials);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} trials ({per_sec})")
            .map_err(|e| CliError::new(format!("invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let aim = AimWeights::default();
    let chunks = trials.div_ceil(CHUNK);

    // Each chunk owns a generator seeded from its index, so the totals do
    // not depend on how rayon splits the work.
    let stats = (0..chunks)
        .into_par_iter()
        .fold(CombatStats::default, |mut local, chunk| {
            let first = chunk * CHUNK;
            let count = CHUNK.min(trials - first);
            let mut rng = SimRng::from_seed_u64(seed.wrapping_add(chunk));
            for _ in 0..count {
                record(&mut local, resolve_attack(&mut rng, roll, &aim));
            }
            if let Some(pb) = &pb {
                pb.inc(count);
            }
            local
        })
        .reduce(CombatStats::default, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }
    let duration = start.elapsed();
    tracing::debug!(trials, elapsed_ms = duration.as_millis(), "combat trials finished");

    match format {
        OutputFormat::Text => {
            print!("{}", format_combat_text(&stats));
            println!();
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonCombatStats::from_stats(&stats))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn record(stats: &mut CombatStats, result: korovany::combat::AttackResult) {
    stats.trials += 1;
    if !result.hit {
        return;
    }
    stats.hits += 1;
    stats.total_damage += u64::from(result.damage);
    if result.crit {
        stats.crits += 1;
    }
    if let Some(part) = result.target_part {
        *stats.parts.entry(part.name()).or_insert(0) += 1;
    }
}
