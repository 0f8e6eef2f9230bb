//! Output formatting utilities for CLI.

use korovany::{AutopilotMode, Faction};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// JSON-serializable session summary.
#[derive(Debug, Serialize)]
pub(super) struct RunSummary {
    pub(super) seed: u64,
    pub(super) faction: Faction,
    pub(super) autopilot: AutopilotMode,
    pub(super) frames: u64,
    pub(super) time: f64,
    pub(super) alive: bool,
    pub(super) death: Option<String>,
    pub(super) hp: u32,
    pub(super) kills: u32,
    pub(super) gold: u32,
    pub(super) enemies_alive: usize,
    pub(super) enemies_chasing: usize,
    pub(super) korovans_looted: usize,
    pub(super) zone: &'static str,
    /// Event counts by name.
    pub(super) events: BTreeMap<&'static str, u64>,
    pub(super) violations: Vec<String>,
}

/// Format a session summary as human-readable text.
pub(super) fn format_run_text(s: &RunSummary) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Session Result (seed: {})", s.seed);
    let _ = writeln!(output, "  Faction: {} ({} autopilot)", s.faction, s.autopilot);
    let _ = writeln!(output, "  Played: {:.1}s over {} frames", s.time, s.frames);
    match &s.death {
        Some(cause) => {
            let _ = writeln!(output, "  Status: dead ({cause})");
        }
        None => {
            let _ = writeln!(output, "  Status: alive, {} HP in the {} zone", s.hp, s.zone);
        }
    }
    let _ = writeln!(output, "  Kills: {}  Gold: {}", s.kills, s.gold);
    let _ = writeln!(
        output,
        "  Enemies: {} alive, {} chasing  Caravans looted: {}",
        s.enemies_alive, s.enemies_chasing, s.korovans_looted
    );
    if !s.events.is_empty() {
        output.push_str("\n  Events:\n");
        for (name, count) in &s.events {
            let _ = writeln!(output, "    {name:<16} {count}");
        }
    }
    if !s.violations.is_empty() {
        output.push_str("\n  Invariant violations:\n");
        for v in &s.violations {
            let _ = writeln!(output, "    {v}");
        }
    }
    output
}

/// Aggregated Monte Carlo attack results.
#[derive(Debug, Clone, Default, Serialize)]
pub(super) struct CombatStats {
    pub(super) trials: u64,
    pub(super) hits: u64,
    pub(super) crits: u64,
    pub(super) total_damage: u64,
    /// Hits per struck part.
    pub(super) parts: BTreeMap<&'static str, u64>,
}

impl CombatStats {
    /// Fold another accumulator into this one.
    pub(super) fn merge(&mut self, other: &Self) {
        self.trials += other.trials;
        self.hits += other.hits;
        self.crits += other.crits;
        self.total_damage += other.total_damage;
        for (&part, &n) in &other.parts {
            *self.parts.entry(part).or_insert(0) += n;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn ratio(n: u64, d: u64) -> f64 {
        if d == 0 { 0.0 } else { n as f64 / d as f64 }
    }

    pub(super) fn dodge_rate(&self) -> f64 {
        Self::ratio(self.trials - self.hits, self.trials)
    }

    pub(super) fn crit_rate(&self) -> f64 {
        Self::ratio(self.crits, self.hits)
    }

    pub(super) fn mean_damage(&self) -> f64 {
        Self::ratio(self.total_damage, self.hits)
    }
}

/// JSON-serializable combat statistics.
#[derive(Debug, Serialize)]
pub(super) struct JsonCombatStats<'a> {
    pub(super) dodge_rate: f64,
    pub(super) crit_rate: f64,
    pub(super) mean_damage: f64,
    pub(super) part_rates: BTreeMap<&'static str, f64>,
    pub(super) raw: &'a CombatStats,
}

impl<'a> JsonCombatStats<'a> {
    pub(super) fn from_stats(stats: &'a CombatStats) -> Self {
        Self {
            dodge_rate: stats.dodge_rate(),
            crit_rate: stats.crit_rate(),
            mean_damage: stats.mean_damage(),
            part_rates: stats
                .parts
                .iter()
                .map(|(&part, &n)| (part, CombatStats::ratio(n, stats.hits)))
                .collect(),
            raw: stats,
        }
    }
}

/// Format combat statistics as human-readable text.
pub(super) fn format_combat_text(stats: &CombatStats) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Combat Statistics ({} trials)", stats.trials);
    let _ = writeln!(output, "  Dodge rate:  {:>6.2}%", stats.dodge_rate() * 100.0);
    let _ = writeln!(output, "  Crit rate:   {:>6.2}%", stats.crit_rate() * 100.0);
    let _ = writeln!(output, "  Mean damage: {:>6.2}", stats.mean_damage());
    output.push_str("\n  Struck parts:\n");
    for (part, &n) in &stats.parts {
        let _ = writeln!(
            output,
            "    {part:<10} {:>6.2}%",
            CombatStats::ratio(n, stats.hits) * 100.0
        );
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_and_rates() {
        let mut a = CombatStats {
            trials: 10,
            hits: 8,
            crits: 1,
            total_damage: 80,
            parts: BTreeMap::from([("torso", 8)]),
        };
        let b = CombatStats {
            trials: 10,
            hits: 2,
            crits: 1,
            total_damage: 20,
            parts: BTreeMap::from([("head", 2)]),
        };
        a.merge(&b);
        assert_eq!(a.trials, 20);
        assert!((a.dodge_rate() - 0.5).abs() < 1e-12);
        assert!((a.crit_rate() - 0.2).abs() < 1e-12);
        assert!((a.mean_damage() - 10.0).abs() < 1e-12);
        assert_eq!(a.parts.len(), 2);
    }

    #[test]
    fn test_empty_stats_do_not_divide_by_zero() {
        let s = CombatStats::default();
        assert!(s.dodge_rate().abs() < f64::EPSILON);
        assert!(format_combat_text(&s).contains("0 trials"));
    }
}
