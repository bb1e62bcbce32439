use std::fs;
use std::path::Path;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::arena::{EpisodeOutcome, Outcome};
use crate::config::{BenchmarkConfig, PlayerKind};

const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("no episodes were recorded")]
    Empty,
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates per-episode outcomes into run-level statistics.
pub struct AnalyticsCollector {
    run_id: String,
    player: PlayerKind,
    max_turns: usize,
    episodes: usize,
    winning_turns: Vec<f64>,
    probes: usize,
    failed_probes: usize,
    relocations: usize,
    panics: usize,
    explorations: usize,
    faults: usize,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Self {
        Self {
            run_id: config.run_id.clone(),
            player: config.player.kind,
            max_turns: config.episodes.max_turns,
            episodes: 0,
            winning_turns: Vec::new(),
            probes: 0,
            failed_probes: 0,
            relocations: 0,
            panics: 0,
            explorations: 0,
            faults: 0,
        }
    }

    pub fn record_episode(&mut self, outcome: &EpisodeOutcome) {
        self.episodes += 1;
        if outcome.outcome == Outcome::OpponentWon {
            self.winning_turns.push(outcome.turns as f64);
        }
        let stats = &outcome.stats;
        self.probes += stats.probes;
        self.failed_probes += stats.failed_probes;
        self.relocations += stats.relocations;
        self.panics += stats.panics;
        self.explorations += stats.explorations;
        self.faults += stats.faults;
    }

    pub fn finalize(self) -> Result<AnalyticsSummary, AnalyticsError> {
        if self.episodes == 0 {
            return Err(AnalyticsError::Empty);
        }

        let wins = self.winning_turns.len();
        let (turns_ci_low, turns_ci_high) = confidence_interval(&self.winning_turns);
        let average_turns_to_win = mean(&self.winning_turns);
        let per_episode = |count: usize| count as f64 / self.episodes as f64;

        Ok(AnalyticsSummary {
            win_rate: per_episode(wins),
            average_turns_to_win,
            turns_ci95: (turns_ci_low, turns_ci_high),
            fastest_win: self.winning_turns.iter().copied().reduce(f64::min),
            probe_failure_rate: if self.probes == 0 {
                0.0
            } else {
                self.failed_probes as f64 / self.probes as f64
            },
            relocations_per_episode: per_episode(self.relocations),
            panics_per_episode: per_episode(self.panics),
            explorations_per_episode: per_episode(self.explorations),
            faults_per_episode: per_episode(self.faults),
            run_id: self.run_id,
            player: self.player,
            max_turns: self.max_turns,
            episodes: self.episodes,
            wins,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub run_id: String,
    pub player: PlayerKind,
    pub max_turns: usize,
    pub episodes: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub average_turns_to_win: Option<f64>,
    pub turns_ci95: (f64, f64),
    pub fastest_win: Option<f64>,
    pub probe_failure_rate: f64,
    pub relocations_per_episode: f64,
    pub panics_per_episode: f64,
    pub explorations_per_episode: f64,
    pub faults_per_episode: f64,
}

impl AnalyticsSummary {
    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        let mut rows = String::new();
        rows.push_str("# Opponent Benchmark Summary\n\n");
        rows.push_str(&format!(
            "Run `{}`: {} episodes, player {:?}, limit {} turns\n\n",
            self.run_id, self.episodes, self.player, self.max_turns
        ));
        rows.push_str("| Metric | Value |\n");
        rows.push_str("|--------|-------|\n");
        rows.push_str(&format!(
            "| Win % | {:.1}% ({}/{}) |\n",
            self.win_rate * 100.0,
            self.wins,
            self.episodes
        ));
        rows.push_str(&format!(
            "| Avg turns to win | {} |\n",
            format_optional(self.average_turns_to_win)
        ));
        rows.push_str(&format!(
            "| 95% CI (turns) | [{:.1}, {:.1}] |\n",
            self.turns_ci95.0, self.turns_ci95.1
        ));
        rows.push_str(&format!(
            "| Fastest win | {} |\n",
            format_optional(self.fastest_win)
        ));
        rows.push_str(&format!(
            "| Failed probe % | {:.1}% |\n",
            self.probe_failure_rate * 100.0
        ));
        rows.push_str(&format!(
            "| Relocations / episode | {:.2} |\n",
            self.relocations_per_episode
        ));
        rows.push_str(&format!(
            "| Panics / episode | {:.2} |\n",
            self.panics_per_episode
        ));
        rows.push_str(&format!(
            "| Explorations / episode | {:.2} |\n",
            self.explorations_per_episode
        ));
        rows.push_str(&format!(
            "| Faults / episode | {:.2} |\n",
            self.faults_per_episode
        ));

        fs::write(path.as_ref(), rows).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }
}

fn format_optional(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.1}"))
        .unwrap_or_else(|| "n/a".to_string())
}

fn mean(points: &[f64]) -> Option<f64> {
    if points.is_empty() {
        None
    } else {
        Some(points.iter().sum::<f64>() / points.len() as f64)
    }
}

/// Normal-approximation interval around the mean of `points`.
fn confidence_interval(points: &[f64]) -> (f64, f64) {
    let Some(mean) = mean(points) else {
        return (0.0, 0.0);
    };
    if points.len() == 1 {
        return (mean, mean);
    }
    let variance = points
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (points.len() as f64 - 1.0);
    let std_error = (variance / points.len() as f64).sqrt();
    let z = Normal::new(0.0, 1.0)
        .map(|normal| normal.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0))
        .unwrap_or(1.96);
    let margin = z * std_error;
    (mean - margin, mean + margin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::EpisodeStats;
    use tombstone_core::grid::Cell;
    use tombstone_core::maze::WallLayout;

    fn config() -> BenchmarkConfig {
        serde_yaml::from_str(
            r#"
run_id: "analytics"
episodes:
  count: 3
outputs:
  jsonl: "out/rows.jsonl"
  summary_md: "out/summary.md"
"#,
        )
        .expect("parse")
    }

    fn episode(outcome: Outcome, turns: usize, probes: usize, failed: usize) -> EpisodeOutcome {
        EpisodeOutcome {
            outcome,
            turns,
            stats: EpisodeStats {
                probes,
                failed_probes: failed,
                ..EpisodeStats::default()
            },
            opponent_cell: Cell::START,
            layout: WallLayout::fully_open(),
        }
    }

    #[test]
    fn summarizes_wins_and_probes() {
        let mut collector = AnalyticsCollector::new(&config());
        collector.record_episode(&episode(Outcome::OpponentWon, 10, 4, 1));
        collector.record_episode(&episode(Outcome::OpponentWon, 30, 6, 3));
        collector.record_episode(&episode(Outcome::TurnLimit, 400, 10, 6));
        let summary = collector.finalize().expect("summary");

        assert_eq!(summary.episodes, 3);
        assert_eq!(summary.wins, 2);
        assert!((summary.win_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.average_turns_to_win, Some(20.0));
        assert_eq!(summary.fastest_win, Some(10.0));
        assert!((summary.probe_failure_rate - 0.5).abs() < 1e-9);
        assert!(summary.turns_ci95.0 < 20.0 && summary.turns_ci95.1 > 20.0);
    }

    #[test]
    fn interval_matches_normal_quantile() {
        let (low, high) = confidence_interval(&[1.0, 3.0]);
        // mean 2, sample std dev sqrt(2), std error 1
        assert!((low - (2.0 - 1.959964)).abs() < 1e-4);
        assert!((high - (2.0 + 1.959964)).abs() < 1e-4);
    }

    #[test]
    fn empty_run_is_an_error() {
        let collector = AnalyticsCollector::new(&config());
        assert!(matches!(collector.finalize(), Err(AnalyticsError::Empty)));
    }
}
