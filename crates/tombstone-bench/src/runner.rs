use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tombstone_bot::OpponentParams;
use tombstone_core::maze::WallLayout;
use tracing::{Level, event};

use crate::analytics::{AnalyticsCollector, AnalyticsError, AnalyticsSummary};
use crate::arena::{Arena, EpisodeOutcome, Outcome};
use crate::config::{BenchmarkConfig, PlayerKind, ResolvedOutputs};

/// Primary entry point for running a batch of episodes.
pub struct EpisodeRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    params: OpponentParams,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub episodes: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
    pub analytics: AnalyticsSummary,
}

#[derive(Debug, Serialize)]
struct EpisodeLogRow<'a> {
    run_id: &'a str,
    episode: usize,
    seed: u64,
    player: PlayerKind,
    outcome: Outcome,
    turns: usize,
    probes: usize,
    failed_probes: usize,
    relocations: usize,
    panics: usize,
    explorations: usize,
    faults: usize,
    final_cell: u8,
    layout: &'a WallLayout,
}

impl EpisodeRunner {
    /// Build a runner from a validated configuration.
    ///
    /// Opponent parameters come from `TOMBSTONE_*` environment overrides.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Self {
        Self::with_params(config, outputs, OpponentParams::from_env())
    }

    pub fn with_params(
        config: BenchmarkConfig,
        outputs: ResolvedOutputs,
        params: OpponentParams,
    ) -> Self {
        Self {
            config,
            outputs,
            params,
        }
    }

    /// Play every episode, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.episodes.seed.unwrap_or(0));
        let mut analytics = AnalyticsCollector::new(&self.config);
        let logging_enabled = self.config.logging.enable_structured;
        let mut rows_written = 0usize;

        for episode in 0..self.config.episodes.count {
            let seed = rng.next_u64();
            let arena = Arena::new(
                seed,
                self.config.player.kind,
                self.params,
                self.config.logging.path_details,
            );
            let outcome = arena.play(self.config.episodes.max_turns);

            if logging_enabled && tracing::enabled!(Level::INFO) {
                event!(
                    target: "tombstone_bench::episode",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    episode = episode as u64,
                    seed,
                    outcome = ?outcome.outcome,
                    turns = outcome.turns as u64,
                    probes = outcome.stats.probes as u64,
                    panics = outcome.stats.panics as u64
                );
            }

            analytics.record_episode(&outcome);
            write_episode_row(&mut writer, &self.config, episode, seed, &outcome)?;
            rows_written += 1;
        }

        writer.flush()?;

        let analytics = analytics.finalize()?;
        analytics.write_markdown(&self.outputs.summary_md)?;

        let telemetry_path =
            logging_enabled.then(|| self.outputs.telemetry_dir().join("telemetry.jsonl"));

        Ok(RunSummary {
            episodes: self.config.episodes.count,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
            analytics,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_episode_row(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    episode: usize,
    seed: u64,
    outcome: &EpisodeOutcome,
) -> Result<(), RunnerError> {
    let stats = &outcome.stats;
    let row = EpisodeLogRow {
        run_id: &config.run_id,
        episode,
        seed,
        player: config.player.kind,
        outcome: outcome.outcome,
        turns: outcome.turns,
        probes: stats.probes,
        failed_probes: stats.failed_probes,
        relocations: stats.relocations,
        panics: stats.panics,
        explorations: stats.explorations,
        faults: stats.faults,
        final_cell: outcome.opponent_cell.into(),
        layout: &outcome.layout,
    };

    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}
