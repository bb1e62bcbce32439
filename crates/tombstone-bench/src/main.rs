use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use tombstone_bench::config::{BenchmarkConfig, PlayerKind, ResolvedOutputs};
use tombstone_bench::logging::init_logging;
use tombstone_bench::runner::EpisodeRunner;

/// Offline episode harness for the maze opponent.
#[derive(Debug, Parser)]
#[command(
    name = "tombstone-bench",
    author,
    version,
    about = "Deterministic episode harness for the Tombstone Maze opponent"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of episodes to play.
    #[arg(long, value_name = "COUNT")]
    episodes: Option<usize>,

    /// Override the RNG seed for maze generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the per-episode turn limit.
    #[arg(long, value_name = "TURNS")]
    max_turns: Option<usize>,

    /// Play without a roaming pawn.
    #[arg(long)]
    no_player: bool,

    /// Exit after validating the configuration (no episode is played).
    #[arg(long)]
    validate_only: bool,

    /// Dump every projected route at TRACE level regardless of config.
    #[arg(long)]
    log_path_details: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(episodes) = cli.episodes {
        config.episodes.count = episodes;
    }

    if let Some(seed) = cli.seed {
        config.episodes.seed = Some(seed);
    }

    if let Some(max_turns) = cli.max_turns {
        config.episodes.max_turns = max_turns;
    }

    if cli.no_player {
        config.player.kind = PlayerKind::Absent;
    }

    if cli.log_path_details {
        config.logging.path_details = true;
    }

    config
        .validate()
        .with_context(|| format!("validating overrides for {}", cli.config.display()))?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let episodes = config.episodes.count;
    let max_turns = config.episodes.max_turns;

    println!(
        "Loaded configuration '{run_id}' ({episodes} episode{}, {max_turns} turns max, player {:?})",
        if episodes == 1 { "" } else { "s" },
        config.player.kind
    );

    if cli.validate_only {
        println!("Validation-only mode: no episodes played.");
        return Ok(());
    }

    let _logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = EpisodeRunner::new(config, outputs);
    let summary = runner.run()?;

    println!(
        "Run complete for '{run_id}': {} episodes → {} rows at {}",
        summary.episodes,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!(
        "  Opponent won {}/{} ({:.1}%)",
        summary.analytics.wins,
        summary.analytics.episodes,
        summary.analytics.win_rate * 100.0
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
