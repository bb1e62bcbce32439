use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, ResolvedOutputs};

/// Target carrying per-cell route dumps and candidate scores.
const ROUTES_TARGET: &str = "tombstone_bot::routes";

pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Installs a JSON subscriber writing opponent and episode events to
/// `telemetry.jsonl` beside the summary.
///
/// Returns `None` when structured logging is disabled. The guard must stay
/// alive until the run finishes or buffered events are lost.
pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
    run_id: &str,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let telemetry_dir = outputs.telemetry_dir();
    fs::create_dir_all(&telemetry_dir).with_context(|| {
        format!(
            "creating telemetry directory at {}",
            telemetry_dir.display()
        )
    })?;

    let telemetry_path = telemetry_dir.join("telemetry.jsonl");
    let file = File::create(&telemetry_path)
        .with_context(|| format!("creating telemetry file at {}", telemetry_path.display()))?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let directives = filter_directives(logging);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directives));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    // A global subscriber may already be installed when running under tests.
    let _ = tracing::subscriber::set_global_default(subscriber);

    tracing::event!(
        target: "tombstone_bench::run",
        Level::INFO,
        run_id,
        directives = %directives,
        path_details = logging.path_details,
        "structured logging enabled"
    );

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path,
    }))
}

/// Filter used when `RUST_LOG` is unset.
///
/// Route dumps sit at TRACE, so `path_details` opens that target regardless
/// of the configured level; otherwise it is muted to keep per-candidate
/// scores out of the file.
fn filter_directives(logging: &LoggingConfig) -> String {
    let level = logging.level().unwrap_or(Level::INFO);
    let base = level.as_str().to_ascii_lowercase();
    if logging.path_details {
        format!("{base},{ROUTES_TARGET}=trace")
    } else {
        format!("{base},{ROUTES_TARGET}=off")
    }
}
