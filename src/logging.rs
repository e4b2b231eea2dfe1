use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Send `tracing` output to `dir/skywatch.log.YYYY-MM-DD`.
///
/// The terminal belongs to the UI, so nothing is written to stdout or
/// stderr.  The level comes from `RUST_LOG`, defaulting to `info`.  Keep the
/// returned guard alive until exit or buffered lines are lost.
pub fn init(dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, "skywatch.log"));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_filter(filter),
        )
        .try_init()
        .context("tracing subscriber already installed")?;

    Ok(guard)
}
