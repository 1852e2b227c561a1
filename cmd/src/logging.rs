// SPDX-FileCopyrightText: © 2024 Hugues Bruant <hugues.bruant@gmail.com>

//! One-time `fern::Dispatch` setup. Rotates to a fresh log file per process
//! invocation (truncate-or-fresh-file, not size/time-based), mirroring the
//! original tool's `logger.py` "one rotation per run" policy. Diagnostics
//! never touch stdout, so piping the graph output never mixes in log noise.

use std::path::PathBuf;

use anyhow::{Context, Result};
use etcetera::{choose_base_strategy, BaseStrategy};

const LOG_FILE_NAME: &str = "pyimpgraph.log";

pub fn init(verbose: bool) -> Result<()> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let log_path = log_file_path().context("failed to determine log directory")?;
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create log directory")?;
    }

    // Truncate rather than append: one rotation per process invocation,
    // not size/time-based, matching the original tool's log policy.
    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {} [{}] {}",
                chrono_like_timestamp(),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(file)
        .apply()
        .context("failed to install logger")?;

    Ok(())
}

fn log_file_path() -> Result<PathBuf> {
    let strategy = choose_base_strategy().context("failed to resolve base directories")?;
    Ok(strategy.cache_dir().join("pyimpgraph").join(LOG_FILE_NAME))
}

/// A dependency-free, second-resolution timestamp. A full `chrono`
/// dependency is not warranted for a single log prefix field.
fn chrono_like_timestamp() -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", now.as_secs())
}
