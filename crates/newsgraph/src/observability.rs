//! Logging setup: human-readable stderr plus optional JSON-lines file.
//!
//! The file layer is enabled by `NEWSGRAPH_LOG_PATH` (exact file),
//! `NEWSGRAPH_LOG_DIR` (daily-rolling files in a directory), or the config
//! file's `log_dir`, in that order of precedence.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_PATH_ENV: &str = "NEWSGRAPH_LOG_PATH";
const LOG_DIR_ENV: &str = "NEWSGRAPH_LOG_DIR";
const LOG_FILE_PREFIX: &str = "newsgraph.jsonl";

/// Where, if anywhere, to write the JSON log file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogFile {
    /// Stderr only.
    #[default]
    Disabled,
    /// Append to exactly this file.
    Path(PathBuf),
    /// Daily-rolling files inside this directory.
    Dir(PathBuf),
}

/// Resolved observability settings.
#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    /// File logging target.
    pub log_file: LogFile,
}

impl ObservabilityConfig {
    /// Read the environment, falling back to `config_log_dir`.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            std::env::var_os(LOG_PATH_ENV).map(PathBuf::from),
            std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
            config_log_dir,
        )
    }

    fn resolve(path: Option<PathBuf>, dir: Option<PathBuf>, config_dir: Option<PathBuf>) -> Self {
        let non_empty = |p: &PathBuf| !p.as_os_str().is_empty();
        let log_file = match (path.filter(non_empty), dir.filter(non_empty).or(config_dir)) {
            (Some(path), _) => LogFile::Path(path),
            (None, Some(dir)) => LogFile::Dir(dir),
            (None, None) => LogFile::Disabled,
        };
        Self { log_file }
    }
}

/// Build the filter: `RUST_LOG` wins, then `-q`/`-v`, then the config level.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some()
        && let Ok(filter) = EnvFilter::try_from_default_env()
    {
        return filter;
    }
    EnvFilter::new(level_directive(quiet, verbose, config_level))
}

fn level_directive(quiet: bool, verbose: u8, config_level: &str) -> &str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => config_level,
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes the file writer.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, guard) = match &config.log_file {
        LogFile::Disabled => (None, None),
        LogFile::Path(path) => {
            let (dir, name) = split_file_path(path)?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().json().with_writer(writer)), Some(guard))
        }
        LogFile::Dir(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().json().with_writer(writer)), Some(guard))
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;
    Ok(guard)
}

fn split_file_path(path: &Path) -> anyhow::Result<(&Path, &std::ffi::OsStr)> {
    let name = path
        .file_name()
        .with_context(|| format!("log path has no file name: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok((dir, name))
}
