//! Structured logging setup for coderr tools.
//!
//! Library code only emits `tracing` events; binaries call [`init_logging`]
//! once at startup:
//!
//! ```ignore
//! use coderr::{LogConfig, init_logging};
//!
//! let _logging_guards = init_logging(&LogConfig::from_env("info").with_stderr())?;
//! ```
//!
//! `RUST_LOG`, when set, takes precedence over the configured level.

use crate::config::{Config, EnvError};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `coderr=debug`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    /// Write to stderr.
    pub stderr: bool,
    /// Also write to this file.
    pub file: Option<PathBuf>,
}

impl LogConfig {
    /// Builds a config from `CODERR_*` variables, with `default_level` as the
    /// level when none is set or the set one is rejected.
    ///
    /// Invalid variables are ignored here; use [`Config::from_env`] to
    /// report them.
    pub fn from_env(default_level: &str) -> Self {
        let (config, errors) = Config::from_env();
        let level_rejected = errors
            .iter()
            .any(|err| matches!(err, EnvError::InvalidLogLevel { .. }));
        let mut log_config = Self::from_config(&config);
        if config.log_level.is_default() || level_rejected {
            log_config.level = default_level.to_string();
        }
        log_config
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            level: config.log_level.value.clone(),
            json: config.log_json.value,
            stderr: false,
            file: config.log_file.value.clone(),
        }
    }

    #[must_use]
    pub fn with_stderr(mut self) -> Self {
        self.stderr = true;
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    fn filter(&self) -> Result<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.level)
                .with_context(|| format!("invalid log level '{}'", self.level)),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            stderr: true,
            file: None,
        }
    }
}

/// Keeps background log writers alive; flushes them on drop.
#[must_use = "dropping the guards stops file logging"]
pub struct LoggingGuards {
    _file: Option<WorkerGuard>,
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global `tracing` subscriber described by `config`.
///
/// Fails if the filter is invalid, the log file cannot be opened, or a
/// global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<LoggingGuards> {
    let filter = config.filter()?;
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut file_guard = None;

    if config.stderr {
        let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
        layers.push(if config.json {
            layer.json().boxed()
        } else {
            layer.compact().boxed()
        });
    }

    if let Some(path) = &config.file {
        let (writer, guard) = tracing_appender::non_blocking(open_log_file(path)?);
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        layers.push(if config.json {
            layer.json().boxed()
        } else {
            layer.boxed()
        });
        file_guard = Some(guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("failed to install global tracing subscriber")?;

    Ok(LoggingGuards { _file: file_guard })
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}
