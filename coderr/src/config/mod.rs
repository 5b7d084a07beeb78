//! Configuration for coderr tools.
//!
//! Everything is read from `CODERR_*` environment variables:
//!
//! | Variable                   | Default  | Meaning                                |
//! |----------------------------|----------|----------------------------------------|
//! | `CODERR_LOG_LEVEL`         | `info`   | trace/debug/info/warn/error/off        |
//! | `CODERR_LOG_FORMAT`        | `pretty` | pretty/json                            |
//! | `CODERR_LOG_FILE`          | unset    | also write logs to this file           |
//! | `CODERR_MAX_PAYLOAD_BYTES` | 1 MiB    | read limit when decoding a payload     |

pub mod env;
pub mod source;

pub use env::{EnvError, EnvParser};
pub use source::{ConfigSource, Sourced};

use std::path::PathBuf;

pub const DEFAULT_MAX_PAYLOAD_BYTES: u64 = 1024 * 1024;
pub const MAX_PAYLOAD_BYTES_LIMIT: u64 = 64 * 1024 * 1024;

const LOG_FORMATS: &[&str] = &["pretty", "json"];

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: Sourced<String>,
    pub log_json: Sourced<bool>,
    pub log_file: Sourced<Option<PathBuf>>,
    pub max_payload_bytes: Sourced<u64>,
}

impl Config {
    /// Reads the configuration from the environment.
    ///
    /// Invalid values fall back to their defaults; the problems are returned
    /// alongside so the caller can report them.
    pub fn from_env() -> (Self, Vec<EnvError>) {
        let mut parser = EnvParser::new();
        let log_format = parser.get_choice("LOG_FORMAT", LOG_FORMATS, "pretty");
        let config = Self {
            log_level: parser.get_log_level("LOG_LEVEL", "info"),
            log_json: Sourced {
                value: log_format.value == "json",
                source: log_format.source,
                var: log_format.var,
            },
            log_file: parser.get_optional_path("LOG_FILE"),
            max_payload_bytes: parser.get_u64_range(
                "MAX_PAYLOAD_BYTES",
                DEFAULT_MAX_PAYLOAD_BYTES,
                1,
                MAX_PAYLOAD_BYTES_LIMIT,
            ),
        };
        (config, parser.take_errors())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Sourced::default_value("info".to_string()),
            log_json: Sourced::default_value(false),
            log_file: Sourced::default_value(None),
            max_payload_bytes: Sourced::default_value(DEFAULT_MAX_PAYLOAD_BYTES),
        }
    }
}

#[cfg(test)]
pub(crate) fn env_test_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
