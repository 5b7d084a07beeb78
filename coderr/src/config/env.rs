//! Environment variable parsing with type safety.
//!
//! Collects errors instead of failing on the first bad variable so that all
//! issues can be reported at once.

use super::source::Sourced;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during environment variable parsing.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Invalid value for a variable.
    #[error("Invalid value for {var}: expected {expected}, got '{value}'")]
    InvalidValue {
        var: String,
        expected: String,
        value: String,
    },

    /// Value out of valid range.
    #[error("Value out of range for {var}: {value} (valid: {min}..={max})")]
    OutOfRange {
        var: String,
        value: String,
        min: String,
        max: String,
    },

    /// Invalid log level.
    #[error("Invalid log level for {var}: {value}")]
    InvalidLogLevel { var: String, value: String },
}

const PREFIX: &str = "CODERR_";

/// Type-safe environment variable parser.
#[derive(Default)]
pub struct EnvParser {
    errors: Vec<EnvError>,
}

impl EnvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of errors.
    pub fn take_errors(&mut self) -> Vec<EnvError> {
        std::mem::take(&mut self.errors)
    }

    fn var_name(&self, name: &str) -> String {
        format!("{PREFIX}{name}")
    }

    /// Get a u64 value with default and range validation.
    pub fn get_u64_range(&mut self, name: &str, default: u64, min: u64, max: u64) -> Sourced<u64> {
        let var_name = self.var_name(name);
        match env::var(&var_name) {
            Ok(value) => match value.parse::<u64>() {
                Ok(n) if n >= min && n <= max => Sourced::from_env(n, var_name),
                Ok(n) => {
                    self.errors.push(EnvError::OutOfRange {
                        var: var_name.clone(),
                        value: n.to_string(),
                        min: min.to_string(),
                        max: max.to_string(),
                    });
                    Sourced::from_env(default, var_name)
                }
                Err(_) => {
                    self.errors.push(EnvError::InvalidValue {
                        var: var_name.clone(),
                        expected: "unsigned 64-bit integer".to_string(),
                        value,
                    });
                    Sourced::default_value(default)
                }
            },
            Err(_) => Sourced::default_value(default),
        }
    }

    /// Get a log level value with validation.
    pub fn get_log_level(&mut self, name: &str, default: &str) -> Sourced<String> {
        let var_name = self.var_name(name);
        match env::var(&var_name) {
            Ok(value) => {
                let lower = value.to_lowercase();
                match lower.as_str() {
                    "trace" | "debug" | "info" | "warn" | "error" | "off" => {
                        Sourced::from_env(lower, var_name)
                    }
                    _ => {
                        self.errors.push(EnvError::InvalidLogLevel {
                            var: var_name.clone(),
                            value: value.clone(),
                        });
                        Sourced::from_env(default.to_string(), var_name)
                    }
                }
            }
            Err(_) => Sourced::default_value(default.to_string()),
        }
    }

    /// Get one of a fixed set of lowercase choices.
    pub fn get_choice(
        &mut self,
        name: &str,
        choices: &[&'static str],
        default: &'static str,
    ) -> Sourced<&'static str> {
        let var_name = self.var_name(name);
        match env::var(&var_name) {
            Ok(value) => {
                let lower = value.to_lowercase();
                match choices.iter().find(|choice| **choice == lower) {
                    Some(choice) => Sourced::from_env(*choice, var_name),
                    None => {
                        self.errors.push(EnvError::InvalidValue {
                            var: var_name.clone(),
                            expected: format!("one of {}", choices.join("/")),
                            value,
                        });
                        Sourced::from_env(default, var_name)
                    }
                }
            }
            Err(_) => Sourced::default_value(default),
        }
    }

    /// Get an optional path with ~ expansion (None if not set or empty).
    pub fn get_optional_path(&mut self, name: &str) -> Sourced<Option<PathBuf>> {
        let var_name = self.var_name(name);
        match env::var(&var_name) {
            Ok(value) if value.is_empty() => Sourced::from_env(None, var_name),
            Ok(value) => Sourced::from_env(Some(expand_home(&value)), var_name),
            Err(_) => Sourced::default_value(None),
        }
    }
}

fn expand_home(value: &str) -> PathBuf {
    match value.strip_prefix("~/") {
        Some(stripped) => match dirs::home_dir() {
            Some(home) => home.join(stripped),
            None => PathBuf::from(value),
        },
        None => PathBuf::from(value),
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use crate::config::env_test_lock;

    fn cleanup_env(vars: &[&str]) {
        for var in vars {
            // SAFETY: env mutation is serialized by env_test_lock
            unsafe { env::remove_var(var) };
        }
    }

    fn set_env(key: &str, value: &str) {
        // SAFETY: env mutation is serialized by env_test_lock
        unsafe { env::set_var(key, value) };
    }

    #[test]
    fn test_get_u64_range_valid() {
        let _guard = env_test_lock();
        let vars = ["CODERR_TEST_U64"];
        cleanup_env(&vars);

        set_env("CODERR_TEST_U64", "50");
        let mut parser = EnvParser::new();
        let result = parser.get_u64_range("TEST_U64", 10, 0, 100);
        assert_eq!(result.value, 50);
        assert!(!result.is_default());
        assert!(parser.take_errors().is_empty());

        cleanup_env(&vars);
    }

    #[test]
    fn test_get_u64_range_out_of_range() {
        let _guard = env_test_lock();
        let vars = ["CODERR_TEST_U64_OOR"];
        cleanup_env(&vars);

        set_env("CODERR_TEST_U64_OOR", "200");
        let mut parser = EnvParser::new();
        let result = parser.get_u64_range("TEST_U64_OOR", 10, 0, 100);
        assert_eq!(result.value, 10);
        let errors = parser.take_errors();
        assert!(matches!(errors.as_slice(), [EnvError::OutOfRange { .. }]));
        assert!(parser.take_errors().is_empty());

        cleanup_env(&vars);
    }

    #[test]
    fn test_get_u64_not_a_number() {
        let _guard = env_test_lock();
        let vars = ["CODERR_TEST_U64_NAN"];
        cleanup_env(&vars);

        set_env("CODERR_TEST_U64_NAN", "lots");
        let mut parser = EnvParser::new();
        let result = parser.get_u64_range("TEST_U64_NAN", 10, 0, 100);
        assert_eq!(result.value, 10);
        assert!(result.is_default());
        let errors = parser.take_errors();
        assert!(errors[0].to_string().contains("expected unsigned 64-bit integer"));

        cleanup_env(&vars);
    }

    #[test]
    fn test_get_log_level() {
        let _guard = env_test_lock();
        let vars = ["CODERR_TEST_LEVEL"];
        cleanup_env(&vars);

        let mut parser = EnvParser::new();
        assert_eq!(parser.get_log_level("TEST_LEVEL", "info").value, "info");

        set_env("CODERR_TEST_LEVEL", "DEBUG");
        assert_eq!(parser.get_log_level("TEST_LEVEL", "info").value, "debug");
        assert!(parser.take_errors().is_empty());

        set_env("CODERR_TEST_LEVEL", "loud");
        assert_eq!(parser.get_log_level("TEST_LEVEL", "info").value, "info");
        assert!(matches!(
            parser.take_errors().as_slice(),
            [EnvError::InvalidLogLevel { .. }]
        ));

        cleanup_env(&vars);
    }

    #[test]
    fn test_get_choice() {
        let _guard = env_test_lock();
        let vars = ["CODERR_TEST_FORMAT"];
        cleanup_env(&vars);

        set_env("CODERR_TEST_FORMAT", "JSON");
        let mut parser = EnvParser::new();
        let result = parser.get_choice("TEST_FORMAT", &["pretty", "json"], "pretty");
        assert_eq!(result.value, "json");

        set_env("CODERR_TEST_FORMAT", "xml");
        let result = parser.get_choice("TEST_FORMAT", &["pretty", "json"], "pretty");
        assert_eq!(result.value, "pretty");
        let errors = parser.take_errors();
        assert!(errors[0].to_string().contains("one of pretty/json"));

        cleanup_env(&vars);
    }

    #[test]
    fn test_get_optional_path() {
        let _guard = env_test_lock();
        let vars = ["CODERR_TEST_PATH"];
        cleanup_env(&vars);

        let mut parser = EnvParser::new();
        assert_eq!(parser.get_optional_path("TEST_PATH").value, None);

        set_env("CODERR_TEST_PATH", "");
        assert_eq!(parser.get_optional_path("TEST_PATH").value, None);

        set_env("CODERR_TEST_PATH", "/var/log/coderr.log");
        assert_eq!(
            parser.get_optional_path("TEST_PATH").value,
            Some(PathBuf::from("/var/log/coderr.log"))
        );

        cleanup_env(&vars);
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/logs/x.log"), home.join("logs/x.log"));
        }
    }
}
