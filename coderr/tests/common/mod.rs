//! Helpers shared by the coderr integration tests.

use coderr::{Error, marshal_json, unmarshal_json_str};
use tracing_subscriber::EnvFilter;

/// Sends the crate's `tracing` output through the test harness.
///
/// Every test may call this; only the first call installs a subscriber.
pub fn init_test_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coderr=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .compact()
        .try_init();
}

/// Serializes `err` and decodes it the way a receiving process would.
pub fn send_across(err: &Error) -> Error {
    unmarshal_json_str(&marshal_json(err))
}
