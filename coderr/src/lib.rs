//! Coded errors.
//!
//! Errors that carry a stable classification [`Code`] through any amount of
//! wrapping and across process boundaries. Callers can ask "is this a
//! not-found error?" without matching on message text or on the concrete
//! type that ended up at the top of the chain.
//!
//! The wrap chain itself is [`anyhow`]'s: [`new`] and [`new_coded`] return an
//! [`Error`] that captures a backtrace (when `RUST_BACKTRACE` or
//! `RUST_LIB_BACKTRACE` enables it), and every layer added with [`wrap`] or
//! `anyhow::Context` leaves the [`CodedError`] at its root untouched.
//!
//! ```rust
//! use coderr::{Code, is, marshal_json, new_coded, unmarshal_json, wrap};
//!
//! const TABLE_NOT_FOUND: Code = Code::from_static("TableNotFound");
//!
//! let err = wrap(new_coded(TABLE_NOT_FOUND, "table not found: tbl"), "planning query");
//! assert!(is(&err, &TABLE_NOT_FOUND));
//!
//! let restored = unmarshal_json(marshal_json(&err).as_bytes());
//! assert!(is(&restored, &TABLE_NOT_FOUND));
//! assert_eq!(format!("{restored:#}"), "planning query: table not found: tbl");
//! ```

pub mod code;
pub mod coded;
pub mod config;
pub mod json;
pub mod logging;
pub mod wrap;

/// The stack-capturing envelope every constructor returns.
pub type Error = anyhow::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub use code::{Code, TODO, UNCODED};
pub use coded::{Classify, CodedError, is, is_coded, is_source, new, new_coded};
pub use config::{Config, EnvError};
pub use json::{
    PayloadTooLarge, marshal_json, snapshot, unmarshal_json, unmarshal_json_limited,
    unmarshal_json_str,
};
pub use logging::{LogConfig, LoggingGuards, init_logging};
pub use wrap::{
    Context, as_coded, as_error, cause, errorf, render, unwrap, with_message, with_messagef,
    with_stack, wrap, wrapf,
};
