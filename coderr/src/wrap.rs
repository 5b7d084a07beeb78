//! Wrap-chain operations.
//!
//! Thin pass-throughs to `anyhow`. They add or remove layers above a
//! [`CodedError`]; the coded value itself is never touched, so classification
//! with [`is`](crate::is) keeps working through any of them.

use crate::Error;
use crate::coded::CodedError;
use std::error::Error as StdError;
use std::fmt::Display;

pub use anyhow::Context;
/// Formatted plain error, `anyhow!` under the name callers expect here.
pub use anyhow::anyhow as errorf;

/// Deepest layer of the chain.
pub fn cause(err: &Error) -> &(dyn StdError + 'static) {
    err.root_cause()
}

/// The layer directly under the outermost one, if any.
pub fn unwrap(err: &Error) -> Option<&(dyn StdError + 'static)> {
    err.chain().nth(1)
}

/// First layer of the chain whose concrete type is `T`.
pub fn as_error<T>(err: &Error) -> Option<&T>
where
    T: StdError + 'static,
{
    err.chain().find_map(|layer| layer.downcast_ref::<T>())
}

/// First [`CodedError`] in the chain.
pub fn as_coded(err: &Error) -> Option<&CodedError> {
    as_error::<CodedError>(err)
}

/// Adds a message layer; renders as `"{message}: {err}"`.
pub fn wrap<M>(err: Error, message: M) -> Error
where
    M: Display + Send + Sync + 'static,
{
    err.context(message)
}

/// [`wrap`] with a message built on demand.
pub fn wrapf<M, F>(err: Error, message: F) -> Error
where
    M: Display + Send + Sync + 'static,
    F: FnOnce() -> M,
{
    err.context(message())
}

/// Adds a message layer without capturing a new stack.
///
/// `anyhow` only captures a backtrace when an error is first boxed, so this
/// is the same operation as [`wrap`].
pub fn with_message<M>(err: Error, message: M) -> Error
where
    M: Display + Send + Sync + 'static,
{
    wrap(err, message)
}

/// [`with_message`] with a message built on demand.
pub fn with_messagef<M, F>(err: Error, message: F) -> Error
where
    M: Display + Send + Sync + 'static,
    F: FnOnce() -> M,
{
    wrapf(err, message)
}

/// Boxes any error into a stack-capturing envelope.
pub fn with_stack<E>(err: E) -> Error
where
    E: StdError + Send + Sync + 'static,
{
    Error::new(err)
}

/// Full text of the chain, outermost layer first, joined with `": "`.
pub fn render(err: &Error) -> String {
    format!("{err:#}")
}
