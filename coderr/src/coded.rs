//! The coded error type and its classification predicates.
//!
//! A [`CodedError`] pairs a [`Code`] with a human message. It is created
//! inside an [`anyhow::Error`] envelope by [`new`] or [`new_coded`], and can
//! then be wrapped any number of times without losing its code:
//!
//! ```rust
//! use coderr::{Code, is, new_coded, wrap};
//!
//! const FIELD_NOT_FOUND: Code = Code::from_static("FieldNotFound");
//!
//! let err = wrap(new_coded(FIELD_NOT_FOUND, "field not found: fld"), "loading schema");
//! assert!(is(&err, &FIELD_NOT_FOUND));
//! ```

use crate::Error;
use crate::code::{Code, UNCODED};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;

/// Error value carrying a classification code.
///
/// `code` and `message` are fixed at construction. `wrapped` is only set on
/// the snapshot produced by serialization and holds the rendered text of the
/// chain the error was found in; when present it is what the error displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodedError {
    #[serde(default)]
    code: Code,
    #[serde(default)]
    message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    wrapped: String,
}

impl CodedError {
    /// Builds a bare coded error, without an `anyhow` envelope.
    ///
    /// Useful as the `#[source]` of a caller-defined error enum. Most callers
    /// want [`new_coded`] instead.
    pub fn new(code: impl Into<Code>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            wrapped: String::new(),
        }
    }

    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Rendered chain text captured at serialization time, if any.
    pub fn wrapped(&self) -> Option<&str> {
        (!self.wrapped.is_empty()).then_some(self.wrapped.as_str())
    }

    /// Returns a copy of this error with its chain text set to `text`.
    ///
    /// The receiver is left untouched.
    #[must_use]
    pub fn with_wrapped(&self, text: impl Into<String>) -> Self {
        Self {
            code: self.code.clone(),
            message: self.message.clone(),
            wrapped: text.into(),
        }
    }

    /// Compares codes only; message and chain text are ignored.
    #[must_use]
    pub fn same_code(&self, other: &CodedError) -> bool {
        self.code == other.code
    }

    /// Moves this error into a stack-capturing envelope.
    pub fn into_error(self) -> Error {
        Error::new(self)
    }
}

impl fmt::Display for CodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.wrapped() {
            Some(wrapped) => f.write_str(wrapped),
            None => f.write_str(&self.message),
        }
    }
}

impl StdError for CodedError {}

/// Creates an error classified as [`UNCODED`].
pub fn new(message: impl Into<String>) -> Error {
    CodedError::new(UNCODED, message).into_error()
}

/// Creates an error classified by `code`.
///
/// The code is not validated. Classification by that exact code succeeds and
/// by any other code, [`UNCODED`] included, fails.
pub fn new_coded(code: impl Into<Code>, message: impl Into<String>) -> Error {
    CodedError::new(code, message).into_error()
}

/// Reports whether any layer of `err`'s chain is a [`CodedError`] with code
/// `target`.
///
/// Accepts `&Error` or `Option<&Error>`; `None` stands for "no error" and is
/// never classified. Errors that never went through this crate are not
/// [`UNCODED`], they are not coded at all.
pub fn is<'a>(err: impl Into<Option<&'a Error>>, target: &Code) -> bool {
    match err.into() {
        Some(err) => err.chain().any(|layer| layer_has_code(layer, target)),
        None => false,
    }
}

/// Same walk as [`is`], over the plain `source()` relation.
///
/// For error types that hold a [`CodedError`] (or an [`Error`] rooted at one)
/// as their source without being an `anyhow::Error` themselves.
pub fn is_source(err: &(dyn StdError + 'static), target: &Code) -> bool {
    let mut current = Some(err);
    while let Some(layer) = current {
        if layer_has_code(layer, target) {
            return true;
        }
        current = layer.source();
    }
    false
}

fn layer_has_code(layer: &(dyn StdError + 'static), target: &Code) -> bool {
    layer
        .downcast_ref::<CodedError>()
        .is_some_and(|coded| coded.code == *target)
}

/// Reports whether the outermost layer of `err` is a [`CodedError`].
///
/// No chain walk: `is_coded(&new_coded(..))` is true, but once a message
/// layer is wrapped around it the result is false. Tells a caller whether
/// the error was raised as a classified error or merely carries one.
pub fn is_coded(err: &Error) -> bool {
    err.chain()
        .next()
        .is_some_and(|top| top.is::<CodedError>())
}

/// Method-call form of [`is`] for the types errors usually arrive in.
pub trait Classify {
    /// See [`is`].
    fn is_code(&self, target: &Code) -> bool;
}

impl Classify for Error {
    fn is_code(&self, target: &Code) -> bool {
        is(self, target)
    }
}

impl Classify for CodedError {
    fn is_code(&self, target: &Code) -> bool {
        self.code == *target
    }
}

impl Classify for Option<&Error> {
    fn is_code(&self, target: &Code) -> bool {
        is(*self, target)
    }
}

impl<T> Classify for Result<T, Error> {
    fn is_code(&self, target: &Code) -> bool {
        is(self.as_ref().err(), target)
    }
}
