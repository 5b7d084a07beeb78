//! Error classification codes.
//!
//! A [`Code`] is an opaque string tag. Components declare their own codes,
//! usually as constants next to the constructors that use them:
//!
//! ```rust
//! use coderr::Code;
//!
//! pub const FIELD_NOT_FOUND: Code = Code::from_static("FieldNotFound");
//! ```
//!
//! Two codes are equal iff their strings are equal. The set is open: this
//! crate only reserves [`UNCODED`] and the placeholder [`TODO`].

use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::fmt;

/// Classification tag carried by a [`CodedError`](crate::CodedError).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Code(Cow<'static, str>);

/// Code of errors built with [`new`](crate::new): no specific classification.
pub const UNCODED: Code = Code::from_static("Uncoded");

/// Placeholder for call sites that have not picked a real code yet.
pub const TODO: Code = Code::from_static("TODOError");

impl Code {
    /// Creates a code from a static string, usable in `const` items.
    #[must_use]
    pub const fn from_static(code: &'static str) -> Self {
        Self(Cow::Borrowed(code))
    }

    /// Creates a code from an owned or borrowed string.
    ///
    /// No validation is done; even the empty string is accepted.
    pub fn new(code: impl Into<String>) -> Self {
        Self(Cow::Owned(code.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty code that serialization assigns to foreign errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn is_uncoded(&self) -> bool {
        *self == UNCODED
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Code {
    fn from(code: &'static str) -> Self {
        Self::from_static(code)
    }
}

impl From<String> for Code {
    fn from(code: String) -> Self {
        Self(Cow::Owned(code))
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Code {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Code {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Code {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
