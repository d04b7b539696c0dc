//! Error types for scalar decoding.
//!
//! Only the strict surfaces fail: JSON and text decoding, [`Rate::set_from_raw`],
//! row scanning into a [`Destination`] and the lexical duration parser. The
//! coercion functions in [`crate::coerce`] never return an error.
//!
//! ## Error Categories
//!
//! - **Syntax Errors**: the input was not valid JSON at all
//! - **Shape Errors**: valid JSON of the wrong kind, or a single-key object of the wrong arity
//! - **Parse Errors**: an unparseable rate count or duration literal
//! - **Destination Errors**: a row value was scanned into an unsupported target
//!
//! ## Examples
//!
//! ```rust
//! use serde_scalars::{Duration, Error, JsonCodec};
//!
//! let mut d = Duration::default();
//! let err = d.decode_json(b"{}").unwrap_err();
//! assert!(matches!(err, Error::NoContent));
//!
//! let err = d.decode_json(br#"{"a": "1s", "b": "2s"}"#).unwrap_err();
//! assert!(matches!(err, Error::TooBig { len: 2 }));
//! ```
//!
//! [`Rate::set_from_raw`]: crate::Rate::set_from_raw
//! [`Destination`]: crate::coerce::Destination

use std::fmt;
use std::num::ParseIntError;
use thiserror::Error;

/// Represents every strict failure in this crate.
///
/// Variants are split by cause so callers can tell a malformed document
/// from a well-formed document of the wrong shape.
#[derive(Debug, Error)]
pub enum Error {
    /// The input was not valid JSON
    #[error("JSON syntax error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value of this kind cannot be decoded into the target type
    #[error("unsupported type '{kind}'")]
    UnsupportedType { kind: &'static str },

    /// An array element was not a string
    #[error("unsupported type '{kind}' in slice")]
    UnsupportedElement { kind: &'static str },

    /// The single entry of a wrapping object held the wrong kind of value
    #[error("invalid kind of value: {kind}")]
    InvalidValueKind { kind: &'static str },

    /// A wrapping object had no entries
    #[error("no content found")]
    NoContent,

    /// A wrapping object had more than one entry
    #[error("length {len} is too big")]
    TooBig { len: usize },

    /// A rate literal did not split into exactly `count/duration`
    #[error("invalid rate structure for '{raw}'")]
    InvalidRate { raw: String },

    /// The count segment of a rate literal was not an unsigned integer
    #[error("invalid rate count: {0}")]
    ParseCount(#[from] ParseIntError),

    /// A duration literal could not be parsed
    #[error(transparent)]
    Duration(#[from] ParseDurationError),

    /// A scan targeted a destination kind outside the supported set
    #[error("unsupported destination type '{kind}'")]
    UnsupportedDestination { kind: &'static str },

    /// Custom error raised through the serde bridge
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_scalars::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns `true` if this error came from the JSON tokenizer rather than
    /// from shape or literal validation.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Json(_))
    }
}

/// Failure to read a lexical duration such as `1h30m` or `500ms`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDurationError {
    #[error("invalid duration: empty input")]
    Empty,

    #[error("invalid duration '{input}'")]
    Invalid { input: String },

    #[error("missing unit in duration '{input}'")]
    MissingUnit { input: String },

    #[error("unknown unit '{unit}' in duration '{input}'")]
    UnknownUnit { unit: String, input: String },

    #[error("duration '{input}' overflows")]
    Overflow { input: String },
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
