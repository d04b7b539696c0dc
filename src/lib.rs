//! # serde_scalars
//!
//! Nullable scalar types for the boundary between storage rows, JSON and
//! plain text, plus the coercion engine they share.
//!
//! ## What is in the box?
//!
//! Loosely typed sources hand over values that rarely match the type you
//! want: a flag arrives as `"yes"`, a count as `"42"`, a timeout as `1.5e9`.
//! This crate converts such a raw [`Value`] into a fixed target type.
//!
//! ## Key Features
//!
//! - **Never-failing coercion**: [`coerce`] maps any value to a bool, a clamped
//!   integer, a string or bytes
//! - **Strict assignment**: [`coerce::to_type`] reports unsupported destinations
//! - **Explicit null**: [`Bool`], [`Int`] and [`Duration`] carry a null flag
//!   instead of an `Option`
//! - **Three surfaces**: every type implements [`Column`], [`JsonCodec`] and
//!   [`TextCodec`], and plugs into serde
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! serde_scalars = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Decoding JSON
//!
//! ```rust
//! use serde_scalars::{from_json, to_json, Duration, Int, SECOND};
//!
//! let timeout: Duration = from_json(br#""1m30s""#).unwrap();
//! assert_eq!(timeout.ticks, 90 * SECOND);
//! assert_eq!(to_json(&timeout), br#""1m30s""#);
//!
//! let retries: Int = from_json(br#""7""#).unwrap();
//! assert_eq!(retries.get(), Some(7));
//! ```
//!
//! ### Inside serde structs
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_scalars::{Bool, Duration, Rate, SlicedString};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Job {
//!     enabled: Bool,
//!     every: Duration,
//!     limit: Rate,
//!     tags: SlicedString,
//! }
//!
//! let job: Job = serde_json::from_str(
//!     r#"{"enabled": "yes", "every": {"d": "5s"}, "limit": "10/1s", "tags": "nightly"}"#,
//! )
//! .unwrap();
//! assert!(job.enabled.val);
//! assert_eq!(job.every.to_string(), "5s");
//! assert_eq!(job.limit.count, 10);
//! assert_eq!(job.tags.as_slice(), ["nightly"]);
//! ```
//!
//! ### Plain text
//!
//! ```rust
//! use serde_scalars::{from_text, to_text, Bool, Rate};
//!
//! let flag: Bool = from_text(b"nil").unwrap();
//! assert!(flag.nil);
//! assert!(to_text(&flag).is_empty());
//!
//! let rate: Rate = from_text(b"3/500ms").unwrap();
//! assert_eq!(to_text(&rate), b"3/500ms");
//! ```
//!
//! ## Failure semantics
//!
//! - The functions in [`coerce`] never fail.
//! - Decoders mutate in place. A failed JSON decode leaves the receiver at
//!   zero or null. A failed `Duration` text decode leaves it null.
//! - Encoders never fail.

pub mod codec;
pub mod coerce;
pub mod duration;
pub mod error;
pub mod map;
pub mod options;
pub mod rate;
pub mod scalar;
pub mod sliced;
pub mod value;

pub use codec::{Column, JsonCodec, TextCodec};
pub use duration::{Duration, HOUR, MICROSECOND, MILLISECOND, MINUTE, NANOSECOND, SECOND};
pub use error::{Error, ParseDurationError, Result};
pub use map::ValueMap;
pub use options::{Delimiter, TextOptions};
pub use rate::Rate;
pub use scalar::{Bool, Int, Nullable, Primitive};
pub use sliced::SlicedString;
pub use value::Value;

/// Decodes a `T` from JSON bytes, starting from `T::default()`.
///
/// # Examples
///
/// ```rust
/// use serde_scalars::{from_json, Bool};
///
/// let flag: Bool = from_json(b"1").unwrap();
/// assert_eq!(flag, Bool::new(true));
/// ```
///
/// # Errors
///
/// Returns whatever `T::decode_json` reports.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_json<T>(buf: &[u8]) -> Result<T>
where
    T: JsonCodec + Default,
{
    let mut out = T::default();
    out.decode_json(buf)?;
    Ok(out)
}

/// Encodes `value` as JSON bytes.
#[must_use]
pub fn to_json<T>(value: &T) -> Vec<u8>
where
    T: ?Sized + JsonCodec,
{
    value.encode_json()
}

/// Decodes a `T` from plain text, starting from `T::default()`.
///
/// # Examples
///
/// ```rust
/// use serde_scalars::{from_text, Int};
///
/// let n: Int = from_text(b"-12").unwrap();
/// assert_eq!(n.val, -12);
/// ```
///
/// # Errors
///
/// Returns whatever `T::decode_text` reports.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_text<T>(buf: &[u8]) -> Result<T>
where
    T: TextCodec + Default,
{
    let mut out = T::default();
    out.decode_text(buf)?;
    Ok(out)
}

/// Encodes `value` as plain text. Null encodes as empty bytes.
#[must_use]
pub fn to_text<T>(value: &T) -> Vec<u8>
where
    T: ?Sized + TextCodec,
{
    value.encode_text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Settings {
        verbose: Bool,
        workers: Int,
        timeout: Duration,
    }

    #[test]
    fn test_from_json_each_type() {
        let flag: Bool = from_json(br#""no""#).unwrap();
        assert_eq!(flag, Bool::new(false));

        let n: Int = from_json(b"null").unwrap();
        assert!(n.nil);

        let d: Duration = from_json(b"1500000000").unwrap();
        assert_eq!(d.to_string(), "1.5s");

        let r: Rate = from_json(br#"{"x": "1/1s"}"#).unwrap();
        assert_eq!(r.count, 1);

        let s: SlicedString = from_json(br#"["a"]"#).unwrap();
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_from_json_error() {
        assert!(matches!(from_json::<Int>(b"{"), Err(Error::Json(_))));
        assert!(matches!(
            from_json::<SlicedString>(b"true"),
            Err(Error::UnsupportedType { kind: "bool" })
        ));
    }

    #[test]
    fn test_text_helpers() {
        let d: Duration = from_text(b"2h45m").unwrap();
        assert_eq!(to_text(&d), b"2h45m0s");

        let empty: Duration = from_text(b"").unwrap();
        assert!(empty.nil);
        assert!(to_text(&empty).is_empty());

        assert!(from_text::<Duration>(b"soon").is_err());
    }

    #[test]
    fn test_struct_round_trip() {
        let settings = Settings {
            verbose: Bool::new(true),
            workers: Int::null(),
            timeout: Duration::from_ticks(250 * MILLISECOND),
        };

        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(json, r#"{"verbose":true,"workers":null,"timeout":"250ms"}"#);

        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
