//! Nullable primitive wrappers.
//!
//! [`Nullable<T>`] pairs a primitive with an explicit null flag. The two
//! concrete types are [`Bool`] and [`Int`]. Whatever surface a value arrives
//! from, it goes through the coercion engine, so `"yes"`, `1` and `true`
//! all read as a true `Bool`, and `"42"`, `42.9` and `42` all read as
//! `Int(42)`.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_scalars::{Bool, Int};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Flags {
//!     enabled: Bool,
//!     retries: Int,
//! }
//!
//! let flags: Flags = serde_json::from_str(r#"{"enabled": "yes", "retries": null}"#).unwrap();
//! assert_eq!(flags.enabled, Bool::new(true));
//! assert!(flags.retries.nil);
//! assert_eq!(
//!     serde_json::to_string(&flags).unwrap(),
//!     r#"{"enabled":true,"retries":null}"#
//! );
//! ```

use crate::codec::{parse_json, Column, JsonCodec, TextCodec};
use crate::coerce::to_type;
use crate::{Result, TextOptions, Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A primitive that a [`Nullable`] can carry.
pub trait Primitive: Copy + Default + PartialEq + fmt::Display + Serialize {
    /// Coerces a non-null raw value through [`to_type`].
    ///
    /// # Errors
    ///
    /// Whatever [`to_type`] reports for this destination kind.
    fn coerce(src: &Value) -> Result<Self>;

    fn into_value(self) -> Value;

    fn into_json(self) -> serde_json::Value;
}

impl Primitive for bool {
    fn coerce(src: &Value) -> Result<Self> {
        let mut out = false;
        to_type(src, (&mut out).into())?;
        Ok(out)
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn into_json(self) -> serde_json::Value {
        serde_json::Value::Bool(self)
    }
}

impl Primitive for i64 {
    fn coerce(src: &Value) -> Result<Self> {
        let mut out = 0;
        to_type(src, (&mut out).into())?;
        Ok(out)
    }

    fn into_value(self) -> Value {
        Value::I64(self)
    }

    fn into_json(self) -> serde_json::Value {
        serde_json::Value::from(self)
    }
}

/// A primitive value plus an explicit null flag.
///
/// When `nil` is `true`, `val` is always `T::default()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Nullable<T> {
    pub val: T,
    pub nil: bool,
}

/// A nullable boolean.
pub type Bool = Nullable<bool>;

/// A nullable 64-bit signed integer.
pub type Int = Nullable<i64>;

impl<T: Primitive> Nullable<T> {
    /// A non-null value.
    #[must_use]
    pub fn new(val: T) -> Self {
        Nullable { val, nil: false }
    }

    /// The null value.
    #[must_use]
    pub fn null() -> Self {
        Nullable {
            val: T::default(),
            nil: true,
        }
    }

    pub fn set_null(&mut self) {
        *self = Self::null();
    }

    /// Returns `None` when null.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        if self.nil {
            None
        } else {
            Some(self.val)
        }
    }

    fn set_from_value(&mut self, src: &Value) -> Result<()> {
        if src.is_null() {
            self.set_null();
            return Ok(());
        }
        match T::coerce(src) {
            Ok(val) => {
                *self = Self::new(val);
                Ok(())
            }
            Err(err) => {
                *self = Self::default();
                Err(err)
            }
        }
    }

    /// Decodes text using `options` to decide which literals mean null.
    ///
    /// # Errors
    ///
    /// Propagates a coercion failure; `self` is reset to the non-null zero value.
    pub fn decode_text_with(&mut self, buf: &[u8], options: &TextOptions) -> Result<()> {
        if options.is_null(buf) {
            self.set_null();
            return Ok(());
        }
        self.set_from_value(&Value::from(buf))
    }
}

impl<T: Primitive> From<T> for Nullable<T> {
    fn from(val: T) -> Self {
        Self::new(val)
    }
}

impl<T: Primitive> From<Option<T>> for Nullable<T> {
    fn from(val: Option<T>) -> Self {
        val.map_or_else(Self::null, Self::new)
    }
}

impl<T: Primitive> fmt::Display for Nullable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nil {
            f.write_str("nil")
        } else {
            write!(f, "{}", self.val)
        }
    }
}

impl<T: Primitive> Column for Nullable<T> {
    fn scan(&mut self, raw: Value) -> Result<()> {
        self.set_from_value(&raw)
    }

    fn to_storable(&self) -> Value {
        self.get().map_or(Value::Null, T::into_value)
    }
}

impl<T: Primitive> JsonCodec for Nullable<T> {
    fn decode_json(&mut self, buf: &[u8]) -> Result<()> {
        match parse_json(buf) {
            Ok(value) => self.set_from_value(&value),
            Err(err) => {
                *self = Self::default();
                Err(err)
            }
        }
    }

    fn to_json_value(&self) -> serde_json::Value {
        self.get().map_or(serde_json::Value::Null, T::into_json)
    }
}

impl<T: Primitive> TextCodec for Nullable<T> {
    fn decode_text(&mut self, buf: &[u8]) -> Result<()> {
        self.decode_text_with(buf, &TextOptions::default())
    }

    fn encode_text(&self) -> Vec<u8> {
        if self.nil {
            return Vec::new();
        }
        self.to_string().into_bytes()
    }
}

impl<T: Primitive> Serialize for Nullable<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.get() {
            Some(val) => val.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Primitive> Deserialize<'de> for Nullable<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let mut out = Self::default();
        out.set_from_value(&raw).map_err(serde::de::Error::custom)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_json() {
        let mut b = Bool::default();
        b.decode_json(b"true").unwrap();
        assert_eq!(b, Bool { val: true, nil: false });

        b.decode_json(b"null").unwrap();
        assert_eq!(b, Bool { val: false, nil: true });

        b.decode_json(br#""y""#).unwrap();
        assert_eq!(b, Bool::new(true));

        assert!(b.decode_json(b"tru").is_err());
        assert_eq!(b, Bool::default());
    }

    #[test]
    fn test_json_failure_resets() {
        let mut i = Int::new(5);
        assert!(matches!(i.decode_json(b"{"), Err(crate::Error::Json(_))));
        assert_eq!(i, Int { val: 0, nil: false });

        let mut n = Int::null();
        assert!(n.decode_json(b"[1,").is_err());
        assert_eq!(n, Int::default());
    }

    #[test]
    fn test_bool_encode() {
        assert_eq!(Bool::new(false).encode_json(), b"false");
        assert_eq!(Bool::null().encode_json(), b"null");
        assert_eq!(Bool::new(true).encode_text(), b"true");
        assert!(Bool::null().encode_text().is_empty());
    }

    #[test]
    fn test_bool_text() {
        let mut b = Bool::new(true);
        for token in [&b""[..], &b"null"[..], &b"nil"[..]] {
            b.val = true;
            b.nil = false;
            b.decode_text(token).unwrap();
            assert_eq!(b, Bool::null());
        }

        b.decode_text(b"T").unwrap();
        assert_eq!(b, Bool::new(true));

        b.decode_text(b"abcdef").unwrap();
        assert_eq!(b, Bool::new(false));
    }

    #[test]
    fn test_bool_scan() {
        let mut b = Bool::default();
        b.scan(Value::from(1i64)).unwrap();
        assert_eq!(b.to_storable(), Value::Bool(true));

        b.scan(Value::Null).unwrap();
        assert_eq!(b, Bool::null());
        assert_eq!(b.to_storable(), Value::Null);
    }

    #[test]
    fn test_int_json() {
        let mut i = Int::default();
        i.decode_json(b"42").unwrap();
        assert_eq!(i, Int::new(42));

        i.decode_json(br#""-17""#).unwrap();
        assert_eq!(i, Int::new(-17));

        i.decode_json(b"3.9").unwrap();
        assert_eq!(i, Int::new(3));

        i.decode_json(b"null").unwrap();
        assert_eq!(i, Int::null());
        assert_eq!(i.encode_json(), b"null");
    }

    #[test]
    fn test_int_text() {
        let mut i = Int::default();
        i.decode_text(b"9223372036854775808").unwrap();
        assert_eq!(i.val, i64::MAX);
        assert_eq!(i.encode_text(), b"9223372036854775807");

        i.decode_text(b"").unwrap();
        assert_eq!(i, Int::null());
    }

    #[test]
    fn test_int_scan_reset() {
        let mut i = Int::new(5);
        i.scan(Value::Null).unwrap();
        assert_eq!(i.val, 0);
        assert!(i.nil);
        assert_eq!(i.to_string(), "nil");

        i.scan(Value::from(7u8)).unwrap();
        assert_eq!(i.to_storable(), Value::I64(7));
        assert_eq!(i.to_string(), "7");
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Int::from(None::<i64>), Int::null());
        assert_eq!(Int::from(Some(3)), Int::new(3));
        assert_eq!(Bool::from(true).get(), Some(true));
    }
}
