//! Boundary contracts shared by every scalar type.
//!
//! Each type implements three traits, one per surface:
//!
//! - [`Column`]: reading a raw query-row value and producing a storable one
//! - [`JsonCodec`]: decoding from and encoding to JSON bytes
//! - [`TextCodec`]: decoding from and encoding to plain text bytes
//!
//! Decoding mutates the receiver in place, because a failed decode still
//! defines the receiver's state: it is reset to zero or null before the error
//! is returned.

use crate::{Result, Value};

/// The query-row binding: the two calls a driver makes on a column type.
pub trait Column {
    /// Reads a raw value handed over by the row scanner.
    ///
    /// # Errors
    ///
    /// Returns an error when the value's kind cannot be stored in this type.
    fn scan(&mut self, raw: Value) -> Result<()>;

    /// Produces the value to bind as a query parameter. Null state maps to [`Value::Null`].
    fn to_storable(&self) -> Value;
}

/// The JSON surface.
pub trait JsonCodec {
    /// Decodes a JSON document into `self`.
    ///
    /// # Errors
    ///
    /// [`Error::Json`] for malformed input, or a shape or parse error
    /// specific to the implementing type.
    ///
    /// [`Error::Json`]: crate::Error::Json
    fn decode_json(&mut self, buf: &[u8]) -> Result<()>;

    /// The JSON form of `self`.
    fn to_json_value(&self) -> serde_json::Value;

    /// Encodes `self` as JSON bytes. Never fails.
    fn encode_json(&self) -> Vec<u8> {
        self.to_json_value().to_string().into_bytes()
    }
}

/// The plain-text surface.
pub trait TextCodec {
    /// Decodes text into `self`.
    ///
    /// # Errors
    ///
    /// Returns a parse error when the text is not a valid literal for the type.
    fn decode_text(&mut self, buf: &[u8]) -> Result<()>;

    /// Encodes `self` as text. Null state encodes as empty bytes. Never fails.
    fn encode_text(&self) -> Vec<u8>;
}

/// Tokenizes a JSON document into a [`Value`].
///
/// # Errors
///
/// [`Error::Json`](crate::Error::Json) if `buf` is not valid JSON.
pub fn parse_json(buf: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_parse_json_syntax_error() {
        let err = parse_json(br#"{"d":}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_parse_json_null() {
        assert_eq!(parse_json(b"null").unwrap(), Value::Null);
    }
}
