//! An ordered list of strings that also accepts a bare string.
//!
//! ```rust
//! use serde_scalars::{JsonCodec, SlicedString};
//!
//! let mut tags = SlicedString::default();
//! tags.decode_json(br#""solo""#).unwrap();
//! assert_eq!(tags.as_slice(), ["solo"]);
//!
//! tags.decode_json(br#"["a", "b"]"#).unwrap();
//! assert_eq!(tags.encode_json(), br#"["a","b"]"#);
//! ```

use crate::codec::{parse_json, Column, JsonCodec, TextCodec};
use crate::{Error, Result, TextOptions, Value};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Deref;
use tracing::trace;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SlicedString(pub Vec<String>);

impl SlicedString {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    /// Splits `buf` on the configured delimiter. Empty input gives an empty list.
    ///
    /// # Errors
    ///
    /// Never fails today; the signature matches the other text decoders.
    pub fn decode_text_with(&mut self, buf: &[u8], options: &TextOptions) -> Result<()> {
        if buf.is_empty() {
            self.0.clear();
            return Ok(());
        }
        let text = String::from_utf8_lossy(buf);
        self.0 = text
            .split(options.delimiter.as_str())
            .map(str::to_string)
            .collect();
        Ok(())
    }

    fn replace_or_clear(&mut self, items: Result<Vec<String>>) -> Result<()> {
        match items {
            Ok(items) => {
                self.0 = items;
                Ok(())
            }
            Err(err) => {
                self.0.clear();
                Err(err)
            }
        }
    }

    /// Joins the elements with the configured delimiter.
    #[must_use]
    pub fn encode_text_with(&self, options: &TextOptions) -> Vec<u8> {
        self.0.join(options.delimiter.as_str()).into_bytes()
    }
}

/// Keeps the strings of `items`, failing on the first element of another kind.
fn collect_strings(items: Vec<Value>) -> Result<Vec<String>> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Text(s) => Ok(s),
            other => Err(Error::UnsupportedElement {
                kind: other.kind_name(),
            }),
        })
        .collect()
}

impl Deref for SlicedString {
    type Target = Vec<String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<String>> for SlicedString {
    fn from(items: Vec<String>) -> Self {
        SlicedString(items)
    }
}

impl From<Vec<&str>> for SlicedString {
    fn from(items: Vec<&str>) -> Self {
        SlicedString(items.into_iter().map(str::to_string).collect())
    }
}

impl FromIterator<String> for SlicedString {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        SlicedString(iter.into_iter().collect())
    }
}

impl IntoIterator for SlicedString {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Column for SlicedString {
    /// A null row leaves the current list untouched. A failed scan clears it.
    fn scan(&mut self, raw: Value) -> Result<()> {
        let items = match raw {
            Value::Null => return Ok(()),
            Value::Text(s) => Ok(vec![s]),
            Value::Bytes(b) => {
                trace!(len = b.len(), "scanning bytes as a single string element");
                Ok(vec![String::from_utf8_lossy(&b).into_owned()])
            }
            Value::List(items) => collect_strings(items),
            other => Err(Error::UnsupportedType {
                kind: other.kind_name(),
            }),
        };
        self.replace_or_clear(items)
    }

    fn to_storable(&self) -> Value {
        Value::List(self.0.iter().cloned().map(Value::Text).collect())
    }
}

impl JsonCodec for SlicedString {
    fn decode_json(&mut self, buf: &[u8]) -> Result<()> {
        let items = parse_json(buf).and_then(|value| match value {
            Value::Text(s) => Ok(vec![s]),
            Value::List(items) => collect_strings(items),
            other => Err(Error::UnsupportedType {
                kind: other.kind_name(),
            }),
        });
        self.replace_or_clear(items)
    }

    fn to_json_value(&self) -> serde_json::Value {
        serde_json::Value::from(self.0.clone())
    }
}

impl TextCodec for SlicedString {
    fn decode_text(&mut self, buf: &[u8]) -> Result<()> {
        self.decode_text_with(buf, &TextOptions::default())
    }

    fn encode_text(&self) -> Vec<u8> {
        self.encode_text_with(&TextOptions::default())
    }
}

impl Serialize for SlicedString {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for item in &self.0 {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for SlicedString {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = match Value::deserialize(deserializer)? {
            Value::Text(s) => vec![s],
            Value::List(items) => collect_strings(items).map_err(serde::de::Error::custom)?,
            other => {
                return Err(serde::de::Error::custom(Error::UnsupportedType {
                    kind: other.kind_name(),
                }))
            }
        };
        Ok(SlicedString(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Delimiter;

    #[test]
    fn test_decode_json() {
        let mut s = SlicedString::default();
        s.decode_json(br#"["a","b","c"]"#).unwrap();
        assert_eq!(s, SlicedString::from(vec!["a", "b", "c"]));

        s.decode_json(br#""only""#).unwrap();
        assert_eq!(s.as_slice(), ["only"]);

        s.decode_json(b"[]").unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn test_decode_json_errors() {
        let mut s = SlicedString::from(vec!["keep"]);
        let err = s.decode_json(b"1").unwrap_err();
        assert!(err.to_string().contains("number"));
        assert!(matches!(err, Error::UnsupportedType { kind: "number" }));
        assert!(s.is_empty());

        let mut s = SlicedString::from(vec!["keep"]);
        let err = s.decode_json(br#"["a", 2]"#).unwrap_err();
        assert_eq!(err.to_string(), "unsupported type 'number' in slice");
        assert!(s.is_empty());

        let mut s = SlicedString::from(vec!["keep"]);
        assert!(matches!(
            s.decode_json(b"null"),
            Err(Error::UnsupportedType { kind: "null" })
        ));
        assert!(s.is_empty());

        let mut s = SlicedString::from(vec!["keep"]);
        assert!(matches!(s.decode_json(b"[\"a\""), Err(Error::Json(_))));
        assert!(s.is_empty());
    }

    #[test]
    fn test_encode_json() {
        assert_eq!(SlicedString::default().encode_json(), b"[]");
        assert_eq!(
            SlicedString::from(vec!["x", "y"]).encode_json(),
            br#"["x","y"]"#
        );
    }

    #[test]
    fn test_scan() {
        let mut s = SlicedString::from(vec!["keep"]);
        s.scan(Value::Null).unwrap();
        assert_eq!(s.as_slice(), ["keep"]);

        s.scan(Value::from("a,b")).unwrap();
        assert_eq!(s.as_slice(), ["a,b"]);

        s.scan(Value::from(&b"raw"[..])).unwrap();
        assert_eq!(s.as_slice(), ["raw"]);

        s.scan(Value::List(vec![Value::from("p"), Value::from("q")]))
            .unwrap();
        assert_eq!(
            s.to_storable(),
            Value::List(vec![Value::from("p"), Value::from("q")])
        );

        assert!(matches!(
            s.scan(Value::List(vec![Value::Bool(true)])),
            Err(Error::UnsupportedElement { kind: "bool" })
        ));
        assert!(s.is_empty());
    }

    #[test]
    fn test_scan_failure_clears() {
        let mut s = SlicedString::from(vec!["keep"]);
        assert!(matches!(
            s.scan(Value::from(3i64)),
            Err(Error::UnsupportedType { kind: "number" })
        ));
        assert!(s.is_empty());

        let mut s = SlicedString::from(vec!["keep"]);
        assert!(s
            .scan(Value::List(vec![Value::from("a"), Value::Null]))
            .is_err());
        assert!(s.is_empty());
    }

    #[test]
    fn test_text() {
        let mut s = SlicedString::default();
        s.decode_text(b"a,b,,c").unwrap();
        assert_eq!(s.as_slice(), ["a", "b", "", "c"]);
        assert_eq!(s.encode_text(), b"a,b,,c");

        s.decode_text(b"").unwrap();
        assert!(s.is_empty());
        assert!(s.encode_text().is_empty());

        let tabs = TextOptions::new().with_delimiter(Delimiter::Tab);
        s.decode_text_with(b"x\ty", &tabs).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.encode_text_with(&tabs), b"x\ty");
    }
}
