//! Send rates: a count per duration.
//!
//! A [`Rate`] is written `count/duration`, for example `100/1s`. An empty
//! rate (zero count, zero sleep) is not null: it encodes as the empty string.
//!
//! ```rust
//! use serde_scalars::{JsonCodec, Rate, SECOND};
//!
//! let rate = Rate::new("100/1s").unwrap();
//! assert_eq!(rate.count, 100);
//! assert_eq!(rate.sleep.ticks, SECOND);
//! assert_eq!(rate.to_string(), "100/1s");
//!
//! assert_eq!(Rate::default().encode_json(), br#""""#);
//! ```

use crate::codec::{parse_json, Column, JsonCodec, TextCodec};
use crate::duration::{format_duration, parse_duration};
use crate::{Duration, Error, Result, Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

const SEPARATOR: char = '/';

/// A number of events per sleep interval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rate {
    pub count: u64,
    pub sleep: Duration,
}

impl Rate {
    /// Parses `raw` into a new rate. Empty input gives the empty rate.
    ///
    /// # Errors
    ///
    /// See [`Rate::set_from_raw`].
    pub fn new(raw: &str) -> Result<Self> {
        let mut rate = Rate::default();
        rate.set_from_raw(raw)?;
        Ok(rate)
    }

    /// Parses `raw` into `self`.
    ///
    /// Empty input leaves `self` unchanged. Any failure resets `self` to the
    /// empty rate.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRate`] unless `raw` has exactly one `/`, or if the
    ///   count carries a `+` sign
    /// - [`Error::ParseCount`] if the count is not an unsigned integer
    /// - [`Error::Duration`] if the sleep is not a lexical duration
    pub fn set_from_raw(&mut self, raw: &str) -> Result<()> {
        if raw.is_empty() {
            return Ok(());
        }

        match parse_rate(raw) {
            Ok(rate) => {
                *self = rate;
                Ok(())
            }
            Err(err) => {
                self.reset();
                Err(err)
            }
        }
    }

    /// `true` when both the count and the sleep are zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0 && self.sleep.ticks == 0
    }

    fn reset(&mut self) {
        *self = Rate::default();
    }

    /// The canonical form, or the empty string for an empty rate.
    fn encode_string(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            self.to_string()
        }
    }

    /// Parses a JSON string payload; a payload that is itself quoted has every quote stripped.
    fn apply_str(&mut self, raw: &str) -> Result<()> {
        if raw.is_empty() {
            self.reset();
            return Ok(());
        }
        if raw.starts_with('"') {
            trace!(raw, "stripping embedded quotes from rate");
            return self.set_from_raw(&raw.replace('"', ""));
        }
        self.set_from_raw(raw)
    }

    fn apply_json(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Text(s) => self.apply_str(&s),
            Value::Map(map) => {
                let inner = map.into_single()?;
                trace!(kind = inner.kind_name(), "unwrapping single-key rate object");
                match inner {
                    Value::Text(s) => self.apply_str(&s),
                    other => Err(Error::InvalidValueKind {
                        kind: other.kind_name(),
                    }),
                }
            }
            other => Err(Error::UnsupportedType {
                kind: other.kind_name(),
            }),
        }
    }
}

fn parse_rate(raw: &str) -> Result<Rate> {
    let invalid = || Error::InvalidRate {
        raw: raw.to_string(),
    };

    let mut parts = raw.split(SEPARATOR);
    let (count, sleep) = match (parts.next(), parts.next(), parts.next()) {
        (Some(count), Some(sleep), None) => (count, sleep),
        _ => return Err(invalid()),
    };
    // u64's FromStr takes a leading '+'; counts are bare digits.
    if count.starts_with('+') {
        return Err(invalid());
    }

    Ok(Rate {
        count: count.parse::<u64>()?,
        sleep: Duration::from_ticks(parse_duration(sleep)?),
    })
}

impl FromStr for Rate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Rate::new(s)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.count, SEPARATOR, format_duration(self.sleep.ticks))
    }
}

impl Column for Rate {
    /// A null row reads as the empty rate; text and bytes use [`Rate::set_from_raw`].
    fn scan(&mut self, raw: Value) -> Result<()> {
        self.reset();
        match raw {
            Value::Null => Ok(()),
            Value::Text(s) => self.set_from_raw(&s),
            Value::Bytes(b) => self.set_from_raw(&String::from_utf8_lossy(&b)),
            other => Err(Error::UnsupportedType {
                kind: other.kind_name(),
            }),
        }
    }

    fn to_storable(&self) -> Value {
        Value::Text(self.encode_string())
    }
}

impl JsonCodec for Rate {
    fn decode_json(&mut self, buf: &[u8]) -> Result<()> {
        let result = parse_json(buf).and_then(|value| self.apply_json(value));
        if result.is_err() {
            self.reset();
        }
        result
    }

    fn to_json_value(&self) -> serde_json::Value {
        serde_json::Value::String(self.encode_string())
    }
}

impl TextCodec for Rate {
    fn decode_text(&mut self, buf: &[u8]) -> Result<()> {
        self.reset();
        self.set_from_raw(&String::from_utf8_lossy(buf))
    }

    fn encode_text(&self) -> Vec<u8> {
        self.encode_string().into_bytes()
    }
}

impl Serialize for Rate {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.encode_string())
    }
}

impl<'de> Deserialize<'de> for Rate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let mut out = Rate::default();
        out.apply_json(raw).map_err(serde::de::Error::custom)?;
        Ok(out)
    }
}
