//! Nullable elapsed time.
//!
//! [`Duration`] stores a signed nanosecond tick count and a null flag. On the
//! text and JSON surfaces it is written as a lexical literal such as `1s`,
//! `1h30m0s` or `1.5ms`.
//!
//! ## Accepted JSON shapes
//!
//! | Input | Result |
//! |---|---|
//! | number | ticks = floor(number) |
//! | string | parsed as a lexical duration |
//! | `{"key": number \| string}` | same as above |
//! | `{"key": null}` or `null` | null |
//! | `{}` | [`Error::NoContent`] |
//! | object with two or more keys | [`Error::TooBig`] |
//! | anything else | [`Error::UnsupportedType`] |
//!
//! Encoding always produces the string form, so a duration read from a
//! number is written back as a string.
//!
//! ```rust
//! use serde_scalars::{Duration, JsonCodec, SECOND};
//!
//! let mut d = Duration::default();
//! d.decode_json(b"1000000000").unwrap();
//! assert_eq!(d.ticks, SECOND);
//! assert_eq!(d.encode_json(), br#""1s""#);
//! ```

use crate::codec::{parse_json, Column, JsonCodec, TextCodec};
use crate::coerce::Bounds;
use crate::{Error, ParseDurationError, Result, Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

pub const NANOSECOND: i64 = 1;
pub const MICROSECOND: i64 = 1_000 * NANOSECOND;
pub const MILLISECOND: i64 = 1_000 * MICROSECOND;
pub const SECOND: i64 = 1_000 * MILLISECOND;
pub const MINUTE: i64 = 60 * SECOND;
pub const HOUR: i64 = 60 * MINUTE;

fn unit_ticks(unit: &str) -> Option<u64> {
    let ticks = match unit {
        "ns" => NANOSECOND,
        "us" | "\u{00b5}s" | "\u{03bc}s" => MICROSECOND,
        "ms" => MILLISECOND,
        "s" => SECOND,
        "m" => MINUTE,
        "h" => HOUR,
        _ => return None,
    };
    Some(ticks as u64)
}

const LIMIT: u64 = 1 << 63;

/// Parses a lexical duration into nanosecond ticks.
///
/// The grammar is an optional sign followed by one or more `<decimal><unit>`
/// pairs, where a decimal may carry a fraction (`1.5h`) and the unit is one
/// of `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare `0` is accepted.
///
/// # Errors
///
/// Returns a [`ParseDurationError`] describing the first problem found.
///
/// # Examples
///
/// ```rust
/// use serde_scalars::duration::{parse_duration, HOUR, MINUTE};
///
/// assert_eq!(parse_duration("1h30m").unwrap(), HOUR + 30 * MINUTE);
/// assert_eq!(parse_duration("-1.5h").unwrap(), -(HOUR + 30 * MINUTE));
/// assert!(parse_duration("1x").is_err());
/// ```
pub fn parse_duration(input: &str) -> std::result::Result<i64, ParseDurationError> {
    let invalid = || ParseDurationError::Invalid {
        input: input.to_string(),
    };
    let overflow = || ParseDurationError::Overflow {
        input: input.to_string(),
    };

    let mut s = input;
    let mut neg = false;
    if let Some(rest) = s.strip_prefix('-') {
        neg = true;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }

    if s == "0" {
        return Ok(0);
    }
    if s.is_empty() {
        return Err(if input.is_empty() {
            ParseDurationError::Empty
        } else {
            invalid()
        });
    }

    let mut total: u64 = 0;
    while !s.is_empty() {
        if !s.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err(invalid());
        }

        let digits = s.bytes().take_while(u8::is_ascii_digit).count();
        let mut whole: u64 = 0;
        for b in s[..digits].bytes() {
            whole = whole
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(b - b'0')))
                .filter(|v| *v <= LIMIT)
                .ok_or_else(invalid)?;
        }
        s = &s[digits..];

        let mut frac: u64 = 0;
        let mut scale = 1.0_f64;
        let mut frac_digits = 0;
        if let Some(rest) = s.strip_prefix('.') {
            s = rest;
            frac_digits = s.bytes().take_while(u8::is_ascii_digit).count();
            let mut saturated = false;
            for b in s[..frac_digits].bytes() {
                if saturated {
                    continue;
                }
                match frac
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(u64::from(b - b'0')))
                    .filter(|v| *v <= LIMIT)
                {
                    Some(v) => {
                        frac = v;
                        scale *= 10.0;
                    }
                    None => saturated = true,
                }
            }
            s = &s[frac_digits..];
        }
        if digits == 0 && frac_digits == 0 {
            return Err(invalid());
        }

        let unit_len = s
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(s.len());
        if unit_len == 0 {
            return Err(ParseDurationError::MissingUnit {
                input: input.to_string(),
            });
        }
        let unit = &s[..unit_len];
        s = &s[unit_len..];
        let per_unit = unit_ticks(unit).ok_or_else(|| ParseDurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        if whole > LIMIT / per_unit {
            return Err(overflow());
        }
        let mut ticks = whole * per_unit;
        if frac > 0 {
            ticks += (frac as f64 * (per_unit as f64 / scale)) as u64;
            if ticks > LIMIT {
                return Err(overflow());
            }
        }
        total = total
            .checked_add(ticks)
            .filter(|v| *v <= LIMIT)
            .ok_or_else(overflow)?;
    }

    if neg {
        return Ok((total as i64).wrapping_neg());
    }
    i64::try_from(total).map_err(|_| overflow())
}

/// Splits `v` into `v / 10^prec` and the fractional digits, with trailing
/// zeros (and an all-zero fraction) removed.
fn split_fraction(v: u64, prec: u32) -> (u64, String) {
    if prec == 0 {
        return (v, String::new());
    }
    let pow = 10u64.pow(prec);
    let frac = v % pow;
    if frac == 0 {
        return (v / pow, String::new());
    }
    let digits = format!("{:0width$}", frac, width = prec as usize);
    (v / pow, format!(".{}", digits.trim_end_matches('0')))
}

/// Formats nanosecond ticks in canonical lexical form.
///
/// # Examples
///
/// ```rust
/// use serde_scalars::duration::{format_duration, HOUR, MILLISECOND, SECOND};
///
/// assert_eq!(format_duration(0), "0s");
/// assert_eq!(format_duration(1500 * MILLISECOND), "1.5s");
/// assert_eq!(format_duration(HOUR + 30 * SECOND), "1h0m30s");
/// assert_eq!(format_duration(-2 * MILLISECOND), "-2ms");
/// ```
#[must_use]
pub fn format_duration(ticks: i64) -> String {
    let u = ticks.unsigned_abs();
    let sign = if ticks < 0 { "-" } else { "" };

    if u == 0 {
        return "0s".to_string();
    }

    if u < SECOND as u64 {
        let (prec, unit) = if u < MICROSECOND as u64 {
            (0, "ns")
        } else if u < MILLISECOND as u64 {
            (3, "\u{00b5}s")
        } else {
            (6, "ms")
        };
        let (whole, frac) = split_fraction(u, prec);
        return format!("{}{}{}{}", sign, whole, frac, unit);
    }

    let (secs, frac) = split_fraction(u, 9);
    let mins = secs / 60;
    let hours = mins / 60;

    let mut out = String::from(sign);
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if mins > 0 {
        out.push_str(&format!("{}m", mins % 60));
    }
    out.push_str(&format!("{}{}s", secs % 60, frac));
    out
}

/// A nullable elapsed time with nanosecond resolution.
///
/// Zero ticks with `nil == false` is a real zero duration, distinct from null.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Duration {
    pub ticks: i64,
    pub nil: bool,
}

impl Duration {
    #[must_use]
    pub const fn from_ticks(ticks: i64) -> Self {
        Duration { ticks, nil: false }
    }

    #[must_use]
    pub const fn null() -> Self {
        Duration { ticks: 0, nil: true }
    }

    pub fn set_null(&mut self) {
        *self = Self::null();
    }

    #[must_use]
    pub const fn get(&self) -> Option<i64> {
        if self.nil {
            None
        } else {
            Some(self.ticks)
        }
    }

    /// Parses a lexical duration into a non-null value.
    ///
    /// # Errors
    ///
    /// See [`parse_duration`].
    pub fn parse(s: &str) -> std::result::Result<Self, ParseDurationError> {
        parse_duration(s).map(Self::from_ticks)
    }

    /// Converts to a standard library duration. `None` when null or negative.
    #[must_use]
    pub fn to_std(&self) -> Option<std::time::Duration> {
        let ticks = u64::try_from(self.get()?).ok()?;
        Some(std::time::Duration::from_nanos(ticks))
    }

    /// Converts to a chrono delta. `None` when null.
    #[must_use]
    pub fn to_chrono(&self) -> Option<chrono::TimeDelta> {
        self.get().map(chrono::TimeDelta::nanoseconds)
    }

    fn apply_json(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Null => {
                self.set_null();
                Ok(())
            }
            Value::Map(map) => {
                let inner = map.into_single()?;
                trace!(kind = inner.kind_name(), "unwrapping single-key duration object");
                if inner.is_null() {
                    self.set_null();
                    return Ok(());
                }
                let kind = inner.kind_name();
                let ticks = scalar_ticks(&inner).ok_or(Error::InvalidValueKind { kind })??;
                *self = Self::from_ticks(ticks);
                Ok(())
            }
            other => {
                let kind = other.kind_name();
                let ticks = scalar_ticks(&other).ok_or(Error::UnsupportedType { kind })??;
                *self = Self::from_ticks(ticks);
                Ok(())
            }
        }
    }
}

/// Ticks for a number or a lexical string; `None` for every other kind.
fn scalar_ticks(value: &Value) -> Option<Result<i64>> {
    match value {
        Value::Text(s) => Some(parse_duration(s).map_err(Error::from)),
        Value::Bytes(b) => Some(parse_duration(&String::from_utf8_lossy(b)).map_err(Error::from)),
        v if v.is_number() => Some(Ok(Bounds::<i64>::full().saturate(v))),
        _ => None,
    }
}

impl FromStr for Duration {
    type Err = ParseDurationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<std::time::Duration> for Duration {
    fn from(d: std::time::Duration) -> Self {
        Self::from_ticks(i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
    }
}

impl From<chrono::TimeDelta> for Duration {
    fn from(delta: chrono::TimeDelta) -> Self {
        let ticks = delta.num_nanoseconds().unwrap_or(if delta < chrono::TimeDelta::zero() {
            i64::MIN
        } else {
            i64::MAX
        });
        Self::from_ticks(ticks)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(ticks) => f.write_str(&format_duration(ticks)),
            None => f.write_str("nil"),
        }
    }
}

impl Column for Duration {
    fn scan(&mut self, raw: Value) -> Result<()> {
        if raw.is_null() {
            self.set_null();
            return Ok(());
        }
        let kind = raw.kind_name();
        match scalar_ticks(&raw) {
            Some(Ok(ticks)) => {
                *self = Self::from_ticks(ticks);
                Ok(())
            }
            Some(Err(err)) => {
                *self = Self::default();
                Err(err)
            }
            None => {
                *self = Self::default();
                Err(Error::UnsupportedType { kind })
            }
        }
    }

    fn to_storable(&self) -> Value {
        self.get().map_or(Value::Null, Value::I64)
    }
}

impl JsonCodec for Duration {
    fn decode_json(&mut self, buf: &[u8]) -> Result<()> {
        let result = parse_json(buf).and_then(|value| self.apply_json(value));
        if result.is_err() {
            *self = Self::default();
        }
        result
    }

    fn to_json_value(&self) -> serde_json::Value {
        self.get().map_or(serde_json::Value::Null, |ticks| {
            serde_json::Value::String(format_duration(ticks))
        })
    }
}

impl TextCodec for Duration {
    /// Empty input decodes as null. A literal that fails to parse also leaves
    /// the duration null, and the parse error is still returned.
    fn decode_text(&mut self, buf: &[u8]) -> Result<()> {
        if buf.is_empty() {
            self.set_null();
            return Ok(());
        }
        match parse_duration(&String::from_utf8_lossy(buf)) {
            Ok(ticks) => {
                *self = Self::from_ticks(ticks);
                Ok(())
            }
            Err(err) => {
                self.set_null();
                Err(err.into())
            }
        }
    }

    fn encode_text(&self) -> Vec<u8> {
        self.get()
            .map(|ticks| format_duration(ticks).into_bytes())
            .unwrap_or_default()
    }
}

impl Serialize for Duration {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.get() {
            Some(ticks) => serializer.serialize_str(&format_duration(ticks)),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let mut out = Self::default();
        out.apply_json(raw).map_err(serde::de::Error::custom)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_duration("1s").unwrap(), SECOND);
        assert_eq!(parse_duration("500ms").unwrap(), 500 * MILLISECOND);
        assert_eq!(parse_duration("2us").unwrap(), 2 * MICROSECOND);
        assert_eq!(parse_duration("2\u{00b5}s").unwrap(), 2 * MICROSECOND);
        assert_eq!(parse_duration("2\u{03bc}s").unwrap(), 2 * MICROSECOND);
        assert_eq!(parse_duration("7ns").unwrap(), 7);
        assert_eq!(parse_duration("1h30m").unwrap(), 90 * MINUTE);
        assert_eq!(parse_duration("0").unwrap(), 0);
        assert_eq!(parse_duration("+0").unwrap(), 0);
        assert_eq!(parse_duration(".5s").unwrap(), 500 * MILLISECOND);
        assert_eq!(parse_duration("1.s").unwrap(), SECOND);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_duration(""), Err(ParseDurationError::Empty));
        assert!(matches!(
            parse_duration("-"),
            Err(ParseDurationError::Invalid { .. })
        ));
        assert!(matches!(
            parse_duration("1"),
            Err(ParseDurationError::MissingUnit { .. })
        ));
        assert!(matches!(
            parse_duration("1x"),
            Err(ParseDurationError::UnknownUnit { ref unit, .. }) if unit == "x"
        ));
        assert!(matches!(
            parse_duration("NaN"),
            Err(ParseDurationError::Invalid { .. })
        ));
        assert!(matches!(
            parse_duration("."),
            Err(ParseDurationError::Invalid { .. })
        ));
        assert!(matches!(
            parse_duration("9999999999h"),
            Err(ParseDurationError::Overflow { .. })
        ));
    }

    #[test]
    fn test_parse_extremes() {
        assert_eq!(parse_duration("-9223372036854775808ns").unwrap(), i64::MIN);
        assert!(parse_duration("9223372036854775808ns").is_err());
        assert_eq!(parse_duration("9223372036854775807ns").unwrap(), i64::MAX);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_duration(1), "1ns");
        assert_eq!(format_duration(1_500), "1.5\u{00b5}s");
        assert_eq!(format_duration(1_500_000), "1.5ms");
        assert_eq!(format_duration(SECOND), "1s");
        assert_eq!(format_duration(90 * SECOND), "1m30s");
        assert_eq!(format_duration(HOUR), "1h0m0s");
        assert_eq!(format_duration(HOUR + 1), "1h0m0.000000001s");
        assert_eq!(format_duration(i64::MIN), "-2562047h47m16.854775808s");
    }

    #[test]
    fn test_json_shapes() {
        let mut d = Duration::default();
        d.decode_json(br#""1s""#).unwrap();
        assert_eq!(d, Duration::from_ticks(SECOND));

        d.decode_json(br#"{"d": 1000000000}"#).unwrap();
        assert_eq!(d, Duration::from_ticks(SECOND));

        d.decode_json(br#"{"d": null}"#).unwrap();
        assert_eq!(d, Duration::null());

        d.decode_json(b"2.9").unwrap();
        assert_eq!(d, Duration::from_ticks(2));

        d.decode_json(b"null").unwrap();
        assert_eq!(d, Duration::null());
    }

    #[test]
    fn test_json_failures_reset() {
        let cases: [(&[u8], fn(&Error) -> bool); 7] = [
            (b"true", |e| matches!(e, Error::UnsupportedType { kind: "bool" })),
            (b"[1]", |e| matches!(e, Error::UnsupportedType { kind: "array" })),
            (br#"{"d":}"#, |e| matches!(e, Error::Json(_))),
            (br#""1x""#, |e| matches!(e, Error::Duration(_))),
            (b"{}", |e| matches!(e, Error::NoContent)),
            (br#"{"d": true}"#, |e| matches!(e, Error::InvalidValueKind { kind: "bool" })),
            (br#"{"d": true, "x": "1s"}"#, |e| matches!(e, Error::TooBig { len: 2 })),
        ];
        for (input, check) in cases {
            let mut d = Duration::from_ticks(5);
            let err = d.decode_json(input).unwrap_err();
            assert!(check(&err), "{}: {err}", String::from_utf8_lossy(input));
            assert_eq!(d, Duration::default());
        }
    }

    #[test]
    fn test_text_failure_nulls_and_reports() {
        let mut d = Duration::from_ticks(SECOND);
        assert!(d.decode_text(b"1x").is_err());
        assert_eq!(d, Duration::null());

        d.decode_text(b"1s").unwrap();
        assert_eq!(d.encode_text(), b"1s");

        d.decode_text(b"").unwrap();
        assert_eq!(d, Duration::null());
        assert!(d.encode_text().is_empty());
    }

    #[test]
    fn test_scan() {
        let mut d = Duration::default();
        for raw in [
            Value::from("1s"),
            Value::from(1_000_000_000i64),
            Value::from(1_000_000_000f64),
        ] {
            d.scan(raw).unwrap();
            assert_eq!(d, Duration::from_ticks(SECOND));
            assert_eq!(d.to_storable(), Value::I64(SECOND));
        }

        assert!(matches!(
            d.scan(Value::from(true)),
            Err(Error::UnsupportedType { kind: "bool" })
        ));
        assert_eq!(d, Duration::default());

        d.scan(Value::Null).unwrap();
        assert!(d.nil);
        assert_eq!(d.to_storable(), Value::Null);
    }

    #[test]
    fn test_interop() {
        let d = Duration::from(std::time::Duration::from_millis(1500));
        assert_eq!(d.ticks, 1500 * MILLISECOND);
        assert_eq!(d.to_std(), Some(std::time::Duration::from_millis(1500)));
        assert_eq!(Duration::from_ticks(-1).to_std(), None);
        assert_eq!(Duration::null().to_std(), None);

        let delta = chrono::TimeDelta::seconds(3);
        assert_eq!(Duration::from(delta).ticks, 3 * SECOND);
        assert_eq!(Duration::from_ticks(SECOND).to_chrono(), Some(chrono::TimeDelta::seconds(1)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Duration::null().to_string(), "nil");
        assert_eq!("1h30m".parse::<Duration>().unwrap().to_string(), "1h30m0s");
    }
}
