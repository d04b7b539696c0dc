//! The coercion engine.
//!
//! These functions turn any [`Value`] into one primitive. They come in two
//! families that must stay separate:
//!
//! - **Lossy coercion** ([`as_bool`], [`as_int`], [`as_uint`], [`as_string`],
//!   [`as_byte_slice`]) never fails. Out-of-range numbers saturate at the
//!   nearest bound and unparseable text becomes zero or `false`.
//! - **Strict scanning** ([`to_type`]) narrows into a typed [`Destination`] and
//!   fails for destination kinds outside the supported set.
//!
//! ## Examples
//!
//! ```rust
//! use serde_scalars::coerce::{as_bool, as_int, as_uint};
//! use serde_scalars::Value;
//!
//! assert!(as_bool(&Value::from("Yes")));
//! assert!(!as_bool(&Value::from("abcdef")));
//! assert_eq!(as_int(&Value::from(300i64), -128, 127), 127);
//! assert_eq!(as_int(&Value::from(-2.5), i64::MIN, i64::MAX), -3);
//! assert_eq!(as_uint(&Value::from("-7"), 0, u64::MAX), 0);
//! ```

use crate::{Error, Result, Value};
use std::fmt;

/// The rendering of [`Value::Null`] by [`as_string`].
pub const NIL_TOKEN: &str = "<nil>";

fn lookup_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "yes" | "t" | "y" | "1" => Some(true),
        "false" | "no" | "f" | "n" | "0" | "-1" => Some(false),
        _ => None,
    }
}

/// Coerces a value into a boolean.
///
/// Text and bytes go through a fixed, case-insensitive table. Anything not in
/// the table is `false`, exactly like a recognized false literal.
#[must_use]
pub fn as_bool(value: &Value) -> bool {
    match value {
        Value::Text(s) => lookup_bool(&s.to_lowercase()).unwrap_or(false),
        Value::Bytes(b) => {
            lookup_bool(&String::from_utf8_lossy(b).to_lowercase()).unwrap_or(false)
        }
        Value::I8(i) => *i > 0,
        Value::I16(i) => *i > 0,
        Value::I32(i) => *i > 0,
        Value::I64(i) => *i > 0,
        Value::U8(u) => *u > 0,
        Value::U16(u) => *u > 0,
        Value::U32(u) => *u > 0,
        Value::U64(u) => *u > 0,
        Value::F32(f) => (f.floor() as i64) > 0,
        Value::F64(f) => (f.floor() as i64) > 0,
        Value::Bool(b) => *b,
        Value::Null | Value::List(_) | Value::Map(_) => false,
    }
}

/// An integer type that values can be saturated into.
pub trait Integral: Copy {
    const MIN: Self;
    const MAX: Self;

    fn widen(self) -> i128;

    /// Narrows a value already known to lie within `MIN..=MAX`.
    fn narrow(wide: i128) -> Self;
}

macro_rules! impl_integral {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Integral for $ty {
                const MIN: Self = <$ty>::MIN;
                const MAX: Self = <$ty>::MAX;

                #[inline]
                fn widen(self) -> i128 {
                    self as i128
                }

                #[inline]
                fn narrow(wide: i128) -> Self {
                    wide as $ty
                }
            }
        )*
    };
}

impl_integral!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// An inclusive `(min, max)` range that numeric input is saturated into.
///
/// # Examples
///
/// ```rust
/// use serde_scalars::coerce::Bounds;
/// use serde_scalars::Value;
///
/// let percent = Bounds::<u64>::full().with_max(100);
/// assert_eq!(percent.saturate(&Value::from(250u32)), 100);
/// assert_eq!(percent.saturate(&Value::from(-4i8)), 0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: Integral> Bounds<T> {
    #[must_use]
    pub const fn new(min: T, max: T) -> Self {
        Bounds { min, max }
    }

    /// The whole range of `T`.
    #[must_use]
    pub const fn full() -> Self {
        Bounds {
            min: T::MIN,
            max: T::MAX,
        }
    }

    #[must_use]
    pub fn with_min(mut self, min: T) -> Self {
        self.min = min;
        self
    }

    #[must_use]
    pub fn with_max(mut self, max: T) -> Self {
        self.max = max;
        self
    }

    /// Caps `wide` at the nearest bound.
    #[must_use]
    pub fn clamp(&self, wide: i128) -> T {
        let (min, max) = (self.min.widen(), self.max.widen());
        if wide > max {
            self.max
        } else if wide < min {
            self.min
        } else {
            T::narrow(wide)
        }
    }

    /// Coerces `value` into this range.
    ///
    /// Numbers saturate (floats are floored first). Text and bytes are parsed
    /// as base-10; text that does not parse yields zero rather than a bound.
    /// Every other kind yields zero.
    #[must_use]
    pub fn saturate(&self, value: &Value) -> T {
        match integral(value) {
            Some(wide) => self.clamp(wide),
            None => T::narrow(0),
        }
    }
}

fn integral(value: &Value) -> Option<i128> {
    match value {
        Value::I8(i) => Some(i128::from(*i)),
        Value::I16(i) => Some(i128::from(*i)),
        Value::I32(i) => Some(i128::from(*i)),
        Value::I64(i) => Some(i128::from(*i)),
        Value::U8(u) => Some(i128::from(*u)),
        Value::U16(u) => Some(i128::from(*u)),
        Value::U32(u) => Some(i128::from(*u)),
        Value::U64(u) => Some(i128::from(*u)),
        Value::F32(f) => Some(f.floor() as i128),
        Value::F64(f) => Some(f.floor() as i128),
        Value::Text(s) => parse_integral(s),
        Value::Bytes(b) => parse_integral(&String::from_utf8_lossy(b)),
        Value::Null | Value::Bool(_) | Value::List(_) | Value::Map(_) => None,
    }
}

fn parse_integral(s: &str) -> Option<i128> {
    if s.starts_with('-') {
        s.parse::<i64>().ok().map(i128::from)
    } else if s.starts_with('+') {
        None
    } else {
        s.parse::<u64>().ok().map(i128::from)
    }
}

/// Coerces a value into a signed integer within `[min, max]`.
#[must_use]
pub fn as_int(value: &Value, min: i64, max: i64) -> i64 {
    Bounds::new(min, max).saturate(value)
}

/// Coerces a value into an unsigned integer within `[min, max]`.
///
/// Negative input, numeric or textual, saturates to `min`.
#[must_use]
pub fn as_uint(value: &Value, min: u64, max: u64) -> u64 {
    // A leading '-' wins over the unparseable-text rule: "-abc" gives min, not 0.
    if has_minus_sign(value) {
        return min;
    }
    Bounds::new(min, max).saturate(value)
}

fn has_minus_sign(value: &Value) -> bool {
    match value {
        Value::Text(s) => s.starts_with('-'),
        Value::Bytes(b) => b.first() == Some(&b'-'),
        _ => false,
    }
}

/// Float types that can be rendered in shortest round-trip form.
pub(crate) trait ShortestFloat: Copy + fmt::Display + fmt::LowerExp {
    fn is_nan(self) -> bool;
    fn is_infinite(self) -> bool;
    fn is_sign_negative(self) -> bool;
}

macro_rules! impl_shortest_float {
    ($($ty:ty),*) => {
        $(
            impl ShortestFloat for $ty {
                fn is_nan(self) -> bool {
                    <$ty>::is_nan(self)
                }

                fn is_infinite(self) -> bool {
                    <$ty>::is_infinite(self)
                }

                fn is_sign_negative(self) -> bool {
                    <$ty>::is_sign_negative(self)
                }
            }
        )*
    };
}

impl_shortest_float!(f32, f64);

/// Renders a float with the fewest digits that round-trip at its own width.
///
/// Plain decimal notation is used for decimal exponents in `-4..6`, otherwise
/// scientific notation with a signed, at least two-digit exponent (`1e+06`).
pub(crate) fn format_float<F: ShortestFloat>(f: F) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f.is_sign_negative() { "-Inf" } else { "+Inf" }.to_string();
    }

    let sci = format!("{:e}", f);
    let split = sci
        .split_once('e')
        .and_then(|(mantissa, exp)| exp.parse::<i32>().ok().map(|exp| (mantissa, exp)));

    match split {
        Some((mantissa, exp)) if !(-4..6).contains(&exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        _ => f.to_string(),
    }
}

/// Renders a value as human-readable text.
///
/// Null renders as [`NIL_TOKEN`]. Lists and maps use the `Display` form of
/// [`Value`].
#[must_use]
pub fn as_string(value: &Value) -> String {
    match value {
        Value::Text(s) => s.clone(),
        Value::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        Value::F32(f) => format_float(*f),
        Value::F64(f) => format_float(*f),
        Value::Null
        | Value::Bool(_)
        | Value::I8(_)
        | Value::I16(_)
        | Value::I32(_)
        | Value::I64(_)
        | Value::U8(_)
        | Value::U16(_)
        | Value::U32(_)
        | Value::U64(_)
        | Value::List(_)
        | Value::Map(_) => value.to_string(),
    }
}

fn put_uvarint(buf: &mut Vec<u8>, mut x: u64) {
    while x >= 0x80 {
        buf.push((x as u8) | 0x80);
        x >>= 7;
    }
    buf.push(x as u8);
}

fn put_varint(buf: &mut Vec<u8>, x: i64) {
    put_uvarint(buf, ((x << 1) ^ (x >> 63)) as u64);
}

fn varint(x: i64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(10);
    put_varint(&mut buf, x);
    buf
}

fn uvarint(x: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(10);
    put_uvarint(&mut buf, x);
    buf
}

/// Renders a value in its compact wire form.
///
/// Unlike [`as_string`], integers become varints (zig-zag for signed kinds)
/// instead of decimal text. Null, lists and maps produce an empty buffer.
#[must_use]
pub fn as_byte_slice(value: &Value) -> Vec<u8> {
    match value {
        Value::Null | Value::List(_) | Value::Map(_) => Vec::new(),
        Value::Text(s) => s.as_bytes().to_vec(),
        Value::Bytes(b) => b.clone(),
        Value::Bool(b) => b.to_string().into_bytes(),
        Value::F32(f) => format_float(*f).into_bytes(),
        Value::F64(f) => format_float(*f).into_bytes(),
        Value::I8(i) => varint(i64::from(*i)),
        Value::I16(i) => varint(i64::from(*i)),
        Value::I32(i) => varint(i64::from(*i)),
        Value::I64(i) => varint(*i),
        Value::U8(u) => uvarint(u64::from(*u)),
        Value::U16(u) => uvarint(u64::from(*u)),
        Value::U32(u) => uvarint(u64::from(*u)),
        Value::U64(u) => uvarint(*u),
    }
}

/// A typed slot that [`to_type`] writes a scanned value into.
#[derive(Debug)]
pub enum Destination<'a> {
    Text(&'a mut String),
    Bytes(&'a mut Vec<u8>),
    Bool(&'a mut bool),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
    F32(&'a mut f32),
    F64(&'a mut f64),
}

impl Destination<'_> {
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Destination::Text(_) => "string",
            Destination::Bytes(_) => "bytes",
            Destination::Bool(_) => "bool",
            Destination::I8(_) => "i8",
            Destination::I16(_) => "i16",
            Destination::I32(_) => "i32",
            Destination::I64(_) => "i64",
            Destination::Isize(_) => "isize",
            Destination::U8(_) => "u8",
            Destination::U16(_) => "u16",
            Destination::U32(_) => "u32",
            Destination::U64(_) => "u64",
            Destination::Usize(_) => "usize",
            Destination::F32(_) => "f32",
            Destination::F64(_) => "f64",
        }
    }
}

macro_rules! impl_destination_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a mut $ty> for Destination<'a> {
                fn from(slot: &'a mut $ty) -> Self {
                    Destination::$variant(slot)
                }
            }
        )*
    };
}

impl_destination_from! {
    String => Text,
    Vec<u8> => Bytes,
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

fn fill<T: Integral>(slot: &mut T, src: &Value) {
    *slot = Bounds::<T>::full().saturate(src);
}

/// Copies `src` into `dest`, coercing it to the destination's kind.
///
/// Returns `Ok(true)` when `src` is null; the destination is left untouched
/// in that case. Otherwise returns `Ok(false)` after writing.
///
/// # Errors
///
/// [`Error::UnsupportedDestination`] for floating point destinations, which
/// have no coercion.
///
/// # Examples
///
/// ```rust
/// use serde_scalars::coerce::to_type;
/// use serde_scalars::Value;
///
/// let mut small = 0i8;
/// assert_eq!(to_type(&Value::from(1000i64), (&mut small).into()).unwrap(), false);
/// assert_eq!(small, i8::MAX);
///
/// let mut ratio = 0f64;
/// assert!(to_type(&Value::from(1i64), (&mut ratio).into()).is_err());
/// ```
pub fn to_type(src: &Value, dest: Destination<'_>) -> Result<bool> {
    if src.is_null() {
        return Ok(true);
    }

    match dest {
        Destination::Text(slot) => *slot = as_string(src),
        Destination::Bytes(slot) => *slot = as_byte_slice(src),
        Destination::Bool(slot) => *slot = as_bool(src),
        Destination::I8(slot) => fill(slot, src),
        Destination::I16(slot) => fill(slot, src),
        Destination::I32(slot) => fill(slot, src),
        Destination::I64(slot) => fill(slot, src),
        Destination::Isize(slot) => fill(slot, src),
        Destination::U8(slot) => fill(slot, src),
        Destination::U16(slot) => fill(slot, src),
        Destination::U32(slot) => fill(slot, src),
        Destination::U64(slot) => fill(slot, src),
        Destination::Usize(slot) => fill(slot, src),
        other @ (Destination::F32(_) | Destination::F64(_)) => {
            return Err(Error::UnsupportedDestination {
                kind: other.kind_name(),
            })
        }
    }

    Ok(false)
}
