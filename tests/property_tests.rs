//! Property-based tests for the coercion engine and the lexical duration form.

use proptest::prelude::*;
use serde_scalars::coerce::{as_int, as_uint, Bounds};
use serde_scalars::duration::{format_duration, parse_duration};
use serde_scalars::{Bool, Duration, Int, JsonCodec, Rate, TextCodec, Value};

proptest! {
    #[test]
    fn prop_as_int_stays_in_range(x in any::<i64>(), a in any::<i64>(), b in any::<i64>()) {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        let got = as_int(&Value::from(x), min, max);
        prop_assert!(min <= got && got <= max);
        if min <= x && x <= max {
            prop_assert_eq!(got, x);
        }
    }

    #[test]
    fn prop_as_uint_stays_in_range(x in any::<u64>(), a in any::<u64>(), b in any::<u64>()) {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        let got = as_uint(&Value::from(x), min, max);
        prop_assert!(min <= got && got <= max);
        if min <= x && x <= max {
            prop_assert_eq!(got, x);
        }
    }

    #[test]
    fn prop_narrow_bounds_saturate(x in any::<i64>()) {
        let got = Bounds::<i8>::full().saturate(&Value::from(x));
        prop_assert_eq!(i64::from(got), x.clamp(i64::from(i8::MIN), i64::from(i8::MAX)));
    }

    #[test]
    fn prop_text_integers_match_numbers(x in any::<i64>()) {
        prop_assert_eq!(
            as_int(&Value::from(x.to_string()), i64::MIN, i64::MAX),
            as_int(&Value::from(x), i64::MIN, i64::MAX)
        );
    }

    #[test]
    fn prop_duration_lexical_round_trip(ticks in any::<i64>()) {
        let text = format_duration(ticks);
        prop_assert_eq!(parse_duration(&text), Ok(ticks));
    }

    #[test]
    fn prop_duration_json_round_trip(ticks in any::<i64>()) {
        let d = Duration::from_ticks(ticks);
        let mut back = Duration::null();
        back.decode_json(&d.encode_json()).unwrap();
        prop_assert_eq!(back, d);
    }

    #[test]
    fn prop_empty_text_is_null(prior in any::<i64>(), flag in any::<bool>()) {
        let mut i = Int::new(prior);
        i.decode_text(b"").unwrap();
        prop_assert_eq!(i, Int::null());

        let mut b = Bool::new(flag);
        b.decode_text(b"").unwrap();
        prop_assert_eq!(b, Bool::null());

        let mut d = Duration::from_ticks(prior);
        d.decode_text(b"").unwrap();
        prop_assert_eq!(d, Duration::null());
    }

    #[test]
    fn prop_rate_round_trip(count in 1u64.., secs in 0i64..1_000_000) {
        let raw = format!("{count}/{secs}s");
        let rate = Rate::new(&raw).unwrap();
        let mut back = Rate::default();
        back.decode_json(&rate.encode_json()).unwrap();
        prop_assert_eq!(back, rate);
    }
}
