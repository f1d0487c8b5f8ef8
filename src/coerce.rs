//! Conversions from [`Value`] into each field kind.
//!
//! Scalars that cannot be converted are errors. Sequence elements that cannot
//! be converted are dropped, so a file array like `[1, "x", 3]` fills a
//! `Vec<i64>` with `[1, 3]`.

use regex::Regex;

use crate::error::KiperError;
use crate::slot::{OptSlot, SeqSlot, Slot};
use crate::value::Value;

/// Default separator for sequence values given as one string.
pub const DEFAULT_DELIMITER: &str = r"\s*,\s*";

/// Integer view of a value. Floats truncate toward zero.
pub fn to_int(v: &Value) -> Option<i64> {
    match v {
        Value::Int(i) => Some(*i),
        Value::Float(f) if f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
            Some(f.trunc() as i64)
        }
        Value::Str(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn to_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Str(s) => match s.trim() {
            t if t.eq_ignore_ascii_case("true") => Some(true),
            t if t.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Text of a scalar. Sequences and maps are not scalars.
pub fn to_text(v: &Value) -> Option<String> {
    match v {
        Value::Str(_) | Value::Int(_) | Value::Float(_) | Value::Bool(_) => v.as_text(),
        _ => None,
    }
}

/// Split `text` on `delim`, dropping empty tokens.
pub fn split(text: &str, delim: &Regex) -> Vec<String> {
    delim
        .split(text)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// The elements a value contributes to a sequence field.
///
/// Arrays contribute their items, strings are split on `delim`, and any
/// other scalar becomes a single element.
pub fn elements(v: &Value, delim: &Regex) -> Vec<Value> {
    match v {
        Value::Seq(items) => items.clone(),
        Value::Str(s) => split(s, delim).into_iter().map(Value::Str).collect(),
        Value::Null | Value::Map(_) => Vec::new(),
        scalar => vec![scalar.clone()],
    }
}

fn collect_elements<T>(
    key: &str,
    v: &Value,
    delim: &Regex,
    convert: impl Fn(&Value) -> Option<T>,
) -> Vec<T> {
    elements(v, delim)
        .iter()
        .filter_map(|e| {
            let converted = convert(e);
            if converted.is_none() {
                tracing::debug!(key, element = %e, "dropping unconvertible sequence element");
            }
            converted
        })
        .collect()
}

fn invalid(key: &str, v: &Value, expected: &str) -> KiperError {
    KiperError::InvalidValue {
        key: key.into(),
        reason: format!("expected {expected}, got '{v}'"),
    }
}

/// Store `v` into the field behind `slot`.
///
/// `key` is the dotted field name, used in errors.
pub fn assign(slot: Slot<'_>, v: &Value, key: &str, delim: &Regex) -> Result<(), KiperError> {
    match slot {
        Slot::Str(s) => *s = to_text(v).ok_or_else(|| invalid(key, v, "a string"))?,
        Slot::Bool(b) => *b = to_bool(v).ok_or_else(|| invalid(key, v, "a boolean"))?,
        Slot::Int(mut i) => {
            let n = to_int(v).ok_or_else(|| invalid(key, v, "an integer"))?;
            if !i.store(n) {
                return Err(KiperError::InvalidValue {
                    key: key.into(),
                    reason: format!("{n} is out of range for {:?}", i.width()),
                });
            }
        }
        Slot::Seq(SeqSlot::Str(out)) => *out = collect_elements(key, v, delim, to_text),
        Slot::Seq(SeqSlot::Int(out)) => *out = collect_elements(key, v, delim, to_int),
        Slot::Seq(SeqSlot::Bool(out)) => *out = collect_elements(key, v, delim, to_bool),
        Slot::Opt(OptSlot::Str(o)) => {
            *o = Some(to_text(v).ok_or_else(|| invalid(key, v, "a string"))?)
        }
        Slot::Opt(OptSlot::Int(o)) => {
            *o = Some(to_int(v).ok_or_else(|| invalid(key, v, "an integer"))?)
        }
        Slot::Opt(OptSlot::Bool(o)) => {
            *o = Some(to_bool(v).ok_or_else(|| invalid(key, v, "a boolean"))?)
        }
        Slot::Custom(c) => {
            let text = v.as_text().ok_or_else(|| invalid(key, v, "a scalar"))?;
            c.set(&text).map_err(|source| KiperError::Custom {
                key: key.into(),
                source,
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::Port;

    fn delim() -> Regex {
        Regex::new(DEFAULT_DELIMITER).unwrap()
    }

    #[test]
    fn float_truncates_toward_zero() {
        assert_eq!(to_int(&Value::Float(90.9)), Some(90));
        assert_eq!(to_int(&Value::Float(-2.7)), Some(-2));
        assert_eq!(to_int(&Value::Float(f64::NAN)), None);
    }

    #[test]
    fn string_to_int_and_bool() {
        assert_eq!(to_int(&Value::Str(" 42 ".into())), Some(42));
        assert_eq!(to_int(&Value::Str("4x".into())), None);
        assert_eq!(to_bool(&Value::Str("TRUE".into())), Some(true));
        assert_eq!(to_bool(&Value::Str("yes".into())), None);
    }

    #[test]
    fn split_default_delimiter() {
        assert_eq!(split("a, b ,c", &delim()), vec!["a", "b", "c"]);
        assert!(split("", &delim()).is_empty());
        assert_eq!(split("a,,b,", &delim()), vec!["a", "b"]);
    }

    #[test]
    fn assign_narrows_float_into_i32() {
        let mut timeout = 0i32;
        assign((&mut timeout).into(), &Value::Float(60.0), "timeout", &delim()).unwrap();
        assert_eq!(timeout, 60);
    }

    #[test]
    fn assign_overflow_is_error() {
        let mut small = 0u8;
        let err = assign((&mut small).into(), &Value::Int(1000), "small", &delim()).unwrap_err();
        assert!(matches!(err, KiperError::InvalidValue { .. }));
        assert_eq!(small, 0);
    }

    #[test]
    fn assign_wrong_scalar_is_error() {
        let mut n = 0i64;
        assert!(assign((&mut n).into(), &Value::Str("abc".into()), "n", &delim()).is_err());
        let mut s = String::new();
        assert!(assign((&mut s).into(), &Value::Map(Default::default()), "s", &delim()).is_err());
    }

    #[test]
    fn seq_from_array_drops_unconvertible() {
        let mut ids: Vec<i64> = vec![9];
        let v = Value::Seq(vec![Value::Int(1), Value::Str("x".into()), Value::Float(3.2)]);
        assign((&mut ids).into(), &v, "ids", &delim()).unwrap();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn seq_from_string_splits() {
        let mut tags: Vec<String> = vec![];
        assign((&mut tags).into(), &Value::Str("a, b".into()), "tags", &delim()).unwrap();
        assert_eq!(tags, vec!["a", "b"]);
    }

    #[test]
    fn seq_replaces_previous_contents() {
        let mut tags = vec!["old".to_string()];
        assign((&mut tags).into(), &Value::Str("new".into()), "tags", &delim()).unwrap();
        assert_eq!(tags, vec!["new"]);
    }

    #[test]
    fn seq_with_custom_delimiter() {
        let mut flags: Vec<bool> = vec![];
        let pipe = Regex::new(r"\s*\|\s*").unwrap();
        assign((&mut flags).into(), &Value::Str("true | false | maybe".into()), "flags", &pipe)
            .unwrap();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn optional_is_allocated() {
        let mut name: Option<String> = None;
        assign((&mut name).into(), &Value::Str("kiper".into()), "name", &delim()).unwrap();
        assert_eq!(name.as_deref(), Some("kiper"));
    }

    #[test]
    fn custom_receives_text_of_number() {
        let mut port = Port::default();
        assign(Slot::custom(&mut port), &Value::Int(3306), "port", &delim()).unwrap();
        assert_eq!(port.0, "3306");
    }

    #[test]
    fn custom_rejection_propagates() {
        let mut port = Port::default();
        let err = assign(Slot::custom(&mut port), &Value::Str("abc".into()), "port", &delim())
            .unwrap_err();
        assert!(matches!(err, KiperError::Custom { ref key, .. } if key == "port"));
    }
}
