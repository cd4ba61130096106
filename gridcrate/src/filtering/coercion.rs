//! Coercion of untyped filter values into a field's kind.
//!
//! Filter values arrive as JSON. Each field kind accepts the JSON shapes that have
//! an unambiguous reading for it; anything else fails and the caller drops the
//! filter.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::core::{FieldKind, FieldValue};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Convert `value` to `kind`. Returns `None` when no sensible conversion exists.
///
/// - `String`: strings as-is; numbers and booleans by their text form.
/// - `Integer`: integral numbers, floats without a fractional part, numeric strings.
/// - `Float`: any number, numeric strings.
/// - `Boolean`: booleans, `"true"`/`"false"` in any case.
/// - `DateTime`: RFC 3339, naive date-times (read as UTC), plain dates (midnight UTC).
/// - `Date`: plain dates, or the date part of a date-time.
/// - `Uuid`: hyphenated or simple UUID strings.
/// - `Enum`: variant names in any case, or a variant index.
#[must_use]
pub fn coerce_value(value: &Value, kind: FieldKind) -> Option<FieldValue> {
    match kind {
        FieldKind::String => coerce_string(value).map(FieldValue::String),
        FieldKind::Integer => coerce_integer(value).map(FieldValue::Integer),
        FieldKind::Float => coerce_float(value).map(FieldValue::Float),
        FieldKind::Boolean => coerce_bool(value).map(FieldValue::Boolean),
        FieldKind::DateTime => value
            .as_str()
            .and_then(|s| parse_datetime(s.trim()))
            .map(FieldValue::DateTime),
        FieldKind::Date => value
            .as_str()
            .and_then(|s| parse_date(s.trim()))
            .map(FieldValue::Date),
        FieldKind::Uuid => value
            .as_str()
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(FieldValue::Uuid),
        FieldKind::Enum(variants) => coerce_enum(value, variants),
    }
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("true") {
                Some(true)
            } else if s.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn coerce_enum(value: &Value, variants: &'static [&'static str]) -> Option<FieldValue> {
    let ordinal = match value {
        Value::String(s) => {
            let s = s.trim();
            variants
                .iter()
                .position(|variant| *variant == s)
                .or_else(|| variants.iter().position(|v| v.eq_ignore_ascii_case(s)))
                .or_else(|| s.parse::<usize>().ok().filter(|idx| *idx < variants.len()))?
        }
        Value::Number(n) => n
            .as_u64()
            .and_then(|idx| usize::try_from(idx).ok())
            .filter(|idx| *idx < variants.len())?,
        _ => return None,
    };
    Some(FieldValue::Enum {
        ordinal,
        name: variants[ordinal],
    })
}

/// Parse a date-time in any of the accepted forms. Offsets are normalized to UTC.
#[must_use]
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| naive.and_utc())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(s).map(|dt| dt.date_naive()))
}
