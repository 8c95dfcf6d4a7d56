//! validation and coercion: raw request input → typed values.
//!
//! coercion dispatches on the descriptor's [`FieldKind`] tag. numeric and
//! timestamp values that fail to parse are silently dropped rather than
//! rejected - that matches the system's established wire behavior, even
//! though it diverges from the aggregate-errors philosophy used everywhere
//! else (flagged in DESIGN.md).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use opsdesk_types::{EntitySchema, FieldDescriptor, FieldKind, FieldValue};

use crate::UploadedFiles;

/// the largest integer exactly representable by every JSON consumer.
pub const MAX_SAFE_INT: i64 = 9_007_199_254_740_991;

/// true when `n` survives a round-trip through an f64 JSON number.
pub fn is_safe_int(n: i64) -> bool {
    n.abs() <= MAX_SAFE_INT
}

/// parse a safe integer from a JSON number or digit string.
pub fn parse_safe_int(value: &Value) -> Option<i64> {
    let n = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    is_safe_int(n).then_some(n)
}

/// parse a safe integer from a path/query string.
pub fn parse_safe_int_str(raw: &str) -> Option<i64> {
    parse_safe_int(&Value::String(raw.to_string()))
}

/// parse a timestamp from the accepted wire shapes.
///
/// RFC 3339, `YYYY-MM-DD[T ]HH:MM[:SS]` (read as UTC) and bare `YYYY-MM-DD`
/// (UTC midnight) are accepted; anything else is `None`.
pub fn parse_stamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

/// coerce one raw body value according to its descriptor.
///
/// returns `None` when the value should be omitted (absent, empty, or an
/// unparseable number/timestamp). file and hashed fields are handled by the
/// pipeline, not here.
pub fn coerce_value(field: &FieldDescriptor, value: &Value) -> Option<FieldValue> {
    match field.kind {
        FieldKind::Flag => match value {
            Value::Bool(b) => Some(FieldValue::Flag(*b)),
            Value::String(s) if !s.is_empty() => {
                Some(FieldValue::Flag(s.eq_ignore_ascii_case("true")))
            }
            _ => None,
        },
        FieldKind::Number => parse_safe_int(value).map(FieldValue::Int),
        FieldKind::BigInt => match value {
            Value::Number(n) => n.as_i64().map(FieldValue::Big),
            Value::String(s) => s.trim().parse::<i64>().ok().map(FieldValue::Big),
            _ => None,
        },
        FieldKind::Stamp => value.as_str().and_then(parse_stamp).map(FieldValue::Stamp),
        FieldKind::Text => match value {
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Number(n) => Some(FieldValue::Text(n.to_string())),
            Value::Bool(b) => Some(FieldValue::Text(b.to_string())),
            _ => None,
        },
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// names of every required field the request failed to supply.
///
/// file fields count as missing when no upload matches the field name;
/// everything else when the body value is absent or the empty string. the
/// caller aggregates all names into one error so the operation never
/// partially succeeds.
pub fn missing_required<'a>(
    schema: &'a EntitySchema,
    body: &serde_json::Map<String, Value>,
    uploads: &UploadedFiles,
) -> Vec<&'a str> {
    schema
        .fields
        .iter()
        .filter(|f| f.required)
        .filter(|f| {
            if f.is_file() {
                uploads.get(f.name).is_none()
            } else {
                is_blank(body.get(f.name))
            }
        })
        .map(|f| f.name)
        .collect()
}

/// digit-count bounds for a numeric field: `[10^(min-1), 10^max - 1]`.
pub fn digit_bounds(field: &FieldDescriptor) -> (i64, i64) {
    let min = if field.min_len > 1 {
        10_i64.checked_pow(field.min_len - 1).unwrap_or(i64::MAX)
    } else {
        0
    };
    let max = if field.max_len > 1 {
        10_i64
            .checked_pow(field.max_len)
            .map_or(i64::MAX, |n| n - 1)
    } else {
        9
    };
    (min, max)
}

/// pure per-field checks: foreign-key ids, digit bounds, length, pattern.
///
/// returns every problem found - callers aggregate across fields and join
/// the messages, so one bad field never hides another.
pub fn check_field(field: &FieldDescriptor, value: Option<&FieldValue>) -> Vec<(u16, String)> {
    let mut issues = Vec::new();

    if field.required && field.foreign_key.is_some() {
        match value {
            Some(v) if v.as_int().is_some_and(is_safe_int) => {}
            _ => issues.push((400, format!("Invalid {} ID", field.name))),
        }
        return issues;
    }

    let Some(value) = value else {
        return issues;
    };
    if !field.required || field.is_file() {
        return issues;
    }

    match field.kind {
        FieldKind::Number | FieldKind::BigInt => {
            let (min, max) = digit_bounds(field);
            if let Some(n) = value.as_int()
                && (n < min || n > max)
            {
                issues.push((
                    400,
                    format!(
                        "Field {} must be a valid number between {} and {}.",
                        field.name, min, max
                    ),
                ));
            }
        }
        FieldKind::Text => {
            if let Some(text) = value.as_text() {
                let len = text.chars().count() as u32;
                if len < field.min_len || len > field.max_len {
                    issues.push((
                        400,
                        format!(
                            "Field {} must be between {} and {} characters.",
                            field.name, field.min_len, field.max_len
                        ),
                    ));
                }
                if let Some(pattern) = field.pattern
                    && !pattern.matches(text)
                {
                    issues.push((400, format!("Field {} has an invalid format.", field.name)));
                }
            }
        }
        FieldKind::Flag | FieldKind::Stamp => {}
    }

    issues
}
