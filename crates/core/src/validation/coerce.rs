//! Type coercion dispatcher: pure logic, no schema walking.
//!
//! Converts one raw JSON value against one [`FieldSpec`] into a
//! [`FieldValue`], or reports why it cannot. A failed coercion never yields a
//! partial value.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use validator::ValidateEmail;

use super::errors::{ErrorKind, ValidationError};
use super::field::{Bounds, FieldKind, FieldSpec};
use super::value::FieldValue;
use crate::config::EmptyItemPolicy;
use crate::types::{truncate_to_millis, EntityId, Timestamp};

/// Extended-JSON key wrapping an already-typed identifier.
pub const OID_KEY: &str = "$oid";

/// Extended-JSON key wrapping an already-typed timestamp.
pub const DATE_KEY: &str = "$date";

const TRUTHY: &[&str] = &["true", "1", "yes", "on", "y"];
const FALSY: &[&str] = &["false", "0", "no", "off", "n"];

/// Whether a raw value counts as "not provided": absent, null, blank string,
/// or an empty array.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        _ => false,
    }
}

/// Coerce `raw` into the kind `spec` demands.
///
/// Collection fields may report several item failures at once; scalar fields
/// report exactly one.
pub fn coerce(
    spec: &FieldSpec,
    raw: &Value,
    empty_items: EmptyItemPolicy,
) -> Result<FieldValue, Vec<ValidationError>> {
    let path = spec.name;
    let scalar = match &spec.kind {
        FieldKind::Identifier => coerce_identifier(path, raw).map(FieldValue::Id),
        FieldKind::Email { domain_suffix } => {
            coerce_email(path, raw, &spec.bounds, *domain_suffix).map(FieldValue::Email)
        }
        FieldKind::Timestamp => coerce_timestamp(path, raw).map(FieldValue::Timestamp),
        FieldKind::Integer => coerce_integer(path, raw, &spec.bounds).map(FieldValue::Integer),
        FieldKind::Float => coerce_float(path, raw, &spec.bounds).map(FieldValue::Float),
        FieldKind::Boolean => Ok(FieldValue::Boolean(coerce_boolean(raw))),
        FieldKind::String => {
            coerce_text(path, raw, &spec.bounds, spec.allowed).map(FieldValue::String)
        }
        FieldKind::StringArray => {
            return coerce_collection(spec, raw, empty_items, |item_path, item| {
                coerce_text(item_path, item, &spec.bounds, spec.allowed)
            })
            .map(FieldValue::StringArray);
        }
        FieldKind::IdentifierArray => {
            return coerce_collection(spec, raw, empty_items, coerce_identifier)
                .map(FieldValue::IdArray);
        }
        FieldKind::NestedObject => match raw {
            Value::Object(map) => Ok(FieldValue::Object(map.clone())),
            _ => Err(ValidationError::type_mismatch(path, spec.kind.type_name())),
        },
    };
    scalar.map_err(|e| vec![e])
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

fn coerce_identifier(path: &str, raw: &Value) -> Result<EntityId, ValidationError> {
    let text = match raw {
        Value::String(s) => s.as_str(),
        Value::Object(map) => match map.get(OID_KEY) {
            Some(Value::String(s)) => s.as_str(),
            _ => return Err(ValidationError::type_mismatch(path, "identifier")),
        },
        _ => return Err(ValidationError::type_mismatch(path, "identifier")),
    };
    EntityId::parse(text).ok_or_else(|| ValidationError::type_mismatch(path, "identifier"))
}

fn coerce_email(
    path: &str,
    raw: &Value,
    bounds: &Bounds,
    domain_suffix: Option<&str>,
) -> Result<String, ValidationError> {
    let Value::String(s) = raw else {
        return Err(ValidationError::type_mismatch(path, "email address"));
    };
    let email = s.trim().to_string();
    if let Some(max) = bounds.max_length {
        if email.chars().count() > max {
            return Err(ValidationError::constraint(
                path,
                format!("{path} must be at most {max} characters"),
            ));
        }
    }
    if !email.validate_email() {
        return Err(ValidationError::type_mismatch(path, "email address"));
    }
    if let Some(suffix) = domain_suffix {
        if !ends_with_ignore_case(&email, suffix) {
            return Err(ValidationError::constraint(
                path,
                format!("{path} must end with {suffix}"),
            ));
        }
    }
    Ok(email)
}

/// Case-insensitive suffix test shared with the club contact rule.
pub fn ends_with_ignore_case(text: &str, suffix: &str) -> bool {
    text.to_lowercase().ends_with(&suffix.to_lowercase())
}

fn coerce_timestamp(path: &str, raw: &Value) -> Result<Timestamp, ValidationError> {
    let parsed = match raw {
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::Object(map) => match map.get(DATE_KEY) {
            Some(inner @ (Value::String(_) | Value::Number(_))) => {
                return coerce_timestamp(path, inner);
            }
            _ => None,
        },
        _ => None,
    };
    parsed
        .map(truncate_to_millis)
        .ok_or_else(|| ValidationError::type_mismatch(path, "timestamp"))
}

/// Parse the textual timestamp forms: RFC 3339, naive date-time (UTC), bare
/// date (midnight UTC), or an all-digit epoch-millisecond string.
pub fn parse_timestamp_str(s: &str) -> Option<Timestamp> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    let digits = s.strip_prefix('-').unwrap_or(s);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        return s.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis);
    }
    None
}

fn coerce_integer(path: &str, raw: &Value, bounds: &Bounds) -> Result<i64, ValidationError> {
    let parsed = match raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(n) => Some(n),
                Err(_) if s.contains(['.', 'e', 'E']) => s.parse::<f64>().ok().and_then(integral),
                Err(_) => None,
            }
        }
        _ => None,
    };
    let n = parsed.ok_or_else(|| ValidationError::type_mismatch(path, "integer"))?;
    check_range(path, n as f64, bounds)?;
    Ok(n)
}

/// 2^63, the first whole float past `i64::MAX`.
const I64_UPPER_EXCLUSIVE: f64 = 9_223_372_036_854_775_808.0;

fn integral(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < I64_UPPER_EXCLUSIVE;
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}

fn coerce_float(path: &str, raw: &Value, bounds: &Bounds) -> Result<f64, ValidationError> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let n = parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| ValidationError::type_mismatch(path, "number"))?;
    check_range(path, n, bounds)?;
    Ok(n)
}

fn check_range(path: &str, n: f64, bounds: &Bounds) -> Result<(), ValidationError> {
    if let Some(min) = bounds.min {
        if n < min {
            return Err(ValidationError::constraint(
                path,
                format!("{path} must be at least {min}"),
            ));
        }
    }
    if let Some(max) = bounds.max {
        if n > max {
            return Err(ValidationError::constraint(
                path,
                format!("{path} must be at most {max}"),
            ));
        }
    }
    Ok(())
}

/// Booleans never fail: unrecognised input falls back to a truthiness cast.
fn coerce_boolean(raw: &Value) -> bool {
    match raw {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let token = s.trim().to_ascii_lowercase();
            if TRUTHY.contains(&token.as_str()) {
                true
            } else if FALSY.contains(&token.as_str()) {
                false
            } else {
                !token.is_empty()
            }
        }
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Null => false,
    }
}

fn coerce_text(
    path: &str,
    raw: &Value,
    bounds: &Bounds,
    allowed: &[&str],
) -> Result<String, ValidationError> {
    let text = match raw {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(ValidationError::type_mismatch(path, "string")),
    };
    let len = text.chars().count();
    if let Some(min) = bounds.min_length {
        if len < min {
            return Err(ValidationError::constraint(
                path,
                format!("{path} must be at least {min} characters"),
            ));
        }
    }
    if let Some(max) = bounds.max_length {
        if len > max {
            return Err(ValidationError::constraint(
                path,
                format!("{path} must be at most {max} characters"),
            ));
        }
    }
    if !allowed.is_empty() && !allowed.contains(&text.as_str()) {
        return Err(ValidationError::constraint(
            path,
            format!("{path} must be one of: {}", allowed.join(", ")),
        ));
    }
    Ok(text)
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

fn coerce_collection<T, F>(
    spec: &FieldSpec,
    raw: &Value,
    empty_items: EmptyItemPolicy,
    coerce_item: F,
) -> Result<Vec<T>, Vec<ValidationError>>
where
    F: Fn(&str, &Value) -> Result<T, ValidationError>,
{
    let path = spec.name;
    let Value::Array(items) = raw else {
        return Err(vec![ValidationError::type_mismatch(
            path,
            spec.kind.type_name(),
        )]);
    };

    let mut kept = Vec::with_capacity(items.len());
    let mut errors = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let item_path = format!("{path}[{index}]");
        if is_blank_item(item) {
            if empty_items == EmptyItemPolicy::Reject {
                errors.push(ValidationError::new(
                    item_path.clone(),
                    ErrorKind::ArrayItem,
                    format!("{item_path} must not be empty"),
                ));
            }
            continue;
        }
        match coerce_item(&item_path, item) {
            Ok(value) => kept.push(value),
            Err(e) => errors.push(e.at_index(path, index)),
        }
    }

    if let Some(max) = spec.bounds.max_items {
        if kept.len() > max {
            errors.push(ValidationError::constraint(
                path,
                format!("{path} must contain at most {max} items"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(kept)
    } else {
        Err(errors)
    }
}

fn is_blank_item(item: &Value) -> bool {
    match item {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
