//! Record mappers: walk a schema over a raw input map in create or update
//! mode, then run business rules and stamp timestamps.

use serde_json::{Map, Value};

use super::coerce::{coerce, is_empty};
use super::errors::{ErrorKind, ErrorMap, ValidationError};
use super::rules::{run_rules, RuleContext};
use super::schema::{EntitySchema, CREATED_AT, UPDATED_AT};
use super::value::{FieldValue, TypedRecord};
use crate::config::UnknownKeyPolicy;

/// Validation mode, reported in logs and by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

/// Map a full record for insertion.
///
/// Every field in the schema is visited in declaration order:
/// - required and empty: "is required", no default;
/// - empty and nullable: omitted;
/// - empty otherwise: the field default is coerced in its place;
/// - present: coerced.
///
/// Business rules run only when every field coerced; all of them run.
pub fn map_for_create(
    schema: &EntitySchema,
    raw: &Map<String, Value>,
    ctx: &RuleContext<'_>,
) -> Result<TypedRecord, ErrorMap> {
    let mut errors = ErrorMap::new();
    let mut record = TypedRecord::new();

    check_unknown_keys(schema, raw, ctx, &mut errors);

    for spec in schema.fields() {
        let provided = raw.get(spec.name);
        let source = if is_empty(provided) {
            if spec.required {
                errors.push(ValidationError::required(spec.name));
                continue;
            }
            if spec.nullable {
                continue;
            }
            match &spec.default {
                Some(default) => default,
                None => continue,
            }
        } else {
            match provided {
                Some(value) => value,
                None => continue,
            }
        };

        match coerce(spec, source, ctx.config.empty_items) {
            Ok(value) => record.insert(spec.name, value),
            Err(field_errors) => errors.extend(field_errors),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    errors.extend(run_rules(schema.rules(), &record, ctx));
    if !errors.is_empty() {
        return Err(errors);
    }

    record.insert(CREATED_AT, FieldValue::Timestamp(ctx.now));
    record.insert(UPDATED_AT, FieldValue::Timestamp(ctx.now));
    Ok(record)
}

/// Map a partial record for an update.
///
/// Only keys present in `raw` are considered; absence never triggers a
/// default. Immutable fields are skipped silently, explicit empties clear
/// nullable fields and leave non-nullable fields unchanged. Only rules whose
/// declared dependencies intersect the mapped fields run.
pub fn map_for_update(
    schema: &EntitySchema,
    raw: &Map<String, Value>,
    ctx: &RuleContext<'_>,
) -> Result<TypedRecord, ErrorMap> {
    let mut errors = ErrorMap::new();
    let mut record = TypedRecord::new();

    check_unknown_keys(schema, raw, ctx, &mut errors);

    for spec in schema.fields() {
        if spec.immutable {
            continue;
        }
        let Some(provided) = raw.get(spec.name) else {
            continue;
        };
        if is_empty(Some(provided)) {
            if spec.nullable {
                record.insert(spec.name, FieldValue::Null);
            }
            continue;
        }

        match coerce(spec, provided, ctx.config.empty_items) {
            Ok(value) => record.insert(spec.name, value),
            Err(field_errors) => errors.extend(field_errors),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let triggered = schema
        .rules()
        .iter()
        .filter(|rule| rule.triggered_by(record.keys()));
    errors.extend(run_rules(triggered, &record, ctx));
    if !errors.is_empty() {
        return Err(errors);
    }

    record.insert(UPDATED_AT, FieldValue::Timestamp(ctx.now));
    Ok(record)
}

fn check_unknown_keys(
    schema: &EntitySchema,
    raw: &Map<String, Value>,
    ctx: &RuleContext<'_>,
    errors: &mut ErrorMap,
) {
    if ctx.config.unknown_keys == UnknownKeyPolicy::Ignore {
        return;
    }
    for key in raw.keys() {
        if schema.field(key).is_none() {
            errors.push(ValidationError::new(
                key.as_str(),
                ErrorKind::Type,
                format!("{key} is not a recognised field"),
            ));
        }
    }
}
