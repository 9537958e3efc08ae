//! Comment schema: content screening for banned terms, character runs, and
//! shouting.

use std::sync::LazyLock;

use serde_json::json;

use crate::validation::errors::ValidationError;
use crate::validation::field::FieldSpec;
use crate::validation::rules::{
    find_banned_term, longest_char_run, uppercase_ratio, BusinessRule, RuleContext,
};
use crate::validation::schema::EntitySchema;
use crate::validation::value::TypedRecord;

pub const CONTENT: &str = "content";

pub static SCHEMA: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new(
        "comment",
        vec![
            FieldSpec::identifier("event_id").required().immutable(),
            FieldSpec::identifier("author_id").required().immutable(),
            FieldSpec::identifier("parent_id").nullable().immutable(),
            FieldSpec::string(CONTENT).required().length(1, 2000),
            FieldSpec::identifier_array("mentions")
                .max_items(10)
                .default_value(json!([])),
            FieldSpec::integer("likes")
                .min(0.0)
                .immutable()
                .default_value(json!(0)),
            FieldSpec::boolean("is_edited").default_value(json!(false)),
        ],
        vec![
            BusinessRule::new("banned_terms", &[CONTENT], banned_terms),
            BusinessRule::new("character_runs", &[CONTENT], character_runs),
            BusinessRule::new("excessive_caps", &[CONTENT], excessive_caps),
        ],
    )
});

fn content(record: &TypedRecord) -> Option<&str> {
    record.present(CONTENT).and_then(|v| v.as_str())
}

fn banned_terms(record: &TypedRecord, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
    let Some(text) = content(record) else {
        return Vec::new();
    };
    match find_banned_term(text, &ctx.config.banned_terms) {
        Some(term) => vec![ValidationError::rule(
            CONTENT,
            format!("content contains disallowed content: \"{term}\""),
        )],
        None => Vec::new(),
    }
}

fn character_runs(record: &TypedRecord, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
    let Some(text) = content(record) else {
        return Vec::new();
    };
    let limit = ctx.config.max_char_run;
    if longest_char_run(text) >= limit {
        vec![ValidationError::rule(
            CONTENT,
            format!("content must not repeat a character {limit} or more times in a row"),
        )]
    } else {
        Vec::new()
    }
}

fn excessive_caps(record: &TypedRecord, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
    let Some(text) = content(record) else {
        return Vec::new();
    };
    let config = ctx.config;
    if text.chars().count() < config.uppercase_min_length {
        return Vec::new();
    }
    if uppercase_ratio(text) > config.max_uppercase_ratio {
        vec![ValidationError::rule(
            CONTENT,
            "content contains too many capital letters",
        )]
    } else {
        Vec::new()
    }
}
