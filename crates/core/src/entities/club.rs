//! Club schema: content screening and official contact address rules.

use std::sync::LazyLock;

use serde_json::json;

use crate::validation::coerce::ends_with_ignore_case;
use crate::validation::errors::ValidationError;
use crate::validation::field::FieldSpec;
use crate::validation::rules::{screen_text, BusinessRule, RuleContext};
use crate::validation::schema::EntitySchema;
use crate::validation::value::TypedRecord;

pub const CATEGORIES: &[&str] = &[
    "academic",
    "arts",
    "cultural",
    "professional",
    "recreation",
    "service",
    "social",
    "sports",
    "technology",
];

pub static SCHEMA: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new(
        "club",
        vec![
            FieldSpec::string("name").required().length(3, 100),
            FieldSpec::string("description").required().length(10, 2000),
            FieldSpec::string("category").required().one_of(CATEGORIES),
            FieldSpec::identifier("owner_id").required().immutable(),
            FieldSpec::email("contact_email").required(),
            FieldSpec::string_array("tags")
                .max_items(10)
                .max_length(30)
                .default_value(json!([])),
            FieldSpec::identifier_array("member_ids")
                .immutable()
                .default_value(json!([])),
            FieldSpec::integer("member_count")
                .min(0.0)
                .immutable()
                .default_value(json!(0)),
            FieldSpec::boolean("is_active").default_value(json!(true)),
            FieldSpec::timestamp("founded_at").nullable(),
            FieldSpec::object("social_links").default_value(json!({})),
        ],
        vec![
            BusinessRule::new("name_screening", &["name"], |record, ctx| {
                screen_field(record, ctx, "name")
            }),
            BusinessRule::new("description_screening", &["description"], |record, ctx| {
                screen_field(record, ctx, "description")
            }),
            BusinessRule::new("official_contact", &["contact_email"], official_contact),
        ],
    )
});

fn screen_field(record: &TypedRecord, ctx: &RuleContext<'_>, field: &str) -> Vec<ValidationError> {
    match record.present(field).and_then(|v| v.as_str()) {
        Some(text) => screen_text(field, text, ctx.config, true),
        None => Vec::new(),
    }
}

fn official_contact(record: &TypedRecord, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
    let suffix = ctx.config.official_email_suffix.as_str();
    match record.present("contact_email").and_then(|v| v.as_str()) {
        Some(email) if !suffix.is_empty() && !ends_with_ignore_case(email, suffix) => {
            vec![ValidationError::rule(
                "contact_email",
                format!("contact_email must be an official address ending in {suffix}"),
            )]
        }
        _ => Vec::new(),
    }
}
