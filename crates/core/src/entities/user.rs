//! User schema.

use std::sync::LazyLock;

use serde_json::json;

use crate::validation::errors::ValidationError;
use crate::validation::field::FieldSpec;
use crate::validation::rules::{screen_text, BusinessRule, RuleContext};
use crate::validation::schema::EntitySchema;
use crate::validation::value::TypedRecord;

pub const ROLES: &[&str] = &["member", "organizer", "admin"];

pub static SCHEMA: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new(
        "user",
        vec![
            FieldSpec::email("email").required(),
            FieldSpec::string("name").required().length(2, 100),
            FieldSpec::string("role")
                .one_of(ROLES)
                .default_value(json!("member")),
            FieldSpec::string("bio").nullable().max_length(500),
            FieldSpec::email("school_email")
                .nullable()
                .domain_suffix(".edu"),
            FieldSpec::string_array("interests")
                .max_items(20)
                .max_length(50)
                .default_value(json!([])),
            FieldSpec::identifier_array("club_ids")
                .max_items(50)
                .immutable()
                .default_value(json!([])),
            FieldSpec::boolean("is_verified")
                .immutable()
                .default_value(json!(false)),
            FieldSpec::timestamp("last_login_at").nullable(),
            FieldSpec::object("preferences").default_value(json!({})),
        ],
        vec![BusinessRule::new("bio_screening", &["bio"], bio_screening)],
    )
});

fn bio_screening(record: &TypedRecord, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
    match record.present("bio").and_then(|v| v.as_str()) {
        Some(bio) => screen_text("bio", bio, ctx.config, false),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::{json, Value};

    use super::*;
    use crate::config::ValidationConfig;
    use crate::validation::errors::{ErrorKind, ErrorMap};
    use crate::validation::mapper::{map_for_create, map_for_update};
    use crate::validation::value::FieldValue;

    fn create(raw: Value) -> Result<TypedRecord, ErrorMap> {
        let config = ValidationConfig::default();
        let ctx = RuleContext {
            config: &config,
            now: Utc::now(),
        };
        map_for_create(&SCHEMA, raw.as_object().unwrap(), &ctx)
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let record = create(json!({ "email": "ada@example.com", "name": "Ada" })).unwrap();
        assert_eq!(record.get("role"), Some(&FieldValue::String("member".into())));
        assert_eq!(record.get("is_verified"), Some(&FieldValue::Boolean(false)));
        assert_eq!(record.get("club_ids"), Some(&FieldValue::IdArray(vec![])));
        assert!(!record.contains("bio"));
        assert!(!record.contains("last_login_at"));
    }

    #[test]
    fn school_email_requires_edu() {
        let errors = create(json!({
            "email": "ada@example.com",
            "name": "Ada",
            "school_email": "ada@example.com",
        }))
        .unwrap_err();
        assert_eq!(errors.get("school_email").unwrap()[0].kind, ErrorKind::Constraint);
    }

    #[test]
    fn interests_drop_blanks() {
        let record = create(json!({
            "email": "ada@example.com",
            "name": "Ada",
            "interests": ["chess", " ", "go", "", "poetry"],
        }))
        .unwrap();
        assert_eq!(
            record.get("interests").and_then(|v| v.as_string_list()).map(<[String]>::len),
            Some(3)
        );
    }

    #[test]
    fn bio_screened_for_banned_terms() {
        let errors = create(json!({
            "email": "ada@example.com",
            "name": "Ada",
            "bio": "I run an online casino",
        }))
        .unwrap_err();
        assert_eq!(errors.get("bio").unwrap()[0].kind, ErrorKind::BusinessRule);
    }

    #[test]
    fn update_cannot_self_verify() {
        let config = ValidationConfig::default();
        let ctx = RuleContext {
            config: &config,
            now: Utc::now(),
        };
        let raw = json!({ "is_verified": true, "bio": null });
        let record = map_for_update(&SCHEMA, raw.as_object().unwrap(), &ctx).unwrap();
        assert!(!record.contains("is_verified"));
        assert_eq!(record.get("bio"), Some(&FieldValue::Null));
    }
}
