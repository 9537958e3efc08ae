//! End-to-end tests for the entity validation facade.
//!
//! Every test pins the clock with `FixedClock` so temporal rules are
//! deterministic.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Map, Value};

use clubhouse_core::types::Timestamp;
use clubhouse_core::{
    CoreError, EmptyItemPolicy, EntityKind, ErrorKind, FieldValue, FixedClock, UnknownKeyPolicy,
    ValidationConfig, ValidationFailure, Validator,
};

const CLUB_ID: &str = "65a1b2c3d4e5f60718293a4b";
const USER_ID: &str = "65a1b2c3d4e5f60718293a4c";

fn now() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 10, 17, 15, 30, 0).unwrap()
}

fn validator() -> Validator {
    validator_with(ValidationConfig::default())
}

fn validator_with(config: ValidationConfig) -> Validator {
    Validator::new(config, Arc::new(FixedClock(now()))).unwrap()
}

fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("fixture must be an object")
}

fn event(start: Timestamp) -> Map<String, Value> {
    object(json!({
        "club_id": CLUB_ID,
        "created_by": USER_ID,
        "title": "Board Game Night",
        "location": "Student Union, Room 2",
        "start_time": start.to_rfc3339(),
    }))
}

// ---------------------------------------------------------------------------
// Required fields
// ---------------------------------------------------------------------------

#[test]
fn each_missing_required_field_yields_one_required_error() {
    let v = validator();
    for kind in EntityKind::ALL {
        let entity = v.entity(kind);
        let errors = entity.is_valid(&Map::new());
        let required: Vec<&str> = entity.schema().required_fields().collect();
        assert!(!required.is_empty());
        assert_eq!(errors.len(), required.len(), "{kind}: {errors}");
        for field in required {
            let found = errors.get(field).expect("required field reported");
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].kind, ErrorKind::Required);
        }
    }
}

#[test]
fn blank_strings_count_as_missing() {
    let mut raw = event(now() + Duration::days(1));
    raw.insert("title".into(), json!("    "));
    let errors = validator().events().is_valid(&raw);
    assert_eq!(errors.error_count(), 1);
    assert_eq!(errors.get("title").unwrap()[0].kind, ErrorKind::Required);
}

// ---------------------------------------------------------------------------
// Update semantics
// ---------------------------------------------------------------------------

#[test]
fn explicit_null_round_trips_for_every_nullable_field() {
    let v = validator();
    for kind in EntityKind::ALL {
        let entity = v.entity(kind);
        let immutable: Vec<&str> = entity.schema().immutable_fields().collect();
        for spec in entity.schema().fields().iter().filter(|f| f.nullable) {
            let raw = object(json!({ spec.name: null }));
            let record = entity.validate_for_update(&raw).unwrap();
            let expected = if immutable.contains(&spec.name) {
                None
            } else {
                Some(&FieldValue::Null)
            };
            assert_eq!(record.get(spec.name), expected, "{kind}.{}", spec.name);
        }
    }
}

#[test]
fn only_reference_fields_are_nullable_and_immutable() {
    let v = validator();
    let pinned: Vec<(EntityKind, &str)> = EntityKind::ALL
        .into_iter()
        .flat_map(|kind| {
            kind.schema()
                .fields()
                .iter()
                .filter(|f| f.nullable && f.immutable)
                .map(move |f| (kind, f.name))
        })
        .collect();
    assert_eq!(pinned, vec![(EntityKind::Comment, "parent_id")]);

    let raw = object(json!({ "last_login_at": "2026-10-17T15:00:00Z" }));
    let record = v.users().validate_for_update(&raw).unwrap();
    assert_eq!(
        record.get("last_login_at"),
        Some(&FieldValue::Timestamp(now() - Duration::minutes(30)))
    );
}

#[test]
fn description_only_update_returns_description_and_timestamp() {
    let raw = object(json!({ "description": "Bring snacks and your favourite games." }));
    let record = validator().events().validate_for_update(&raw).unwrap();
    let keys: Vec<&str> = record.keys().collect();
    assert_eq!(keys, vec!["description", "updated_at"]);
    assert_eq!(record.get("updated_at"), Some(&FieldValue::Timestamp(now())));
}

#[test]
fn unknown_key_update_succeeds_with_timestamp_only() {
    for kind in EntityKind::ALL {
        let raw = object(json!({ "bogus": "x" }));
        let record = validator().entity(kind).validate_for_update(&raw).unwrap();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["updated_at"], "{kind}");
    }
}

#[test]
fn unknown_key_update_rejected_when_strict() {
    let v = validator_with(ValidationConfig {
        unknown_keys: UnknownKeyPolicy::Reject,
        ..ValidationConfig::default()
    });
    let raw = object(json!({ "bogus": "x" }));
    let failure = v.clubs().validate_for_update(&raw).unwrap_err();
    assert!(failure.errors().contains("bogus"));
}

#[test]
fn update_never_defaults_or_touches_created_at() {
    let raw = object(json!({ "title": "Board Game Marathon" }));
    let record = validator().events().validate_for_update(&raw).unwrap();
    assert!(!record.contains("ticket_price"));
    assert!(!record.contains("is_public"));
    assert!(!record.contains("created_at"));
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

#[test]
fn iso_and_epoch_start_times_are_identical() {
    let start = Utc.with_ymd_and_hms(2026, 12, 1, 19, 0, 0).unwrap();
    let v = validator();

    let from_iso = v.events().validate_for_create(&event(start)).unwrap();

    let mut raw = event(start);
    raw.insert("start_time".into(), json!(start.timestamp_millis()));
    let from_epoch = v.events().validate_for_create(&raw).unwrap();

    assert_eq!(from_iso.get("start_time"), from_epoch.get("start_time"));
    assert_eq!(from_iso.get("start_time"), Some(&FieldValue::Timestamp(start)));
}

#[test]
fn three_items_and_two_blanks_coerce_to_three() {
    let mut raw = event(now() + Duration::days(3));
    raw.insert("tags".into(), json!(["games", "", "social", "  ", "free"]));
    let record = validator().events().validate_for_create(&raw).unwrap();
    assert_eq!(
        record.get("tags"),
        Some(&FieldValue::StringArray(vec![
            "games".into(),
            "social".into(),
            "free".into()
        ]))
    );
}

#[test]
fn blanks_rejected_when_strict() {
    let v = validator_with(ValidationConfig {
        empty_items: EmptyItemPolicy::Reject,
        ..ValidationConfig::default()
    });
    let mut raw = event(now() + Duration::days(3));
    raw.insert("tags".into(), json!(["games", "", "social"]));
    let errors = v.events().is_valid(&raw);
    assert_eq!(errors.get("tags[1]").unwrap()[0].kind, ErrorKind::ArrayItem);
}

// ---------------------------------------------------------------------------
// Business rules
// ---------------------------------------------------------------------------

#[test]
fn end_before_start_fails_once_on_end_time() {
    let mut raw = event(now() + Duration::hours(1));
    raw.insert("end_time".into(), json!(now().to_rfc3339()));
    let errors = validator().events().validate_for_create(&raw).unwrap_err().into_errors();
    assert_eq!(errors.error_count(), 1);
    let found = errors.get("end_time").unwrap();
    assert_eq!(found[0].kind, ErrorKind::BusinessRule);
}

#[test]
fn past_start_fails_once_on_start_time() {
    let raw = event(now() - Duration::hours(1));
    let errors = validator().events().is_valid(&raw);
    assert_eq!(errors.error_count(), 1);
    assert_eq!(errors.get("start_time").unwrap()[0].kind, ErrorKind::BusinessRule);
}

#[test]
fn field_errors_prevent_rule_evaluation() {
    let mut raw = event(now() - Duration::hours(1));
    raw.insert("venue_capacity".into(), json!("lots"));
    let errors = validator().events().is_valid(&raw);
    let paths: Vec<&str> = errors.paths().collect();
    assert_eq!(paths, vec!["venue_capacity"]);
}

// ---------------------------------------------------------------------------
// Error shapes
// ---------------------------------------------------------------------------

#[test]
fn throwing_and_plain_shapes_are_identical() {
    let v = validator();
    let raw = object(json!({
        "name": "X",
        "description": "short",
        "category": "knitting",
        "owner_id": "nope",
        "contact_email": "not-an-email",
        "tags": ["ok", 12, ["nested"]],
    }));

    let plain = v.clubs().is_valid(&raw);
    let failure = v.clubs().validate_for_create(&raw).unwrap_err();

    assert!(!plain.is_empty());
    assert_eq!(&plain, failure.errors());
    assert_eq!(
        serde_json::to_string(&plain).unwrap(),
        serde_json::to_string(failure.errors()).unwrap()
    );
}

#[test]
fn update_shapes_are_identical() {
    let v = validator();
    let raw = object(json!({
        "title": "Board Game Marathon",
        "start_time": (now() - Duration::hours(1)).to_rfc3339(),
    }));

    let plain = v.events().is_valid_update(&raw);
    let failure = v.events().validate_for_update(&raw).unwrap_err();

    assert_eq!(plain.error_count(), 1);
    assert_eq!(plain.get("start_time").unwrap()[0].kind, ErrorKind::BusinessRule);
    assert_eq!(&plain, failure.errors());
    assert_eq!(
        serde_json::to_string(&plain).unwrap(),
        serde_json::to_string(failure.errors()).unwrap()
    );
}

#[test]
fn valid_update_gives_empty_error_map() {
    let raw = object(json!({ "description": null, "is_public": "no" }));
    assert!(validator().events().is_valid_update(&raw).is_empty());
}

#[test]
fn valid_input_gives_empty_error_map() {
    let raw = event(now() + Duration::days(1));
    assert!(validator().events().is_valid(&raw).is_empty());
}

#[test]
fn failure_lifts_into_core_error() {
    let result: Result<(), CoreError> = validator()
        .comments()
        .validate_for_create(&Map::new())
        .map(|_| ())
        .map_err(CoreError::from);
    assert_matches!(result, Err(CoreError::InvalidRecord(ref m)) if m.contains("content"));
}

#[test]
fn failure_display_lists_paths() {
    let failure: ValidationFailure = validator()
        .users()
        .validate_for_create(&object(json!({ "name": "Ada" })))
        .unwrap_err();
    assert_eq!(
        failure.to_string(),
        "validation failed for 1 field(s): email: email is required"
    );
}

// ---------------------------------------------------------------------------
// Persistence payload
// ---------------------------------------------------------------------------

#[test]
fn typed_record_renders_flat_payload() {
    let start = Utc.with_ymd_and_hms(2026, 12, 1, 19, 0, 0).unwrap();
    let mut raw = event(start);
    raw.insert("club_id".into(), json!({ "$oid": CLUB_ID.to_uppercase() }));
    raw.insert("venue_capacity".into(), json!("120"));
    let record = validator().events().validate_for_create(&raw).unwrap();
    let payload = record.to_json();

    assert_eq!(payload["club_id"], json!(CLUB_ID));
    assert_eq!(payload["start_time"], json!("2026-12-01T19:00:00.000Z"));
    assert_eq!(payload["venue_capacity"], json!(120));
    assert_eq!(payload["created_at"], payload["updated_at"]);
    assert_eq!(payload["created_at"], json!("2026-10-17T15:30:00.000Z"));
}
