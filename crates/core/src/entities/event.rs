//! Event schema: scheduling, capacity, and temporal ordering rules.

use std::sync::LazyLock;

use serde_json::json;

use crate::validation::errors::ValidationError;
use crate::validation::field::FieldSpec;
use crate::validation::rules::{BusinessRule, RuleContext};
use crate::validation::schema::EntitySchema;
use crate::validation::value::TypedRecord;

pub const START_TIME: &str = "start_time";
pub const END_TIME: &str = "end_time";
pub const REGISTRATION_CLOSE: &str = "registration_close";
pub const VENUE_CAPACITY: &str = "venue_capacity";
pub const MAX_ATTENDEES: &str = "max_attendees";

/// Upper bound for any capacity figure.
pub const MAX_CAPACITY: f64 = 100_000.0;

/// Maximum ticket price in the club's currency.
pub const MAX_TICKET_PRICE: f64 = 10_000.0;

pub static SCHEMA: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::new(
        "event",
        vec![
            FieldSpec::identifier("club_id").required().immutable(),
            FieldSpec::identifier("created_by").required().immutable(),
            FieldSpec::string("title").required().length(3, 150),
            FieldSpec::string("description").nullable().max_length(5000),
            FieldSpec::string("location").required().max_length(200),
            FieldSpec::timestamp(START_TIME).required(),
            FieldSpec::timestamp(END_TIME).nullable(),
            FieldSpec::timestamp(REGISTRATION_CLOSE).nullable(),
            FieldSpec::integer(VENUE_CAPACITY)
                .nullable()
                .range(1.0, MAX_CAPACITY),
            FieldSpec::integer(MAX_ATTENDEES)
                .nullable()
                .range(1.0, MAX_CAPACITY),
            FieldSpec::float("ticket_price")
                .range(0.0, MAX_TICKET_PRICE)
                .default_value(json!(0.0)),
            FieldSpec::boolean("is_public").default_value(json!(true)),
            FieldSpec::string_array("tags")
                .max_items(10)
                .max_length(30)
                .default_value(json!([])),
            FieldSpec::identifier_array("attendee_ids")
                .immutable()
                .default_value(json!([])),
            FieldSpec::integer("attendee_count")
                .min(0.0)
                .immutable()
                .default_value(json!(0)),
            FieldSpec::object("metadata").nullable(),
        ],
        vec![
            BusinessRule::new("start_in_future", &[START_TIME], start_in_future),
            BusinessRule::new("end_after_start", &[START_TIME, END_TIME], end_after_start),
            BusinessRule::new(
                "registration_closes_before_start",
                &[START_TIME, REGISTRATION_CLOSE],
                registration_closes_before_start,
            ),
            BusinessRule::new(
                "attendees_within_venue",
                &[MAX_ATTENDEES, VENUE_CAPACITY],
                attendees_within_venue,
            ),
        ],
    )
});

fn start_in_future(record: &TypedRecord, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
    match record.present(START_TIME).and_then(|v| v.as_timestamp()) {
        Some(start) if start <= ctx.now => vec![ValidationError::rule(
            START_TIME,
            "start_time must be in the future",
        )],
        _ => Vec::new(),
    }
}

fn end_after_start(record: &TypedRecord, _ctx: &RuleContext<'_>) -> Vec<ValidationError> {
    let start = record.present(START_TIME).and_then(|v| v.as_timestamp());
    let end = record.present(END_TIME).and_then(|v| v.as_timestamp());
    match (start, end) {
        (Some(start), Some(end)) if end <= start => vec![ValidationError::rule(
            END_TIME,
            "end_time must be after start_time",
        )],
        _ => Vec::new(),
    }
}

fn registration_closes_before_start(
    record: &TypedRecord,
    _ctx: &RuleContext<'_>,
) -> Vec<ValidationError> {
    let start = record.present(START_TIME).and_then(|v| v.as_timestamp());
    let close = record
        .present(REGISTRATION_CLOSE)
        .and_then(|v| v.as_timestamp());
    match (start, close) {
        (Some(start), Some(close)) if close >= start => vec![ValidationError::rule(
            REGISTRATION_CLOSE,
            "registration_close must be before start_time",
        )],
        _ => Vec::new(),
    }
}

fn attendees_within_venue(record: &TypedRecord, _ctx: &RuleContext<'_>) -> Vec<ValidationError> {
    let attendees = record.present(MAX_ATTENDEES).and_then(|v| v.as_i64());
    let venue = record.present(VENUE_CAPACITY).and_then(|v| v.as_i64());
    match (attendees, venue) {
        (Some(attendees), Some(venue)) if attendees > venue => vec![ValidationError::rule(
            MAX_ATTENDEES,
            format!("max_attendees ({attendees}) must not exceed venue_capacity ({venue})"),
        )],
        _ => Vec::new(),
    }
}
