//! Strongly-typed field values and the records built from them.

use chrono::SecondsFormat;
use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::types::{EntityId, Timestamp};

/// A coerced value whose variant always matches its field's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Explicit clear of a nullable field (update mode only).
    Null,
    Id(EntityId),
    Email(String),
    Timestamp(Timestamp),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    StringArray(Vec<String>),
    IdArray(Vec<EntityId>),
    Object(Map<String, Value>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Text content of string and e-mail values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Email(s) => Some(s.as_str()),
            Self::Id(id) => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            Self::StringArray(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Render as the JSON the persistence layer stores.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Id(id) => Value::String(id.to_string()),
            Self::Email(s) | Self::String(s) => Value::String(s.clone()),
            Self::Timestamp(ts) => Value::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Integer(n) => Value::from(*n),
            Self::Float(n) => Value::from(*n),
            Self::Boolean(b) => Value::Bool(*b),
            Self::StringArray(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            Self::IdArray(items) => Value::Array(
                items
                    .iter()
                    .map(|id| Value::String(id.to_string()))
                    .collect(),
            ),
            Self::Object(map) => Value::Object(map.clone()),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Output of a successful validation: field name to typed value, in schema
/// declaration order followed by the stamped timestamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedRecord {
    fields: IndexMap<String, FieldValue>,
}

impl TypedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Like [`get`](Self::get), but treats an explicit `Null` as absent.
    pub fn present(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Flat insert/update payload for the persistence layer.
    pub fn to_json(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }
}

impl Serialize for TypedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    #[test]
    fn timestamps_render_with_millis_and_z() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(
            FieldValue::Timestamp(ts).to_json(),
            json!("2026-03-01T12:30:00.000Z")
        );
    }

    #[test]
    fn record_preserves_insertion_order() {
        let mut record = TypedRecord::new();
        record.insert("b", FieldValue::Integer(1));
        record.insert("a", FieldValue::Boolean(true));
        record.insert("c", FieldValue::Null);
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"b":1,"a":true,"c":null}"#
        );
    }

    #[test]
    fn present_hides_explicit_null() {
        let mut record = TypedRecord::new();
        record.insert("end_time", FieldValue::Null);
        assert!(record.contains("end_time"));
        assert!(record.present("end_time").is_none());
    }

    #[test]
    fn id_list_renders_as_strings() {
        let id = EntityId::parse("65a1b2c3d4e5f60718293a4b").unwrap();
        let value = FieldValue::IdArray(vec![id]);
        assert_eq!(value.to_json(), json!(["65a1b2c3d4e5f60718293a4b"]));
    }
}
