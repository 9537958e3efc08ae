use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// All timestamps are UTC.
pub type Timestamp = DateTime<Utc>;

/// Length of an opaque record identifier in hexadecimal characters.
pub const ENTITY_ID_LEN: usize = 24;

static ENTITY_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^[0-9a-fA-F]{{{ENTITY_ID_LEN}}}$")).expect("valid regex")
});

/// Opaque reference to a stored record.
///
/// Identifiers are assigned by the persistence layer as 12-byte object ids
/// rendered in hex. The engine only checks the shape; whether the referenced
/// record exists is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Parse a 24-character hex token, normalizing to lower case.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if ENTITY_ID_RE.is_match(raw) {
            Some(Self(raw.to_ascii_lowercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Drop sub-millisecond precision so every stored timestamp compares exactly.
pub fn truncate_to_millis(ts: Timestamp) -> Timestamp {
    DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_lowercases_hex_ids() {
        let id = EntityId::parse(" 65A1B2C3D4E5F60718293A4B ").unwrap();
        assert_eq!(id.as_str(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn rejects_wrong_length_or_alphabet() {
        assert!(EntityId::parse("65a1b2c3").is_none());
        assert!(EntityId::parse("zza1b2c3d4e5f60718293a4b").is_none());
        assert!(EntityId::parse("").is_none());
    }

    #[test]
    fn truncation_drops_micros() {
        let ts = DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap();
        assert_eq!(truncate_to_millis(ts).timestamp_subsec_nanos(), 123_000_000);
    }
}
