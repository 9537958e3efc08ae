//! Entity schemas for users, clubs, events, and comments.
//!
//! Each schema is built once on first use and shared read-only.

pub mod club;
pub mod comment;
pub mod event;
pub mod user;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::validation::schema::EntitySchema;

/// The entity types the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    User,
    Club,
    Event,
    Comment,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [Self::User, Self::Club, Self::Event, Self::Comment];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Club => "club",
            Self::Event => "event",
            Self::Comment => "comment",
        }
    }

    /// The process-wide schema for this entity.
    pub fn schema(self) -> &'static EntitySchema {
        match self {
            Self::User => &*user::SCHEMA,
            Self::Club => &*club::SCHEMA,
            Self::Event => &*event::SCHEMA,
            Self::Comment => &*comment::SCHEMA,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "users" => Ok(Self::User),
            "club" | "clubs" => Ok(Self::Club),
            "event" | "events" => Ok(Self::Event),
            "comment" | "comments" => Ok(Self::Comment),
            other => Err(CoreError::Validation(format!("unknown entity type '{other}'"))),
        }
    }
}
