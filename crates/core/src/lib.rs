//! Declarative schema validation and type coercion for the clubhouse
//! membership and events backend.
//!
//! Raw JSON input is coerced field by field against an immutable entity
//! schema, checked against cross-field business rules, and returned either
//! as a [`TypedRecord`](validation::value::TypedRecord) ready for persistence
//! or as an aggregated [`ErrorMap`](validation::errors::ErrorMap).

pub mod clock;
pub mod config;
pub mod entities;
pub mod error;
pub mod facade;
pub mod types;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{EmptyItemPolicy, UnknownKeyPolicy, ValidationConfig};
pub use entities::EntityKind;
pub use error::CoreError;
pub use facade::{EntityValidator, Validator};
pub use validation::errors::{ErrorKind, ErrorMap, ValidationError, ValidationFailure};
pub use validation::mapper::Mode;
pub use validation::value::{FieldValue, TypedRecord};
