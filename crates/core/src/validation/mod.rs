//! Schema validation and type-coercion engine.
//!
//! Provides declarative field specifications, a coercion dispatcher, create
//! and update record mappers, business-rule plumbing, and error aggregation,
//! all without I/O.

pub mod coerce;
pub mod errors;
pub mod field;
pub mod mapper;
pub mod rules;
pub mod schema;
pub mod value;
