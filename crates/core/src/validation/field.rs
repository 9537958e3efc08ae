//! Declarative field specifications.
//!
//! Entity tables are built from these once at startup and never mutated.

use serde_json::Value;

/// The data type a field coerces into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Identifier,
    /// An e-mail address, optionally restricted to a domain suffix.
    Email {
        domain_suffix: Option<&'static str>,
    },
    Timestamp,
    Integer,
    Float,
    Boolean,
    String,
    StringArray,
    IdentifierArray,
    NestedObject,
}

impl FieldKind {
    /// Human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Email { .. } => "email address",
            Self::Timestamp => "timestamp",
            Self::Integer => "integer",
            Self::Float => "number",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::StringArray => "list of strings",
            Self::IdentifierArray => "list of identifiers",
            Self::NestedObject => "object",
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::StringArray | Self::IdentifierArray)
    }
}

/// Length, numeric, and item-count limits. All bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bounds {
    /// Minimum length in characters (strings, and each string-array item).
    pub min_length: Option<usize>,
    /// Maximum length in characters (strings, emails, string-array items).
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Maximum element count of a collection, after blank items are dropped.
    pub max_items: Option<usize>,
}

/// Declarative description of one field's type and constraints.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
    /// Raw value substituted on create when the input is missing or empty.
    pub default: Option<Value>,
    pub bounds: Bounds,
    /// Allowed values for strings and string-array items.
    pub allowed: &'static [&'static str],
    /// Skipped silently by update-mode mapping.
    pub immutable: bool,
}

impl FieldSpec {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            nullable: false,
            default: None,
            bounds: Bounds::default(),
            allowed: &[],
            immutable: false,
        }
    }

    pub fn identifier(name: &'static str) -> Self {
        Self::new(name, FieldKind::Identifier)
    }

    pub fn email(name: &'static str) -> Self {
        Self::new(
            name,
            FieldKind::Email {
                domain_suffix: None,
            },
        )
        .max_length(254)
    }

    pub fn timestamp(name: &'static str) -> Self {
        Self::new(name, FieldKind::Timestamp)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn float(name: &'static str) -> Self {
        Self::new(name, FieldKind::Float)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn string_array(name: &'static str) -> Self {
        Self::new(name, FieldKind::StringArray)
    }

    pub fn identifier_array(name: &'static str) -> Self {
        Self::new(name, FieldKind::IdentifierArray)
    }

    pub fn object(name: &'static str) -> Self {
        Self::new(name, FieldKind::NestedObject)
    }

    // -- modifiers ----------------------------------------------------------

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.bounds.min_length = Some(min);
        self.bounds.max_length = Some(max);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.bounds.max_length = Some(max);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.bounds.min = Some(min);
        self.bounds.max = Some(max);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.bounds.min = Some(min);
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.bounds.max_items = Some(max);
        self
    }

    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = allowed;
        self
    }

    /// Require an e-mail field to end with `suffix`. No effect on other kinds.
    pub fn domain_suffix(mut self, suffix: &'static str) -> Self {
        if let FieldKind::Email { domain_suffix } = &mut self.kind {
            *domain_suffix = Some(suffix);
        }
        self
    }
}
