//! Per-entity schema: ordered field table plus business rules.

use super::field::FieldSpec;
use super::rules::BusinessRule;

/// Field key stamped on create.
pub const CREATED_AT: &str = "created_at";

/// Field key stamped on create and on every update.
pub const UPDATED_AT: &str = "updated_at";

/// Immutable description of one entity type.
#[derive(Debug)]
pub struct EntitySchema {
    pub name: &'static str,
    fields: Vec<FieldSpec>,
    rules: Vec<BusinessRule>,
}

impl EntitySchema {
    pub fn new(name: &'static str, fields: Vec<FieldSpec>, rules: Vec<BusinessRule>) -> Self {
        Self {
            name,
            fields,
            rules,
        }
    }

    /// Field specifications in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn rules(&self) -> &[BusinessRule] {
        &self.rules
    }

    /// Names of the fields update-mode mapping always skips.
    pub fn immutable_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.immutable).map(|f| f.name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }
}
