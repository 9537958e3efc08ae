//! Entity schema facade: the entry points callers use.
//!
//! Each entity exposes a create and an update validation returning either
//! the typed record or a catchable [`ValidationFailure`], plus `is_valid`
//! variants that hand back the bare [`ErrorMap`] (empty on success). Both
//! shapes carry identical content.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clock::{Clock, SystemClock};
use crate::config::ValidationConfig;
use crate::entities::EntityKind;
use crate::error::CoreError;
use crate::validation::errors::{ErrorMap, ValidationFailure};
use crate::validation::mapper::{map_for_create, map_for_update, Mode};
use crate::validation::rules::RuleContext;
use crate::validation::schema::EntitySchema;
use crate::validation::value::TypedRecord;

/// Shared validation engine. Cheap to clone; holds configuration and clock.
#[derive(Clone)]
pub struct Validator {
    config: Arc<ValidationConfig>,
    clock: Arc<dyn Clock>,
}

impl Validator {
    /// Build a validator, rejecting configurations no rule could apply.
    pub fn new(config: ValidationConfig, clock: Arc<dyn Clock>) -> Result<Self, CoreError> {
        config.check()?;
        Ok(Self {
            config: Arc::new(config),
            clock,
        })
    }

    /// Validator reading the process wall clock.
    pub fn with_system_clock(config: ValidationConfig) -> Result<Self, CoreError> {
        Self::new(config, Arc::new(SystemClock))
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn entity(&self, kind: EntityKind) -> EntityValidator<'_> {
        EntityValidator {
            kind,
            schema: kind.schema(),
            validator: self,
        }
    }

    pub fn users(&self) -> EntityValidator<'_> {
        self.entity(EntityKind::User)
    }

    pub fn clubs(&self) -> EntityValidator<'_> {
        self.entity(EntityKind::Club)
    }

    pub fn events(&self) -> EntityValidator<'_> {
        self.entity(EntityKind::Event)
    }

    pub fn comments(&self) -> EntityValidator<'_> {
        self.entity(EntityKind::Comment)
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// One entity's validation entry points.
#[derive(Debug, Clone, Copy)]
pub struct EntityValidator<'a> {
    kind: EntityKind,
    schema: &'static EntitySchema,
    validator: &'a Validator,
}

impl EntityValidator<'_> {
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    /// Validate a full record for creation.
    pub fn validate_for_create(
        &self,
        raw: &Map<String, Value>,
    ) -> Result<TypedRecord, ValidationFailure> {
        self.validate(Mode::Create, raw)
    }

    /// Validate a partial record for an update.
    pub fn validate_for_update(
        &self,
        raw: &Map<String, Value>,
    ) -> Result<TypedRecord, ValidationFailure> {
        self.validate(Mode::Update, raw)
    }

    /// Create-mode failures as a plain map; empty means valid.
    pub fn is_valid(&self, raw: &Map<String, Value>) -> ErrorMap {
        self.errors(Mode::Create, raw)
    }

    /// Update-mode failures as a plain map; empty means valid.
    pub fn is_valid_update(&self, raw: &Map<String, Value>) -> ErrorMap {
        self.errors(Mode::Update, raw)
    }

    pub fn validate(
        &self,
        mode: Mode,
        raw: &Map<String, Value>,
    ) -> Result<TypedRecord, ValidationFailure> {
        self.map(mode, raw).map_err(ValidationFailure)
    }

    fn errors(&self, mode: Mode, raw: &Map<String, Value>) -> ErrorMap {
        self.map(mode, raw).err().unwrap_or_default()
    }

    fn map(&self, mode: Mode, raw: &Map<String, Value>) -> Result<TypedRecord, ErrorMap> {
        let ctx = RuleContext {
            config: &self.validator.config,
            now: self.validator.clock.now(),
        };
        let result = match mode {
            Mode::Create => map_for_create(self.schema, raw, &ctx),
            Mode::Update => map_for_update(self.schema, raw, &ctx),
        };

        match &result {
            Ok(record) => tracing::debug!(
                entity = self.kind.as_str(),
                mode = mode.as_str(),
                fields = record.len(),
                "Record validated"
            ),
            Err(errors) => tracing::debug!(
                entity = self.kind.as_str(),
                mode = mode.as_str(),
                error_count = errors.error_count(),
                "Record rejected"
            ),
        }

        result
    }
}
