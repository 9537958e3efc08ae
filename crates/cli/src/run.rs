//! Runs one record through the validation facade.

use anyhow::{bail, Context};
use clubhouse_core::{
    EmptyItemPolicy, EntityKind, Mode, UnknownKeyPolicy, ValidationConfig, Validator,
};
use serde_json::{json, Value};

use crate::args::Cli;

/// Result of validating one record, ready to print.
#[derive(Debug)]
pub struct Outcome {
    pub valid: bool,
    pub body: Value,
}

/// Apply command-line overrides on top of the environment configuration.
pub fn effective_config(cli: &Cli, mut config: ValidationConfig) -> ValidationConfig {
    if cli.strict_keys {
        config.unknown_keys = UnknownKeyPolicy::Reject;
    }
    if cli.strict_items {
        config.empty_items = EmptyItemPolicy::Reject;
    }
    config
}

/// Parse `input` as a JSON object and validate it.
///
/// A validation failure is an `Ok` outcome; only unreadable input is an error.
pub fn run(validator: &Validator, cli: &Cli, input: &str) -> anyhow::Result<Outcome> {
    let value: Value = serde_json::from_str(input).context("input is not valid JSON")?;
    let Value::Object(raw) = value else {
        bail!("input must be a JSON object");
    };

    let kind = EntityKind::from(cli.entity);
    let mode = Mode::from(cli.mode);
    tracing::info!(entity = %kind, mode = mode.as_str(), keys = raw.len(), "Validating record");

    let outcome = match validator.entity(kind).validate(mode, &raw) {
        Ok(record) => Outcome {
            valid: true,
            body: json!({ "record": record }),
        },
        Err(failure) => Outcome {
            valid: false,
            body: json!({ "errors": failure.errors() }),
        },
    };
    Ok(outcome)
}
