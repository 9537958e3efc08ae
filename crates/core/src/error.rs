use crate::validation::errors::ErrorMap;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(ErrorMap),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
