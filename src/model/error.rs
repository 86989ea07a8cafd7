use thiserror::Error;

/// Errors raised when building a record from raw field values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntityError {
    #[error("Invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("Expected {expected} field values, got {actual}")]
    FieldCount { expected: usize, actual: usize },
}

impl EntityError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }
}
