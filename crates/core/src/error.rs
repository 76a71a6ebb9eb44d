use serde::Serialize;

use crate::types::DbId;

/// A single rejected query parameter.
///
/// `field` uses the public (camelCase) parameter name so callers can map
/// the error straight back onto their request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Every invalid field of a request, collected in one pass.
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// The store could not be reached (connection refused, pool exhausted, ...).
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Any other store-level failure.
    #[error("Store error: {0}")]
    Store(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl CoreError {
    /// The field errors carried by a validation failure, empty otherwise.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            CoreError::Validation(errors) => errors,
            _ => &[],
        }
    }
}
