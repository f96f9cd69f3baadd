//! Model construction faults.
//!
//! These are caller contract violations, raised immediately. Problems with the
//! user's schema are never reported here; they are collected as diagnostics by
//! validation.

use thiserror::Error;

/// Result type for model construction.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while building a model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The configuration could not be decoded.
    #[error("Malformed model configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A calc mutation operator name is missing from the operator table.
    #[error("Unknown calc mutation operator '{operator}' on field {type_name}.{field}")]
    UnknownCalcOperator {
        type_name: String,
        field: String,
        operator: String,
    },
}

impl ModelError {
    pub fn unknown_calc_operator(
        type_name: impl Into<String>,
        field: impl Into<String>,
        operator: impl Into<String>,
    ) -> Self {
        Self::UnknownCalcOperator {
            type_name: type_name.into(),
            field: field.into(),
            operator: operator.into(),
        }
    }
}
