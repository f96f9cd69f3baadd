//! Query compilation error types.

use thiserror::Error;

/// Result type for query compilation.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while compiling read access.
///
/// A model that passed validation never produces these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Type \"{type_name}\" of field {field} does not exist")]
    UnknownFieldType { field: String, type_name: String },

    #[error("Relation of field {field} cannot be resolved")]
    UnresolvedRelation { field: String },

    #[error("Reference target \"{type_name}\" of field {field} is not a keyed root entity type")]
    InvalidReferenceTarget { field: String, type_name: String },
}

impl QueryError {
    pub fn unknown_field_type(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnknownFieldType {
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    pub fn unresolved_relation(field: impl Into<String>) -> Self {
        Self::UnresolvedRelation {
            field: field.into(),
        }
    }

    pub fn invalid_reference_target(
        field: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self::InvalidReferenceTarget {
            field: field.into(),
            type_name: type_name.into(),
        }
    }
}
