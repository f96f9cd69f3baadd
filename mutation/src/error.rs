//! Mutation error types.

use graft_query::QueryError;
use thiserror::Error;

/// Result type for mutation input compilation.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors that can occur while generating input shapes or coercing input.
///
/// Shape generation faults (`UnexpectedFieldShape`, `UnknownFieldType`,
/// `UnresolvedRelation`, `NotAnObjectType`) mean the model was not valid.
/// `NotARootEntity` means the caller addressed a type the store does not keep
/// as standalone entities.
/// The remaining variants describe bad input values.
#[derive(Debug, Error, PartialEq)]
pub enum MutationError {
    #[error("Field {field} has a shape that cannot be written")]
    UnexpectedFieldShape { field: String },

    #[error("Type \"{type_name}\" of field {field} does not exist")]
    UnknownFieldType { field: String, type_name: String },

    #[error("Relation of field {field} cannot be resolved")]
    UnresolvedRelation { field: String },

    #[error("Type \"{type_name}\" has no input shape")]
    NotAnObjectType { type_name: String },

    #[error("Input {input} expects a list, got {actual}")]
    NotAList { input: String, actual: String },

    #[error("Input {input} expects an object, got {actual}")]
    NotAnObject { input: String, actual: String },

    #[error("Invalid value for input {input}: expected {expected}, got {actual}")]
    InvalidValue {
        input: String,
        expected: String,
        actual: String,
    },

    #[error("Unknown input {input} on {shape}")]
    UnknownInput { shape: String, input: String },

    #[error("Inputs {inputs} of {shape} all write field {field}")]
    ConflictingInputs {
        shape: String,
        field: String,
        inputs: String,
    },

    #[error("Input {input} of {shape} is required to identify the object to update")]
    MissingIdentity { shape: String, input: String },

    #[error("Input {input} addresses object {id} more than once")]
    DuplicateIdentity { input: String, id: String },

    #[error("Type \"{type_name}\" is not a root entity type")]
    NotARootEntity { type_name: String },

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl MutationError {
    pub fn unexpected_field_shape(field: impl Into<String>) -> Self {
        Self::UnexpectedFieldShape {
            field: field.into(),
        }
    }

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

    pub fn not_an_object_type(type_name: impl Into<String>) -> Self {
        Self::NotAnObjectType {
            type_name: type_name.into(),
        }
    }

    pub fn not_a_list(input: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::NotAList {
            input: input.into(),
            actual: actual.into(),
        }
    }

    pub fn not_an_object(input: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::NotAnObject {
            input: input.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_value(
        input: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            input: input.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn unknown_input(shape: impl Into<String>, input: impl Into<String>) -> Self {
        Self::UnknownInput {
            shape: shape.into(),
            input: input.into(),
        }
    }

    pub fn conflicting_inputs(
        shape: impl Into<String>,
        field: impl Into<String>,
        inputs: &[&str],
    ) -> Self {
        Self::ConflictingInputs {
            shape: shape.into(),
            field: field.into(),
            inputs: inputs.join(", "),
        }
    }

    pub fn missing_identity(shape: impl Into<String>, input: impl Into<String>) -> Self {
        Self::MissingIdentity {
            shape: shape.into(),
            input: input.into(),
        }
    }

    pub fn duplicate_identity(input: impl Into<String>, id: impl Into<String>) -> Self {
        Self::DuplicateIdentity {
            input: input.into(),
            id: id.into(),
        }
    }

    pub fn not_a_root_entity(type_name: impl Into<String>) -> Self {
        Self::NotARootEntity {
            type_name: type_name.into(),
        }
    }

    /// Whether this error means the model itself cannot be compiled.
    pub fn is_generation_fault(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedFieldShape { .. }
                | Self::UnknownFieldType { .. }
                | Self::UnresolvedRelation { .. }
                | Self::NotAnObjectType { .. }
                | Self::Query(_)
        )
    }
}
