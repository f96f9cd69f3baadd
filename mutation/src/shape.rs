//! Input shape descriptions.
//!
//! Executors and API layers read these instead of re-deriving input
//! handling from the model.

use graft_core::TypeId;
use serde::Serialize;

/// Raw value an input accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AcceptedValue {
    /// A value of the named scalar or enum type, or null.
    Scalar { type_name: String },
    /// An entity identity.
    Id,
    /// An object matching the create shape of a type.
    CreateInput { type_id: TypeId },
    /// An object matching the update shape of a type.
    UpdateInput { type_id: TypeId },
    List { item: Box<AcceptedValue> },
}

impl AcceptedValue {
    pub fn scalar(type_name: impl Into<String>) -> Self {
        AcceptedValue::Scalar {
            type_name: type_name.into(),
        }
    }

    pub fn list(item: AcceptedValue) -> Self {
        AcceptedValue::List {
            item: Box::new(item),
        }
    }
}

/// What one input field accepts and how it treats the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputShape {
    pub name: String,
    pub accepts: AcceptedValue,
    /// Only locates the target; never written.
    pub filter_only: bool,
    /// Null is normalized to an empty list and non-lists are rejected.
    pub list_coercing: bool,
    /// Values are coerced through a nested input shape.
    pub recursive: bool,
}
