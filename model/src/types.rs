//! Model record types.

use crate::{CalcOperator, PermissionConfig, PermissionsConfig};
use graft_core::{FieldId, Location, TypeId, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the system identity field.
pub const ID_FIELD: &str = "id";
/// Name of the system creation timestamp field.
pub const CREATED_AT_FIELD: &str = "createdAt";
/// Name of the system modification timestamp field.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Scalar types every model provides without declaring them.
pub const BUILTIN_SCALARS: &[&str] = &["ID", "String", "Int", "Float", "Boolean", "DateTime", "JSON"];

/// Name of the permission profile used by root entities without explicit permissions.
pub const DEFAULT_PERMISSION_PROFILE: &str = "default";

/// Kind discriminant of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Enum,
    ValueObject,
    EntityExtension,
    ChildEntity,
    RootEntity,
}

impl TypeKind {
    /// Object types declare fields; scalars and enums do not.
    pub fn is_object_type(&self) -> bool {
        !matches!(self, TypeKind::Scalar | TypeKind::Enum)
    }

    /// Entities carry system-maintained identity fields.
    pub fn is_entity(&self) -> bool {
        matches!(self, TypeKind::RootEntity | TypeKind::ChildEntity)
    }

    pub fn is_scalar_or_enum(&self) -> bool {
        matches!(self, TypeKind::Scalar | TypeKind::Enum)
    }

    pub fn description(&self) -> &'static str {
        match self {
            TypeKind::Scalar => "scalar type",
            TypeKind::Enum => "enum type",
            TypeKind::ValueObject => "value object type",
            TypeKind::EntityExtension => "entity extension type",
            TypeKind::ChildEntity => "child entity type",
            TypeKind::RootEntity => "root entity type",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A type in the model.
#[derive(Debug, Clone)]
pub struct TypeDef {
    pub id: TypeId,
    pub name: String,
    pub kind: TypeKind,
    /// Fields in declaration order, system fields first.
    pub fields: Vec<FieldId>,
    /// Declared key field name (root entities).
    pub key_field_name: Option<String>,
    /// Resolved key field.
    pub key_field: Option<FieldId>,
    /// Enum values (enum types).
    pub enum_values: Vec<String>,
    pub permissions: Option<PermissionsConfig>,
    /// Whether the model provided this type rather than the schema.
    pub is_builtin: bool,
    pub location: Location,
}

impl TypeDef {
    pub fn is_root_entity(&self) -> bool {
        self.kind == TypeKind::RootEntity
    }

    pub fn is_child_entity(&self) -> bool {
        self.kind == TypeKind::ChildEntity
    }

    pub fn is_value_object(&self) -> bool {
        self.kind == TypeKind::ValueObject
    }

    pub fn is_entity_extension(&self) -> bool {
        self.kind == TypeKind::EntityExtension
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    pub fn is_scalar(&self) -> bool {
        self.kind == TypeKind::Scalar
    }
}

/// A field in the model.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub id: FieldId,
    /// The type this field is declared on.
    pub declaring_type: TypeId,
    pub name: String,
    /// Declared type name.
    pub type_name: String,
    /// Resolved target type; None when the name does not resolve.
    pub resolved_type: Option<TypeId>,
    pub is_list: bool,
    pub is_reference: bool,
    pub is_relation: bool,
    /// System-maintained and read-only.
    pub is_system_field: bool,
    pub default_value: Option<Value>,
    pub calc_operators: Vec<CalcOperator>,
    pub permissions: Option<PermissionsConfig>,
    /// Declared inverse field name on the target type.
    pub inverse_of: Option<String>,
    pub location: Location,
}

impl FieldDef {
    pub fn is_identity_field(&self) -> bool {
        self.is_system_field && self.name == ID_FIELD
    }
}

/// A named permission profile.
#[derive(Debug, Clone)]
pub struct PermissionProfile {
    pub name: String,
    pub permissions: Vec<PermissionConfig>,
    pub location: Location,
}
