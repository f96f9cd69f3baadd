//! Model configuration.
//!
//! These are the declarations produced by the schema parser. They are plain
//! data: names are not resolved and nothing is validated until the model is
//! built from them.

use crate::{ModelError, ModelResult, TypeKind};
use graft_core::{Location, Value};
use serde::{Deserialize, Serialize};

/// The complete input of one schema compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelConfig {
    /// Type declarations, in declaration order.
    pub types: Vec<TypeConfig>,
    /// Named permission profiles that types and fields may refer to.
    pub permission_profiles: Vec<PermissionProfileConfig>,
}

impl ModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a model configuration from JSON.
    pub fn from_json(source: &str) -> ModelResult<Self> {
        serde_json::from_str(source).map_err(ModelError::from)
    }

    pub fn with_type(mut self, type_config: TypeConfig) -> Self {
        self.types.push(type_config);
        self
    }

    pub fn with_permission_profile(mut self, profile: PermissionProfileConfig) -> Self {
        self.permission_profiles.push(profile);
        self
    }
}

/// A type declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeConfig {
    pub name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
    /// Name of the key field (root entities only).
    #[serde(default)]
    pub key_field: Option<String>,
    /// Enum values (enum types only).
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub permissions: Option<PermissionsConfig>,
    #[serde(default)]
    pub location: Location,
}

impl TypeConfig {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fields: Vec::new(),
            key_field: None,
            values: Vec::new(),
            permissions: None,
            location: Location::unknown(),
        }
    }

    pub fn field(mut self, field: FieldConfig) -> Self {
        self.fields.push(field);
        self
    }

    pub fn key_field(mut self, name: impl Into<String>) -> Self {
        self.key_field = Some(name.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.values.push(value.into());
        self
    }

    pub fn permissions(mut self, permissions: PermissionsConfig) -> Self {
        self.permissions = Some(permissions);
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

/// A field declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub name: String,
    /// Name of the field's type, resolved against the whole model.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub is_list: bool,
    #[serde(default)]
    pub is_reference: bool,
    #[serde(default)]
    pub is_relation: bool,
    /// Name of the field on the target type this relation is the inverse of.
    #[serde(default)]
    pub inverse_of: Option<String>,
    #[serde(default)]
    pub default_value: Option<Value>,
    /// Calc mutation operator names (e.g. "ADD", "APPEND").
    #[serde(default)]
    pub calc_mutations: Vec<String>,
    #[serde(default)]
    pub permissions: Option<PermissionsConfig>,
    #[serde(default)]
    pub location: Location,
}

impl FieldConfig {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_list: false,
            is_reference: false,
            is_relation: false,
            inverse_of: None,
            default_value: None,
            calc_mutations: Vec::new(),
            permissions: None,
            location: Location::unknown(),
        }
    }

    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    pub fn reference(mut self) -> Self {
        self.is_reference = true;
        self
    }

    pub fn relation(mut self) -> Self {
        self.is_relation = true;
        self
    }

    pub fn inverse_of(mut self, field_name: impl Into<String>) -> Self {
        self.is_relation = true;
        self.inverse_of = Some(field_name.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn calc_mutation(mut self, operator: impl Into<String>) -> Self {
        self.calc_mutations.push(operator.into());
        self
    }

    pub fn permissions(mut self, permissions: PermissionsConfig) -> Self {
        self.permissions = Some(permissions);
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

/// Permission metadata of a type or field.
///
/// Either a profile name or an explicit roles specifier; declaring both is a
/// schema error reported by validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermissionsConfig {
    pub profile: Option<String>,
    pub roles: Option<RolesSpecifier>,
}

impl PermissionsConfig {
    pub fn profile(name: impl Into<String>) -> Self {
        Self {
            profile: Some(name.into()),
            roles: None,
        }
    }

    pub fn roles(roles: RolesSpecifier) -> Self {
        Self {
            profile: None,
            roles: Some(roles),
        }
    }
}

/// Explicit role lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RolesSpecifier {
    pub read: Vec<String>,
    pub read_write: Vec<String>,
}

impl RolesSpecifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(mut self, role: impl Into<String>) -> Self {
        self.read.push(role.into());
        self
    }

    pub fn read_write(mut self, role: impl Into<String>) -> Self {
        self.read_write.push(role.into());
        self
    }
}

/// A named permission profile declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionProfileConfig {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<PermissionConfig>,
    #[serde(default)]
    pub location: Location,
}

impl PermissionProfileConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permissions: Vec::new(),
            location: Location::unknown(),
        }
    }

    pub fn grant(mut self, role: impl Into<String>, access: Access) -> Self {
        self.permissions.push(PermissionConfig {
            roles: vec![role.into()],
            access,
        });
        self
    }
}

/// One entry of a permission profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionConfig {
    pub roles: Vec<String>,
    pub access: Access,
}

/// Access level granted by a permission entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Access {
    Read,
    ReadWrite,
}
