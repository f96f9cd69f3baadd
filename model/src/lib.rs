//! GRAFT Model
//!
//! In-memory schema model and its validation.
//!
//! Responsibilities:
//! - Build an immutable model of types and fields from configuration
//! - Resolve field types, key fields and relations
//! - Validate the model and collect diagnostics with locations
//! - Provide the calc mutation operator table

mod builder;
mod calc;
mod config;
mod error;
mod model;
mod relation;
mod types;
mod validate;
mod validation;

pub use builder::{ModelBuilder, TypeBuilder};
pub use calc::{capitalize, operators_for_type, CalcOperator};
pub use config::{
    Access, FieldConfig, ModelConfig, PermissionConfig, PermissionProfileConfig,
    PermissionsConfig, RolesSpecifier, TypeConfig,
};
pub use error::{ModelError, ModelResult};
pub use model::Model;
pub use relation::{Relation, RelationSide};
pub use types::{
    FieldDef, PermissionProfile, TypeDef, TypeKind, BUILTIN_SCALARS, CREATED_AT_FIELD,
    DEFAULT_PERMISSION_PROFILE, ID_FIELD, UPDATED_AT_FIELD,
};
pub use validation::{Severity, ValidationContext, ValidationMessage};
