//! The Model - immutable schema lookup.

use crate::relation::resolve_relation;
use crate::{
    validate, FieldDef, ModelBuilder, ModelConfig, ModelResult, PermissionProfile, Relation,
    RelationSide, TypeDef, TypeKind, ValidationContext, DEFAULT_PERMISSION_PROFILE,
};
use graft_core::{FieldId, TypeId};
use std::collections::HashMap;
use std::sync::OnceLock;

/// The Model provides lookup of types, fields and their derived properties.
/// It is immutable after construction.
///
/// Types and fields are stored in arenas addressed by `TypeId` and `FieldId`.
/// Relations are derived on first access and cached per field.
#[derive(Debug)]
pub struct Model {
    /// Type definitions by ID.
    types: Vec<TypeDef>,
    /// Field definitions by ID.
    fields: Vec<FieldDef>,
    /// Type ID lookup by name.
    type_names: HashMap<String, TypeId>,

    /// Permission profiles.
    profiles: Vec<PermissionProfile>,
    /// Profile lookup by name (first declaration wins).
    profile_names: HashMap<String, usize>,

    /// Lazily resolved relation per field.
    relations: Vec<OnceLock<Option<Relation>>>,
}

impl Model {
    pub(crate) fn new(
        types: Vec<TypeDef>,
        fields: Vec<FieldDef>,
        type_names: HashMap<String, TypeId>,
        profiles: Vec<PermissionProfile>,
    ) -> Self {
        let mut profile_names = HashMap::new();
        for (index, profile) in profiles.iter().enumerate() {
            profile_names.entry(profile.name.clone()).or_insert(index);
        }
        let relations = (0..fields.len()).map(|_| OnceLock::new()).collect();
        Self {
            types,
            fields,
            type_names,
            profiles,
            profile_names,
            relations,
        }
    }

    /// Build a model from configuration.
    pub fn from_config(config: ModelConfig) -> ModelResult<Model> {
        ModelBuilder::from_config(config)?.build()
    }

    /// Run the full validation pipeline.
    pub fn validate(&self) -> ValidationContext {
        validate::validate_model(self)
    }

    // ==================== Type Lookups ====================

    /// Get a type definition by ID.
    ///
    /// IDs are only issued by the builder of this model, so every ID is in range.
    pub fn get_type(&self, id: TypeId) -> &TypeDef {
        &self.types[id.index()]
    }

    /// Get a type definition by name.
    pub fn get_type_by_name(&self, name: &str) -> Option<&TypeDef> {
        self.type_names.get(name).map(|id| self.get_type(*id))
    }

    /// All types, built-in scalars included.
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.iter()
    }

    /// Types declared by the schema.
    pub fn declared_types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.iter().filter(|t| !t.is_builtin)
    }

    /// All root entity types.
    pub fn root_entity_types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.iter().filter(|t| t.kind == TypeKind::RootEntity)
    }

    /// The key field of a root entity type.
    pub fn key_field(&self, type_id: TypeId) -> Option<FieldId> {
        self.get_type(type_id).key_field
    }

    // ==================== Field Lookups ====================

    /// Get a field definition by ID.
    pub fn get_field(&self, id: FieldId) -> &FieldDef {
        &self.fields[id.index()]
    }

    /// Find a field of a type by name.
    pub fn field_by_name(&self, type_id: TypeId, name: &str) -> Option<FieldId> {
        self.get_type(type_id)
            .fields
            .iter()
            .copied()
            .find(|id| self.get_field(*id).name == name)
    }

    /// Fields of a type, in declaration order.
    pub fn fields_of(&self, type_id: TypeId) -> impl Iterator<Item = &FieldDef> {
        self.get_type(type_id)
            .fields
            .iter()
            .map(move |id| self.get_field(*id))
    }

    /// The resolved type of a field.
    pub fn field_type(&self, field_id: FieldId) -> Option<&TypeDef> {
        self.get_field(field_id)
            .resolved_type
            .map(|id| self.get_type(id))
    }

    /// The type a field is declared on.
    pub fn declaring_type(&self, field_id: FieldId) -> &TypeDef {
        self.get_type(self.get_field(field_id).declaring_type)
    }

    /// "Type.field", for messages.
    pub fn qualified_name(&self, field_id: FieldId) -> String {
        let field = self.get_field(field_id);
        format!("{}.{}", self.get_type(field.declaring_type).name, field.name)
    }

    // ==================== Derived Predicates ====================

    /// Whether the field's type name resolves.
    pub fn has_valid_type(&self, field_id: FieldId) -> bool {
        self.get_field(field_id).resolved_type.is_some()
    }

    /// System fields are maintained by the store and cannot be written.
    pub fn is_read_only(&self, field_id: FieldId) -> bool {
        self.get_field(field_id).is_system_field
    }

    pub fn has_default_value(&self, field_id: FieldId) -> bool {
        self.get_field(field_id).default_value.is_some()
    }

    // ==================== Relations ====================

    /// The relation a relation field belongs to.
    pub fn relation(&self, field_id: FieldId) -> Option<Relation> {
        *self.relations[field_id.index()].get_or_init(|| resolve_relation(self, field_id))
    }

    /// The side of its relation a relation field views.
    pub fn relation_side(&self, field_id: FieldId) -> Option<RelationSide> {
        let relation = self.relation(field_id)?;
        if relation.from_field == field_id {
            Some(relation.from_side())
        } else {
            Some(relation.to_side())
        }
    }

    /// The field paired with a relation field, if the relation has two sides.
    pub fn inverse_field(&self, field_id: FieldId) -> Option<FieldId> {
        self.relation_side(field_id)?.target_field()
    }

    // ==================== Permissions ====================

    /// Get a permission profile by name.
    pub fn get_permission_profile(&self, name: &str) -> Option<&PermissionProfile> {
        self.profile_names.get(name).map(|index| &self.profiles[*index])
    }

    /// All permission profiles.
    pub fn permission_profiles(&self) -> impl Iterator<Item = &PermissionProfile> {
        self.profiles.iter()
    }

    /// The profile a field refers to.
    pub fn permission_profile(&self, field_id: FieldId) -> Option<&PermissionProfile> {
        let name = self.get_field(field_id).permissions.as_ref()?.profile.as_ref()?;
        self.get_permission_profile(name)
    }

    /// The profile governing a root entity type.
    ///
    /// Root entities without own permissions fall back to the default profile.
    pub fn type_permission_profile(&self, type_id: TypeId) -> Option<&PermissionProfile> {
        let type_def = self.get_type(type_id);
        match &type_def.permissions {
            Some(permissions) => permissions
                .profile
                .as_ref()
                .and_then(|name| self.get_permission_profile(name)),
            None if type_def.is_root_entity() => {
                self.get_permission_profile(DEFAULT_PERMISSION_PROFILE)
            }
            None => None,
        }
    }
}
