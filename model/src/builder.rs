//! ModelBuilder for constructing an immutable Model.

use crate::{
    CalcOperator, FieldConfig, FieldDef, Model, ModelConfig, ModelError, ModelResult,
    PermissionProfile, PermissionProfileConfig, PermissionsConfig, TypeConfig, TypeDef, TypeKind,
    BUILTIN_SCALARS, CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD,
};
use graft_core::{FieldId, Location, TypeId};
use std::collections::HashMap;

/// Builder for constructing an immutable Model.
///
/// Types are registered first with unresolved field type names; `build`
/// resolves every name against the complete set of types.
#[derive(Debug)]
pub struct ModelBuilder {
    /// Types being built, indexed by TypeId.
    types: Vec<TypeDef>,
    /// Fields being built, indexed by FieldId.
    fields: Vec<FieldDef>,
    /// Type name to ID mapping (first declaration wins).
    type_names: HashMap<String, TypeId>,
    /// Permission profiles being built.
    profiles: Vec<PermissionProfile>,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBuilder {
    /// Create a new builder with the built-in scalar types registered.
    pub fn new() -> Self {
        let mut builder = Self {
            types: Vec::new(),
            fields: Vec::new(),
            type_names: HashMap::new(),
            profiles: Vec::new(),
        };
        for name in BUILTIN_SCALARS {
            builder.register_type(TypeDef {
                id: TypeId::new(0),
                name: (*name).to_string(),
                kind: TypeKind::Scalar,
                fields: Vec::new(),
                key_field_name: None,
                key_field: None,
                enum_values: Vec::new(),
                permissions: None,
                is_builtin: true,
                location: Location::unknown(),
            });
        }
        builder
    }

    /// Populate a builder from a complete configuration.
    pub fn from_config(config: ModelConfig) -> ModelResult<Self> {
        let mut builder = Self::new();
        for profile in config.permission_profiles {
            builder.add_permission_profile(profile);
        }
        for type_config in config.types {
            builder.add_type_config(type_config)?;
        }
        Ok(builder)
    }

    /// Add a type definition.
    pub fn add_type(&mut self, name: impl Into<String>, kind: TypeKind) -> TypeBuilder<'_> {
        TypeBuilder {
            builder: self,
            config: TypeConfig::new(name, kind),
        }
    }

    /// Add a type from its declaration.
    pub fn add_type_config(&mut self, config: TypeConfig) -> ModelResult<TypeId> {
        TypeBuilder {
            builder: self,
            config,
        }
        .done()
    }

    /// Add a permission profile.
    pub fn add_permission_profile(&mut self, config: PermissionProfileConfig) {
        self.profiles.push(PermissionProfile {
            name: config.name,
            permissions: config.permissions,
            location: config.location,
        });
    }

    /// Build the immutable Model.
    pub fn build(mut self) -> ModelResult<Model> {
        // Resolve field types against the complete set of types
        for field in &mut self.fields {
            field.resolved_type = self.type_names.get(&field.type_name).copied();
        }

        // Resolve key fields
        for index in 0..self.types.len() {
            let key_field = self.types[index].key_field_name.as_ref().and_then(|key| {
                self.types[index]
                    .fields
                    .iter()
                    .copied()
                    .find(|id| self.fields[id.index()].name == *key)
            });
            self.types[index].key_field = key_field;
        }

        tracing::debug!(
            types = self.types.len(),
            fields = self.fields.len(),
            profiles = self.profiles.len(),
            "built model"
        );

        Ok(Model::new(self.types, self.fields, self.type_names, self.profiles))
    }

    fn register_type(&mut self, mut type_def: TypeDef) -> TypeId {
        let id = TypeId::new(self.types.len() as u32);
        type_def.id = id;
        // Duplicates keep their arena slot so validation can report every declaration.
        self.type_names.entry(type_def.name.clone()).or_insert(id);
        self.types.push(type_def);
        id
    }

    fn push_field(
        &mut self,
        declaring_type: TypeId,
        config: FieldConfig,
        is_system_field: bool,
        calc_operators: Vec<CalcOperator>,
    ) -> FieldId {
        let id = FieldId::new(self.fields.len() as u32);
        self.fields.push(FieldDef {
            id,
            declaring_type,
            name: config.name,
            type_name: config.type_name,
            resolved_type: None,
            is_list: config.is_list,
            is_reference: config.is_reference,
            is_relation: config.is_relation,
            is_system_field,
            default_value: config.default_value,
            calc_operators,
            permissions: config.permissions,
            inverse_of: config.inverse_of,
            location: config.location,
        });
        id
    }
}

/// Builder for a type definition.
pub struct TypeBuilder<'a> {
    builder: &'a mut ModelBuilder,
    config: TypeConfig,
}

impl<'a> TypeBuilder<'a> {
    /// Add a field.
    pub fn field(mut self, field: FieldConfig) -> Self {
        self.config.fields.push(field);
        self
    }

    /// Designate the key field.
    pub fn key_field(mut self, name: impl Into<String>) -> Self {
        self.config.key_field = Some(name.into());
        self
    }

    /// Add an enum value.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.config.values.push(value.into());
        self
    }

    /// Set permission metadata.
    pub fn permissions(mut self, permissions: PermissionsConfig) -> Self {
        self.config.permissions = Some(permissions);
        self
    }

    /// Set the source location.
    pub fn at(mut self, location: Location) -> Self {
        self.config.location = location;
        self
    }

    /// Finish building this type.
    pub fn done(self) -> ModelResult<TypeId> {
        let TypeConfig {
            name,
            kind,
            fields,
            key_field,
            values,
            permissions,
            location,
        } = self.config;

        // Operator names are checked before anything is registered
        let mut operators = Vec::with_capacity(fields.len());
        for field in &fields {
            let mut field_operators = Vec::with_capacity(field.calc_mutations.len());
            for operator in &field.calc_mutations {
                let op = CalcOperator::from_name(operator).ok_or_else(|| {
                    ModelError::unknown_calc_operator(&name, &field.name, operator)
                })?;
                field_operators.push(op);
            }
            operators.push(field_operators);
        }

        let system_location = location.clone();
        let type_id = self.builder.register_type(TypeDef {
            id: TypeId::new(0),
            name,
            kind,
            fields: Vec::new(),
            key_field_name: key_field,
            key_field: None,
            enum_values: values,
            permissions,
            is_builtin: false,
            location,
        });

        let mut field_ids = Vec::new();
        if kind.is_entity() {
            for (field_name, type_name) in [
                (ID_FIELD, "ID"),
                (CREATED_AT_FIELD, "DateTime"),
                (UPDATED_AT_FIELD, "DateTime"),
            ] {
                let config = FieldConfig::new(field_name, type_name).at(system_location.clone());
                field_ids.push(self.builder.push_field(type_id, config, true, Vec::new()));
            }
        }
        for (field, field_operators) in fields.into_iter().zip(operators) {
            field_ids.push(self.builder.push_field(type_id, field, false, field_operators));
        }
        self.builder.types[type_id.index()].fields = field_ids;

        Ok(type_id)
    }
}
