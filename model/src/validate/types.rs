//! Type-level rules.

use super::{names, permissions};
use crate::{Model, TypeDef, TypeKind, ValidationContext, DEFAULT_PERMISSION_PROFILE};
use std::collections::{HashMap, HashSet};

pub(super) fn check_duplicate_type_names(model: &Model, ctx: &mut ValidationContext) {
    let mut by_name: HashMap<&str, Vec<&TypeDef>> = HashMap::new();
    for type_def in model.types() {
        by_name.entry(type_def.name.as_str()).or_default().push(type_def);
    }

    for type_def in model.declared_types() {
        let Some(group) = by_name.get(type_def.name.as_str()) else {
            continue;
        };
        if group.len() < 2 {
            continue;
        }
        if group.iter().any(|t| t.is_builtin) {
            ctx.error(
                format!(
                    "Type name \"{}\" is reserved for a built-in scalar type.",
                    type_def.name
                ),
                &type_def.location,
            );
        } else {
            ctx.error(
                format!("Duplicate type name: \"{}\".", type_def.name),
                &type_def.location,
            );
        }
    }
}

pub(super) fn validate_type(model: &Model, type_def: &TypeDef, ctx: &mut ValidationContext) {
    names::check_type_name(&type_def.name, &type_def.location, ctx);

    match type_def.kind {
        TypeKind::Scalar => {}
        TypeKind::Enum => check_enum_values(type_def, ctx),
        TypeKind::ValueObject
        | TypeKind::EntityExtension
        | TypeKind::ChildEntity
        | TypeKind::RootEntity => {
            check_declares_fields(model, type_def, ctx);
            check_duplicate_fields(model, type_def, ctx);
        }
    }

    check_key_field(model, type_def, ctx);
    check_type_permissions(model, type_def, ctx);
}

fn check_enum_values(type_def: &TypeDef, ctx: &mut ValidationContext) {
    if type_def.enum_values.is_empty() {
        ctx.error(
            format!("Enum type \"{}\" does not declare any values.", type_def.name),
            &type_def.location,
        );
        return;
    }
    let mut seen = HashSet::new();
    for value in &type_def.enum_values {
        if !seen.insert(value.as_str()) {
            ctx.error(
                format!("Duplicate enum value \"{}\" in \"{}\".", value, type_def.name),
                &type_def.location,
            );
        }
    }
}

fn check_declares_fields(model: &Model, type_def: &TypeDef, ctx: &mut ValidationContext) {
    if model.fields_of(type_def.id).all(|f| f.is_system_field) {
        ctx.error(
            format!("Object type \"{}\" does not declare any fields.", type_def.name),
            &type_def.location,
        );
    }
}

fn check_duplicate_fields(model: &Model, type_def: &TypeDef, ctx: &mut ValidationContext) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for field in model.fields_of(type_def.id) {
        *counts.entry(field.name.as_str()).or_default() += 1;
    }
    for field in model.fields_of(type_def.id) {
        if field.is_system_field {
            continue;
        }
        if counts.get(field.name.as_str()).copied().unwrap_or(0) > 1 {
            ctx.error(
                format!("Duplicate field name: \"{}\".", field.name),
                &field.location,
            );
        }
    }
}

fn check_key_field(model: &Model, type_def: &TypeDef, ctx: &mut ValidationContext) {
    let Some(key_name) = &type_def.key_field_name else {
        return;
    };
    if !type_def.is_root_entity() {
        ctx.error(
            "Only root entity types can declare a key field.",
            &type_def.location,
        );
        return;
    }
    let Some(key_field) = type_def.key_field else {
        ctx.error(
            format!(
                "Field \"{}\" declared as key field does not exist on type \"{}\".",
                key_name, type_def.name
            ),
            &type_def.location,
        );
        return;
    };
    let field = model.get_field(key_field);
    let is_scalar = model
        .field_type(key_field)
        .is_some_and(|t| t.kind.is_scalar_or_enum());
    if field.is_list || !is_scalar {
        ctx.error(
            "Only non-list scalar and enum fields can be used as key field.",
            &field.location,
        );
    }
}

fn check_type_permissions(model: &Model, type_def: &TypeDef, ctx: &mut ValidationContext) {
    match &type_def.permissions {
        Some(_) if !type_def.is_root_entity() => {
            ctx.error(
                "Permissions can only be specified on root entity types.",
                &type_def.location,
            );
        }
        Some(config) => {
            permissions::check_permissions(model, config, &type_def.location, ctx);
        }
        None if type_def.is_root_entity()
            && model.get_permission_profile(DEFAULT_PERMISSION_PROFILE).is_none() =>
        {
            ctx.error(
                format!(
                    "No permissions specified for root entity type \"{}\". Specify permissions explicitly or define a permission profile named \"{}\".",
                    type_def.name, DEFAULT_PERMISSION_PROFILE
                ),
                &type_def.location,
            );
        }
        None => {}
    }
}
