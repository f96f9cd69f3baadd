//! Field-level rules.

use super::{names, permissions};
use crate::relation::inverse_candidates;
use crate::{operators_for_type, FieldDef, Model, TypeDef, TypeKind, ValidationContext};

pub(super) fn validate_field(model: &Model, field: &FieldDef, ctx: &mut ValidationContext) {
    names::check_field_name(&field.name, &field.location, ctx);

    if field.is_reference && field.is_relation {
        ctx.error(
            "A field cannot be both a reference and a relation.",
            &field.location,
        );
    }
    if field.inverse_of.is_some() && !field.is_relation {
        ctx.error(
            "An inverse field can only be declared on relation fields.",
            &field.location,
        );
    }
    if let Some(config) = &field.permissions {
        permissions::check_permissions(model, config, &field.location, ctx);
    }
    check_default_value(field, ctx);

    // Everything below dereferences the target type
    let Some(target) = model.field_type(field.id) else {
        ctx.error(
            format!("Type \"{}\" not found.", field.type_name),
            &field.location,
        );
        if field.is_list && !field.calc_operators.is_empty() {
            ctx.error("Calc mutations are not supported on list fields.", &field.location);
        }
        return;
    };
    let declaring = model.get_type(field.declaring_type);

    if !field.is_reference && !field.is_relation {
        check_embedding(field, declaring, target, ctx);
    }
    if field.is_relation {
        check_relation(model, field, declaring, target, ctx);
    }
    if field.is_reference {
        check_reference(model, field, target, ctx);
    }
    check_calc_mutations(field, target, ctx);
}

fn check_embedding(field: &FieldDef, declaring: &TypeDef, target: &TypeDef, ctx: &mut ValidationContext) {
    match target.kind {
        TypeKind::RootEntity => {
            ctx.error(
                format!(
                    "Type \"{}\" is a root entity type and cannot be embedded. Consider declaring the field as a reference or relation.",
                    target.name
                ),
                &field.location,
            );
        }
        TypeKind::EntityExtension => {
            if declaring.is_value_object() {
                ctx.error(
                    format!(
                        "Type \"{}\" is an entity extension type and cannot be used within value object types. Change \"{}\" to an entity extension type or use a value object type for \"{}\".",
                        target.name, declaring.name, field.name
                    ),
                    &field.location,
                );
            }
            if field.is_list {
                ctx.error(
                    format!(
                        "Type \"{}\" is an entity extension type and cannot be used in a list. Change the field type to a child entity type or a value object type.",
                        target.name
                    ),
                    &field.location,
                );
            }
        }
        TypeKind::ChildEntity => {
            if declaring.is_value_object() {
                ctx.error(
                    format!(
                        "Type \"{}\" is a child entity type and cannot be used within value object types. Change \"{}\" to an entity extension type or use a value object type for \"{}\".",
                        target.name, declaring.name, field.name
                    ),
                    &field.location,
                );
            }
            if !field.is_list {
                ctx.error(
                    format!(
                        "Type \"{}\" is a child entity type and can only be used in a list. Change the field type to \"[{}]\", or use an entity extension or value object type instead.",
                        target.name, target.name
                    ),
                    &field.location,
                );
            }
        }
        TypeKind::Scalar | TypeKind::Enum | TypeKind::ValueObject => {}
    }
}

fn check_relation(
    model: &Model,
    field: &FieldDef,
    declaring: &TypeDef,
    target: &TypeDef,
    ctx: &mut ValidationContext,
) {
    let mut valid = true;
    if !declaring.is_root_entity() {
        ctx.error(
            "Relations can only be defined on root entity types. Consider using a reference instead.",
            &field.location,
        );
        valid = false;
    }
    if !target.is_root_entity() {
        ctx.error(
            format!(
                "Type \"{}\" cannot be used as relation target because it is not a root entity type.",
                target.name
            ),
            &field.location,
        );
        valid = false;
    }
    if !valid {
        return;
    }

    let this_name = format!("{}.{}", declaring.name, field.name);

    if let Some(inverse_name) = &field.inverse_of {
        let inverse_qualified = format!("{}.{}", target.name, inverse_name);
        let Some(inverse_id) = model.field_by_name(target.id, inverse_name) else {
            ctx.error(
                format!(
                    "Field \"{}\" used as inverse field of \"{}\" does not exist.",
                    inverse_qualified, this_name
                ),
                &field.location,
            );
            return;
        };
        let inverse = model.get_field(inverse_id);
        if !inverse.is_relation {
            ctx.error(
                format!(
                    "Field \"{}\" used as inverse field of \"{}\" is not a relation.",
                    inverse_qualified, this_name
                ),
                &field.location,
            );
        } else if inverse.resolved_type != Some(declaring.id) {
            ctx.error(
                format!(
                    "Field \"{}\" used as inverse field of \"{}\" has type \"{}\" but should be of type \"{}\".",
                    inverse_qualified, this_name, inverse.type_name, declaring.name
                ),
                &field.location,
            );
        } else if inverse.inverse_of.is_some() {
            ctx.error(
                format!(
                    "Field \"{}\" used as inverse field of \"{}\" should not declare an inverse field itself.",
                    inverse_qualified, this_name
                ),
                &field.location,
            );
        }
        return;
    }

    let candidates = inverse_candidates(model, field.id);
    if candidates.len() > 1 {
        let names = candidates
            .iter()
            .map(|id| format!("\"{}\"", model.qualified_name(*id)))
            .collect::<Vec<_>>()
            .join(", ");
        for candidate in &candidates {
            ctx.error(
                format!(
                    "Multiple fields ({}) declare inverseOf to \"{}\".",
                    names, this_name
                ),
                &model.get_field(*candidate).location,
            );
        }
        return;
    }
    if candidates.is_empty() {
        let unpaired: Vec<&FieldDef> = model
            .fields_of(target.id)
            .filter(|other| {
                other.id != field.id
                    && other.is_relation
                    && other.inverse_of.is_none()
                    && other.resolved_type == Some(declaring.id)
            })
            .collect();
        if let [other] = unpaired.as_slice() {
            ctx.warn(
                format!(
                    "This field and \"{}.{}\" define separate relations. Consider declaring one of them as the inverse of the other.",
                    target.name, other.name
                ),
                &field.location,
            );
        }
    }
}

fn check_reference(model: &Model, field: &FieldDef, target: &TypeDef, ctx: &mut ValidationContext) {
    if !target.is_root_entity() {
        ctx.error(
            format!(
                "\"{}\" cannot be used as reference type because it is not a root entity type.",
                target.name
            ),
            &field.location,
        );
    } else if model.key_field(target.id).is_none() {
        ctx.error(
            format!(
                "\"{}\" cannot be used as reference type because it does not have a key field.",
                target.name
            ),
            &field.location,
        );
    }
    if field.is_list {
        ctx.error(
            "References are not supported with list types. Consider wrapping the reference in a child entity or value object type.",
            &field.location,
        );
    }
}

fn check_default_value(field: &FieldDef, ctx: &mut ValidationContext) {
    if field.default_value.is_none() {
        return;
    }
    if field.is_relation {
        ctx.error("Default values are not supported on relations.", &field.location);
    } else {
        ctx.info(
            "Take care, there are no type checks for default values yet.",
            &field.location,
        );
    }
}

fn check_calc_mutations(field: &FieldDef, target: &TypeDef, ctx: &mut ValidationContext) {
    if field.calc_operators.is_empty() {
        return;
    }
    if field.is_list {
        ctx.error("Calc mutations are not supported on list fields.", &field.location);
        return;
    }
    let allowed = operators_for_type(&target.name);
    for operator in &field.calc_operators {
        if operator.supports(&target.name) {
            continue;
        }
        let hint = if allowed.is_empty() {
            "no calc mutation operators are supported on this type".to_string()
        } else {
            let names = allowed
                .iter()
                .map(|op| format!("\"{}\"", op.name()))
                .collect::<Vec<_>>()
                .join(", ");
            format!("supported operators: {}", names)
        };
        ctx.error(
            format!(
                "Calc mutation operator \"{}\" is not supported on type \"{}\" ({}).",
                operator.name(),
                target.name,
                hint
            ),
            &field.location,
        );
    }
}
