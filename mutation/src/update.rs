//! Update input shapes.

use crate::input::{
    coerce_object, collect_affected, compile_changes, reference_input, resolve_side,
    resolve_target,
};
use crate::{InputField, InputFieldKind, InputShape, InputTypeGenerator, MutationError, MutationResult};
use graft_core::{FieldId, TypeId, Value};
use graft_model::{capitalize, Model, TypeKind};
use graft_query::{QueryNode, VarGen};

/// Inputs accepted when updating an object of one type.
///
/// The update-all variant applies the same changes to many objects and has
/// no identity filter.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateInputType {
    pub type_id: TypeId,
    pub name: String,
    pub update_all: bool,
    fields: Vec<InputField>,
}

impl UpdateInputType {
    /// Input fields, in field declaration order.
    pub fn fields(&self) -> &[InputField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&InputField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The identity filter, if this shape locates its target itself.
    pub fn filter(&self) -> Option<&InputField> {
        self.fields.iter().find(|f| f.is_filter())
    }

    pub fn describe(&self) -> Vec<InputShape> {
        self.fields.iter().map(InputField::describe).collect()
    }

    /// Coerce a raw input object. The identity filter is mandatory.
    pub fn coerce(&self, gen: &InputTypeGenerator<'_>, value: &Value) -> MutationResult<Value> {
        let coerced = coerce_object(gen, &self.name, &self.fields, value)?;
        if let Some(filter) = self.filter() {
            if !coerced.contains_key(&filter.name) {
                return Err(MutationError::missing_identity(&self.name, &filter.name));
            }
        }
        Ok(Value::Object(coerced))
    }

    /// The identity a coerced input object addresses.
    pub fn identity<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        value.get(&self.filter()?.name)
    }

    /// Compile a coerced input object to an `UpdateObject` node on `target`.
    pub fn compile(
        &self,
        gen: &InputTypeGenerator<'_>,
        value: &Value,
        target: QueryNode,
        vars: &mut VarGen,
    ) -> MutationResult<QueryNode> {
        let binding = vars.fresh("target");
        let changes = compile_changes(
            gen,
            &self.fields,
            value,
            &QueryNode::variable(&binding),
            vars,
        )?;
        Ok(QueryNode::UpdateObject {
            target: Box::new(target),
            binding,
            changes,
        })
    }

    pub fn affected_fields(
        &self,
        gen: &InputTypeGenerator<'_>,
        value: &Value,
    ) -> MutationResult<Vec<FieldId>> {
        collect_affected(gen, &self.fields, value)
    }
}

pub(crate) fn generate(
    model: &Model,
    type_id: TypeId,
    update_all: bool,
) -> MutationResult<UpdateInputType> {
    let type_def = model.get_type(type_id);
    if !type_def.kind.is_object_type() {
        return Err(MutationError::not_an_object_type(&type_def.name));
    }

    let mut fields = Vec::new();
    for field in model.fields_of(type_id) {
        if field.is_system_field {
            if field.is_identity_field() && type_def.kind.is_entity() && !update_all {
                fields.push(InputField::new(model, &field.name, field.id, InputFieldKind::Filter));
            }
            continue;
        }
        let target = resolve_target(model, field)?;
        let capitalized = capitalize(&field.name);

        if field.is_relation {
            let side = resolve_side(model, field)?;
            if field.is_list {
                fields.push(InputField::new(
                    model,
                    format!("add{}", capitalized),
                    field.id,
                    InputFieldKind::AddEdges { side },
                ));
                fields.push(InputField::new(
                    model,
                    format!("remove{}", capitalized),
                    field.id,
                    InputFieldKind::RemoveEdges { side },
                ));
                fields.push(InputField::new(
                    model,
                    format!("createAndAdd{}", capitalized),
                    field.id,
                    InputFieldKind::CreateAndAddEdges { side },
                ));
            } else {
                fields.push(InputField::new(model, &field.name, field.id, InputFieldKind::SetEdge { side }));
                fields.push(InputField::new(
                    model,
                    format!("create{}", capitalized),
                    field.id,
                    InputFieldKind::CreateAndSetEdge { side },
                ));
            }
            continue;
        }
        if field.is_reference {
            fields.push(reference_input(model, field, target)?);
            continue;
        }

        match (target.kind, field.is_list) {
            (TypeKind::Scalar | TypeKind::Enum, false) => {
                fields.push(InputField::new(
                    model,
                    &field.name,
                    field.id,
                    InputFieldKind::Scalar {
                        type_id: target.id,
                        list: false,
                    },
                ));
                for operator in &field.calc_operators {
                    fields.push(InputField::new(
                        model,
                        operator.input_name(&field.name),
                        field.id,
                        InputFieldKind::Calc {
                            type_id: target.id,
                            operator: *operator,
                        },
                    ));
                }
            }
            (TypeKind::Scalar | TypeKind::Enum, true) if field.calc_operators.is_empty() => {
                fields.push(InputField::new(
                    model,
                    &field.name,
                    field.id,
                    InputFieldKind::Scalar {
                        type_id: target.id,
                        list: true,
                    },
                ));
            }
            (TypeKind::ValueObject, list) => {
                fields.push(InputField::new(
                    model,
                    &field.name,
                    field.id,
                    InputFieldKind::ValueObject {
                        type_id: target.id,
                        list,
                    },
                ));
            }
            (TypeKind::EntityExtension, false) => {
                fields.push(InputField::new(
                    model,
                    &field.name,
                    field.id,
                    InputFieldKind::UpdateEntityExtension { type_id: target.id },
                ));
            }
            (TypeKind::ChildEntity, true) => {
                for (prefix, kind) in [
                    ("add", InputFieldKind::AddChildren { type_id: target.id }),
                    ("update", InputFieldKind::UpdateChildren { type_id: target.id }),
                    ("remove", InputFieldKind::RemoveChildren { type_id: target.id }),
                ] {
                    fields.push(InputField::new(
                        model,
                        format!("{}{}", prefix, capitalized),
                        field.id,
                        kind,
                    ));
                }
            }
            _ => return Err(MutationError::unexpected_field_shape(model.qualified_name(field.id))),
        }
    }

    tracing::debug!(
        type_name = %type_def.name,
        update_all,
        inputs = fields.len(),
        "generated update input"
    );

    let prefix = if update_all { "UpdateAll" } else { "Update" };
    Ok(UpdateInputType {
        type_id,
        name: format!("{}{}Input", prefix, type_def.name),
        update_all,
        fields,
    })
}
