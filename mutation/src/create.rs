//! Create input shapes.

use crate::input::{
    coerce_object, collect_affected, compile_changes, fill_defaults, reference_input,
    resolve_side, resolve_target,
};
use crate::{InputField, InputFieldKind, InputShape, InputTypeGenerator, MutationError, MutationResult};
use graft_core::{FieldId, TypeId, Value};
use graft_model::{capitalize, Model, TypeKind, ID_FIELD};
use graft_query::{QueryNode, VarGen};

/// Inputs accepted when creating an object of one type.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateInputType {
    pub type_id: TypeId,
    pub name: String,
    fields: Vec<InputField>,
}

impl CreateInputType {
    /// Input fields, in field declaration order.
    pub fn fields(&self) -> &[InputField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&InputField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn describe(&self) -> Vec<InputShape> {
        self.fields.iter().map(InputField::describe).collect()
    }

    /// Coerce a raw input object and fill declared defaults of absent fields.
    pub fn coerce(&self, gen: &InputTypeGenerator<'_>, value: &Value) -> MutationResult<Value> {
        let mut coerced = coerce_object(gen, &self.name, &self.fields, value)?;
        fill_defaults(gen.model(), &self.fields, &mut coerced);
        Ok(Value::Object(coerced))
    }

    /// Compile a coerced input object to a `CreateObject` node.
    pub fn compile(
        &self,
        gen: &InputTypeGenerator<'_>,
        value: &Value,
        vars: &mut VarGen,
    ) -> MutationResult<QueryNode> {
        let model = gen.model();
        let binding = vars.fresh("new");
        let mut changes = Vec::new();

        // Child identity is stored with the child; root identity is assigned by the store
        if model.get_type(self.type_id).kind == TypeKind::ChildEntity {
            if let Some(id_field) = model.field_by_name(self.type_id, ID_FIELD) {
                changes.push(QueryNode::set_field(id_field, ID_FIELD, QueryNode::GenerateId));
            }
        }
        changes.extend(compile_changes(
            gen,
            &self.fields,
            value,
            &QueryNode::variable(&binding),
            vars,
        )?);

        Ok(QueryNode::CreateObject {
            type_id: self.type_id,
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

pub(crate) fn generate(model: &Model, type_id: TypeId) -> MutationResult<CreateInputType> {
    let type_def = model.get_type(type_id);
    if !type_def.kind.is_object_type() {
        return Err(MutationError::not_an_object_type(&type_def.name));
    }

    let mut fields = Vec::new();
    for field in model.fields_of(type_id) {
        // System fields are maintained by the store
        if field.is_system_field {
            continue;
        }
        let target = resolve_target(model, field)?;

        if field.is_relation {
            let side = resolve_side(model, field)?;
            let capitalized = capitalize(&field.name);
            if field.is_list {
                fields.push(InputField::new(model, &field.name, field.id, InputFieldKind::AddEdges { side }));
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

        let kind = match (target.kind, field.is_list) {
            (TypeKind::Scalar | TypeKind::Enum, list) => InputFieldKind::Scalar {
                type_id: target.id,
                list,
            },
            (TypeKind::ValueObject, list) => InputFieldKind::ValueObject {
                type_id: target.id,
                list,
            },
            (TypeKind::EntityExtension, false) => {
                InputFieldKind::CreateEntityExtension { type_id: target.id }
            }
            (TypeKind::ChildEntity, true) => InputFieldKind::CreateChildren { type_id: target.id },
            _ => return Err(MutationError::unexpected_field_shape(model.qualified_name(field.id))),
        };
        fields.push(InputField::new(model, &field.name, field.id, kind));
    }

    tracing::debug!(type_name = %type_def.name, inputs = fields.len(), "generated create input");

    Ok(CreateInputType {
        type_id,
        name: format!("Create{}Input", type_def.name),
        fields,
    })
}
