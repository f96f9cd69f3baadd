//! Input fields of create and update shapes.
//!
//! Every input field writes one model field. Its kind decides how the raw
//! value is coerced, which IR it emits against the object being written,
//! and which fields it touches.

use crate::coerce::{coerce_id, coerce_list, coerce_scalar, coerced_items};
use crate::{AcceptedValue, InputShape, InputTypeGenerator, MutationError, MutationResult};
use graft_core::{FieldId, Object, TypeId, Value};
use graft_model::{CalcOperator, FieldDef, Model, RelationSide, TypeDef, ID_FIELD};
use graft_query::{BinaryOperator, FieldAccess, QueryNode, VarGen};
use std::collections::HashMap;

/// How an input field writes its model field.
#[derive(Debug, Clone, PartialEq)]
pub enum InputFieldKind {
    /// Identity of the object to update. Never written.
    Filter,
    /// Scalar or enum setter.
    Scalar { type_id: TypeId, list: bool },
    /// Combines the supplied value with the stored one.
    Calc { type_id: TypeId, operator: CalcOperator },
    /// Embedded value object(s), replaced as a whole.
    ValueObject { type_id: TypeId, list: bool },
    CreateEntityExtension { type_id: TypeId },
    /// Partial update of an embedded entity extension.
    UpdateEntityExtension { type_id: TypeId },
    /// Initial children of a new object.
    CreateChildren { type_id: TypeId },
    AddChildren { type_id: TypeId },
    /// Partial updates of children, keyed by child identity.
    UpdateChildren { type_id: TypeId },
    RemoveChildren { type_id: TypeId },
    /// Key of a referenced root entity. The entity is not required to exist.
    Reference { key_type: TypeId },
    AddEdges { side: RelationSide },
    RemoveEdges { side: RelationSide },
    CreateAndAddEdges { side: RelationSide },
    /// Replace the edge of a to-one relation; null unlinks.
    SetEdge { side: RelationSide },
    CreateAndSetEdge { side: RelationSide },
}

impl InputFieldKind {
    /// Writes the whole field, so at most one such input may be used per field.
    fn replaces_value(&self) -> bool {
        matches!(
            self,
            InputFieldKind::Scalar { .. }
                | InputFieldKind::Calc { .. }
                | InputFieldKind::ValueObject { .. }
                | InputFieldKind::CreateEntityExtension { .. }
                | InputFieldKind::UpdateEntityExtension { .. }
                | InputFieldKind::CreateChildren { .. }
                | InputFieldKind::Reference { .. }
                | InputFieldKind::SetEdge { .. }
                | InputFieldKind::CreateAndSetEdge { .. }
        )
    }

    /// Plain setters named after their field. Declared defaults fill these on create.
    fn is_setter(&self) -> bool {
        matches!(
            self,
            InputFieldKind::Scalar { .. }
                | InputFieldKind::ValueObject { .. }
                | InputFieldKind::CreateEntityExtension { .. }
                | InputFieldKind::CreateChildren { .. }
                | InputFieldKind::Reference { .. }
        )
    }

    fn is_list_coercing(&self) -> bool {
        matches!(
            self,
            InputFieldKind::Scalar { list: true, .. }
                | InputFieldKind::ValueObject { list: true, .. }
                | InputFieldKind::CreateChildren { .. }
                | InputFieldKind::AddChildren { .. }
                | InputFieldKind::UpdateChildren { .. }
                | InputFieldKind::RemoveChildren { .. }
                | InputFieldKind::AddEdges { .. }
                | InputFieldKind::RemoveEdges { .. }
                | InputFieldKind::CreateAndAddEdges { .. }
        )
    }

    fn is_recursive(&self) -> bool {
        matches!(
            self,
            InputFieldKind::ValueObject { .. }
                | InputFieldKind::CreateEntityExtension { .. }
                | InputFieldKind::UpdateEntityExtension { .. }
                | InputFieldKind::CreateChildren { .. }
                | InputFieldKind::AddChildren { .. }
                | InputFieldKind::UpdateChildren { .. }
                | InputFieldKind::CreateAndAddEdges { .. }
                | InputFieldKind::CreateAndSetEdge { .. }
        )
    }

    fn accepts(&self, model: &Model) -> AcceptedValue {
        let scalar = |type_id: TypeId| AcceptedValue::scalar(&model.get_type(type_id).name);
        match self {
            InputFieldKind::Filter | InputFieldKind::SetEdge { .. } => AcceptedValue::Id,
            InputFieldKind::Scalar { type_id, list } => {
                if *list {
                    AcceptedValue::list(scalar(*type_id))
                } else {
                    scalar(*type_id)
                }
            }
            InputFieldKind::Calc { type_id, .. } => scalar(*type_id),
            InputFieldKind::Reference { key_type } => scalar(*key_type),
            InputFieldKind::ValueObject { type_id, list } => {
                let item = AcceptedValue::CreateInput { type_id: *type_id };
                if *list {
                    AcceptedValue::list(item)
                } else {
                    item
                }
            }
            InputFieldKind::CreateEntityExtension { type_id } => {
                AcceptedValue::CreateInput { type_id: *type_id }
            }
            InputFieldKind::UpdateEntityExtension { type_id } => {
                AcceptedValue::UpdateInput { type_id: *type_id }
            }
            InputFieldKind::CreateChildren { type_id } | InputFieldKind::AddChildren { type_id } => {
                AcceptedValue::list(AcceptedValue::CreateInput { type_id: *type_id })
            }
            InputFieldKind::UpdateChildren { type_id } => {
                AcceptedValue::list(AcceptedValue::UpdateInput { type_id: *type_id })
            }
            InputFieldKind::RemoveChildren { .. }
            | InputFieldKind::AddEdges { .. }
            | InputFieldKind::RemoveEdges { .. } => AcceptedValue::list(AcceptedValue::Id),
            InputFieldKind::CreateAndAddEdges { side } => {
                AcceptedValue::list(AcceptedValue::CreateInput {
                    type_id: side.target_type(),
                })
            }
            InputFieldKind::CreateAndSetEdge { side } => AcceptedValue::CreateInput {
                type_id: side.target_type(),
            },
        }
    }
}

/// A named input of a create or update shape.
#[derive(Debug, Clone, PartialEq)]
pub struct InputField {
    pub name: String,
    /// The model field this input writes (or, for a filter, identifies by).
    pub field: FieldId,
    pub kind: InputFieldKind,
    accepts: AcceptedValue,
}

impl InputField {
    pub(crate) fn new(
        model: &Model,
        name: impl Into<String>,
        field: FieldId,
        kind: InputFieldKind,
    ) -> Self {
        let accepts = kind.accepts(model);
        Self {
            name: name.into(),
            field,
            kind,
            accepts,
        }
    }

    pub fn is_filter(&self) -> bool {
        self.kind == InputFieldKind::Filter
    }

    /// A coerced value that writes nothing and is treated as absent.
    fn is_no_change(&self, value: &Value) -> bool {
        matches!(self.kind, InputFieldKind::CreateAndSetEdge { .. }) && value.is_null()
    }

    pub fn describe(&self) -> InputShape {
        InputShape {
            name: self.name.clone(),
            accepts: self.accepts.clone(),
            filter_only: self.is_filter(),
            list_coercing: self.kind.is_list_coercing(),
            recursive: self.kind.is_recursive(),
        }
    }

    /// Normalize a raw value.
    pub fn coerce(&self, gen: &InputTypeGenerator<'_>, value: &Value) -> MutationResult<Value> {
        let model = gen.model();
        let name = self.name.as_str();

        match &self.kind {
            InputFieldKind::Filter => coerce_id(name, value),
            InputFieldKind::Scalar { type_id, list } => {
                let type_def = model.get_type(*type_id);
                if *list {
                    coerce_list(name, value, |item| coerce_scalar(name, type_def, item))
                } else {
                    coerce_scalar(name, type_def, value)
                }
            }
            InputFieldKind::Calc { type_id, .. } => {
                let type_def = model.get_type(*type_id);
                if value.is_null() {
                    return Err(MutationError::invalid_value(name, &type_def.name, value.type_name()));
                }
                coerce_scalar(name, type_def, value)
            }
            InputFieldKind::Reference { key_type } => {
                coerce_scalar(name, model.get_type(*key_type), value)
            }
            InputFieldKind::ValueObject { type_id, list } => {
                let shape = gen.create_input(*type_id)?;
                if *list {
                    coerce_list(name, value, |item| shape.coerce(gen, item))
                } else if value.is_null() {
                    Ok(Value::Null)
                } else {
                    shape.coerce(gen, value)
                }
            }
            InputFieldKind::CreateEntityExtension { type_id } => {
                if value.is_null() {
                    return Ok(Value::Null);
                }
                gen.create_input(*type_id)?.coerce(gen, value)
            }
            InputFieldKind::UpdateEntityExtension { type_id } => {
                if value.is_null() {
                    return Ok(Value::Null);
                }
                gen.update_input(*type_id)?.coerce(gen, value)
            }
            InputFieldKind::CreateChildren { type_id } | InputFieldKind::AddChildren { type_id } => {
                let shape = gen.create_input(*type_id)?;
                coerce_list(name, value, |item| shape.coerce(gen, item))
            }
            InputFieldKind::UpdateChildren { type_id } => {
                let shape = gen.update_input(*type_id)?;
                let updates = coerce_list(name, value, |item| shape.coerce(gen, item))?;
                let mut seen = Vec::new();
                for update in coerced_items(&updates) {
                    if let Some(id) = shape.identity(update) {
                        if seen.contains(&id) {
                            let id = id.as_str().unwrap_or_default();
                            return Err(MutationError::duplicate_identity(name, id));
                        }
                        seen.push(id);
                    }
                }
                Ok(updates)
            }
            InputFieldKind::RemoveChildren { .. }
            | InputFieldKind::AddEdges { .. }
            | InputFieldKind::RemoveEdges { .. } => {
                coerce_list(name, value, |item| coerce_id(name, item))
            }
            InputFieldKind::CreateAndAddEdges { side } => {
                let shape = gen.create_input(side.target_type())?;
                coerce_list(name, value, |item| shape.coerce(gen, item))
            }
            InputFieldKind::SetEdge { .. } => {
                if value.is_null() {
                    return Ok(Value::Null);
                }
                coerce_id(name, value)
            }
            // Null leaves the edge unchanged; unlinking goes through the set-edge input
            InputFieldKind::CreateAndSetEdge { side } => {
                if value.is_null() {
                    return Ok(Value::Null);
                }
                gen.create_input(side.target_type())?.coerce(gen, value)
            }
        }
    }

    /// IR writing a coerced value to the object `current` evaluates to.
    pub fn mutation_nodes(
        &self,
        gen: &InputTypeGenerator<'_>,
        value: &Value,
        current: &QueryNode,
        vars: &mut VarGen,
    ) -> MutationResult<Vec<QueryNode>> {
        let model = gen.model();
        let field = model.get_field(self.field);
        let set = |value: QueryNode| QueryNode::set_field(field.id, &field.name, value);

        let nodes = match &self.kind {
            InputFieldKind::Filter => Vec::new(),
            InputFieldKind::Scalar { .. } | InputFieldKind::Reference { .. } => {
                vec![set(QueryNode::literal(value.clone()))]
            }
            InputFieldKind::Calc { operator, .. } => {
                let stored = QueryNode::field(current.clone(), field.id, &field.name);
                vec![set(QueryNode::binary(
                    BinaryOperator::from(*operator),
                    stored,
                    QueryNode::literal(value.clone()),
                ))]
            }
            InputFieldKind::ValueObject { type_id, list: false }
            | InputFieldKind::CreateEntityExtension { type_id } => {
                if value.is_null() {
                    vec![set(QueryNode::null())]
                } else {
                    vec![set(gen.create_input(*type_id)?.compile(gen, value, vars)?)]
                }
            }
            InputFieldKind::ValueObject { type_id, list: true }
            | InputFieldKind::CreateChildren { type_id } => {
                let items = create_all(gen, *type_id, value, vars)?;
                vec![set(QueryNode::List { items })]
            }
            InputFieldKind::UpdateEntityExtension { type_id } => {
                if value.is_null() {
                    vec![set(QueryNode::null())]
                } else {
                    let stored = FieldAccess::new(model).compile(field.id, current, vars)?;
                    let update = gen.update_input(*type_id)?.compile(gen, value, stored, vars)?;
                    vec![set(update)]
                }
            }
            InputFieldKind::AddChildren { type_id } => {
                if coerced_items(value).is_empty() {
                    return Ok(Vec::new());
                }
                let stored = FieldAccess::new(model).compile(field.id, current, vars)?;
                let items = create_all(gen, *type_id, value, vars)?;
                vec![set(QueryNode::binary(
                    BinaryOperator::Concat,
                    stored,
                    QueryNode::List { items },
                ))]
            }
            InputFieldKind::UpdateChildren { type_id } => {
                if coerced_items(value).is_empty() {
                    return Ok(Vec::new());
                }
                let stored = FieldAccess::new(model).compile(field.id, current, vars)?;
                let shape = gen.update_input(*type_id)?;
                let child = vars.fresh("child");

                let mut updates = Vec::new();
                for update in coerced_items(value) {
                    let id = update.get(ID_FIELD).cloned().unwrap_or_default();
                    let node = shape.compile(gen, update, QueryNode::variable(&child), vars)?;
                    updates.push((id, node));
                }
                // Children without a matching update are kept unchanged
                let inner = updates.into_iter().rev().fold(
                    QueryNode::variable(&child),
                    |otherwise, (id, node)| {
                        QueryNode::conditional(
                            QueryNode::eq(
                                QueryNode::entity_id(QueryNode::variable(&child)),
                                QueryNode::literal(id),
                            ),
                            node,
                            otherwise,
                        )
                    },
                );
                vec![set(QueryNode::TransformList {
                    list: Box::new(stored),
                    item: child,
                    filter: None,
                    max_count: None,
                    inner: Some(Box::new(inner)),
                })]
            }
            InputFieldKind::RemoveChildren { .. } => {
                if coerced_items(value).is_empty() {
                    return Ok(Vec::new());
                }
                let stored = FieldAccess::new(model).compile(field.id, current, vars)?;
                let child = vars.fresh("child");
                let removed = QueryNode::binary(
                    BinaryOperator::In,
                    QueryNode::entity_id(QueryNode::variable(&child)),
                    QueryNode::literal(value.clone()),
                );
                vec![set(QueryNode::TransformList {
                    list: Box::new(stored),
                    item: child,
                    filter: Some(Box::new(QueryNode::not(removed))),
                    max_count: None,
                    inner: None,
                })]
            }
            InputFieldKind::AddEdges { side } => {
                if coerced_items(value).is_empty() {
                    return Ok(Vec::new());
                }
                vec![QueryNode::AddEdges {
                    side: *side,
                    source: Box::new(current.clone()),
                    targets: Box::new(QueryNode::literal(value.clone())),
                }]
            }
            InputFieldKind::RemoveEdges { side } => {
                if coerced_items(value).is_empty() {
                    return Ok(Vec::new());
                }
                vec![QueryNode::RemoveEdges {
                    side: *side,
                    source: Box::new(current.clone()),
                    targets: Box::new(QueryNode::literal(value.clone())),
                }]
            }
            InputFieldKind::CreateAndAddEdges { side } => {
                if coerced_items(value).is_empty() {
                    return Ok(Vec::new());
                }
                let items = create_all(gen, side.target_type(), value, vars)?;
                vec![QueryNode::AddEdges {
                    side: *side,
                    source: Box::new(current.clone()),
                    targets: Box::new(QueryNode::List { items }),
                }]
            }
            InputFieldKind::SetEdge { side } => {
                let target = if value.is_null() {
                    None
                } else {
                    Some(Box::new(QueryNode::literal(value.clone())))
                };
                vec![QueryNode::SetEdge {
                    side: *side,
                    source: Box::new(current.clone()),
                    target,
                }]
            }
            InputFieldKind::CreateAndSetEdge { side } => {
                if value.is_null() {
                    return Ok(Vec::new());
                }
                let created = gen
                    .create_input(side.target_type())?
                    .compile(gen, value, vars)?;
                vec![QueryNode::SetEdge {
                    side: *side,
                    source: Box::new(current.clone()),
                    target: Some(Box::new(created)),
                }]
            }
        };
        Ok(nodes)
    }

    /// Fields a coerced value touches, nested ones included.
    pub fn affected_fields(
        &self,
        gen: &InputTypeGenerator<'_>,
        value: &Value,
    ) -> MutationResult<Vec<FieldId>> {
        if self.is_filter() || self.is_no_change(value) {
            return Ok(Vec::new());
        }
        let mut fields = vec![self.field];
        let has_edges = !coerced_items(value).is_empty();

        match &self.kind {
            InputFieldKind::ValueObject { type_id, list } => {
                let shape = gen.create_input(*type_id)?;
                for item in items(value, *list) {
                    fields.extend(shape.affected_fields(gen, item)?);
                }
            }
            InputFieldKind::CreateEntityExtension { type_id } => {
                let shape = gen.create_input(*type_id)?;
                for item in items(value, false) {
                    fields.extend(shape.affected_fields(gen, item)?);
                }
            }
            InputFieldKind::UpdateEntityExtension { type_id } => {
                let shape = gen.update_input(*type_id)?;
                for item in items(value, false) {
                    fields.extend(shape.affected_fields(gen, item)?);
                }
            }
            InputFieldKind::CreateChildren { type_id } | InputFieldKind::AddChildren { type_id } => {
                let shape = gen.create_input(*type_id)?;
                for item in items(value, true) {
                    fields.extend(shape.affected_fields(gen, item)?);
                }
            }
            InputFieldKind::UpdateChildren { type_id } => {
                let shape = gen.update_input(*type_id)?;
                for item in items(value, true) {
                    fields.extend(shape.affected_fields(gen, item)?);
                }
            }
            InputFieldKind::AddEdges { side } | InputFieldKind::RemoveEdges { side } => {
                if has_edges {
                    fields.extend(side.target_field());
                }
            }
            InputFieldKind::SetEdge { side } => {
                fields.extend(side.target_field());
            }
            InputFieldKind::CreateAndAddEdges { side } => {
                if has_edges {
                    fields.extend(side.target_field());
                }
                let shape = gen.create_input(side.target_type())?;
                for item in items(value, true) {
                    fields.extend(shape.affected_fields(gen, item)?);
                }
            }
            InputFieldKind::CreateAndSetEdge { side } => {
                fields.extend(side.target_field());
                let shape = gen.create_input(side.target_type())?;
                for item in items(value, false) {
                    fields.extend(shape.affected_fields(gen, item)?);
                }
            }
            InputFieldKind::Filter
            | InputFieldKind::Scalar { .. }
            | InputFieldKind::Calc { .. }
            | InputFieldKind::RemoveChildren { .. }
            | InputFieldKind::Reference { .. } => {}
        }
        Ok(fields)
    }
}

fn items(value: &Value, list: bool) -> Vec<&Value> {
    if list {
        coerced_items(value).iter().collect()
    } else if value.is_null() {
        Vec::new()
    } else {
        vec![value]
    }
}

fn create_all(
    gen: &InputTypeGenerator<'_>,
    type_id: TypeId,
    value: &Value,
    vars: &mut VarGen,
) -> MutationResult<Vec<QueryNode>> {
    let shape = gen.create_input(type_id)?;
    coerced_items(value)
        .iter()
        .map(|item| shape.compile(gen, item, vars))
        .collect()
}

// ==================== Shape Helpers ====================

/// Target type of a field that is about to get inputs.
pub(crate) fn resolve_target<'m>(model: &'m Model, field: &FieldDef) -> MutationResult<&'m TypeDef> {
    model
        .field_type(field.id)
        .ok_or_else(|| MutationError::unknown_field_type(model.qualified_name(field.id), &field.type_name))
}

pub(crate) fn resolve_side(model: &Model, field: &FieldDef) -> MutationResult<RelationSide> {
    model
        .relation_side(field.id)
        .ok_or_else(|| MutationError::unresolved_relation(model.qualified_name(field.id)))
}

/// The setter of a reference field, accepting the key type of the referenced entity.
pub(crate) fn reference_input(
    model: &Model,
    field: &FieldDef,
    target: &TypeDef,
) -> MutationResult<InputField> {
    let key_type = target
        .key_field
        .and_then(|key| model.get_field(key).resolved_type)
        .filter(|_| target.is_root_entity())
        .ok_or_else(|| MutationError::unexpected_field_shape(model.qualified_name(field.id)))?;
    Ok(InputField::new(
        model,
        &field.name,
        field.id,
        InputFieldKind::Reference { key_type },
    ))
}

/// Coerce an input object against a list of input fields.
///
/// Rejects non-objects, unknown input names and several inputs replacing the
/// same field. Absent inputs stay absent.
pub(crate) fn coerce_object(
    gen: &InputTypeGenerator<'_>,
    shape_name: &str,
    fields: &[InputField],
    value: &Value,
) -> MutationResult<Object> {
    let Some(raw) = value.as_object() else {
        return Err(MutationError::not_an_object(shape_name, value.type_name()));
    };

    let mut coerced = Object::new();
    for (name, raw_value) in raw {
        let input = fields
            .iter()
            .find(|f| &f.name == name)
            .ok_or_else(|| MutationError::unknown_input(shape_name, name))?;
        let value = input.coerce(gen, raw_value)?;
        if !input.is_no_change(&value) {
            coerced.insert(name.clone(), value);
        }
    }

    let mut writers: HashMap<FieldId, Vec<&str>> = HashMap::new();
    for input in fields {
        if input.kind.replaces_value() && coerced.contains_key(&input.name) {
            writers.entry(input.field).or_default().push(&input.name);
        }
    }
    // Report in declaration order
    for input in fields {
        if let Some(names) = writers.get(&input.field) {
            if names.len() > 1 {
                let field = gen.model().get_field(input.field);
                return Err(MutationError::conflicting_inputs(shape_name, &field.name, names));
            }
        }
    }

    Ok(coerced)
}

/// Insert declared defaults for absent setters.
pub(crate) fn fill_defaults(model: &Model, fields: &[InputField], coerced: &mut Object) {
    for input in fields {
        if !input.kind.is_setter() || coerced.contains_key(&input.name) {
            continue;
        }
        if let Some(default) = &model.get_field(input.field).default_value {
            coerced.insert(input.name.clone(), default.clone());
        }
    }
}

/// IR for every present input, in shape order.
pub(crate) fn compile_changes(
    gen: &InputTypeGenerator<'_>,
    fields: &[InputField],
    value: &Value,
    current: &QueryNode,
    vars: &mut VarGen,
) -> MutationResult<Vec<QueryNode>> {
    let mut changes = Vec::new();
    for input in fields {
        if let Some(input_value) = value.get(&input.name) {
            changes.extend(input.mutation_nodes(gen, input_value, current, vars)?);
        }
    }
    Ok(changes)
}

/// Affected fields of every present input, without duplicates.
pub(crate) fn collect_affected(
    gen: &InputTypeGenerator<'_>,
    fields: &[InputField],
    value: &Value,
) -> MutationResult<Vec<FieldId>> {
    let mut affected = Vec::new();
    for input in fields {
        if let Some(input_value) = value.get(&input.name) {
            for field in input.affected_fields(gen, input_value)? {
                if !affected.contains(&field) {
                    affected.push(field);
                }
            }
        }
    }
    Ok(affected)
}
