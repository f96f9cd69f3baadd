//! Memoized input shape generation and whole-mutation compilation.

use crate::{create, update, CreateInputType, MutationError, MutationResult, UpdateInputType};
use graft_core::{FieldId, TypeId, Value};
use graft_model::Model;
use graft_query::{QueryNode, VarGen};
use std::sync::{Arc, OnceLock};

/// A compiled mutation and the fields it writes.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledMutation {
    pub node: QueryNode,
    pub affected_fields: Vec<FieldId>,
}

/// Generates create and update input shapes for a model.
///
/// Shapes are generated on first request and cached per type, so repeated
/// requests return the same `Arc`. Nested shapes are only referenced by
/// `TypeId`, which keeps recursive types from recursing during generation.
pub struct InputTypeGenerator<'m> {
    model: &'m Model,
    create: Vec<OnceLock<Arc<CreateInputType>>>,
    update: Vec<OnceLock<Arc<UpdateInputType>>>,
    update_all: Vec<OnceLock<Arc<UpdateInputType>>>,
}

fn slots<T>(count: usize) -> Vec<OnceLock<T>> {
    (0..count).map(|_| OnceLock::new()).collect()
}

/// Generation failures are not cached; a failing type fails on every request.
fn memoized<T>(
    slot: &OnceLock<Arc<T>>,
    generate: impl FnOnce() -> MutationResult<T>,
) -> MutationResult<Arc<T>> {
    if let Some(shape) = slot.get() {
        return Ok(Arc::clone(shape));
    }
    let shape = Arc::new(generate()?);
    Ok(Arc::clone(slot.get_or_init(|| shape)))
}

impl<'m> InputTypeGenerator<'m> {
    pub fn new(model: &'m Model) -> Self {
        let count = model.types().count();
        Self {
            model,
            create: slots(count),
            update: slots(count),
            update_all: slots(count),
        }
    }

    pub fn model(&self) -> &'m Model {
        self.model
    }

    /// Only root entities are stored on their own and can be addressed by id.
    fn require_root_entity(&self, type_id: TypeId) -> MutationResult<()> {
        let type_def = self.model.get_type(type_id);
        if type_def.is_root_entity() {
            Ok(())
        } else {
            Err(MutationError::not_a_root_entity(&type_def.name))
        }
    }

    pub fn create_input(&self, type_id: TypeId) -> MutationResult<Arc<CreateInputType>> {
        memoized(&self.create[type_id.index()], || create::generate(self.model, type_id))
    }

    pub fn update_input(&self, type_id: TypeId) -> MutationResult<Arc<UpdateInputType>> {
        memoized(&self.update[type_id.index()], || {
            update::generate(self.model, type_id, false)
        })
    }

    /// Update shape without identity filter, for updating many objects at once.
    pub fn update_all_input(&self, type_id: TypeId) -> MutationResult<Arc<UpdateInputType>> {
        memoized(&self.update_all[type_id.index()], || {
            update::generate(self.model, type_id, true)
        })
    }

    // ==================== Mutations ====================

    /// Compile the creation of an object from a raw input.
    pub fn compile_create(
        &self,
        type_id: TypeId,
        input: &Value,
        vars: &mut VarGen,
    ) -> MutationResult<CompiledMutation> {
        let shape = self.create_input(type_id)?;
        let value = shape.coerce(self, input)?;
        Ok(CompiledMutation {
            node: shape.compile(self, &value, vars)?,
            affected_fields: shape.affected_fields(self, &value)?,
        })
    }

    /// Compile the update of the root entity identified by the input's `id`.
    pub fn compile_update(
        &self,
        type_id: TypeId,
        input: &Value,
        vars: &mut VarGen,
    ) -> MutationResult<CompiledMutation> {
        self.require_root_entity(type_id)?;
        let shape = self.update_input(type_id)?;
        let value = shape.coerce(self, input)?;
        let id = shape
            .identity(&value)
            .cloned()
            .ok_or_else(|| MutationError::missing_identity(&shape.name, graft_model::ID_FIELD))?;
        let target = entity_by_id(type_id, id, vars);
        Ok(CompiledMutation {
            node: shape.compile(self, &value, target, vars)?,
            affected_fields: shape.affected_fields(self, &value)?,
        })
    }

    /// Compile the same update applied to every entity `targets` evaluates to.
    pub fn compile_update_all(
        &self,
        type_id: TypeId,
        input: &Value,
        targets: QueryNode,
        vars: &mut VarGen,
    ) -> MutationResult<CompiledMutation> {
        let shape = self.update_all_input(type_id)?;
        let value = shape.coerce(self, input)?;
        let item = vars.fresh("item");
        let update = shape.compile(self, &value, QueryNode::variable(&item), vars)?;
        Ok(CompiledMutation {
            node: QueryNode::TransformList {
                list: Box::new(targets),
                item,
                filter: None,
                max_count: None,
                inner: Some(Box::new(update)),
            },
            affected_fields: shape.affected_fields(self, &value)?,
        })
    }

    /// Compile the deletion of the root entity with the given id.
    pub fn compile_delete(
        &self,
        type_id: TypeId,
        id: &Value,
        vars: &mut VarGen,
    ) -> MutationResult<CompiledMutation> {
        self.require_root_entity(type_id)?;
        let id = crate::coerce::coerce_id(graft_model::ID_FIELD, id)?;
        Ok(CompiledMutation {
            node: QueryNode::DeleteObject {
                type_id,
                target: Box::new(entity_by_id(type_id, id, vars)),
            },
            affected_fields: Vec::new(),
        })
    }
}

/// The entity of a root entity type with the given identity, or null.
fn entity_by_id(type_id: TypeId, id: Value, vars: &mut VarGen) -> QueryNode {
    let candidate = vars.fresh("candidate");
    let filter = QueryNode::eq(
        QueryNode::entity_id(QueryNode::variable(&candidate)),
        QueryNode::literal(id),
    );
    QueryNode::first_of_list(QueryNode::TransformList {
        list: Box::new(QueryNode::entities(type_id)),
        item: candidate,
        filter: Some(Box::new(filter)),
        max_count: Some(1),
        inner: None,
    })
}
