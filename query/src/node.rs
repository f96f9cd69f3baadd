//! Query IR nodes.
//!
//! The IR is a closed expression tree. Read nodes evaluate to a value; write
//! nodes are only valid inside the `changes` of a `CreateObject` or
//! `UpdateObject`, where they apply to the object bound by that node.

use crate::Variable;
use graft_core::{FieldId, TypeId, Value};
use graft_model::{CalcOperator, RelationSide};
use serde::Serialize;

/// An IR node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryNode {
    // ==================== Read ====================
    /// All stored entities of a root entity type.
    Entities { type_id: TypeId },

    /// Stored value of a field on an object.
    Field {
        source: Box<QueryNode>,
        field: FieldId,
        name: String,
    },

    /// Identity of an entity. Identity is not ordinary field storage.
    EntityId { source: Box<QueryNode> },

    Conditional {
        condition: Box<QueryNode>,
        then: Box<QueryNode>,
        otherwise: Box<QueryNode>,
    },

    /// Whether a runtime value has the given shape.
    TypeCheck {
        value: Box<QueryNode>,
        shape: ValueShape,
    },

    /// Filter, cap and map a list. `item` is bound to each element in
    /// `filter` and `inner`; without `inner` the element itself is kept.
    TransformList {
        list: Box<QueryNode>,
        item: Variable,
        filter: Option<Box<QueryNode>>,
        max_count: Option<usize>,
        inner: Option<Box<QueryNode>>,
    },

    /// First element of a list, null for an empty list.
    FirstOfList { list: Box<QueryNode> },

    /// Entities connected to `source` along a relation side.
    FollowEdge {
        side: RelationSide,
        source: Box<QueryNode>,
    },

    BinaryOp {
        op: BinaryOperator,
        lhs: Box<QueryNode>,
        rhs: Box<QueryNode>,
    },

    UnaryOp {
        op: UnaryOperator,
        operand: Box<QueryNode>,
    },

    Literal { value: Value },

    Variable { variable: Variable },

    /// Object built from named properties, in order.
    Object { properties: Vec<(String, QueryNode)> },

    List { items: Vec<QueryNode> },

    /// A new unique identity.
    GenerateId,

    // ==================== Write ====================
    /// Store a value in a field of the bound object.
    SetField {
        field: FieldId,
        name: String,
        value: Box<QueryNode>,
    },

    /// Link `source` to every entity id in `targets`.
    AddEdges {
        side: RelationSide,
        source: Box<QueryNode>,
        targets: Box<QueryNode>,
    },

    /// Unlink `source` from every entity id in `targets`.
    RemoveEdges {
        side: RelationSide,
        source: Box<QueryNode>,
        targets: Box<QueryNode>,
    },

    /// Replace the edge of a to-one side; `None` removes it.
    SetEdge {
        side: RelationSide,
        source: Box<QueryNode>,
        target: Option<Box<QueryNode>>,
    },

    /// Create an entity or embedded object. Evaluates to the new object
    /// (for root entities, to its id). `binding` refers to the new object
    /// inside `changes`.
    CreateObject {
        type_id: TypeId,
        binding: Variable,
        changes: Vec<QueryNode>,
    },

    /// Apply `changes` to the object `target` evaluates to, bound as `binding`.
    /// Evaluates to the updated object.
    UpdateObject {
        target: Box<QueryNode>,
        binding: Variable,
        changes: Vec<QueryNode>,
    },

    DeleteObject {
        type_id: TypeId,
        target: Box<QueryNode>,
    },
}

/// Runtime value shape inspected by `TypeCheck`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueShape {
    Object,
    List,
    Null,
    Scalar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryOperator {
    Equal,
    Unequal,
    And,
    Or,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    /// String concatenation, current value first.
    Append,
    /// String concatenation, supplied value first.
    Prepend,
    /// List membership of the left operand.
    In,
    /// List concatenation.
    Concat,
}

impl From<CalcOperator> for BinaryOperator {
    fn from(op: CalcOperator) -> Self {
        match op {
            CalcOperator::Multiply => BinaryOperator::Multiply,
            CalcOperator::Divide => BinaryOperator::Divide,
            CalcOperator::Add => BinaryOperator::Add,
            CalcOperator::Subtract => BinaryOperator::Subtract,
            CalcOperator::Modulo => BinaryOperator::Modulo,
            CalcOperator::Append => BinaryOperator::Append,
            CalcOperator::Prepend => BinaryOperator::Prepend,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UnaryOperator {
    Not,
}

// ==================== Constructors ====================

impl QueryNode {
    pub fn null() -> Self {
        QueryNode::Literal { value: Value::Null }
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        QueryNode::Literal {
            value: value.into(),
        }
    }

    pub fn variable(variable: &Variable) -> Self {
        QueryNode::Variable {
            variable: variable.clone(),
        }
    }

    pub fn entities(type_id: TypeId) -> Self {
        QueryNode::Entities { type_id }
    }

    pub fn field(source: QueryNode, field: FieldId, name: impl Into<String>) -> Self {
        QueryNode::Field {
            source: Box::new(source),
            field,
            name: name.into(),
        }
    }

    pub fn entity_id(source: QueryNode) -> Self {
        QueryNode::EntityId {
            source: Box::new(source),
        }
    }

    pub fn conditional(condition: QueryNode, then: QueryNode, otherwise: QueryNode) -> Self {
        QueryNode::Conditional {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn type_check(value: QueryNode, shape: ValueShape) -> Self {
        QueryNode::TypeCheck {
            value: Box::new(value),
            shape,
        }
    }

    pub fn first_of_list(list: QueryNode) -> Self {
        QueryNode::FirstOfList {
            list: Box::new(list),
        }
    }

    pub fn follow_edge(side: RelationSide, source: QueryNode) -> Self {
        QueryNode::FollowEdge {
            side,
            source: Box::new(source),
        }
    }

    pub fn binary(op: BinaryOperator, lhs: QueryNode, rhs: QueryNode) -> Self {
        QueryNode::BinaryOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn eq(lhs: QueryNode, rhs: QueryNode) -> Self {
        Self::binary(BinaryOperator::Equal, lhs, rhs)
    }

    pub fn neq(lhs: QueryNode, rhs: QueryNode) -> Self {
        Self::binary(BinaryOperator::Unequal, lhs, rhs)
    }

    pub fn and(lhs: QueryNode, rhs: QueryNode) -> Self {
        Self::binary(BinaryOperator::And, lhs, rhs)
    }

    pub fn not(operand: QueryNode) -> Self {
        QueryNode::UnaryOp {
            op: UnaryOperator::Not,
            operand: Box::new(operand),
        }
    }

    pub fn empty_object() -> Self {
        QueryNode::Object {
            properties: Vec::new(),
        }
    }

    pub fn empty_list() -> Self {
        QueryNode::List { items: Vec::new() }
    }

    pub fn set_field(field: FieldId, name: impl Into<String>, value: QueryNode) -> Self {
        QueryNode::SetField {
            field,
            name: name.into(),
            value: Box::new(value),
        }
    }

    // ==================== Inspection ====================

    /// Whether this node writes.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            QueryNode::SetField { .. }
                | QueryNode::AddEdges { .. }
                | QueryNode::RemoveEdges { .. }
                | QueryNode::SetEdge { .. }
                | QueryNode::CreateObject { .. }
                | QueryNode::UpdateObject { .. }
                | QueryNode::DeleteObject { .. }
        )
    }

    /// Whether this node or any descendant reads from the entity store.
    pub fn reads_entities(&self) -> bool {
        let mut found = false;
        self.walk(&mut |node| {
            if matches!(node, QueryNode::Entities { .. } | QueryNode::FollowEdge { .. }) {
                found = true;
            }
        });
        found
    }

    /// Visit this node and all descendants, parents first.
    pub fn walk(&self, visit: &mut impl FnMut(&QueryNode)) {
        visit(self);
        match self {
            QueryNode::Entities { .. }
            | QueryNode::Literal { .. }
            | QueryNode::Variable { .. }
            | QueryNode::GenerateId => {}
            QueryNode::Field { source, .. }
            | QueryNode::EntityId { source }
            | QueryNode::FollowEdge { source, .. } => source.walk(visit),
            QueryNode::Conditional {
                condition,
                then,
                otherwise,
            } => {
                condition.walk(visit);
                then.walk(visit);
                otherwise.walk(visit);
            }
            QueryNode::TypeCheck { value, .. } | QueryNode::SetField { value, .. } => {
                value.walk(visit)
            }
            QueryNode::TransformList {
                list,
                filter,
                inner,
                ..
            } => {
                list.walk(visit);
                if let Some(filter) = filter {
                    filter.walk(visit);
                }
                if let Some(inner) = inner {
                    inner.walk(visit);
                }
            }
            QueryNode::FirstOfList { list } => list.walk(visit),
            QueryNode::BinaryOp { lhs, rhs, .. } => {
                lhs.walk(visit);
                rhs.walk(visit);
            }
            QueryNode::UnaryOp { operand, .. } => operand.walk(visit),
            QueryNode::Object { properties } => {
                for (_, value) in properties {
                    value.walk(visit);
                }
            }
            QueryNode::List { items } => {
                for item in items {
                    item.walk(visit);
                }
            }
            QueryNode::AddEdges {
                source, targets, ..
            }
            | QueryNode::RemoveEdges {
                source, targets, ..
            } => {
                source.walk(visit);
                targets.walk(visit);
            }
            QueryNode::SetEdge { source, target, .. } => {
                source.walk(visit);
                if let Some(target) = target {
                    target.walk(visit);
                }
            }
            QueryNode::CreateObject { changes, .. } => {
                for change in changes {
                    change.walk(visit);
                }
            }
            QueryNode::UpdateObject {
                target, changes, ..
            } => {
                target.walk(visit);
                for change in changes {
                    change.walk(visit);
                }
            }
            QueryNode::DeleteObject { target, .. } => target.walk(visit),
        }
    }
}
