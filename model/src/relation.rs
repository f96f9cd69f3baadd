//! Relation resolution.
//!
//! A relation is never declared directly. It is derived from a relation field
//! and, if present, the field on the target type that is paired with it. Both
//! fields of a pair resolve to the same `Relation`; each of them sees it
//! through its own `RelationSide`.

use crate::Model;
use graft_core::{FieldId, TypeId};
use serde::Serialize;

/// A graph edge definition between two root entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Relation {
    pub from_type: TypeId,
    pub from_field: FieldId,
    pub to_type: TypeId,
    /// The inverse field; None for one-sided relations.
    pub to_field: Option<FieldId>,
}

impl Relation {
    pub fn from_side(&self) -> RelationSide {
        RelationSide {
            relation: *self,
            is_from_side: true,
        }
    }

    pub fn to_side(&self) -> RelationSide {
        RelationSide {
            relation: *self,
            is_from_side: false,
        }
    }

    pub fn is_one_sided(&self) -> bool {
        self.to_field.is_none()
    }
}

/// One directional view of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RelationSide {
    pub relation: Relation,
    pub is_from_side: bool,
}

impl RelationSide {
    /// The type edges are followed from.
    pub fn source_type(&self) -> TypeId {
        if self.is_from_side {
            self.relation.from_type
        } else {
            self.relation.to_type
        }
    }

    /// The field this side is accessed through; None on the to-side of a one-sided relation.
    pub fn source_field(&self) -> Option<FieldId> {
        if self.is_from_side {
            Some(self.relation.from_field)
        } else {
            self.relation.to_field
        }
    }

    /// The type edges lead to.
    pub fn target_type(&self) -> TypeId {
        if self.is_from_side {
            self.relation.to_type
        } else {
            self.relation.from_type
        }
    }

    /// The field on the target type that views the opposite side.
    pub fn target_field(&self) -> Option<FieldId> {
        if self.is_from_side {
            self.relation.to_field
        } else {
            Some(self.relation.from_field)
        }
    }

    /// The same relation, seen from the other end.
    pub fn opposite(&self) -> RelationSide {
        RelationSide {
            relation: self.relation,
            is_from_side: !self.is_from_side,
        }
    }
}

/// Derive the relation of a relation field.
///
/// Returns None if the field is not a relation, its type does not resolve, the
/// explicit inverse is missing, or several fields claim to be its inverse.
pub(crate) fn resolve_relation(model: &Model, field_id: FieldId) -> Option<Relation> {
    let field = model.get_field(field_id);
    if !field.is_relation {
        return None;
    }
    let target_type = field.resolved_type?;

    if let Some(inverse_name) = &field.inverse_of {
        // This field is the to-side; the relation belongs to the inverse field.
        let inverse = model.field_by_name(target_type, inverse_name)?;
        if !model.get_field(inverse).is_relation {
            return None;
        }
        return Some(Relation {
            from_type: target_type,
            from_field: inverse,
            to_type: field.declaring_type,
            to_field: Some(field_id),
        });
    }

    let candidates = inverse_candidates(model, field_id);
    match candidates.as_slice() {
        [] => Some(Relation {
            from_type: field.declaring_type,
            from_field: field_id,
            to_type: target_type,
            to_field: None,
        }),
        [inverse] => Some(Relation {
            from_type: field.declaring_type,
            from_field: field_id,
            to_type: target_type,
            to_field: Some(*inverse),
        }),
        _ => None,
    }
}

/// Fields on the target type that declare themselves the inverse of `field_id`.
pub(crate) fn inverse_candidates(model: &Model, field_id: FieldId) -> Vec<FieldId> {
    let field = model.get_field(field_id);
    let Some(target_type) = field.resolved_type else {
        return Vec::new();
    };
    model
        .fields_of(target_type)
        .filter(|other| {
            other.is_relation
                && other.inverse_of.as_deref() == Some(field.name.as_str())
                && other.resolved_type == Some(field.declaring_type)
        })
        .map(|other| other.id)
        .collect()
}
