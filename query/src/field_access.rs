//! Field read compilation.
//!
//! Given a field and an expression for the object it is read from, produce
//! the IR that reads it. Rules apply in priority order:
//!
//! 1. list relation: follow the edges of the field's relation side
//! 2. to-one relation: follow the edges and take the first
//! 3. reference: look up the referenced entity by key, short-circuiting a null key
//! 4. identity of an entity: the dedicated identity accessor
//! 5. entity extension: the stored object, or `{}` if it is not an object
//! 6. plain list: the stored list, or `[]` if it is not a list
//! 7. anything else: the stored value

use crate::{QueryError, QueryNode, QueryResult, ValueShape, VarGen};
use graft_core::{FieldId, TypeId};
use graft_model::{FieldDef, Model, TypeDef, TypeKind};

/// Compiles read access to fields of a model.
pub struct FieldAccess<'m> {
    model: &'m Model,
}

impl<'m> FieldAccess<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self { model }
    }

    /// Compile a read of `field` on the object `source` evaluates to.
    pub fn compile(
        &self,
        field_id: FieldId,
        source: &QueryNode,
        vars: &mut VarGen,
    ) -> QueryResult<QueryNode> {
        let field = self.model.get_field(field_id);
        let target = self.target_type(field)?;

        tracing::trace!(field = %self.model.qualified_name(field_id), "compiling field access");

        if field.is_relation {
            let side = self
                .model
                .relation_side(field_id)
                .ok_or_else(|| QueryError::unresolved_relation(self.model.qualified_name(field_id)))?;
            let edges = QueryNode::follow_edge(side, source.clone());
            return Ok(if field.is_list {
                edges
            } else {
                QueryNode::first_of_list(edges)
            });
        }

        if field.is_reference {
            return self.compile_reference(field, target, source, vars);
        }

        let declaring = self.model.get_type(field.declaring_type);
        if field.is_identity_field() && declaring.kind.is_entity() {
            return Ok(QueryNode::entity_id(source.clone()));
        }

        let raw = QueryNode::field(source.clone(), field.id, &field.name);
        if target.kind == TypeKind::EntityExtension && !field.is_list {
            return Ok(QueryNode::conditional(
                QueryNode::type_check(raw.clone(), ValueShape::Object),
                raw,
                QueryNode::empty_object(),
            ));
        }
        if field.is_list {
            return Ok(QueryNode::conditional(
                QueryNode::type_check(raw.clone(), ValueShape::List),
                raw,
                QueryNode::empty_list(),
            ));
        }
        Ok(raw)
    }

    /// Compile an object holding every field of `type_id` read from `source`.
    pub fn compile_object(
        &self,
        type_id: TypeId,
        source: &QueryNode,
        vars: &mut VarGen,
    ) -> QueryResult<QueryNode> {
        let mut properties = Vec::new();
        for field in self.model.fields_of(type_id) {
            properties.push((field.name.clone(), self.compile(field.id, source, vars)?));
        }
        Ok(QueryNode::Object { properties })
    }

    /// Compile a listing of all entities of a root entity type, each
    /// projected to an object of its fields.
    pub fn compile_listing(&self, type_id: TypeId, vars: &mut VarGen) -> QueryResult<QueryNode> {
        let item = vars.fresh("entity");
        let inner = self.compile_object(type_id, &QueryNode::variable(&item), vars)?;
        Ok(QueryNode::TransformList {
            list: Box::new(QueryNode::entities(type_id)),
            item,
            filter: None,
            max_count: None,
            inner: Some(Box::new(inner)),
        })
    }

    fn compile_reference(
        &self,
        field: &FieldDef,
        target: &TypeDef,
        source: &QueryNode,
        vars: &mut VarGen,
    ) -> QueryResult<QueryNode> {
        let key_field = match (target.is_root_entity(), target.key_field) {
            (true, Some(key_field)) => key_field,
            _ => {
                return Err(QueryError::invalid_reference_target(
                    self.model.qualified_name(field.id),
                    &target.name,
                ))
            }
        };

        let stored_key = QueryNode::field(source.clone(), field.id, &field.name);
        let candidate = vars.fresh("candidate");
        let candidate_key = self.compile(key_field, &QueryNode::variable(&candidate), vars)?;

        // The non-null check only helps index selection; null never equals a stored key
        let filter = QueryNode::and(
            QueryNode::eq(candidate_key.clone(), stored_key.clone()),
            QueryNode::neq(candidate_key, QueryNode::null()),
        );
        let lookup = QueryNode::first_of_list(QueryNode::TransformList {
            list: Box::new(QueryNode::entities(target.id)),
            item: candidate,
            filter: Some(Box::new(filter)),
            max_count: Some(1),
            inner: None,
        });

        Ok(QueryNode::conditional(
            QueryNode::eq(stored_key, QueryNode::null()),
            QueryNode::null(),
            lookup,
        ))
    }

    fn target_type(&self, field: &FieldDef) -> QueryResult<&'m TypeDef> {
        self.model.field_type(field.id).ok_or_else(|| {
            QueryError::unknown_field_type(self.model.qualified_name(field.id), &field.type_name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Variable;
    use graft_model::{FieldConfig, ModelBuilder};
    use pretty_assertions::assert_eq;

    fn movie_model() -> (Model, TypeId) {
        let mut builder = ModelBuilder::new();
        let movie = builder
            .add_type("Movie", TypeKind::RootEntity)
            .field(FieldConfig::new("title", "String"))
            .field(FieldConfig::new("tags", "String").list())
            .field(FieldConfig::new("release", "Release"))
            .field(FieldConfig::new("director", "Person").relation())
            .field(FieldConfig::new("actors", "Person").list().relation())
            .field(FieldConfig::new("studio", "Studio").reference())
            .done()
            .unwrap();
        builder
            .add_type("Release", TypeKind::EntityExtension)
            .field(FieldConfig::new("year", "Int"))
            .done()
            .unwrap();
        builder
            .add_type("Person", TypeKind::RootEntity)
            .field(FieldConfig::new("name", "String"))
            .done()
            .unwrap();
        builder
            .add_type("Studio", TypeKind::RootEntity)
            .field(FieldConfig::new("code", "String"))
            .key_field("code")
            .done()
            .unwrap();
        (builder.build().unwrap(), movie)
    }

    fn source() -> QueryNode {
        QueryNode::variable(&Variable {
            id: 100,
            label: "movie".to_string(),
        })
    }

    fn compile(model: &Model, type_id: TypeId, name: &str) -> QueryNode {
        let field = model.field_by_name(type_id, name).unwrap();
        FieldAccess::new(model)
            .compile(field, &source(), &mut VarGen::new())
            .unwrap()
    }

    // ========== TEST: list_relation_follows_edges ==========
    #[test]
    fn test_list_relation_follows_edges() {
        // GIVEN Movie.actors, a one-sided list relation
        let (model, movie) = movie_model();
        let actors = model.field_by_name(movie, "actors").unwrap();

        // WHEN compiling the read
        let node = compile(&model, movie, "actors");

        // THEN edges are followed unwrapped, from the from-side
        let side = model.relation_side(actors).unwrap();
        assert!(side.is_from_side);
        assert_eq!(node, QueryNode::follow_edge(side, source()));
    }

    // ========== TEST: to_one_relation_takes_first ==========
    #[test]
    fn test_to_one_relation_takes_first() {
        let (model, movie) = movie_model();
        let director = model.field_by_name(movie, "director").unwrap();

        let node = compile(&model, movie, "director");

        let side = model.relation_side(director).unwrap();
        assert_eq!(
            node,
            QueryNode::first_of_list(QueryNode::follow_edge(side, source()))
        );
    }

    // ========== TEST: reference_short_circuits_null_key ==========
    #[test]
    fn test_reference_short_circuits_null_key() {
        // GIVEN Movie.studio referencing Studio by code
        let (model, movie) = movie_model();
        let studio_field = model.field_by_name(movie, "studio").unwrap();
        let studio = model.get_type_by_name("Studio").unwrap();
        let code = model.field_by_name(studio.id, "code").unwrap();

        // WHEN compiling the read
        let node = compile(&model, movie, "studio");

        // THEN a null key yields null, otherwise a lookup capped at one result
        let stored = QueryNode::field(source(), studio_field, "studio");
        let candidate = Variable {
            id: 0,
            label: "candidate".to_string(),
        };
        let candidate_key = QueryNode::field(QueryNode::variable(&candidate), code, "code");
        let expected = QueryNode::conditional(
            QueryNode::eq(stored.clone(), QueryNode::null()),
            QueryNode::null(),
            QueryNode::first_of_list(QueryNode::TransformList {
                list: Box::new(QueryNode::entities(studio.id)),
                item: candidate,
                filter: Some(Box::new(QueryNode::and(
                    QueryNode::eq(candidate_key.clone(), stored),
                    QueryNode::neq(candidate_key, QueryNode::null()),
                ))),
                max_count: Some(1),
                inner: None,
            }),
        );
        assert_eq!(node, expected);

        // AND the null branch performs no lookup
        let QueryNode::Conditional { then, otherwise, .. } = &node else {
            panic!("expected conditional");
        };
        assert!(!then.reads_entities());
        assert!(otherwise.reads_entities());
    }

    // ========== TEST: identity_uses_entity_id ==========
    #[test]
    fn test_identity_uses_entity_id() {
        let (model, movie) = movie_model();

        let node = compile(&model, movie, "id");

        assert_eq!(node, QueryNode::entity_id(source()));
    }

    // ========== TEST: entity_extension_is_guarded ==========
    #[test]
    fn test_entity_extension_is_guarded() {
        let (model, movie) = movie_model();
        let release = model.field_by_name(movie, "release").unwrap();

        let node = compile(&model, movie, "release");

        let raw = QueryNode::field(source(), release, "release");
        assert_eq!(
            node,
            QueryNode::conditional(
                QueryNode::type_check(raw.clone(), ValueShape::Object),
                raw,
                QueryNode::empty_object(),
            )
        );
    }

    // ========== TEST: plain_list_is_guarded ==========
    #[test]
    fn test_plain_list_is_guarded() {
        let (model, movie) = movie_model();
        let tags = model.field_by_name(movie, "tags").unwrap();

        let node = compile(&model, movie, "tags");

        let raw = QueryNode::field(source(), tags, "tags");
        assert_eq!(
            node,
            QueryNode::conditional(
                QueryNode::type_check(raw.clone(), ValueShape::List),
                raw,
                QueryNode::empty_list(),
            )
        );
    }

    // ========== TEST: scalar_is_direct_read ==========
    #[test]
    fn test_scalar_is_direct_read() {
        let (model, movie) = movie_model();
        let title = model.field_by_name(movie, "title").unwrap();

        assert_eq!(
            compile(&model, movie, "title"),
            QueryNode::field(source(), title, "title")
        );
    }

    // ========== TEST: unknown_type_is_fault ==========
    #[test]
    fn test_unknown_type_is_fault() {
        let mut builder = ModelBuilder::new();
        let movie = builder
            .add_type("Movie", TypeKind::RootEntity)
            .field(FieldConfig::new("director", "Person").relation())
            .done()
            .unwrap();
        let model = builder.build().unwrap();
        let director = model.field_by_name(movie, "director").unwrap();

        let result = FieldAccess::new(&model).compile(director, &source(), &mut VarGen::new());

        assert_eq!(
            result,
            Err(QueryError::unknown_field_type("Movie.director", "Person"))
        );
    }

    // ========== TEST: keyless_reference_is_fault ==========
    #[test]
    fn test_keyless_reference_is_fault() {
        let mut builder = ModelBuilder::new();
        let order = builder
            .add_type("Order", TypeKind::RootEntity)
            .field(FieldConfig::new("customer", "Customer").reference())
            .done()
            .unwrap();
        builder
            .add_type("Customer", TypeKind::RootEntity)
            .field(FieldConfig::new("name", "String"))
            .done()
            .unwrap();
        let model = builder.build().unwrap();
        let customer = model.field_by_name(order, "customer").unwrap();

        let result = FieldAccess::new(&model).compile(customer, &source(), &mut VarGen::new());

        assert!(matches!(
            result,
            Err(QueryError::InvalidReferenceTarget { .. })
        ));
    }

    // ========== TEST: listing_projects_every_field ==========
    #[test]
    fn test_listing_projects_every_field() {
        let (model, movie) = movie_model();

        let node = FieldAccess::new(&model)
            .compile_listing(movie, &mut VarGen::new())
            .unwrap();

        let QueryNode::TransformList { inner: Some(inner), .. } = node else {
            panic!("expected listing transform");
        };
        let QueryNode::Object { properties } = *inner else {
            panic!("expected object projection");
        };
        let names: Vec<&str> = properties.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec!["id", "createdAt", "updatedAt", "title", "tags", "release", "director", "actors", "studio"]
        );
    }
}
