use crate::{
    AcceptedValue, InputFieldKind, InputShape, InputTypeGenerator, MutationError, UpdateInputType,
};
use graft_core::{object, FieldId, TypeId, Value};
use graft_model::{FieldConfig, Model, ModelBuilder, TypeKind};
use graft_query::{BinaryOperator, QueryNode, UnaryOperator, VarGen};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn order_model() -> (Model, TypeId) {
    let mut builder = ModelBuilder::new();
    let order = builder
        .add_type("Order", TypeKind::RootEntity)
        .field(FieldConfig::new("status", "String").with_default("NEW"))
        .field(
            FieldConfig::new("quantity", "Int")
                .calc_mutation("ADD")
                .calc_mutation("MULTIPLY"),
        )
        .field(FieldConfig::new("tags", "String").list())
        .field(FieldConfig::new("address", "Address"))
        .field(FieldConfig::new("meta", "Meta"))
        .field(FieldConfig::new("items", "Item").list())
        .field(FieldConfig::new("customer", "Customer").reference())
        .field(FieldConfig::new("products", "Product").list().relation())
        .field(FieldConfig::new("invoice", "Invoice").relation())
        .done()
        .unwrap();
    builder
        .add_type("Address", TypeKind::ValueObject)
        .field(FieldConfig::new("street", "String"))
        .field(FieldConfig::new("country", "String").with_default("DE"))
        .done()
        .unwrap();
    builder
        .add_type("Meta", TypeKind::EntityExtension)
        .field(FieldConfig::new("note", "String"))
        .done()
        .unwrap();
    builder
        .add_type("Item", TypeKind::ChildEntity)
        .field(FieldConfig::new("sku", "String"))
        .field(FieldConfig::new("amount", "Int").calc_mutation("ADD"))
        .done()
        .unwrap();
    builder
        .add_type("Customer", TypeKind::RootEntity)
        .field(FieldConfig::new("name", "String"))
        .key_field("id")
        .done()
        .unwrap();
    builder
        .add_type("Product", TypeKind::RootEntity)
        .field(FieldConfig::new("name", "String"))
        .field(FieldConfig::new("orders", "Order").list().inverse_of("products"))
        .done()
        .unwrap();
    builder
        .add_type("Invoice", TypeKind::RootEntity)
        .field(FieldConfig::new("number", "String"))
        .done()
        .unwrap();
    (builder.build().unwrap(), order)
}

fn field(model: &Model, type_name: &str, name: &str) -> FieldId {
    let type_id = model.get_type_by_name(type_name).unwrap().id;
    model.field_by_name(type_id, name).unwrap()
}

fn names(fields: &[crate::InputField]) -> Vec<&str> {
    fields.iter().map(|f| f.name.as_str()).collect()
}

fn current() -> QueryNode {
    QueryNode::variable(&graft_query::Variable {
        id: 99,
        label: "current".to_string(),
    })
}

// ========== TEST: update_input_names ==========
#[test]
fn test_update_input_names() {
    // GIVEN an Order with every kind of field
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);

    // WHEN generating its update shape
    let shape = gen.update_input(order).unwrap();

    // THEN inputs follow field order with per-kind names
    assert_eq!(shape.name, "UpdateOrderInput");
    assert_eq!(
        names(shape.fields()),
        vec![
            "id",
            "status",
            "quantity",
            "increaseByQuantity",
            "multiplyWithQuantity",
            "tags",
            "address",
            "meta",
            "addItems",
            "updateItems",
            "removeItems",
            "customer",
            "addProducts",
            "removeProducts",
            "createAndAddProducts",
            "invoice",
            "createInvoice",
        ]
    );
}

// ========== TEST: update_all_omits_identity ==========
#[test]
fn test_update_all_omits_identity() {
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);

    let shape = gen.update_all_input(order).unwrap();

    assert_eq!(shape.name, "UpdateAllOrderInput");
    assert!(shape.filter().is_none());
    assert_eq!(names(shape.fields())[0], "status");
}

// ========== TEST: create_input_names ==========
#[test]
fn test_create_input_names() {
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);

    let shape = gen.create_input(order).unwrap();

    // THEN system fields and calc inputs are omitted
    assert_eq!(
        names(shape.fields()),
        vec![
            "status",
            "quantity",
            "tags",
            "address",
            "meta",
            "items",
            "customer",
            "products",
            "createAndAddProducts",
            "invoice",
            "createInvoice",
        ]
    );
}

// ========== TEST: shapes_are_memoized ==========
#[test]
fn test_shapes_are_memoized() {
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);

    let first = gen.update_input(order).unwrap();
    let second = gen.update_input(order).unwrap();
    let create_first = gen.create_input(order).unwrap();
    let create_second = gen.create_input(order).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&create_first, &create_second));
    assert!(!Arc::ptr_eq(&first, &gen.update_all_input(order).unwrap()));
}

// ========== TEST: shapes_are_shareable ==========
#[test]
fn test_shapes_are_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Model>();
    assert_send_sync::<InputTypeGenerator<'static>>();
    assert_send_sync::<Arc<UpdateInputType>>();
}

// ========== TEST: null_list_normalizes_and_is_affected ==========
#[test]
fn test_null_list_normalizes_and_is_affected() {
    // GIVEN an update setting tags to null
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();
    let input = object! { "id" => "o1", "tags" => Value::Null };

    // WHEN coercing
    let value = shape.coerce(&gen, &input).unwrap();

    // THEN the null becomes an empty list and tags is still touched
    assert_eq!(value.get("tags"), Some(&Value::empty_list()));
    assert_eq!(
        shape.affected_fields(&gen, &value).unwrap(),
        vec![field(&model, "Order", "tags")]
    );
}

// ========== TEST: identity_is_filter_only ==========
#[test]
fn test_identity_is_filter_only() {
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();
    let filter = shape.filter().unwrap();

    assert_eq!(
        filter.describe(),
        InputShape {
            name: "id".to_string(),
            accepts: AcceptedValue::Id,
            filter_only: true,
            list_coercing: false,
            recursive: false,
        }
    );
    let id = Value::from("o1");
    assert!(filter
        .mutation_nodes(&gen, &id, &current(), &mut VarGen::new())
        .unwrap()
        .is_empty());
    assert!(filter.affected_fields(&gen, &id).unwrap().is_empty());
}

// ========== TEST: describe_reports_list_and_nesting ==========
#[test]
fn test_describe_reports_list_and_nesting() {
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();
    let item = model.get_type_by_name("Item").unwrap().id;

    let update_items = shape.field("updateItems").unwrap().describe();
    let tags = shape.field("tags").unwrap().describe();

    assert_eq!(
        update_items.accepts,
        AcceptedValue::list(AcceptedValue::UpdateInput { type_id: item })
    );
    assert!(update_items.recursive && update_items.list_coercing);
    assert_eq!(tags.accepts, AcceptedValue::list(AcceptedValue::scalar("String")));
    assert!(tags.list_coercing && !tags.recursive);
}

// ========== TEST: calc_reads_current_value ==========
#[test]
fn test_calc_reads_current_value() {
    // GIVEN increaseByQuantity
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();
    let input = shape.field("increaseByQuantity").unwrap();
    let quantity = field(&model, "Order", "quantity");

    // WHEN compiling a value of 5
    let nodes = input
        .mutation_nodes(&gen, &Value::Int(5), &current(), &mut VarGen::new())
        .unwrap();

    // THEN the stored value is combined rather than overwritten
    assert_eq!(
        nodes,
        vec![QueryNode::set_field(
            quantity,
            "quantity",
            QueryNode::binary(
                BinaryOperator::Add,
                QueryNode::field(current(), quantity, "quantity"),
                QueryNode::literal(5),
            ),
        )]
    );
}

// ========== TEST: setter_and_calc_conflict ==========
#[test]
fn test_setter_and_calc_conflict() {
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();
    let input = object! { "id" => "o1", "quantity" => 3i64, "increaseByQuantity" => 2i64 };

    let result = shape.coerce(&gen, &input);

    assert_eq!(
        result,
        Err(MutationError::conflicting_inputs(
            "UpdateOrderInput",
            "quantity",
            &["quantity", "increaseByQuantity"],
        ))
    );
}

// ========== TEST: malformed_update_inputs ==========
#[test]
fn test_malformed_update_inputs() {
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();

    assert_eq!(
        shape.coerce(&gen, &object! { "id" => "o1", "color" => "red" }),
        Err(MutationError::unknown_input("UpdateOrderInput", "color"))
    );
    assert_eq!(
        shape.coerce(&gen, &object! { "status" => "PAID" }),
        Err(MutationError::missing_identity("UpdateOrderInput", "id"))
    );
    assert_eq!(
        shape.coerce(&gen, &Value::from("o1")),
        Err(MutationError::not_an_object("UpdateOrderInput", "String"))
    );
    assert_eq!(
        shape.coerce(&gen, &object! { "id" => "o1", "addProducts" => "p1" }),
        Err(MutationError::not_a_list("addProducts", "String"))
    );
}

// ========== TEST: reference_accepts_key_type ==========
#[test]
fn test_reference_accepts_key_type() {
    // GIVEN Order.customer referencing Customer, keyed by id
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();
    let customer = field(&model, "Order", "customer");

    let inputs: Vec<_> = shape.fields().iter().filter(|f| f.field == customer).collect();

    // THEN exactly one setter accepting an ID
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].describe().accepts, AcceptedValue::scalar("ID"));

    // AND any key is accepted without looking the customer up
    let value = inputs[0].coerce(&gen, &Value::Int(404)).unwrap();
    let nodes = inputs[0]
        .mutation_nodes(&gen, &value, &current(), &mut VarGen::new())
        .unwrap();
    assert_eq!(
        nodes,
        vec![QueryNode::set_field(customer, "customer", QueryNode::literal("404"))]
    );
    assert!(!nodes[0].reads_entities());
}

// ========== TEST: value_objects_coerce_recursively ==========
#[test]
fn test_value_objects_coerce_recursively() {
    // GIVEN an address without a country
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();
    let address = shape.field("address").unwrap();

    let value = address
        .coerce(&gen, &object! { "street" => "Main St" })
        .unwrap();

    // THEN the nested create shape fills the default and nested fields are touched
    assert_eq!(value, object! { "street" => "Main St", "country" => "DE" });
    assert_eq!(
        address.affected_fields(&gen, &value).unwrap(),
        vec![
            field(&model, "Order", "address"),
            field(&model, "Address", "street"),
            field(&model, "Address", "country"),
        ]
    );
    assert_eq!(
        address.coerce(&gen, &object! { "street" => 7i64 }),
        Err(MutationError::invalid_value("street", "String", "Int"))
    );
}

// ========== TEST: entity_extension_updates_guarded_value ==========
#[test]
fn test_entity_extension_updates_guarded_value() {
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();
    let meta = shape.field("meta").unwrap();
    let meta_field = field(&model, "Order", "meta");

    let value = meta.coerce(&gen, &object! { "note" => "fragile" }).unwrap();
    let nodes = meta
        .mutation_nodes(&gen, &value, &current(), &mut VarGen::new())
        .unwrap();

    let [QueryNode::SetField { field, value, .. }] = nodes.as_slice() else {
        panic!("expected one set-field node");
    };
    assert_eq!(*field, meta_field);
    let QueryNode::UpdateObject { target, changes, .. } = value.as_ref() else {
        panic!("expected nested update");
    };
    assert!(matches!(target.as_ref(), QueryNode::Conditional { .. }));
    assert_eq!(changes.len(), 1);
}

// ========== TEST: child_add_generates_identity ==========
#[test]
fn test_child_add_generates_identity() {
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();
    let add = shape.field("addItems").unwrap();

    let value = add.coerce(&gen, &Value::List(vec![object! { "sku" => "A-1" }])).unwrap();
    let nodes = add
        .mutation_nodes(&gen, &value, &current(), &mut VarGen::new())
        .unwrap();

    let [QueryNode::SetField { value, .. }] = nodes.as_slice() else {
        panic!("expected one set-field node");
    };
    let QueryNode::BinaryOp {
        op: BinaryOperator::Concat,
        rhs,
        ..
    } = value.as_ref()
    else {
        panic!("expected concatenation");
    };
    let QueryNode::List { items } = rhs.as_ref() else {
        panic!("expected created children");
    };
    let QueryNode::CreateObject { changes, .. } = &items[0] else {
        panic!("expected create");
    };
    assert_eq!(
        changes[0],
        QueryNode::set_field(field(&model, "Item", "id"), "id", QueryNode::GenerateId)
    );
}

// ========== TEST: child_update_matches_by_identity ==========
#[test]
fn test_child_update_matches_by_identity() {
    // GIVEN updates for two children
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();
    let update = shape.field("updateItems").unwrap();

    let value = update
        .coerce(
            &gen,
            &Value::List(vec![
                object! { "id" => "i1", "sku" => "B-2" },
                object! { "id" => "i2", "increaseByAmount" => 1i64 },
            ]),
        )
        .unwrap();
    let nodes = update
        .mutation_nodes(&gen, &value, &current(), &mut VarGen::new())
        .unwrap();

    // THEN each child is matched in order and unmatched children pass through
    let [QueryNode::SetField { value, .. }] = nodes.as_slice() else {
        panic!("expected one set-field node");
    };
    let QueryNode::TransformList {
        item,
        inner: Some(inner),
        filter: None,
        ..
    } = value.as_ref()
    else {
        panic!("expected transform");
    };
    let QueryNode::Conditional {
        condition,
        otherwise,
        ..
    } = inner.as_ref()
    else {
        panic!("expected first match");
    };
    assert_eq!(
        condition.as_ref(),
        &QueryNode::eq(
            QueryNode::entity_id(QueryNode::variable(item)),
            QueryNode::literal("i1"),
        )
    );
    let QueryNode::Conditional { otherwise, .. } = otherwise.as_ref() else {
        panic!("expected second match");
    };
    assert_eq!(otherwise.as_ref(), &QueryNode::variable(item));

    // AND a child update without identity is rejected
    assert_eq!(
        update.coerce(&gen, &Value::List(vec![object! { "sku" => "C" }])),
        Err(MutationError::missing_identity("UpdateItemInput", "id"))
    );
}

// ========== TEST: child_remove_filters_ids ==========
#[test]
fn test_child_remove_filters_ids() {
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();
    let remove = shape.field("removeItems").unwrap();

    let value = remove.coerce(&gen, &Value::List(vec![Value::from("i1")])).unwrap();
    let nodes = remove
        .mutation_nodes(&gen, &value, &current(), &mut VarGen::new())
        .unwrap();

    let [QueryNode::SetField { value: list, .. }] = nodes.as_slice() else {
        panic!("expected one set-field node");
    };
    let QueryNode::TransformList {
        item,
        filter: Some(filter),
        ..
    } = list.as_ref()
    else {
        panic!("expected filtered transform");
    };
    assert_eq!(
        filter.as_ref(),
        &QueryNode::UnaryOp {
            op: UnaryOperator::Not,
            operand: Box::new(QueryNode::binary(
                BinaryOperator::In,
                QueryNode::entity_id(QueryNode::variable(item)),
                QueryNode::literal(value.clone()),
            )),
        }
    );

    // AND an empty removal emits nothing
    let nodes = remove
        .mutation_nodes(&gen, &Value::empty_list(), &current(), &mut VarGen::new())
        .unwrap();
    assert!(nodes.is_empty());
}

// ========== TEST: edges_touch_inverse_field ==========
#[test]
fn test_edges_touch_inverse_field() {
    // GIVEN Order.products paired with Product.orders
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();
    let add = shape.field("addProducts").unwrap();
    let products = field(&model, "Order", "products");

    let value = add.coerce(&gen, &Value::List(vec![Value::from("p1")])).unwrap();
    let nodes = add
        .mutation_nodes(&gen, &value, &current(), &mut VarGen::new())
        .unwrap();

    assert_eq!(
        nodes,
        vec![QueryNode::AddEdges {
            side: model.relation_side(products).unwrap(),
            source: Box::new(current()),
            targets: Box::new(QueryNode::literal(vec!["p1"])),
        }]
    );
    assert_eq!(
        add.affected_fields(&gen, &value).unwrap(),
        vec![products, field(&model, "Product", "orders")]
    );
}

// ========== TEST: to_one_edge_null_unlinks ==========
#[test]
fn test_to_one_edge_null_unlinks() {
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();
    let invoice = shape.field("invoice").unwrap();

    let value = invoice.coerce(&gen, &Value::Null).unwrap();
    let nodes = invoice
        .mutation_nodes(&gen, &value, &current(), &mut VarGen::new())
        .unwrap();

    assert!(matches!(
        nodes.as_slice(),
        [QueryNode::SetEdge { target: None, .. }]
    ));
    assert!(matches!(
        invoice.kind,
        InputFieldKind::SetEdge { side } if side.is_from_side
    ));
}

// ========== TEST: create_fills_defaults ==========
#[test]
fn test_create_fills_defaults() {
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let mut vars = VarGen::new();

    let compiled = gen
        .compile_create(order, &object! { "quantity" => 2i64 }, &mut vars)
        .unwrap();

    let QueryNode::CreateObject {
        type_id, changes, ..
    } = &compiled.node
    else {
        panic!("expected create");
    };
    assert_eq!(*type_id, order);
    assert_eq!(
        changes,
        &vec![
            QueryNode::set_field(field(&model, "Order", "status"), "status", QueryNode::literal("NEW")),
            QueryNode::set_field(field(&model, "Order", "quantity"), "quantity", QueryNode::literal(2)),
        ]
    );
    assert_eq!(
        compiled.affected_fields,
        vec![field(&model, "Order", "status"), field(&model, "Order", "quantity")]
    );
}

// ========== TEST: compile_update_locates_target ==========
#[test]
fn test_compile_update_locates_target() {
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let mut vars = VarGen::new();

    let compiled = gen
        .compile_update(order, &object! { "id" => "o1", "status" => "PAID" }, &mut vars)
        .unwrap();

    let QueryNode::UpdateObject { target, changes, .. } = &compiled.node else {
        panic!("expected update");
    };
    let QueryNode::FirstOfList { list } = target.as_ref() else {
        panic!("expected lookup");
    };
    assert!(matches!(
        list.as_ref(),
        QueryNode::TransformList { max_count: Some(1), .. }
    ));
    assert_eq!(changes.len(), 1);
}

// ========== TEST: compile_delete ==========
#[test]
fn test_compile_delete() {
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);

    let compiled = gen
        .compile_delete(order, &Value::from("o1"), &mut VarGen::new())
        .unwrap();

    assert!(matches!(
        compiled.node,
        QueryNode::DeleteObject { type_id, .. } if type_id == order
    ));
    assert!(gen.compile_delete(order, &Value::Null, &mut VarGen::new()).is_err());
}

// ========== TEST: embedded_root_entity_is_fault ==========
#[test]
fn test_embedded_root_entity_is_fault() {
    // GIVEN a root entity embedded without relation or reference
    let mut builder = ModelBuilder::new();
    let movie = builder
        .add_type("Movie", TypeKind::RootEntity)
        .field(FieldConfig::new("sequel", "Movie"))
        .done()
        .unwrap();
    let model = builder.build().unwrap();
    let gen = InputTypeGenerator::new(&model);

    let result = gen.update_input(movie);

    let err = result.unwrap_err();
    assert_eq!(err, MutationError::unexpected_field_shape("Movie.sequel"));
    assert!(err.is_generation_fault());
}

// ========== TEST: scalar_types_have_no_shape ==========
#[test]
fn test_scalar_types_have_no_shape() {
    let (model, _) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let string = model.get_type_by_name("String").unwrap().id;

    assert_eq!(
        gen.create_input(string).unwrap_err(),
        MutationError::not_an_object_type("String")
    );
}

// ========== TEST: describe_serializes ==========
#[test]
fn test_describe_serializes() {
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();

    let json = serde_json::to_value(shape.field("tags").unwrap().describe()).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "name": "tags",
            "accepts": { "list": { "item": { "scalar": { "type_name": "String" } } } },
            "filterOnly": false,
            "listCoercing": true,
            "recursive": false
        })
    );
}

// ========== TEST: child_update_rejects_repeated_identity ==========
#[test]
fn test_child_update_rejects_repeated_identity() {
    // GIVEN two updates addressing the same child
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();
    let update = shape.field("updateItems").unwrap();
    let input = Value::List(vec![
        object! { "id" => "i1", "sku" => "B-2" },
        object! { "id" => "i1", "increaseByAmount" => 1i64 },
    ]);

    // WHEN coercing
    let result = update.coerce(&gen, &input);

    // THEN the request is rejected instead of dropping one update
    assert_eq!(
        result,
        Err(MutationError::duplicate_identity("updateItems", "i1"))
    );

    // AND integer ids are compared after normalization
    let input = Value::List(vec![
        object! { "id" => 7i64, "sku" => "C" },
        object! { "id" => "7", "sku" => "D" },
    ]);
    assert_eq!(
        update.coerce(&gen, &input),
        Err(MutationError::duplicate_identity("updateItems", "7"))
    );
}

// ========== TEST: create_and_set_null_is_no_change ==========
#[test]
fn test_create_and_set_null_is_no_change() {
    // GIVEN createInvoice set to null
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();
    let input = object! { "id" => "o1", "createInvoice" => Value::Null };

    // WHEN compiling the update
    let value = shape.coerce(&gen, &input).unwrap();

    // THEN the input is treated as absent
    assert_eq!(value, object! { "id" => "o1" });
    assert!(shape.affected_fields(&gen, &value).unwrap().is_empty());
    let create_invoice = shape.field("createInvoice").unwrap();
    assert!(create_invoice
        .mutation_nodes(&gen, &Value::Null, &current(), &mut VarGen::new())
        .unwrap()
        .is_empty());

    // AND it does not conflict with unlinking through the set-edge input
    let input = object! { "id" => "o1", "invoice" => Value::Null, "createInvoice" => Value::Null };
    assert!(shape.coerce(&gen, &input).is_ok());
}

// ========== TEST: empty_edge_list_skips_inverse ==========
#[test]
fn test_empty_edge_list_skips_inverse() {
    // GIVEN edge inputs without any targets
    let (model, order) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let shape = gen.update_input(order).unwrap();
    let products = field(&model, "Order", "products");

    for name in ["addProducts", "removeProducts", "createAndAddProducts"] {
        let input = shape.field(name).unwrap();

        // WHEN coercing null and reporting the touched fields
        let value = input.coerce(&gen, &Value::Null).unwrap();

        // THEN only the field itself is reported and nothing is emitted
        assert_eq!(input.affected_fields(&gen, &value).unwrap(), vec![products]);
        assert!(input
            .mutation_nodes(&gen, &value, &current(), &mut VarGen::new())
            .unwrap()
            .is_empty());
    }
}

// ========== TEST: addressing_requires_root_entity ==========
#[test]
fn test_addressing_requires_root_entity() {
    // GIVEN types that are only stored embedded in a root entity
    let (model, _) = order_model();
    let gen = InputTypeGenerator::new(&model);
    let item = model.get_type_by_name("Item").unwrap().id;
    let address = model.get_type_by_name("Address").unwrap().id;

    // WHEN addressing them by id
    let update = gen.compile_update(item, &object! { "id" => "i1" }, &mut VarGen::new());
    let delete = gen.compile_delete(address, &Value::from("a1"), &mut VarGen::new());

    // THEN no entity scan is compiled
    assert_eq!(update, Err(MutationError::not_a_root_entity("Item")));
    assert_eq!(delete, Err(MutationError::not_a_root_entity("Address")));
}
