use pretty_assertions::assert_eq;

use super::{compile, schema};
use crate::{
    FieldResult, LeafFieldResult, ListResult, ObjectResult, ResultNodeId, ResultParent, ResultPoolSession, SlotValue,
};

#[test]
fn returned_objects_are_reset_and_reused() {
    let schema = schema();
    let operation = compile(&schema, "{ name count }");
    let mut pool = ResultPoolSession::default();

    let id = pool.rent_object_result();
    pool[id].initialize(&operation, operation.root_selection_set_id(), 0);
    pool.set_slot_leaf(ResultParent::Field { object_id: id, index: 0 }, serde_json::json!("x"));
    assert!(pool.object(id).is_initialized());
    assert_eq!(pool.rented_count(), 1);

    pool.return_object_result(id);
    assert_eq!(pool.object(id), &ObjectResult::default());
    assert_eq!(pool.rented_count(), 0);

    assert_eq!(pool.rent_object_result(), id);
    assert_eq!(pool.rented_count(), 1);
}

#[test]
fn returned_lists_are_reset_per_kind() {
    let schema = schema();
    let mut pool = ResultPoolSession::default();
    let string = schema[schema.object_field_by_name(schema.query(), "name").unwrap()].ty;

    let leaf = pool.rent_leaf_list_result();
    pool[leaf].initialize(string, 2);
    pool.set_slot_leaf(ResultParent::Element { list_id: leaf, index: 1 }, serde_json::json!("b"));
    assert_eq!(pool.list(leaf).len(), 2);

    pool.return_list_result(leaf);
    assert_eq!(pool.list(leaf), &ListResult::Leaf(Default::default()));

    // Free lists are kept per kind.
    let object_list = pool.rent_object_list_result();
    assert_ne!(object_list, leaf);
    assert!(matches!(pool.list(object_list), ListResult::Object(_)));
    assert_eq!(pool.rent_leaf_list_result(), leaf);
}

#[test]
fn returning_a_node_returns_its_descendants() {
    let schema = schema();
    let operation = compile(&schema, "{ foo { nested { a } } products { id } }");
    let root_set = operation.root_selection_set_id();
    let foo_selection = &operation[operation[root_set].selection_ids()[0]];
    let foo_set = foo_selection.selection_set_for(schema.object_by_name("Foo").unwrap()).unwrap();
    let products_selection = &operation[operation[root_set].selection_ids()[1]];
    let product_set = products_selection
        .selection_set_for(schema.object_by_name("Product").unwrap())
        .unwrap();

    let mut pool = ResultPoolSession::default();
    let root = pool.rent_object_result();
    pool[root].initialize(&operation, root_set, 0);

    let foo = pool.rent_object_result();
    pool[foo].initialize(&operation, foo_set, 0);
    pool.attach(ResultParent::Field { object_id: root, index: 0 }, ResultNodeId::Object(foo));

    let products = pool.rent_object_list_result();
    pool[products].initialize(products_selection.ty().list_item().unwrap(), 1);
    pool.attach(ResultParent::Field { object_id: root, index: 1 }, ResultNodeId::List(products));

    let product = pool.rent_object_result();
    pool[product].initialize(&operation, product_set, 0);
    pool.attach(
        ResultParent::Element {
            list_id: products,
            index: 0,
        },
        ResultNodeId::Object(product),
    );

    assert_eq!(
        pool.parent_of(ResultNodeId::Object(product)),
        Some(ResultParent::Element {
            list_id: products,
            index: 0
        })
    );
    assert_eq!(pool.list(products).child(0), Some(ResultNodeId::Object(product)));
    assert_eq!(pool.rented_count(), 4);

    // Nulling a slot gives its subtree back.
    pool.set_slot_null(ResultParent::Field { object_id: root, index: 1 });
    assert_eq!(pool.rented_count(), 2);
    assert!(pool.object(root).field(1).is_some_and(FieldResult::is_null));
    assert_eq!(pool.parent_of(ResultNodeId::Object(product)), None);

    pool.return_object_result(root);
    assert_eq!(pool.rented_count(), 0);
}

#[test]
fn field_reset_keeps_the_variant() {
    let schema = schema();
    let operation = compile(&schema, "{ name }");
    let selection = &operation.selections()[0];

    let mut field = FieldResult::new(selection);
    assert_eq!(field.selection_id(), Some(selection.id()));
    assert!(field.is_pending());

    assert!(field.set_leaf(serde_json::json!("x")));
    assert_eq!(field.as_leaf(), Some(&serde_json::json!("x")));

    field.reset();
    assert_eq!(field, FieldResult::Leaf(LeafFieldResult::default()));
    assert!(matches!(
        field,
        FieldResult::Leaf(LeafFieldResult {
            value: SlotValue::Pending,
            ..
        })
    ));
}

#[test]
fn clear_returns_everything() {
    let mut pool = ResultPoolSession::with_capacity(4);
    let objects = [pool.rent_object_result(), pool.rent_object_result()];
    let list = pool.rent_nested_list_result();
    assert_eq!(pool.rented_count(), 3);

    pool.clear();
    assert_eq!(pool.rented_count(), 0);
    assert_eq!(pool.rent_object_result(), objects[0]);
    assert_eq!(pool.rent_object_result(), objects[1]);
    assert_eq!(pool.rent_nested_list_result(), list);
}
