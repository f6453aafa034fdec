use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use super::{compile, config, schema, store};
use crate::{
    ErrorHandling, ExecutionConfig, ExecutionError, FetchResultStore, SelectionPath, SharedFetchResultStore,
    SourceSchemaResult, Variables,
};

fn fetch(path: SelectionPath, data: serde_json::Value) -> SourceSchemaResult {
    SourceSchemaResult::new(path, data)
}

fn finish(store: FetchResultStore) -> serde_json::Value {
    serde_json::to_value(store.finish().unwrap()).unwrap()
}

#[test]
fn fetches_complete_a_nested_object() {
    let mut store = store(
        "{ product(id: 1) { id name price } }",
        json!({}),
        ExecutionConfig::default(),
    );
    assert!(store
        .save(&fetch(SelectionPath::root(), json!({ "product": { "id": "1" } })))
        .unwrap());
    assert!(store
        .save(&fetch(
            SelectionPath::root().field("product"),
            json!({ "name": "P", "price": 9.5 })
        ))
        .unwrap());

    assert_eq!(
        finish(store).to_string(),
        r#"{"data":{"product":{"id":"1","name":"P","price":9.5}}}"#
    );
}

#[test]
fn fetches_into_list_items() {
    let mut store = store("{ products { id name } }", json!({}), ExecutionConfig::default());
    store
        .save(&fetch(
            SelectionPath::root(),
            json!({ "products": [{ "id": "1" }, { "id": "2" }, { "id": "3" }] }),
        ))
        .unwrap();
    store
        .save(&fetch(SelectionPath::root().field("products").index(2), json!({ "name": "Three" })))
        .unwrap();
    store
        .save(&fetch(SelectionPath::root().field("products").index(0), json!({ "name": "One" })))
        .unwrap();

    assert_eq!(
        finish(store),
        json!({
            "data": {
                "products": [
                    { "id": "1", "name": "One" },
                    { "id": "2", "name": null },
                    { "id": "3", "name": "Three" }
                ]
            }
        })
    );
}

#[test]
fn data_path_locates_the_object_in_the_fetched_data() {
    let mut store = store("{ product(id: 1) { id name } }", json!({}), ExecutionConfig::default());
    store
        .save(&fetch(SelectionPath::root(), json!({ "product": { "id": "1" } })))
        .unwrap();
    store
        .save(
            &fetch(
                SelectionPath::root().field("product"),
                json!({ "_entities": [{ "__typename": "Product", "name": "P" }] }),
            )
            .with_data_path(SelectionPath::root().field("_entities").index(0)),
        )
        .unwrap();

    assert_eq!(finish(store), json!({ "data": { "product": { "id": "1", "name": "P" } } }));
}

#[test]
fn invalid_paths() {
    let mut store = store(
        "{ products { id } name product(id: 1) { id } }",
        json!({}),
        ExecutionConfig::default(),
    );
    store
        .save(&fetch(
            SelectionPath::root(),
            json!({ "products": [{ "id": "1" }], "name": "n", "product": { "id": "1" } }),
        ))
        .unwrap();

    let paths = [
        SelectionPath::root().field("nope"),
        SelectionPath::root().field("name"),
        SelectionPath::root().field("products"),
        SelectionPath::root().field("products").index(5),
        SelectionPath::root().field("products").field("id"),
        SelectionPath::root().field("product").index(0),
    ];
    for path in paths {
        let err = store.save(&fetch(path.clone(), json!({ "id": "2" }))).unwrap_err();
        assert!(
            matches!(err, ExecutionError::PathNotFound { .. }),
            "{path}: unexpected {err:?}"
        );
    }

    let err = store
        .save(&fetch(SelectionPath::root(), json!("not an object")))
        .unwrap_err();
    assert!(matches!(err, ExecutionError::InvalidFetchData { .. }));

    let err = store
        .save(
            &fetch(SelectionPath::root().field("product"), json!({ "data": {} }))
                .with_data_path(SelectionPath::root().field("_entities")),
        )
        .unwrap_err();
    assert!(matches!(err, ExecutionError::InvalidFetchData { .. }));
}

#[test]
fn fetches_into_nulled_positions_are_ignored() {
    let mut store = store("{ product(id: 1) { id name } }", json!({}), ExecutionConfig::default());
    store
        .save(&fetch(SelectionPath::root(), json!({ "product": null })))
        .unwrap();

    let start = store.get_start_result(&SelectionPath::root().field("product")).unwrap();
    assert_eq!(start, None);
    assert!(!store
        .save(&fetch(SelectionPath::root().field("product"), json!({ "name": "P" })))
        .unwrap());

    assert_eq!(finish(store), json!({ "data": { "product": null } }));
}

#[test]
fn nested_fetch_propagates_into_its_parent() {
    let mut store = store(
        "{ product(id: 1) { id reviews { body } } name }",
        json!({}),
        ExecutionConfig::default(),
    );
    store
        .save(&fetch(SelectionPath::root(), json!({ "product": { "id": "1" }, "name": "n" })))
        .unwrap();
    let valid = store
        .save(&fetch(
            SelectionPath::root().field("product"),
            json!({ "reviews": [{ "body": "ok" }, { "body": null }] }),
        ))
        .unwrap();
    assert!(!valid);
    assert_eq!(store.errors().len(), 1);

    assert_eq!(
        finish(store),
        json!({
            "data": { "product": null, "name": "n" },
            "errors": [{
                "message": "Cannot return null for non-nullable type String!",
                "path": ["product", "reviews", 1, "body"]
            }]
        })
    );
}

#[test]
fn null_fetch_data_nulls_the_target() {
    let mut store = store("{ name }", json!({}), ExecutionConfig::default());
    assert!(!store.save(&fetch(SelectionPath::root(), json!(null))).unwrap());
    assert!(store.is_data_null());

    // Ignored from now on.
    assert!(!store.save(&fetch(SelectionPath::root(), json!({ "name": "n" }))).unwrap());
    assert_eq!(finish(store), json!({ "data": null }));
}

#[test]
fn root_fetches_are_merged() {
    let mut store = store("{ name foo { a b } count }", json!({}), ExecutionConfig::default());
    store
        .save(&fetch(SelectionPath::root(), json!({ "name": "n", "foo": { "a": "x" } })))
        .unwrap();
    store
        .save(&fetch(SelectionPath::root(), json!({ "foo": { "b": "y" }, "count": 2 })))
        .unwrap();

    assert_eq!(
        finish(store).to_string(),
        r#"{"data":{"name":"n","foo":{"a":"x","b":"y"},"count":2}}"#
    );
}

#[test]
fn violation_while_merging_is_absorbed_by_a_nullable_field() {
    let query = "{ foo { a b } name }";
    let first = json!({ "foo": { "b": "y" }, "name": "n" });
    let second = json!({ "foo": { "a": null } });
    let error = json!([{ "message": "Cannot return null for non-nullable type String!", "path": ["foo", "a"] }]);

    let mut propagating = store(query, json!({}), ExecutionConfig::default());
    propagating.save(&fetch(SelectionPath::root(), first.clone())).unwrap();
    assert!(propagating.save(&fetch(SelectionPath::root(), second.clone())).unwrap());
    assert!(!propagating.is_data_null());
    assert_eq!(
        finish(propagating),
        json!({ "data": { "foo": null, "name": "n" }, "errors": error })
    );

    let mut nulling = store(query, json!({}), config(ErrorHandling::Null));
    nulling.save(&fetch(SelectionPath::root(), first.clone())).unwrap();
    nulling.save(&fetch(SelectionPath::root(), second.clone())).unwrap();
    assert_eq!(
        finish(nulling),
        json!({ "data": { "foo": { "a": null, "b": "y" }, "name": "n" }, "errors": error })
    );

    let mut halting = store(query, json!({}), config(ErrorHandling::Halt));
    halting.save(&fetch(SelectionPath::root(), first)).unwrap();
    assert!(!halting.save(&fetch(SelectionPath::root(), second)).unwrap());
    assert_eq!(finish(halting), json!({ "data": null, "errors": error }));
}

#[test]
fn violation_while_merging_into_a_non_null_field_reaches_the_data() {
    let mut store = store("{ requiredFoo { a b } name }", json!({}), ExecutionConfig::default());
    store
        .save(&fetch(SelectionPath::root(), json!({ "requiredFoo": { "b": "y" }, "name": "n" })))
        .unwrap();
    assert!(!store
        .save(&fetch(SelectionPath::root(), json!({ "requiredFoo": { "a": null } })))
        .unwrap());
    assert!(store.is_data_null());

    assert_eq!(
        finish(store),
        json!({
            "data": null,
            "errors": [{ "message": "Cannot return null for non-nullable type String!", "path": ["requiredFoo", "a"] }]
        })
    );
}

#[test]
fn missing_non_null_fields_are_only_reported_at_finish() {
    let mut store = store("{ foo { a } }", json!({}), ExecutionConfig::default());
    assert!(store
        .save(&fetch(SelectionPath::root(), json!({ "foo": {} })))
        .unwrap());
    assert!(store.errors().is_empty());

    assert_eq!(
        finish(store),
        json!({
            "data": { "foo": null },
            "errors": [{ "message": "Cannot return null for non-nullable type String!", "path": ["foo", "a"] }]
        })
    );
}

#[test]
fn halted_store_ignores_later_fetches() {
    let mut store = store("{ foo { a } name }", json!({}), config(ErrorHandling::Halt));
    store
        .save(&fetch(SelectionPath::root(), json!({ "name": "n" })))
        .unwrap();
    assert!(!store
        .save(&fetch(SelectionPath::root(), json!({ "foo": { "a": null } })))
        .unwrap());
    assert!(store.is_data_null());
    assert_eq!(store.errors().len(), 1);
}

#[test]
fn shared_store_serializes_concurrent_saves() {
    let shared = SharedFetchResultStore::new(store(
        "{ products { id name } }",
        json!({}),
        ExecutionConfig::default(),
    ));
    shared
        .save(&fetch(
            SelectionPath::root(),
            json!({ "products": [{ "id": "1" }, { "id": "2" }, { "id": "3" }, { "id": "4" }] }),
        ))
        .unwrap();

    std::thread::scope(|scope| {
        for index in 0..4 {
            let shared = shared.clone();
            scope.spawn(move || {
                shared
                    .save(&fetch(
                        SelectionPath::root().field("products").index(index),
                        json!({ "name": format!("P{}", index + 1) }),
                    ))
                    .unwrap()
            });
        }
    });

    let other = shared.clone();
    assert!(matches!(shared.finish(), Err(ExecutionError::StoreStillShared)));

    let response = serde_json::to_value(other.finish().unwrap()).unwrap();
    assert_eq!(
        response,
        json!({
            "data": {
                "products": [
                    { "id": "1", "name": "P1" },
                    { "id": "2", "name": "P2" },
                    { "id": "3", "name": "P3" },
                    { "id": "4", "name": "P4" }
                ]
            }
        })
    );
}

#[test]
fn sessions_are_reused_across_requests() {
    let schema = schema();
    let operation = Arc::new(compile(&schema, "{ products { id reviews { body } } }"));
    let data = json!({ "products": [{ "id": "1", "reviews": [{ "body": "b" }] }] });

    let mut store = FetchResultStore::new(
        schema.clone(),
        operation.clone(),
        ExecutionConfig::default(),
        &Variables::default(),
    );
    store.save(&fetch(SelectionPath::root(), data.clone())).unwrap();
    assert_eq!(store.session().rented_count(), 5);
    let first = store.finish().unwrap();
    let expected = serde_json::to_value(&first).unwrap();

    let session = first.into_session();
    assert_eq!(session.rented_count(), 0);

    let mut store = FetchResultStore::with_session(
        session,
        schema,
        operation,
        ExecutionConfig::default(),
        &Variables::default(),
    );
    assert_eq!(store.session().rented_count(), 1);
    store.save(&fetch(SelectionPath::root(), data)).unwrap();
    assert_eq!(store.session().rented_count(), 5);
    assert_eq!(serde_json::to_value(store.finish().unwrap()).unwrap(), expected);
}
