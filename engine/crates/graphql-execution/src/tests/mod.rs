mod pool;
mod store;

use std::sync::Arc;

use schema::Schema;
use serde_json::Value;

use crate::{
    compile_document, ErrorHandling, ExecutionConfig, FetchResultStore, Operation, SelectionPath, SourceSchemaResult,
    Variables,
};

#[ctor::ctor]
fn setup_logging() {
    let filter = tracing_subscriber::filter::EnvFilter::builder()
        .parse(std::env::var("RUST_LOG").unwrap_or("graphql_execution=debug".to_string()))
        .unwrap();
    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .without_time()
        .init();
}

const SDL: &str = r#"
    type Query {
        foo: Foo
        requiredFoo: Foo!
        product(id: ID!): Product
        products: [Product!]
        nullableProducts: [Product]
        node: Node
        search: [SearchResult!]!
        matrix: [[Int!]]
        tags: [String!]
        name: String
        count: Int
        role: Role
        custom: JSON
    }

    type Foo {
        a: String!
        b: String
        c: Int
        nested: Foo
    }

    type Product {
        id: ID!
        name: String
        price: Float
        reviews: [Review!]!
    }

    type Review {
        body: String!
        author: User
    }

    interface Node {
        id: ID!
    }

    type User implements Node {
        id: ID!
        name: String
        friends: [User]
    }

    type Post implements Node {
        id: ID!
        title: String!
    }

    union SearchResult = User | Post

    enum Role {
        ADMIN
        USER
    }

    scalar JSON
"#;

fn schema() -> Arc<Schema> {
    Arc::new(Schema::from_sdl(SDL).unwrap())
}

fn compile(schema: &Schema, query: &str) -> Operation {
    compile_document(schema, query, None).unwrap()
}

fn store(query: &str, variables: Value, config: ExecutionConfig) -> FetchResultStore {
    let schema = schema();
    let operation = Arc::new(compile(&schema, query));
    let variables: Variables = serde_json::from_value(variables).unwrap();
    FetchResultStore::new(schema, operation, config, &variables)
}

fn config(error_handling: ErrorHandling) -> ExecutionConfig {
    ExecutionConfig {
        error_handling,
        ..Default::default()
    }
}

/// Saves every fetch in order and serializes the response.
fn execute_with(query: &str, variables: Value, config: ExecutionConfig, fetches: Vec<SourceSchemaResult>) -> Value {
    let mut store = store(query, variables, config);
    for fetch in &fetches {
        store.save(fetch).unwrap();
    }
    serde_json::to_value(store.finish().unwrap()).unwrap()
}

/// A single fetch for the whole query.
fn execute(query: &str, data: Value) -> Value {
    execute_with(
        query,
        serde_json::json!({}),
        ExecutionConfig::default(),
        vec![SourceSchemaResult::new(SelectionPath::root(), data)],
    )
}
