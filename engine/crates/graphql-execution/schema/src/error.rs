#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error(transparent)]
    Parse(#[from] async_graphql_parser::Error),
    #[error("Type '{0}' is defined more than once")]
    DuplicateType(String),
    #[error("Type '{name}' cannot be extended as a {kind}")]
    InvalidExtension { name: String, kind: &'static str },
    #[error("Unknown type '{ty}' used by field {parent}.{field}")]
    UnknownFieldType { parent: String, field: String, ty: String },
    #[error("Type '{name}' used by {parent} must be {expected}")]
    InvalidTypeReference {
        parent: String,
        name: String,
        expected: &'static str,
    },
    #[error("Root operation type '{0}' must be an object type")]
    InvalidRootType(String),
    #[error("The schema must define a query type")]
    MissingQueryType,
    #[error("Field {parent}.{field} has more than {max} nested lists")]
    TooManyListWrappers {
        parent: String,
        field: String,
        max: u32,
    },
}
