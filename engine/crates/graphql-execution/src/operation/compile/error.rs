use crate::operation::{Location, ParseError};

#[derive(thiserror::Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Mutations are not defined on this schema.")]
    NoMutationDefined,
    #[error("Subscriptions are not defined on this schema.")]
    NoSubscriptionDefined,
    #[error("Type {ty} does not have a field named '{name}'.")]
    UnknownField { ty: String, name: String, location: Location },
    #[error("Unknown type named '{name}'.")]
    UnknownType { name: String, location: Location },
    #[error("Type conditions cannot be declared on '{name}', only on objects, unions and interfaces.")]
    InvalidTypeCondition { name: String, location: Location },
    #[error("Unknown fragment named '{name}'.")]
    UnknownFragment { name: String, location: Location },
    #[error("Fragment cycle detected: {}", .cycle.join(", "))]
    FragmentCycle { cycle: Vec<String>, location: Location },
    #[error("Fields '{response_name}' conflict because '{first}' and '{second}' are different fields.")]
    FieldMergeConflict {
        response_name: String,
        first: String,
        second: String,
        location: Location,
    },
    #[error("Field '{name}' cannot have a selection set, it's a {ty}.")]
    LeafWithSelectionSet { name: String, ty: String, location: Location },
    #[error("Field '{name}' must have a selection set, it's a {ty}.")]
    MissingSelectionSet { name: String, ty: String, location: Location },
    #[error("Directive @{directive} requires a boolean or variable 'if' argument.")]
    InvalidDirectiveArgument { directive: String, location: Location },
    #[error("Operations are limited to {max} distinct @skip/@include conditions.")]
    TooManyIncludeConditions { max: usize },
    #[error("Query is too big: {0}")]
    QueryTooBig(String),
}

impl CompileError {
    pub fn location(&self) -> Option<Location> {
        match self {
            CompileError::UnknownField { location, .. }
            | CompileError::UnknownType { location, .. }
            | CompileError::InvalidTypeCondition { location, .. }
            | CompileError::UnknownFragment { location, .. }
            | CompileError::FragmentCycle { location, .. }
            | CompileError::FieldMergeConflict { location, .. }
            | CompileError::LeafWithSelectionSet { location, .. }
            | CompileError::MissingSelectionSet { location, .. }
            | CompileError::InvalidDirectiveArgument { location, .. } => Some(*location),
            CompileError::Parse(_)
            | CompileError::NoMutationDefined
            | CompileError::NoSubscriptionDefined
            | CompileError::TooManyIncludeConditions { .. }
            | CompileError::QueryTooBig(_) => None,
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;
