use std::collections::HashMap;

use async_graphql_parser::{
    types::{DocumentOperations, FragmentDefinition, OperationDefinition},
    Positioned,
};
use async_graphql_value::Name;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("Unknown operation named '{0}'.")]
    UnknownOperation(String),
    #[error("Missing operation name.")]
    MissingOperationName,
    #[error(transparent)]
    Parser(#[from] async_graphql_parser::Error),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Identity of an operation: a blake3 hash of the operation name and the document.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationId(blake3::Hash);

impl OperationId {
    pub fn new(document: &str, operation_name: Option<&str>) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(operation_name.unwrap_or_default().as_bytes());
        hasher.update(&[0x00]);
        hasher.update(document.as_bytes());
        Self(hasher.finalize())
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl std::fmt::Debug for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OperationId({})", self.0.to_hex())
    }
}

pub struct ParsedOperation {
    pub id: OperationId,
    pub name: Option<String>,
    pub definition: OperationDefinition,
    pub fragments: HashMap<Name, Positioned<FragmentDefinition>>,
}

impl ParsedOperation {
    /// Parses the document and selects the operation to execute.
    pub fn parse(document: &str, operation_name: Option<&str>) -> ParseResult<ParsedOperation> {
        let id = OperationId::new(document, operation_name);
        let document = async_graphql_parser::parse_query(document)?;

        let (name, operation) = if let Some(operation_name) = operation_name {
            match document.operations {
                DocumentOperations::Single(_) => None,
                DocumentOperations::Multiple(mut operations) => operations
                    .remove(operation_name)
                    .map(|operation| (Some(operation_name.to_string()), operation)),
            }
            .ok_or_else(|| ParseError::UnknownOperation(operation_name.to_string()))?
        } else {
            match document.operations {
                DocumentOperations::Single(operation) => (None, operation),
                DocumentOperations::Multiple(operations) if operations.len() == 1 => operations
                    .into_iter()
                    .next()
                    .map(|(name, operation)| (Some(name.to_string()), operation))
                    .ok_or(ParseError::MissingOperationName)?,
                DocumentOperations::Multiple(_) => return Err(ParseError::MissingOperationName),
            }
        };

        Ok(ParsedOperation {
            id,
            name,
            definition: operation.node,
            fragments: document.fragments,
        })
    }

    pub fn get_fragment(&self, name: &str) -> Option<&Positioned<FragmentDefinition>> {
        self.fragments.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_selection() {
        let document = "query A { a } query B { b }";

        let parsed = ParsedOperation::parse(document, Some("B")).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("B"));

        assert!(matches!(
            ParsedOperation::parse(document, None),
            Err(ParseError::MissingOperationName)
        ));
        assert!(matches!(
            ParsedOperation::parse(document, Some("C")),
            Err(ParseError::UnknownOperation(name)) if name == "C"
        ));

        let parsed = ParsedOperation::parse("query A { a }", None).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("A"));

        let parsed = ParsedOperation::parse("{ a }", None).unwrap();
        assert_eq!(parsed.name, None);

        assert!(matches!(ParsedOperation::parse("{ a", None), Err(ParseError::Parser(_))));
    }

    #[test]
    fn operation_id_depends_on_name() {
        let document = "query A { a } query B { b }";
        assert_eq!(OperationId::new(document, Some("A")), OperationId::new(document, Some("A")));
        assert_ne!(OperationId::new(document, Some("A")), OperationId::new(document, Some("B")));
    }
}
