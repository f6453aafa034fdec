//! Selection set compilation and value completion for a GraphQL execution engine.
//!
//! An [`Operation`] is compiled once from a parsed document and shared across requests. Each
//! request then owns a [`FetchResultStore`] which completes fetched JSON data into a pooled
//! result tree mirroring the compiled selection sets, applying GraphQL null propagation.

mod config;
mod execution;
mod operation;
mod response;

#[cfg(test)]
mod tests;

pub use config::{ErrorHandling, ExecutionConfig};
pub use execution::{
    ExecutionError, ExecutionResult, FetchResultStore, SharedFetchResultStore, SourceSchemaResult, ValueCompletion,
};
pub use operation::{
    collapse_include_flags, compile_document, CompileError, CompileResult, DirectiveOutcome, FieldSelectionNode,
    IncludeCondition, IncludeConditionCollection, Location, Operation, OperationCache, OperationCompiler, OperationId,
    OperationType, ParseError, ParseResult, ParsedOperation, Selection, SelectionId, SelectionKind, SelectionSet,
    SelectionSetId, Variables, MAX_INCLUDE_CONDITIONS,
};
pub use response::{
    FieldError, FieldResult, LeafFieldResult, LeafListResult, ListFieldResult, ListResult, ListResultId,
    NestedListResult, ObjectFieldResult, ObjectListResult, ObjectResult, ObjectResultId, ResponseDataView, Response,
    ResultNodeId, ResultParent, ResultPoolSession, SelectionPath, SelectionPathSegment, SlotValue, TypedListResult,
};
pub use schema;
