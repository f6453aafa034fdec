mod cache;
mod compile;
mod condition;
mod ids;
mod location;
mod parse;
mod selection_set;
mod variables;

use std::collections::HashMap;

pub use async_graphql_parser::types::OperationType;
pub use cache::OperationCache;
pub use compile::{compile_document, CompileError, CompileResult, OperationCompiler};
pub use condition::*;
pub use ids::*;
pub use location::Location;
pub use parse::{OperationId, ParseError, ParseResult, ParsedOperation};
use schema::ObjectDefinitionId;
pub use selection_set::*;
pub use variables::Variables;

/// A compiled operation. Immutable and shared across all the requests executing it.
#[derive(Debug)]
pub struct Operation {
    pub(crate) id: OperationId,
    pub(crate) ty: OperationType,
    pub(crate) name: Option<String>,
    pub(crate) root_object_id: ObjectDefinitionId,
    pub(crate) root_selection_set_id: SelectionSetId,
    pub(crate) selection_sets: Vec<SelectionSet>,
    pub(crate) selections: Vec<Selection>,
    pub(crate) include_conditions: IncludeConditionCollection,
    /// Default values of the boolean variables, used when a request doesn't provide them.
    pub(crate) variable_defaults: HashMap<String, bool>,
}

impl Operation {
    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn ty(&self) -> OperationType {
        self.ty
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn root_object_id(&self) -> ObjectDefinitionId {
        self.root_object_id
    }

    pub fn root_selection_set_id(&self) -> SelectionSetId {
        self.root_selection_set_id
    }

    pub fn root_selection_set(&self) -> &SelectionSet {
        &self[self.root_selection_set_id]
    }

    pub fn selection_sets(&self) -> &[SelectionSet] {
        &self.selection_sets
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn include_conditions(&self) -> &IncludeConditionCollection {
        &self.include_conditions
    }

    /// Used as a capacity hint when sizing the result arena.
    pub fn last_selection_id(&self) -> Option<SelectionId> {
        self.selections.last().map(|selection| selection.id)
    }

    /// Position of the selection with this response name within its selection set.
    pub fn position_of(&self, selection_set_id: SelectionSetId, response_name: &str) -> Option<usize> {
        self[selection_set_id].position_of(response_name)
    }

    /// Evaluates every include condition against the request variables. Bit `i` is set if condition
    /// `i` holds.
    pub fn create_include_flags(&self, variables: &Variables) -> u64 {
        self.include_conditions
            .create_include_flags(variables, &self.variable_defaults)
    }
}
