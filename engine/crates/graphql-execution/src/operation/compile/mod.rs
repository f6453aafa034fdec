mod collect;
mod error;
mod selection_set;
mod validation;

use async_graphql_value::ConstValue;
use schema::Schema;

use super::{
    IncludeConditionCollection, Operation, OperationType, ParsedOperation, Selection, SelectionId, SelectionSet,
    SelectionSetId,
};
pub use error::*;

/// Compiles a parsed operation into the immutable selection tree executed by every request.
pub struct OperationCompiler<'schema> {
    schema: &'schema Schema,
}

impl<'schema> OperationCompiler<'schema> {
    pub fn new(schema: &'schema Schema) -> Self {
        Self { schema }
    }

    #[tracing::instrument(skip_all, fields(operation_id = %parsed.id))]
    pub fn compile(&self, parsed: &ParsedOperation) -> CompileResult<Operation> {
        let root_object_id = match parsed.definition.ty {
            OperationType::Query => self.schema.query(),
            OperationType::Mutation => self.schema.mutation().ok_or(CompileError::NoMutationDefined)?,
            OperationType::Subscription => self.schema.subscription().ok_or(CompileError::NoSubscriptionDefined)?,
        };

        validation::validate_fragments(parsed)?;

        let mut compiler = Compiler {
            schema: self.schema,
            parsed,
            selection_sets: Vec::new(),
            selections: Vec::new(),
            include_conditions: IncludeConditionCollection::default(),
        };

        let root_selection_set_id =
            compiler.build_selection_set(root_object_id, &[(&parsed.definition.selection_set.node, 0)])?;

        let variable_defaults = parsed
            .definition
            .variable_definitions
            .iter()
            .filter_map(|definition| match definition.node.default_value.as_ref().map(|value| &value.node) {
                Some(ConstValue::Boolean(value)) => Some((definition.node.name.node.to_string(), *value)),
                _ => None,
            })
            .collect();

        tracing::debug!(
            selections = compiler.selections.len(),
            selection_sets = compiler.selection_sets.len(),
            include_conditions = compiler.include_conditions.len(),
            "Compiled operation"
        );

        Ok(Operation {
            id: parsed.id,
            ty: parsed.definition.ty,
            name: parsed.name.clone(),
            root_object_id,
            root_selection_set_id,
            selection_sets: compiler.selection_sets,
            selections: compiler.selections,
            include_conditions: compiler.include_conditions,
            variable_defaults,
        })
    }
}

/// Parses and compiles an operation in one go.
pub fn compile_document(schema: &Schema, document: &str, operation_name: Option<&str>) -> CompileResult<Operation> {
    let parsed = ParsedOperation::parse(document, operation_name)?;
    OperationCompiler::new(schema).compile(&parsed)
}

pub(super) struct Compiler<'schema, 'p> {
    schema: &'schema Schema,
    parsed: &'p ParsedOperation,
    selection_sets: Vec<SelectionSet>,
    selections: Vec<Selection>,
    include_conditions: IncludeConditionCollection,
}

impl std::ops::Index<SelectionId> for Compiler<'_, '_> {
    type Output = Selection;

    fn index(&self, id: SelectionId) -> &Self::Output {
        &self.selections[usize::from(id)]
    }
}

impl std::ops::IndexMut<SelectionId> for Compiler<'_, '_> {
    fn index_mut(&mut self, id: SelectionId) -> &mut Self::Output {
        &mut self.selections[usize::from(id)]
    }
}

impl std::ops::Index<SelectionSetId> for Compiler<'_, '_> {
    type Output = SelectionSet;

    fn index(&self, id: SelectionSetId) -> &Self::Output {
        &self.selection_sets[usize::from(id)]
    }
}

impl std::ops::IndexMut<SelectionSetId> for Compiler<'_, '_> {
    fn index_mut(&mut self, id: SelectionSetId) -> &mut Self::Output {
        &mut self.selection_sets[usize::from(id)]
    }
}
