use std::collections::{hash_map::Entry, HashMap};

use async_graphql_parser::{
    types::{Directive, Field, Selection, SelectionSet},
    Positioned,
};
use async_graphql_value::Name;
use schema::ObjectDefinitionId;

use super::{CompileError, CompileResult, Compiler};
use crate::operation::{DirectiveOutcome, IncludeCondition};

/// All occurrences of a response name within the merged selection sets.
pub(super) struct CollectedField<'p> {
    pub response_name: &'p str,
    /// Each node with the include flags of the path leading to it.
    pub nodes: Vec<(&'p Positioned<Field>, u64)>,
}

impl<'schema, 'p> Compiler<'schema, 'p> {
    /// Flattens fragments and groups fields by response name, in order of first occurrence.
    pub(super) fn collect_fields(
        &mut self,
        object_id: ObjectDefinitionId,
        selection_sets: &[(&'p SelectionSet, u64)],
    ) -> CompileResult<Vec<CollectedField<'p>>> {
        let mut collector = FieldCollector {
            compiler: self,
            object_id,
            fields: Vec::new(),
            positions: HashMap::new(),
        };
        for (selection_set, include_flags) in selection_sets {
            collector.collect_selection_set(selection_set, *include_flags)?;
        }
        Ok(collector.fields)
    }

    /// Returns the include flags of a node given its parent's, or `None` if it can never be included.
    fn apply_directives(&mut self, directives: &[Positioned<Directive>], include_flags: u64) -> CompileResult<Option<u64>> {
        match IncludeCondition::try_create(directives)? {
            DirectiveOutcome::Always => Ok(Some(include_flags)),
            DirectiveOutcome::Never => Ok(None),
            DirectiveOutcome::Conditional(condition) => {
                let (inserted, index) = self.include_conditions.add(condition)?;
                if inserted {
                    tracing::trace!(index, "Registered include condition");
                }
                Ok(Some(include_flags | (1 << index)))
            }
        }
    }
}

struct FieldCollector<'schema, 'p, 'c> {
    compiler: &'c mut Compiler<'schema, 'p>,
    object_id: ObjectDefinitionId,
    fields: Vec<CollectedField<'p>>,
    positions: HashMap<&'p str, usize>,
}

impl<'s, 'p, 'c> std::ops::Deref for FieldCollector<'s, 'p, 'c> {
    type Target = Compiler<'s, 'p>;

    fn deref(&self) -> &Self::Target {
        self.compiler
    }
}

impl<'s, 'p, 'c> std::ops::DerefMut for FieldCollector<'s, 'p, 'c> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.compiler
    }
}

impl<'schema, 'p, 'c> FieldCollector<'schema, 'p, 'c> {
    fn collect_selection_set(&mut self, selection_set: &'p SelectionSet, include_flags: u64) -> CompileResult<()> {
        for Positioned { node: selection, .. } in &selection_set.items {
            match selection {
                Selection::Field(field) => {
                    if let Some(include_flags) = self.apply_directives(&field.node.directives, include_flags)? {
                        self.register_field(field, include_flags);
                    }
                }
                Selection::InlineFragment(fragment) => {
                    let Some(include_flags) = self.apply_directives(&fragment.node.directives, include_flags)? else {
                        continue;
                    };
                    if let Some(type_condition) = &fragment.node.type_condition {
                        if !self.type_condition_applies(&type_condition.node.on)? {
                            continue;
                        }
                    }
                    self.collect_selection_set(&fragment.node.selection_set.node, include_flags)?;
                }
                Selection::FragmentSpread(spread) => {
                    let Some(include_flags) = self.apply_directives(&spread.node.directives, include_flags)? else {
                        continue;
                    };
                    let name = spread.node.fragment_name.node.as_str();
                    let parsed = self.parsed;
                    let fragment = parsed
                        .get_fragment(name)
                        .ok_or_else(|| CompileError::UnknownFragment {
                            name: name.to_string(),
                            location: spread.pos.into(),
                        })?;
                    if !self.type_condition_applies(&fragment.node.type_condition.node.on)? {
                        continue;
                    }
                    self.collect_selection_set(&fragment.node.selection_set.node, include_flags)?;
                }
            }
        }
        Ok(())
    }

    fn register_field(&mut self, field: &'p Positioned<Field>, include_flags: u64) {
        let response_name = field.node.response_key().node.as_str();
        match self.positions.entry(response_name) {
            Entry::Occupied(entry) => self.fields[*entry.get()].nodes.push((field, include_flags)),
            Entry::Vacant(entry) => {
                entry.insert(self.fields.len());
                self.fields.push(CollectedField {
                    response_name,
                    nodes: vec![(field, include_flags)],
                });
            }
        }
    }

    /// A fragment applies if the current object is one of its possible types.
    fn type_condition_applies(&self, name: &Positioned<Name>) -> CompileResult<bool> {
        let definition = self
            .schema
            .definition_by_name(name.node.as_str())
            .ok_or_else(|| CompileError::UnknownType {
                name: name.node.to_string(),
                location: name.pos.into(),
            })?;
        let Some(ty) = definition.as_composite_type() else {
            return Err(CompileError::InvalidTypeCondition {
                name: name.node.to_string(),
                location: name.pos.into(),
            });
        };
        Ok(self.schema.is_possible_type(ty, self.object_id))
    }
}
