use std::collections::HashSet;

use async_graphql_parser::{
    types::{FragmentSpread, Selection, SelectionSet},
    Positioned,
};

use super::{CompileError, CompileResult};
use crate::operation::ParsedOperation;

/// Rejects unknown fragments and fragment cycles before any selection set is built, whether the
/// cycle goes through fields or not.
pub(super) fn validate_fragments(parsed: &ParsedOperation) -> CompileResult<()> {
    Visitor {
        parsed,
        current_fragments_stack: Vec::new(),
        acyclic_fragments: HashSet::new(),
    }
    .visit_selection_set(&parsed.definition.selection_set.node)
}

struct Visitor<'p> {
    parsed: &'p ParsedOperation,
    current_fragments_stack: Vec<&'p str>,
    // fully visited without finding a cycle
    acyclic_fragments: HashSet<&'p str>,
}

impl<'p> Visitor<'p> {
    fn visit_selection_set(&mut self, selection_set: &'p SelectionSet) -> CompileResult<()> {
        for item in &selection_set.items {
            match &item.node {
                Selection::Field(field) => self.visit_selection_set(&field.node.selection_set.node)?,
                Selection::InlineFragment(fragment) => self.visit_selection_set(&fragment.node.selection_set.node)?,
                Selection::FragmentSpread(spread) => self.visit_fragment_spread(spread)?,
            }
        }
        Ok(())
    }

    fn visit_fragment_spread(&mut self, spread: &'p Positioned<FragmentSpread>) -> CompileResult<()> {
        let name = spread.node.fragment_name.node.as_str();
        if let Some(start) = self.current_fragments_stack.iter().position(|fragment| *fragment == name) {
            let mut cycle = self.current_fragments_stack[start..]
                .iter()
                .map(|fragment| fragment.to_string())
                .collect::<Vec<_>>();
            cycle.push(name.to_string());
            return Err(CompileError::FragmentCycle {
                cycle,
                location: spread.pos.into(),
            });
        }
        if self.acyclic_fragments.contains(name) {
            return Ok(());
        }
        let Some(fragment) = self.parsed.get_fragment(name) else {
            return Err(CompileError::UnknownFragment {
                name: name.to_string(),
                location: spread.pos.into(),
            });
        };

        self.current_fragments_stack.push(name);
        self.visit_selection_set(&fragment.node.selection_set.node)?;
        self.current_fragments_stack.pop();
        self.acyclic_fragments.insert(name);

        Ok(())
    }
}
