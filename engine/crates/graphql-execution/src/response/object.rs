use crate::operation::{Operation, SelectionSetId};

use super::{FieldResult, ResultNodeId, ResultParent};

/// An object of the response, mirroring one selection set.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ObjectResult {
    parent: Option<ResultParent>,
    selection_set_id: Option<SelectionSetId>,
    /// One slot per selection of the selection set, `None` if the selection is excluded.
    fields: Vec<Option<FieldResult>>,
}

impl ObjectResult {
    /// Creates the fields of every selection included with `include_flags`.
    pub fn initialize(&mut self, operation: &Operation, selection_set_id: SelectionSetId, include_flags: u64) {
        let selection_set = &operation[selection_set_id];
        self.selection_set_id = Some(selection_set_id);
        self.fields.clear();
        self.fields.extend(selection_set.selection_ids().iter().map(|id| {
            let selection = &operation[*id];
            if selection.is_included(include_flags) {
                Some(FieldResult::new(selection))
            } else {
                None
            }
        }));
    }

    pub fn is_initialized(&self) -> bool {
        self.selection_set_id.is_some()
    }

    pub fn selection_set_id(&self) -> Option<SelectionSetId> {
        self.selection_set_id
    }

    pub fn parent(&self) -> Option<ResultParent> {
        self.parent
    }

    pub fn set_parent(&mut self, parent: Option<ResultParent>) {
        self.parent = parent;
    }

    pub fn fields(&self) -> &[Option<FieldResult>] {
        &self.fields
    }

    /// `None` if the field is excluded.
    pub fn field(&self, index: usize) -> Option<&FieldResult> {
        self.fields.get(index).and_then(Option::as_ref)
    }

    pub fn field_mut(&mut self, index: usize) -> Option<&mut FieldResult> {
        self.fields.get_mut(index).and_then(Option::as_mut)
    }

    pub fn field_by_name(&self, operation: &Operation, response_name: &str) -> Option<&FieldResult> {
        let position = operation.position_of(self.selection_set_id?, response_name)?;
        self.field(position)
    }

    pub(crate) fn children(&self) -> impl Iterator<Item = ResultNodeId> + '_ {
        self.fields.iter().flatten().filter_map(FieldResult::child)
    }

    pub fn reset(&mut self) {
        self.parent = None;
        self.selection_set_id = None;
        self.fields.clear();
    }
}
