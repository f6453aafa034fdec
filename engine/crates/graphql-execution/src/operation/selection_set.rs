use std::collections::HashMap;

use schema::{FieldDefinitionId, ObjectDefinitionId, TypeRecord};

use super::{Location, SelectionId, SelectionSetId};

/// Selections of a single concrete object type, in response order.
#[derive(Debug, Clone)]
pub struct SelectionSet {
    pub(crate) id: SelectionSetId,
    pub(crate) object_id: ObjectDefinitionId,
    pub(crate) selection_ids: Vec<SelectionId>,
    /// Position of each selection within `selection_ids`, by response name.
    pub(crate) positions: HashMap<String, usize>,
    pub(crate) is_conditional: bool,
}

impl SelectionSet {
    pub fn id(&self) -> SelectionSetId {
        self.id
    }

    pub fn object_id(&self) -> ObjectDefinitionId {
        self.object_id
    }

    pub fn selection_ids(&self) -> &[SelectionId] {
        &self.selection_ids
    }

    pub fn position_of(&self, response_name: &str) -> Option<usize> {
        self.positions.get(response_name).copied()
    }

    pub fn len(&self) -> usize {
        self.selection_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selection_ids.is_empty()
    }

    /// Whether some selection depends on `@skip`/`@include` variables.
    pub fn is_conditional(&self) -> bool {
        self.is_conditional
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Leaf,
    Object,
    List,
}

/// An occurrence of a field in the document that was merged into a [`Selection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelectionNode {
    pub location: Location,
    /// Conditions that must all hold for this occurrence to be reached.
    pub include_flags: u64,
}

/// All the occurrences of a response name within a selection set, merged.
#[derive(Debug, Clone)]
pub struct Selection {
    pub(crate) id: SelectionId,
    pub(crate) response_name: String,
    /// `None` for `__typename`
    pub(crate) definition_id: Option<FieldDefinitionId>,
    pub(crate) ty: TypeRecord,
    pub(crate) kind: SelectionKind,
    pub(crate) nodes: Vec<FieldSelectionNode>,
    /// Collapsed disjunction of the node flags, empty if unconditional.
    pub(crate) include_flags: Vec<u64>,
    /// Sorted by object id, one per possible type of the field.
    pub(crate) selection_sets: Vec<(ObjectDefinitionId, SelectionSetId)>,
    pub(crate) declaring_selection_set_id: SelectionSetId,
}

impl Selection {
    pub fn id(&self) -> SelectionId {
        self.id
    }

    pub fn response_name(&self) -> &str {
        &self.response_name
    }

    pub fn definition_id(&self) -> Option<FieldDefinitionId> {
        self.definition_id
    }

    pub fn is_typename(&self) -> bool {
        self.definition_id.is_none()
    }

    pub fn ty(&self) -> TypeRecord {
        self.ty
    }

    pub fn kind(&self) -> SelectionKind {
        self.kind
    }

    pub fn nodes(&self) -> &[FieldSelectionNode] {
        &self.nodes
    }

    pub fn location(&self) -> Location {
        self.nodes[0].location
    }

    pub fn include_flags(&self) -> &[u64] {
        &self.include_flags
    }

    pub fn is_conditional(&self) -> bool {
        !self.include_flags.is_empty()
    }

    /// A selection is included if all conditions of at least one of its paths hold.
    pub fn is_included(&self, include_flags: u64) -> bool {
        self.include_flags.is_empty() || self.include_flags.iter().any(|&mask| mask & include_flags == mask)
    }

    pub fn selection_sets(&self) -> &[(ObjectDefinitionId, SelectionSetId)] {
        &self.selection_sets
    }

    /// The selection set to use when the field value is an `object_id`.
    pub fn selection_set_for(&self, object_id: ObjectDefinitionId) -> Option<SelectionSetId> {
        self.selection_sets
            .binary_search_by_key(&object_id, |(id, _)| *id)
            .ok()
            .map(|index| self.selection_sets[index].1)
    }

    pub fn declaring_selection_set_id(&self) -> SelectionSetId {
        self.declaring_selection_set_id
    }
}
