use crate::operation::{Selection, SelectionId, SelectionKind};

use super::{ListResultId, ObjectResultId, ResultNodeId};

/// State of a position in the result tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue<T> {
    /// Nothing was written yet, another fetch may still provide it.
    Pending,
    Null,
    Value(T),
}

impl<T> Default for SlotValue<T> {
    fn default() -> Self {
        SlotValue::Pending
    }
}

impl<T> SlotValue<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, SlotValue::Pending)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SlotValue::Null)
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            SlotValue::Value(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct LeafFieldResult {
    pub(crate) selection_id: Option<SelectionId>,
    pub(crate) value: SlotValue<serde_json::Value>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ObjectFieldResult {
    pub(crate) selection_id: Option<SelectionId>,
    pub(crate) value: SlotValue<ObjectResultId>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListFieldResult {
    pub(crate) selection_id: Option<SelectionId>,
    pub(crate) value: SlotValue<ListResultId>,
}

/// Field of an [`ObjectResult`](super::ObjectResult), shaped after its selection.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldResult {
    Leaf(LeafFieldResult),
    Object(ObjectFieldResult),
    List(ListFieldResult),
}

impl FieldResult {
    pub fn new(selection: &Selection) -> Self {
        let selection_id = Some(selection.id());
        match selection.kind() {
            SelectionKind::Leaf => FieldResult::Leaf(LeafFieldResult {
                selection_id,
                value: SlotValue::Pending,
            }),
            SelectionKind::Object => FieldResult::Object(ObjectFieldResult {
                selection_id,
                value: SlotValue::Pending,
            }),
            SelectionKind::List => FieldResult::List(ListFieldResult {
                selection_id,
                value: SlotValue::Pending,
            }),
        }
    }

    pub fn selection_id(&self) -> Option<SelectionId> {
        match self {
            FieldResult::Leaf(field) => field.selection_id,
            FieldResult::Object(field) => field.selection_id,
            FieldResult::List(field) => field.selection_id,
        }
    }

    pub fn is_pending(&self) -> bool {
        match self {
            FieldResult::Leaf(field) => field.value.is_pending(),
            FieldResult::Object(field) => field.value.is_pending(),
            FieldResult::List(field) => field.value.is_pending(),
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            FieldResult::Leaf(field) => field.value.is_null(),
            FieldResult::Object(field) => field.value.is_null(),
            FieldResult::List(field) => field.value.is_null(),
        }
    }

    pub fn as_leaf(&self) -> Option<&serde_json::Value> {
        match self {
            FieldResult::Leaf(field) => field.value.as_value(),
            _ => None,
        }
    }

    /// The object or list stored in this field, if any.
    pub fn child(&self) -> Option<ResultNodeId> {
        match self {
            FieldResult::Leaf(_) => None,
            FieldResult::Object(field) => field.value.as_value().copied().map(ResultNodeId::Object),
            FieldResult::List(field) => field.value.as_value().copied().map(ResultNodeId::List),
        }
    }

    /// Sets the field to null, returning the node it held.
    pub(crate) fn set_null(&mut self) -> Option<ResultNodeId> {
        let child = self.child();
        match self {
            FieldResult::Leaf(field) => field.value = SlotValue::Null,
            FieldResult::Object(field) => field.value = SlotValue::Null,
            FieldResult::List(field) => field.value = SlotValue::Null,
        }
        child
    }

    pub(crate) fn set_leaf(&mut self, value: serde_json::Value) -> bool {
        match self {
            FieldResult::Leaf(field) => {
                field.value = SlotValue::Value(value);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_child(&mut self, child: ResultNodeId) -> bool {
        match (self, child) {
            (FieldResult::Object(field), ResultNodeId::Object(id)) => {
                field.value = SlotValue::Value(id);
                true
            }
            (FieldResult::List(field), ResultNodeId::List(id)) => {
                field.value = SlotValue::Value(id);
                true
            }
            _ => false,
        }
    }

    /// Back to the state of a field that was never bound to a selection. The variant is kept.
    pub fn reset(&mut self) {
        match self {
            FieldResult::Leaf(field) => *field = LeafFieldResult::default(),
            FieldResult::Object(field) => *field = ObjectFieldResult::default(),
            FieldResult::List(field) => *field = ListFieldResult::default(),
        }
    }
}
