use schema::TypeRecord;

use super::{ListResultId, ObjectResultId, ResultNodeId, ResultParent};

/// A list of the response. Null items are `null`/`None`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedListResult<T> {
    parent: Option<ResultParent>,
    element_type: Option<TypeRecord>,
    items: Vec<T>,
}

pub type LeafListResult = TypedListResult<serde_json::Value>;
pub type ObjectListResult = TypedListResult<Option<ObjectResultId>>;
pub type NestedListResult = TypedListResult<Option<ListResultId>>;

impl<T> Default for TypedListResult<T> {
    fn default() -> Self {
        Self {
            parent: None,
            element_type: None,
            items: Vec::new(),
        }
    }
}

impl<T: Default> TypedListResult<T> {
    fn initialize(&mut self, element_type: TypeRecord, len: usize) {
        self.element_type = Some(element_type);
        self.items.clear();
        self.items.resize_with(len, T::default);
    }
}

impl<T> TypedListResult<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    fn reset(&mut self) {
        self.parent = None;
        self.element_type = None;
        self.items.clear();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListResult {
    Leaf(LeafListResult),
    Object(ObjectListResult),
    Nested(NestedListResult),
}

impl ListResult {
    /// Sizes the list with `len` null items.
    pub fn initialize(&mut self, element_type: TypeRecord, len: usize) {
        match self {
            ListResult::Leaf(list) => list.initialize(element_type, len),
            ListResult::Object(list) => list.initialize(element_type, len),
            ListResult::Nested(list) => list.initialize(element_type, len),
        }
    }

    pub fn parent(&self) -> Option<ResultParent> {
        match self {
            ListResult::Leaf(list) => list.parent,
            ListResult::Object(list) => list.parent,
            ListResult::Nested(list) => list.parent,
        }
    }

    pub fn set_parent(&mut self, parent: Option<ResultParent>) {
        match self {
            ListResult::Leaf(list) => list.parent = parent,
            ListResult::Object(list) => list.parent = parent,
            ListResult::Nested(list) => list.parent = parent,
        }
    }

    pub fn element_type(&self) -> Option<TypeRecord> {
        match self {
            ListResult::Leaf(list) => list.element_type,
            ListResult::Object(list) => list.element_type,
            ListResult::Nested(list) => list.element_type,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ListResult::Leaf(list) => list.items.len(),
            ListResult::Object(list) => list.items.len(),
            ListResult::Nested(list) => list.items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The object or list at `index`, if any.
    pub fn child(&self, index: usize) -> Option<ResultNodeId> {
        match self {
            ListResult::Leaf(_) => None,
            ListResult::Object(list) => list.items.get(index).copied().flatten().map(ResultNodeId::Object),
            ListResult::Nested(list) => list.items.get(index).copied().flatten().map(ResultNodeId::List),
        }
    }

    pub(crate) fn children(&self) -> Box<dyn Iterator<Item = ResultNodeId> + '_> {
        match self {
            ListResult::Leaf(_) => Box::new(std::iter::empty()),
            ListResult::Object(list) => Box::new(list.items.iter().flatten().copied().map(ResultNodeId::Object)),
            ListResult::Nested(list) => Box::new(list.items.iter().flatten().copied().map(ResultNodeId::List)),
        }
    }

    /// Sets the item to null, returning the node it held.
    pub(crate) fn set_null(&mut self, index: usize) -> Option<ResultNodeId> {
        let child = self.child(index);
        match self {
            ListResult::Leaf(list) => {
                if let Some(item) = list.items.get_mut(index) {
                    *item = serde_json::Value::Null;
                }
            }
            ListResult::Object(list) => {
                if let Some(item) = list.items.get_mut(index) {
                    *item = None;
                }
            }
            ListResult::Nested(list) => {
                if let Some(item) = list.items.get_mut(index) {
                    *item = None;
                }
            }
        }
        child
    }

    pub(crate) fn set_leaf(&mut self, index: usize, value: serde_json::Value) -> bool {
        match self {
            ListResult::Leaf(list) => list.items.get_mut(index).map(|item| *item = value).is_some(),
            _ => false,
        }
    }

    pub(crate) fn set_child(&mut self, index: usize, child: ResultNodeId) -> bool {
        match (self, child) {
            (ListResult::Object(list), ResultNodeId::Object(id)) => {
                list.items.get_mut(index).map(|item| *item = Some(id)).is_some()
            }
            (ListResult::Nested(list), ResultNodeId::List(id)) => {
                list.items.get_mut(index).map(|item| *item = Some(id)).is_some()
            }
            _ => false,
        }
    }

    /// Back to a fresh list of the same variant.
    pub fn reset(&mut self) {
        match self {
            ListResult::Leaf(list) => list.reset(),
            ListResult::Object(list) => list.reset(),
            ListResult::Nested(list) => list.reset(),
        }
    }
}
