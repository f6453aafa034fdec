use super::{LeafListResult, ListResult, NestedListResult, ObjectListResult, ObjectResult};

id_newtypes::NonZeroU32! {
    ResultPoolSession.objects[ObjectResultId] => ObjectResult,
    ResultPoolSession.lists[ListResultId] => ListResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultNodeId {
    Object(ObjectResultId),
    List(ListResultId),
}

/// Where a node is attached in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultParent {
    Field { object_id: ObjectResultId, index: usize },
    Element { list_id: ListResultId, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Leaf,
    Object,
    Nested,
}

/// Arena of the result nodes of a request.
///
/// Nodes are rented and returned instead of being allocated and dropped, so a session re-used across
/// requests keeps its buffers. Ids are only meaningful within the session that issued them and
/// until the node is returned.
#[derive(Debug, Default)]
pub struct ResultPoolSession {
    objects: Vec<ObjectResult>,
    lists: Vec<ListResult>,
    free_objects: Vec<ObjectResultId>,
    free_leaf_lists: Vec<ListResultId>,
    free_object_lists: Vec<ListResultId>,
    free_nested_lists: Vec<ListResultId>,
}

impl ResultPoolSession {
    pub fn with_capacity(objects: usize) -> Self {
        Self {
            objects: Vec::with_capacity(objects),
            ..Default::default()
        }
    }

    pub fn rent_object_result(&mut self) -> ObjectResultId {
        if let Some(id) = self.free_objects.pop() {
            return id;
        }
        let id = ObjectResultId::from(self.objects.len());
        self.objects.push(ObjectResult::default());
        id
    }

    pub fn rent_leaf_list_result(&mut self) -> ListResultId {
        self.rent_list_result(ListKind::Leaf)
    }

    pub fn rent_object_list_result(&mut self) -> ListResultId {
        self.rent_list_result(ListKind::Object)
    }

    pub fn rent_nested_list_result(&mut self) -> ListResultId {
        self.rent_list_result(ListKind::Nested)
    }

    fn rent_list_result(&mut self, kind: ListKind) -> ListResultId {
        if let Some(id) = self.free_lists(kind).pop() {
            return id;
        }
        let id = ListResultId::from(self.lists.len());
        self.lists.push(match kind {
            ListKind::Leaf => ListResult::Leaf(LeafListResult::default()),
            ListKind::Object => ListResult::Object(ObjectListResult::default()),
            ListKind::Nested => ListResult::Nested(NestedListResult::default()),
        });
        id
    }

    fn free_lists(&mut self, kind: ListKind) -> &mut Vec<ListResultId> {
        match kind {
            ListKind::Leaf => &mut self.free_leaf_lists,
            ListKind::Object => &mut self.free_object_lists,
            ListKind::Nested => &mut self.free_nested_lists,
        }
    }

    /// Returns the object and all of its descendants to the pool.
    pub fn return_object_result(&mut self, id: ObjectResultId) {
        self.return_node(ResultNodeId::Object(id));
    }

    /// Returns the list and all of its descendants to the pool.
    pub fn return_list_result(&mut self, id: ListResultId) {
        self.return_node(ResultNodeId::List(id));
    }

    pub fn return_node(&mut self, node: ResultNodeId) {
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            match node {
                ResultNodeId::Object(id) => {
                    let object = &mut self.objects[usize::from(id)];
                    stack.extend(object.children());
                    object.reset();
                    self.free_objects.push(id);
                }
                ResultNodeId::List(id) => {
                    let list = &mut self.lists[usize::from(id)];
                    stack.extend(list.children());
                    list.reset();
                    let kind = match list {
                        ListResult::Leaf(_) => ListKind::Leaf,
                        ListResult::Object(_) => ListKind::Object,
                        ListResult::Nested(_) => ListKind::Nested,
                    };
                    self.free_lists(kind).push(id);
                }
            }
        }
    }

    pub fn object(&self, id: ObjectResultId) -> &ObjectResult {
        &self[id]
    }

    pub fn list(&self, id: ListResultId) -> &ListResult {
        &self[id]
    }

    pub fn parent_of(&self, node: ResultNodeId) -> Option<ResultParent> {
        match node {
            ResultNodeId::Object(id) => self[id].parent(),
            ResultNodeId::List(id) => self[id].parent(),
        }
    }

    /// Sets the slot to null, returning whatever it held to the pool.
    pub fn set_slot_null(&mut self, slot: ResultParent) {
        let child = match slot {
            ResultParent::Field { object_id, index } => self[object_id].field_mut(index).and_then(|field| field.set_null()),
            ResultParent::Element { list_id, index } => self[list_id].set_null(index),
        };
        if let Some(child) = child {
            self.return_node(child);
        }
    }

    pub fn set_slot_leaf(&mut self, slot: ResultParent, value: serde_json::Value) {
        let written = match slot {
            ResultParent::Field { object_id, index } => self[object_id]
                .field_mut(index)
                .is_some_and(|field| field.set_leaf(value)),
            ResultParent::Element { list_id, index } => self[list_id].set_leaf(index, value),
        };
        debug_assert!(written, "leaf written into a composite slot");
    }

    /// Stores `child` in the slot and records the slot as its parent.
    pub fn attach(&mut self, slot: ResultParent, child: ResultNodeId) {
        let written = match slot {
            ResultParent::Field { object_id, index } => self[object_id]
                .field_mut(index)
                .is_some_and(|field| field.set_child(child)),
            ResultParent::Element { list_id, index } => self[list_id].set_child(index, child),
        };
        debug_assert!(written, "{child:?} doesn't fit in {slot:?}");
        match child {
            ResultNodeId::Object(id) => self[id].set_parent(Some(slot)),
            ResultNodeId::List(id) => self[id].set_parent(Some(slot)),
        }
    }

    /// Number of nodes currently rented out.
    pub fn rented_count(&self) -> usize {
        let free = self.free_objects.len()
            + self.free_leaf_lists.len()
            + self.free_object_lists.len()
            + self.free_nested_lists.len();
        self.objects.len() + self.lists.len() - free
    }

    /// Returns every node to the pool.
    pub fn clear(&mut self) {
        self.free_objects.clear();
        self.free_leaf_lists.clear();
        self.free_object_lists.clear();
        self.free_nested_lists.clear();

        for (index, object) in self.objects.iter_mut().enumerate().rev() {
            object.reset();
            self.free_objects.push(ObjectResultId::from(index));
        }
        for (index, list) in self.lists.iter_mut().enumerate().rev() {
            list.reset();
            let free = match list {
                ListResult::Leaf(_) => &mut self.free_leaf_lists,
                ListResult::Object(_) => &mut self.free_object_lists,
                ListResult::Nested(_) => &mut self.free_nested_lists,
            };
            free.push(ListResultId::from(index));
        }
    }
}
