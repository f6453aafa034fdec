use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serialize,
};

use crate::operation::Operation;

use super::{FieldResult, ListResult, ObjectResultId, ResultNodeId, ResultPoolSession, SlotValue};

/// Serializes an object of the result tree, fields in selection order. Excluded fields are omitted.
pub struct ResponseDataView<'a> {
    pub(super) operation: &'a Operation,
    pub(super) pool: &'a ResultPoolSession,
    pub(super) object_id: ObjectResultId,
}

impl<'a> ResponseDataView<'a> {
    fn node(&self, node: Option<ResultNodeId>) -> NodeView<'a> {
        NodeView {
            operation: self.operation,
            pool: self.pool,
            node,
        }
    }
}

impl Serialize for ResponseDataView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let object = &self.pool[self.object_id];
        let mut map = serializer.serialize_map(None)?;
        let Some(selection_set_id) = object.selection_set_id() else {
            return map.end();
        };

        let selection_ids = self.operation[selection_set_id].selection_ids();
        for (field, selection_id) in object.fields().iter().zip(selection_ids) {
            let Some(field) = field else {
                continue;
            };
            let key = self.operation[*selection_id].response_name();
            match field {
                FieldResult::Leaf(field) => match &field.value {
                    SlotValue::Pending => continue,
                    SlotValue::Null => map.serialize_entry(key, &serde_json::Value::Null)?,
                    SlotValue::Value(value) => map.serialize_entry(key, value)?,
                },
                FieldResult::Object(field) => match field.value {
                    SlotValue::Pending => continue,
                    SlotValue::Null => map.serialize_entry(key, &serde_json::Value::Null)?,
                    SlotValue::Value(id) => map.serialize_entry(key, &self.node(Some(ResultNodeId::Object(id))))?,
                },
                FieldResult::List(field) => match field.value {
                    SlotValue::Pending => continue,
                    SlotValue::Null => map.serialize_entry(key, &serde_json::Value::Null)?,
                    SlotValue::Value(id) => map.serialize_entry(key, &self.node(Some(ResultNodeId::List(id))))?,
                },
            }
        }
        map.end()
    }
}

struct NodeView<'a> {
    operation: &'a Operation,
    pool: &'a ResultPoolSession,
    node: Option<ResultNodeId>,
}

impl Serialize for NodeView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let Some(node) = self.node else {
            return serializer.serialize_none();
        };
        match node {
            ResultNodeId::Object(object_id) => ResponseDataView {
                operation: self.operation,
                pool: self.pool,
                object_id,
            }
            .serialize(serializer),
            ResultNodeId::List(list_id) => match &self.pool[list_id] {
                ListResult::Leaf(list) => list.items().serialize(serializer),
                ListResult::Object(list) => {
                    let mut seq = serializer.serialize_seq(Some(list.items().len()))?;
                    for item in list.items() {
                        seq.serialize_element(&self.child(item.map(ResultNodeId::Object)))?;
                    }
                    seq.end()
                }
                ListResult::Nested(list) => {
                    let mut seq = serializer.serialize_seq(Some(list.items().len()))?;
                    for item in list.items() {
                        seq.serialize_element(&self.child(item.map(ResultNodeId::List)))?;
                    }
                    seq.end()
                }
            },
        }
    }
}

impl NodeView<'_> {
    fn child(&self, node: Option<ResultNodeId>) -> NodeView<'_> {
        NodeView {
            operation: self.operation,
            pool: self.pool,
            node,
        }
    }
}
