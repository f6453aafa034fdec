use schema::{CompositeTypeId, ObjectDefinitionId};
use serde_json::{Map, Value};

use super::ValueCompletion;
use crate::{
    config::ErrorHandling,
    execution::ExecutionResult,
    operation::Selection,
    response::{ObjectResultId, ResultNodeId, ResultParent, ResultPoolSession},
};

impl ValueCompletion<'_> {
    pub(super) fn complete_object(
        &mut self,
        pool: &mut ResultPoolSession,
        selection: &Selection,
        object_id: ObjectDefinitionId,
        value: &Value,
        depth: usize,
        slot: ResultParent,
    ) -> ExecutionResult<bool> {
        self.assert_depth_allowed(depth)?;

        let Value::Object(data) = value else {
            self.field_error(format!(
                "Expected an object of type {}, got: {value}",
                self.schema[object_id].name
            ));
            return Ok(false);
        };

        let Some(selection_set_id) = selection.selection_set_for(object_id) else {
            self.field_error(format!(
                "Type {} is not a possible type of field '{}'",
                self.schema[object_id].name,
                selection.response_name()
            ));
            return Ok(false);
        };

        let child = pool.rent_object_result();
        pool[child].initialize(self.operation, selection_set_id, self.include_flags);
        pool.attach(slot, ResultNodeId::Object(child));

        let valid = self.complete_fields(pool, child, Some(data), depth)?;
        Ok(valid || self.error_handling == ErrorHandling::Null)
    }

    /// Resolves the object type from `__typename`, or from the type itself if it has a single
    /// possible type.
    pub(super) fn complete_abstract(
        &mut self,
        pool: &mut ResultPoolSession,
        selection: &Selection,
        ty: CompositeTypeId,
        value: &Value,
        depth: usize,
        slot: ResultParent,
    ) -> ExecutionResult<bool> {
        let schema = self.schema;
        let Value::Object(data) = value else {
            self.field_error(format!(
                "Expected an object of type {}, got: {value}",
                schema.composite_type_name(ty)
            ));
            return Ok(false);
        };

        let object_id = match data.get("__typename").and_then(Value::as_str) {
            Some(typename) => match schema.object_by_name(typename) {
                Some(object_id) if schema.is_possible_type(ty, object_id) => object_id,
                _ => {
                    self.field_error(format!(
                        "'{typename}' is not a possible type of {}",
                        schema.composite_type_name(ty)
                    ));
                    return Ok(false);
                }
            },
            None => match schema.possible_types(ty).as_ref() {
                [object_id] => *object_id,
                _ => {
                    self.field_error(format!(
                        "Missing __typename to resolve the object type of {}",
                        schema.composite_type_name(ty)
                    ));
                    return Ok(false);
                }
            },
        };

        self.complete_object(pool, selection, object_id, value, depth, slot)
    }

    /// Completes more fields of an object another fetch already wrote.
    pub(super) fn merge_object(
        &mut self,
        pool: &mut ResultPoolSession,
        object_id: ObjectResultId,
        data: &Map<String, Value>,
        depth: usize,
    ) -> ExecutionResult<bool> {
        self.assert_depth_allowed(depth)?;
        let valid = self.complete_fields(pool, object_id, Some(data), depth)?;
        Ok(valid || self.error_handling == ErrorHandling::Null)
    }
}
