use schema::TypeRecord;
use serde_json::Value;

use super::{PathFrame, ValueCompletion};
use crate::{
    config::ErrorHandling,
    execution::ExecutionResult,
    operation::Selection,
    response::{ResultNodeId, ResultParent, ResultPoolSession},
};

impl ValueCompletion<'_> {
    /// A null item of a non-null item type nulls the whole list.
    pub(super) fn complete_list(
        &mut self,
        pool: &mut ResultPoolSession,
        selection: &Selection,
        item_ty: TypeRecord,
        value: &Value,
        depth: usize,
        slot: ResultParent,
    ) -> ExecutionResult<bool> {
        self.assert_depth_allowed(depth)?;

        let Value::Array(items) = value else {
            self.field_error(format!("Expected a list, got: {value}"));
            return Ok(false);
        };

        let list_id = if item_ty.wrapping.is_list() {
            pool.rent_nested_list_result()
        } else if item_ty.definition_id.as_composite_type().is_some() {
            pool.rent_object_list_result()
        } else {
            pool.rent_leaf_list_result()
        };
        pool[list_id].initialize(item_ty, items.len());
        pool.attach(slot, ResultNodeId::List(list_id));

        let mut valid = true;
        for (index, item) in items.iter().enumerate() {
            self.path.push(PathFrame::Index(index));
            let result = self.try_complete_value(
                pool,
                selection,
                item_ty,
                Some(item),
                depth,
                ResultParent::Element { list_id, index },
            );
            self.path.pop();

            if !result? {
                valid = false;
                if self.error_handling != ErrorHandling::Null {
                    return Ok(false);
                }
            }
        }

        Ok(valid || self.error_handling == ErrorHandling::Null)
    }
}
