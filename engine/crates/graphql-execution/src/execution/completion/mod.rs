mod leaf;
mod list;
mod object;

use schema::{CompositeTypeId, DefinitionId, Schema, TypeRecord};
use serde_json::{Map, Value};

use super::{ExecutionError, ExecutionResult};
use crate::{
    config::{ErrorHandling, ExecutionConfig},
    operation::{Operation, Selection, SelectionId},
    response::{FieldError, FieldResult, ObjectResultId, ResultParent, ResultPoolSession, SelectionPath, SelectionPathSegment},
};

#[derive(Debug, Clone, Copy)]
enum PathFrame {
    Field(SelectionId),
    Index(usize),
}

/// Completes fetched JSON data into the result tree following the selection sets of the
/// operation, coercing leaves and applying null propagation.
pub struct ValueCompletion<'a> {
    schema: &'a Schema,
    operation: &'a Operation,
    include_flags: u64,
    max_depth: usize,
    error_handling: ErrorHandling,
    base_path: SelectionPath,
    path: Vec<PathFrame>,
    errors: Vec<FieldError>,
    violations: usize,
    halted: bool,
}

impl<'a> ValueCompletion<'a> {
    pub fn new(schema: &'a Schema, operation: &'a Operation, config: &ExecutionConfig, include_flags: u64) -> Self {
        Self {
            schema,
            operation,
            include_flags,
            max_depth: config.max_depth,
            error_handling: config.error_handling,
            base_path: SelectionPath::root(),
            path: Vec::new(),
            errors: Vec::new(),
            violations: 0,
            halted: false,
        }
    }

    pub fn with_error_handling(mut self, error_handling: ErrorHandling) -> Self {
        self.error_handling = error_handling;
        self
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<FieldError> {
        std::mem::take(&mut self.errors)
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// Number of non-null positions that ended up null.
    pub fn violations(&self) -> usize {
        self.violations
    }

    /// Whether a violation occurred with [`ErrorHandling::Halt`], in which case the whole data must be
    /// discarded.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Writes `data` into the fields of the initialized object `object_id` located at `path`. Fields
    /// absent from `data` are left pending for another fetch.
    ///
    /// Returns `false` if the object itself must be nulled by the caller, either because a non-null
    /// violation couldn't be absorbed within it or, with [`ErrorHandling::Null`], if any violation
    /// occurred.
    pub fn build_result(
        &mut self,
        pool: &mut ResultPoolSession,
        object_id: ObjectResultId,
        data: &Value,
        path: &SelectionPath,
    ) -> ExecutionResult<bool> {
        let Value::Object(data) = data else {
            return Err(ExecutionError::InvalidFetchData { path: path.clone() });
        };
        self.complete_object_fields(pool, object_id, Some(data), path)
    }

    /// Completes every field of `object_id` still pending as if its data was null.
    pub fn complete_missing(
        &mut self,
        pool: &mut ResultPoolSession,
        object_id: ObjectResultId,
        path: &SelectionPath,
    ) -> ExecutionResult<bool> {
        self.complete_object_fields(pool, object_id, None, path)
    }

    fn complete_object_fields(
        &mut self,
        pool: &mut ResultPoolSession,
        object_id: ObjectResultId,
        data: Option<&Map<String, Value>>,
        path: &SelectionPath,
    ) -> ExecutionResult<bool> {
        self.base_path = path.clone();
        self.path.clear();

        let violations = self.violations;
        let valid = self.complete_fields(pool, object_id, data, path.len())?;

        Ok(match self.error_handling {
            ErrorHandling::Null => self.violations == violations,
            ErrorHandling::Propagate | ErrorHandling::Halt => valid,
        })
    }

    /// With data, completes the fields present in it. Without, completes the pending fields as null.
    fn complete_fields(
        &mut self,
        pool: &mut ResultPoolSession,
        object_id: ObjectResultId,
        data: Option<&Map<String, Value>>,
        depth: usize,
    ) -> ExecutionResult<bool> {
        let operation = self.operation;
        let Some(selection_set_id) = pool[object_id].selection_set_id() else {
            return Ok(true);
        };
        let selection_set = &operation[selection_set_id];

        let mut valid = true;
        for (index, selection_id) in selection_set.selection_ids().iter().enumerate() {
            let Some(field) = pool[object_id].field(index) else {
                continue;
            };
            let is_pending = field.is_pending();
            let existing_object = match field {
                FieldResult::Object(field) => field.value.as_value().copied(),
                _ => None,
            };

            let selection = &operation[*selection_id];
            let slot = ResultParent::Field { object_id, index };

            if selection.is_typename() {
                if is_pending {
                    let name = self.schema[selection_set.object_id()].name.clone();
                    pool.set_slot_leaf(slot, Value::String(name));
                }
                continue;
            }

            let value = match data {
                Some(data) => match data.get(selection.response_name()) {
                    Some(value) => Some(value),
                    None => continue,
                },
                None if is_pending => None,
                None => continue,
            };

            self.path.push(PathFrame::Field(*selection_id));
            let result = match (existing_object, value) {
                // Another fetch already provided part of this object.
                (Some(child), Some(Value::Object(data))) => match self.merge_object(pool, child, data, depth + 1) {
                    Ok(false) => Ok(self.null_failed_slot(pool, selection.ty(), slot, false)),
                    result => result,
                },
                _ => {
                    if !is_pending {
                        pool.set_slot_null(slot);
                    }
                    self.try_complete_value(pool, selection, selection.ty(), value, depth, slot)
                }
            };
            self.path.pop();

            if !result? {
                valid = false;
                if self.error_handling != ErrorHandling::Null {
                    return Ok(false);
                }
            }
        }

        Ok(valid)
    }

    /// Completes a single value into `slot`. `None` stands for missing data.
    ///
    /// Returns `false` if the slot is non-null and couldn't be completed, so the caller must null its
    /// own position.
    fn try_complete_value(
        &mut self,
        pool: &mut ResultPoolSession,
        selection: &Selection,
        ty: TypeRecord,
        value: Option<&Value>,
        depth: usize,
        slot: ResultParent,
    ) -> ExecutionResult<bool> {
        let value = value.filter(|value| !value.is_null());

        let produced = match value {
            None => false,
            Some(value) => match ty.list_item() {
                Some(item_ty) => self.complete_list(pool, selection, item_ty, value, depth + 1, slot)?,
                None => match ty.definition_id {
                    DefinitionId::Object(object_id) => {
                        self.complete_object(pool, selection, object_id, value, depth + 1, slot)?
                    }
                    DefinitionId::Interface(id) => self.complete_abstract(
                        pool,
                        selection,
                        CompositeTypeId::Interface(id),
                        value,
                        depth + 1,
                        slot,
                    )?,
                    DefinitionId::Union(id) => {
                        self.complete_abstract(pool, selection, CompositeTypeId::Union(id), value, depth + 1, slot)?
                    }
                    DefinitionId::Scalar(_) | DefinitionId::Enum(_) => self.complete_leaf(pool, ty, value, slot),
                    DefinitionId::InputObject(_) => {
                        self.field_error(format!(
                            "Input type {} cannot be used as an output",
                            self.schema.type_display(ty)
                        ));
                        false
                    }
                },
            },
        };

        if produced {
            return Ok(true);
        }

        Ok(self.null_failed_slot(pool, ty, slot, value.is_none()))
    }

    /// Nulls a slot that couldn't be completed. Returns `false` if the slot is non-null, in which
    /// case the violation moves up to the caller's position. `report_null` records the violation
    /// as a field error, otherwise the error was already reported deeper in the tree.
    fn null_failed_slot(
        &mut self,
        pool: &mut ResultPoolSession,
        ty: TypeRecord,
        slot: ResultParent,
        report_null: bool,
    ) -> bool {
        pool.set_slot_null(slot);
        if !ty.wrapping.is_required() {
            return !self.halted;
        }

        if report_null {
            self.field_error(format!(
                "Cannot return null for non-nullable type {}",
                self.schema.type_display(ty)
            ));
        }
        self.violations += 1;
        if self.error_handling == ErrorHandling::Halt {
            self.halted = true;
        }
        false
    }

    fn assert_depth_allowed(&self, depth: usize) -> ExecutionResult<()> {
        if depth > self.max_depth {
            return Err(ExecutionError::MaxDepthExceeded {
                max_depth: self.max_depth,
                path: self.current_path(),
            });
        }
        Ok(())
    }

    fn current_path(&self) -> SelectionPath {
        let mut path = self.base_path.clone();
        path.extend(self.path.iter().map(|frame| match frame {
            PathFrame::Field(id) => SelectionPathSegment::Field(self.operation[*id].response_name().to_string()),
            PathFrame::Index(index) => SelectionPathSegment::Index(*index),
        }));
        path
    }

    fn field_error(&mut self, message: String) {
        let path = self.current_path();
        tracing::debug!(%path, "{message}");
        self.errors.push(FieldError::new(message, path));
    }
}
