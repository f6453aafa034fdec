use std::sync::{Arc, Mutex, PoisonError};

use schema::{Schema, TypeRecord};
use serde_json::Value;

use super::{ExecutionError, ExecutionResult, ValueCompletion};
use crate::{
    config::{ErrorHandling, ExecutionConfig},
    operation::{Operation, Variables},
    response::{
        FieldError, ListResult, ObjectResultId, Response, ResultNodeId, ResultParent, ResultPoolSession,
        SelectionPath, SelectionPathSegment,
    },
};

/// Data returned by a fetch for the object at `path` of the response.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSchemaResult {
    pub path: SelectionPath,
    pub data: Value,
    /// Where the object sits within `data`, the root if empty.
    pub data_path: SelectionPath,
}

impl SourceSchemaResult {
    pub fn new(path: SelectionPath, data: Value) -> Self {
        Self {
            path,
            data,
            data_path: SelectionPath::root(),
        }
    }

    pub fn with_data_path(mut self, data_path: SelectionPath) -> Self {
        self.data_path = data_path;
        self
    }

    fn object_data(&self) -> Option<&Value> {
        self.data_path.iter().try_fold(&self.data, |data, segment| match segment {
            SelectionPathSegment::Field(name) => data.get(name.as_str()),
            SelectionPathSegment::Index(index) => data.get(*index),
        })
    }
}

/// The result tree of a request, written into by every fetch of the request.
pub struct FetchResultStore {
    schema: Arc<Schema>,
    operation: Arc<Operation>,
    config: ExecutionConfig,
    include_flags: u64,
    pool: ResultPoolSession,
    root_id: ObjectResultId,
    data_is_null: bool,
    errors: Vec<FieldError>,
}

impl FetchResultStore {
    pub fn new(schema: Arc<Schema>, operation: Arc<Operation>, config: ExecutionConfig, variables: &Variables) -> Self {
        let capacity = operation.last_selection_id().map(usize::from).unwrap_or_default() + 1;
        Self::with_session(
            ResultPoolSession::with_capacity(capacity),
            schema,
            operation,
            config,
            variables,
        )
    }

    /// Re-uses the buffers of a session from a previous request.
    pub fn with_session(
        mut pool: ResultPoolSession,
        schema: Arc<Schema>,
        operation: Arc<Operation>,
        config: ExecutionConfig,
        variables: &Variables,
    ) -> Self {
        pool.clear();
        let include_flags = operation.create_include_flags(variables);
        let root_id = pool.rent_object_result();
        tracing::debug!("Created result store with include flags {include_flags:#b}");

        Self {
            schema,
            operation,
            config,
            include_flags,
            pool,
            root_id,
            data_is_null: false,
            errors: Vec::new(),
        }
    }

    pub fn include_flags(&self) -> u64 {
        self.include_flags
    }

    pub fn root_id(&self) -> ObjectResultId {
        self.root_id
    }

    pub fn session(&self) -> &ResultPoolSession {
        &self.pool
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_data_null(&self) -> bool {
        self.data_is_null
    }

    /// Completes the fetched data into the object at its path.
    ///
    /// Returns `false` if a non-null violation nulled the target object or one of its ancestors, or
    /// if the data was halted. In `Null` error handling any violation returns `false`. A violation
    /// absorbed by a nullable field below the target returns `true`. Fetches targeting a position
    /// that was nulled in the meantime are ignored and return `false`.
    ///
    /// Non-null fields missing from the fetched data stay pending, as a later fetch may provide them,
    /// so they don't count as violations here. `finish` reports them.
    #[tracing::instrument(skip_all, fields(path = %result.path))]
    pub fn save(&mut self, result: &SourceSchemaResult) -> ExecutionResult<bool> {
        if self.data_is_null {
            tracing::debug!("Data was nulled, ignoring fetch result");
            return Ok(false);
        }

        let data = result
            .object_data()
            .ok_or_else(|| ExecutionError::InvalidFetchData {
                path: result.path.clone(),
            })?;

        let Some(object_id) = self.get_start_result(&result.path)? else {
            tracing::debug!("Target object was nulled, ignoring fetch result");
            return Ok(false);
        };

        let object = &mut self.pool[object_id];
        if !object.is_initialized() {
            object.initialize(&self.operation, self.operation.root_selection_set_id(), self.include_flags);
        }

        if data.is_null() {
            self.propagate(ResultNodeId::Object(object_id));
            return Ok(false);
        }

        let mut completion = ValueCompletion::new(&self.schema, &self.operation, &self.config, self.include_flags);
        let valid = completion.build_result(&mut self.pool, object_id, data, &result.path);
        let halted = completion.is_halted();
        self.errors.extend(completion.into_errors());
        let valid = valid?;

        if halted {
            self.null_data();
        } else if !valid && self.config.error_handling == ErrorHandling::Propagate {
            self.propagate(ResultNodeId::Object(object_id));
        }

        Ok(valid && !halted)
    }

    /// Walks the path from the root. `None` if a position along it is null.
    pub fn get_start_result(&self, path: &SelectionPath) -> ExecutionResult<Option<ObjectResultId>> {
        let mut node = ResultNodeId::Object(self.root_id);

        for (i, segment) in path.iter().enumerate() {
            let not_found = |reason: &str| ExecutionError::PathNotFound {
                path: path.segments()[..=i].iter().cloned().collect(),
                reason: reason.to_string(),
            };

            node = match (node, segment) {
                (ResultNodeId::Object(object_id), SelectionPathSegment::Field(name)) => {
                    let Some(field) = self.pool[object_id].field_by_name(&self.operation, name) else {
                        return Err(not_found("no such field"));
                    };
                    if field.is_null() {
                        return Ok(None);
                    }
                    match field.child() {
                        Some(child) => child,
                        None => return Err(not_found("field holds no object or list")),
                    }
                }
                (ResultNodeId::List(list_id), SelectionPathSegment::Index(index)) => {
                    let list = &self.pool[list_id];
                    if *index >= list.len() || matches!(list, ListResult::Leaf(_)) {
                        return Err(not_found("no such list item"));
                    }
                    match list.child(*index) {
                        Some(child) => child,
                        None => return Ok(None),
                    }
                }
                (ResultNodeId::Object(_), SelectionPathSegment::Index(_)) => {
                    return Err(not_found("expected a field name for an object"))
                }
                (ResultNodeId::List(_), SelectionPathSegment::Field(_)) => {
                    return Err(not_found("expected an index for a list"))
                }
            };
        }

        match node {
            ResultNodeId::Object(object_id) => Ok(Some(object_id)),
            ResultNodeId::List(_) => Err(ExecutionError::PathNotFound {
                path: path.clone(),
                reason: "path leads to a list".into(),
            }),
        }
    }

    /// Completes the fields no fetch provided as null and returns the response.
    pub fn finish(mut self) -> ExecutionResult<Response> {
        if !self.data_is_null {
            self.complete_missing()?;
        }

        Ok(Response {
            root: (!self.data_is_null).then_some(self.root_id),
            operation: self.operation,
            pool: self.pool,
            errors: self.errors,
        })
    }

    fn complete_missing(&mut self) -> ExecutionResult<()> {
        let schema = self.schema.clone();
        let operation = self.operation.clone();

        if !self.pool[self.root_id].is_initialized() {
            self.pool[self.root_id].initialize(&operation, operation.root_selection_set_id(), self.include_flags);
        }

        let mut objects = Vec::new();
        let mut stack = vec![ResultNodeId::Object(self.root_id)];
        while let Some(node) = stack.pop() {
            match node {
                ResultNodeId::Object(id) => {
                    objects.push(id);
                    stack.extend(self.pool[id].children());
                }
                ResultNodeId::List(id) => stack.extend(self.pool[id].children()),
            }
        }

        let mut completion = ValueCompletion::new(&schema, &operation, &self.config, self.include_flags);
        // Descendants before their ancestors, so that propagation reaches objects not processed yet.
        for object_id in objects.into_iter().rev() {
            // returned to the pool by an earlier propagation
            if !self.pool[object_id].is_initialized() {
                continue;
            }
            let path = self.path_of(ResultNodeId::Object(object_id));
            let valid = completion.complete_missing(&mut self.pool, object_id, &path);
            self.errors.extend(completion.take_errors());
            let valid = valid?;

            if completion.is_halted() {
                self.null_data();
                break;
            }
            if !valid && self.config.error_handling == ErrorHandling::Propagate {
                self.propagate(ResultNodeId::Object(object_id));
                if self.data_is_null {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Nulls the position of `node`, moving up to the parent while that position is non-null.
    fn propagate(&mut self, mut node: ResultNodeId) {
        loop {
            let Some(parent) = self.pool.parent_of(node) else {
                self.null_data();
                return;
            };
            let required = self.slot_type(parent).is_some_and(|ty| ty.wrapping.is_required());
            tracing::trace!(?parent, required, "Nulling position");
            self.pool.set_slot_null(parent);

            if !required || self.config.error_handling == ErrorHandling::Null {
                return;
            }
            if self.config.error_handling == ErrorHandling::Halt {
                self.null_data();
                return;
            }
            node = match parent {
                ResultParent::Field { object_id, .. } => ResultNodeId::Object(object_id),
                ResultParent::Element { list_id, .. } => ResultNodeId::List(list_id),
            };
        }
    }

    fn null_data(&mut self) {
        tracing::debug!("Nulling the whole data");
        self.data_is_null = true;
    }

    fn slot_type(&self, slot: ResultParent) -> Option<TypeRecord> {
        match slot {
            ResultParent::Field { object_id, index } => {
                let selection_set_id = self.pool[object_id].selection_set_id()?;
                let selection_id = self.operation[selection_set_id].selection_ids().get(index)?;
                Some(self.operation[*selection_id].ty())
            }
            ResultParent::Element { list_id, .. } => self.pool[list_id].element_type(),
        }
    }

    /// Path of a node, rebuilt from the parent links.
    fn path_of(&self, mut node: ResultNodeId) -> SelectionPath {
        let mut segments = Vec::new();
        while let Some(parent) = self.pool.parent_of(node) {
            match parent {
                ResultParent::Field { object_id, index } => {
                    let name = self.pool[object_id]
                        .selection_set_id()
                        .and_then(|id| self.operation[id].selection_ids().get(index))
                        .map(|id| self.operation[*id].response_name().to_string())
                        .unwrap_or_default();
                    segments.push(SelectionPathSegment::Field(name));
                    node = ResultNodeId::Object(object_id);
                }
                ResultParent::Element { list_id, index } => {
                    segments.push(SelectionPathSegment::Index(index));
                    node = ResultNodeId::List(list_id);
                }
            }
        }
        segments.into_iter().rev().collect()
    }
}

/// A [`FetchResultStore`] shared by concurrent fetches, writes are serialized.
#[derive(Clone)]
pub struct SharedFetchResultStore(Arc<Mutex<FetchResultStore>>);

impl SharedFetchResultStore {
    pub fn new(store: FetchResultStore) -> Self {
        Self(Arc::new(Mutex::new(store)))
    }

    pub fn save(&self, result: &SourceSchemaResult) -> ExecutionResult<bool> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).save(result)
    }

    /// Fails if other clones are still alive.
    pub fn finish(self) -> ExecutionResult<Response> {
        let store = Arc::try_unwrap(self.0).map_err(|_| ExecutionError::StoreStillShared)?;
        store.into_inner().unwrap_or_else(PoisonError::into_inner).finish()
    }
}
