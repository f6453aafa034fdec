use std::sync::{Arc, Mutex, PoisonError};

use schema::Schema;

use super::{CompileResult, Operation, OperationCompiler, OperationId, ParsedOperation};

type Slot = Arc<Mutex<Option<Arc<Operation>>>>;

/// Bounded cache of compiled operations for a single schema.
///
/// Concurrent requests for the same document compile it only once: the first one holds the slot
/// lock while compiling and the others wait for its result. Failed compilations aren't cached.
pub struct OperationCache {
    schema: Arc<Schema>,
    slots: mini_moka::sync::Cache<OperationId, Slot>,
    insert_lock: Mutex<()>,
}

impl OperationCache {
    pub fn new(schema: Arc<Schema>, capacity: u64) -> Self {
        Self {
            schema,
            slots: mini_moka::sync::Cache::builder().max_capacity(capacity).build(),
            insert_lock: Mutex::new(()),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn get_or_compile(&self, document: &str, operation_name: Option<&str>) -> CompileResult<Arc<Operation>> {
        let id = OperationId::new(document, operation_name);
        let slot = self.slot(id);
        let mut operation = slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(operation) = operation.as_ref() {
            tracing::trace!(operation_id = %id, "Operation cache hit");
            return Ok(operation.clone());
        }

        tracing::debug!(operation_id = %id, "Operation cache miss");
        let parsed = ParsedOperation::parse(document, operation_name)?;
        let compiled = Arc::new(OperationCompiler::new(&self.schema).compile(&parsed)?);
        *operation = Some(compiled.clone());

        Ok(compiled)
    }

    fn slot(&self, id: OperationId) -> Slot {
        let _guard = self.insert_lock.lock().unwrap_or_else(PoisonError::into_inner);
        match self.slots.get(&id) {
            Some(slot) => slot,
            None => {
                let slot = Slot::default();
                self.slots.insert(id, slot.clone());
                slot
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_once_per_document() {
        let schema = Arc::new(Schema::from_sdl("type Query { a: Int, b: Int }").unwrap());
        let cache = Arc::new(OperationCache::new(schema, 10));

        let operations = std::thread::scope(|scope| {
            let handles = (0..8)
                .map(|_| scope.spawn(|| cache.get_or_compile("{ a b }", None).unwrap()))
                .collect::<Vec<_>>();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect::<Vec<_>>()
        });

        for operation in &operations {
            assert!(Arc::ptr_eq(operation, &operations[0]));
        }

        let other = cache.get_or_compile("{ b }", None).unwrap();
        assert!(!Arc::ptr_eq(&other, &operations[0]));
    }

    #[test]
    fn errors_are_not_cached() {
        let schema = Arc::new(Schema::from_sdl("type Query { a: Int }").unwrap());
        let cache = OperationCache::new(schema, 10);

        assert!(cache.get_or_compile("{ unknown }", None).is_err());
        assert!(cache.get_or_compile("{ unknown }", None).is_err());
        assert!(cache.get_or_compile("{ a }", None).is_ok());
    }
}
