mod error;
mod field;
mod list;
mod object;
mod path;
mod pool;
mod ser;

use std::sync::Arc;

pub use error::FieldError;
pub use field::*;
pub use list::*;
pub use object::ObjectResult;
pub use path::{SelectionPath, SelectionPathSegment};
pub use pool::{ListResultId, ObjectResultId, ResultNodeId, ResultParent, ResultPoolSession};
pub use ser::ResponseDataView;

use crate::operation::Operation;

/// The completed data of a request and the errors raised while completing it.
pub struct Response {
    pub(crate) operation: Arc<Operation>,
    pub(crate) pool: ResultPoolSession,
    /// `None` if the data was nulled entirely.
    pub(crate) root: Option<ObjectResultId>,
    pub(crate) errors: Vec<FieldError>,
}

impl Response {
    pub fn data(&self) -> Option<ResponseDataView<'_>> {
        self.root.map(|object_id| ResponseDataView {
            operation: &self.operation,
            pool: &self.pool,
            object_id,
        })
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn operation(&self) -> &Arc<Operation> {
        &self.operation
    }

    /// Releases the result tree, giving back the emptied session for the next request.
    pub fn into_session(self) -> ResultPoolSession {
        let mut pool = self.pool;
        pool.clear();
        pool
    }
}

impl serde::Serialize for Response {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("data", &self.data())?;
        if !self.errors.is_empty() {
            map.serialize_entry("errors", &self.errors)?;
        }
        map.end()
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("root", &self.root)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}
