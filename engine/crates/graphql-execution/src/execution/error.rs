use crate::response::SelectionPath;

#[derive(thiserror::Error, Debug)]
pub enum ExecutionError {
    #[error("Maximum depth of {max_depth} exceeded at {path}.")]
    MaxDepthExceeded { max_depth: usize, path: SelectionPath },
    #[error("No result at {path} to write into: {reason}.")]
    PathNotFound { path: SelectionPath, reason: String },
    #[error("Fetched data for {path} is not an object.")]
    InvalidFetchData { path: SelectionPath },
    #[error("The result store is still shared with other writers.")]
    StoreStillShared,
}

pub type ExecutionResult<T> = Result<T, ExecutionError>;
