mod completion;
mod error;
mod store;

pub use completion::ValueCompletion;
pub use error::*;
pub use store::{FetchResultStore, SharedFetchResultStore, SourceSchemaResult};
