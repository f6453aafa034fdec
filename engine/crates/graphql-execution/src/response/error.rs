use super::SelectionPath;

/// An error that nulled a position of the response, reported alongside the data.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FieldError {
    pub message: String,
    pub path: SelectionPath,
}

impl FieldError {
    pub fn new(message: impl Into<String>, path: SelectionPath) -> Self {
        Self {
            message: message.into(),
            path,
        }
    }
}
