use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum SelectionPathSegment {
    Field(String),
    Index(usize),
}

impl From<&str> for SelectionPathSegment {
    fn from(name: &str) -> Self {
        SelectionPathSegment::Field(name.to_string())
    }
}

impl From<String> for SelectionPathSegment {
    fn from(name: String) -> Self {
        SelectionPathSegment::Field(name)
    }
}

impl From<usize> for SelectionPathSegment {
    fn from(index: usize) -> Self {
        SelectionPathSegment::Index(index)
    }
}

/// Location in the response made of response names and list indices, serialized as a GraphQL error
/// path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SelectionPath(Vec<SelectionPathSegment>);

impl SelectionPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.0.push(SelectionPathSegment::Field(name.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.0.push(SelectionPathSegment::Index(index));
        self
    }

    pub fn push(&mut self, segment: impl Into<SelectionPathSegment>) {
        self.0.push(segment.into());
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[SelectionPathSegment] {
        &self.0
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &SelectionPathSegment> + '_ {
        self.0.iter()
    }
}

impl<S: Into<SelectionPathSegment>> FromIterator<S> for SelectionPath {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<SelectionPathSegment>> Extend<S> for SelectionPath {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl fmt::Display for SelectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                SelectionPathSegment::Field(name) if i == 0 => write!(f, "{name}")?,
                SelectionPathSegment::Field(name) => write!(f, ".{name}")?,
                SelectionPathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_serialize() {
        let path = SelectionPath::root().field("products").index(3).field("name");
        assert_eq!(path.to_string(), "products[3].name");
        assert_eq!(serde_json::to_value(&path).unwrap(), serde_json::json!(["products", 3, "name"]));
        assert_eq!(SelectionPath::root().to_string(), "(root)");

        let parsed: SelectionPath = serde_json::from_value(serde_json::json!(["products", 3, "name"])).unwrap();
        assert_eq!(parsed, path);
    }
}
