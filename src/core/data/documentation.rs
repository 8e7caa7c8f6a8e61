use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One documentation tag after merging.
///
/// Repeated tags of the same name hold their values joined with `\n`, in the
/// order they were written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationTag {
    pub name: String,
    pub value: String,
}

impl DocumentationTag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Normalized documentation of a symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationComment {
    pub description: String,
    /// Tags by name, in first-encounter order.
    pub tags: IndexMap<String, DocumentationTag>,
}

impl DocumentationComment {
    pub fn tag(&self, name: &str) -> Option<&DocumentationTag> {
        self.tags.get(name)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }
}
