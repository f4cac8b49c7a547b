use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a structural action applies.
///
/// Serialized as `"root"`, `{"section": "<id>"}` or `{"group": "<id>"}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// The document's root item list.
    Root,
    /// The section with this id, found anywhere in the tree.
    Section(String),
    /// The group with this id in the top-level group table.
    Group(String),
}

impl Target {
    pub fn section(id: impl Into<String>) -> Self {
        Self::Section(id.into())
    }

    pub fn group(id: impl Into<String>) -> Self {
        Self::Group(id.into())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Section(id) => write!(f, "section:{id}"),
            Self::Group(id) => write!(f, "group:{id}"),
        }
    }
}
