// ── Folder ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A folder: a titled container for resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub parent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_akas: Option<Vec<String>>,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

impl FolderState {
    pub fn new(
        parent: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            parent: parent.into(),
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Tags with "absent" and "empty" treated alike.
    pub fn tags_or_empty(&self) -> BTreeMap<String, String> {
        self.tags.clone().unwrap_or_default()
    }
}
