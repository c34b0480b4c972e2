// ── Generic resource ──

use serde::{Deserialize, Serialize};

/// A resource of arbitrary type whose properties travel as a JSON body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Declared parent: an id or any of its akas.
    pub parent: String,
    /// Computed: every identifier the parent answers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_akas: Option<Vec<String>>,
    /// Resource type URI. Changing it requires replacement.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// JSON object text, stored normalized.
    pub body: String,
}

impl ResourceState {
    pub fn new(
        parent: impl Into<String>,
        resource_type: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            parent: parent.into(),
            resource_type: resource_type.into(),
            body: body.into(),
            ..Self::default()
        }
    }
}
