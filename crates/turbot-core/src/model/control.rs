// ── Control (read-only) ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Observed state of a control.
///
/// Located either by `id`, or by the pair (`uri`, `resource`) naming a
/// control type attached to a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Details as JSON text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Flattened `turbot` metadata block.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub turbot: BTreeMap<String, String>,
}

impl ControlState {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn by_uri(uri: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            resource: Some(resource.into()),
            ..Self::default()
        }
    }
}
