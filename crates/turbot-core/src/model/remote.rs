// ── Remote views ──
//
// What the workspace reports back, decoupled from the wire types in
// `turbot-api`. `convert.rs` builds these from client responses.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Identity block common to every remote entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityRef {
    pub id: String,
    pub parent_id: String,
    pub akas: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteResource {
    pub entity: EntityRef,
    /// Requested properties only, or everything when no projection was sent.
    pub data: Map<String, Value>,
}

/// Writable folder fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderFields {
    pub title: String,
    pub description: String,
    pub tags: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteFolder {
    pub entity: EntityRef,
    pub parent: String,
    pub fields: FolderFields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteMod {
    pub entity: EntityRef,
    pub parent: String,
    pub org: String,
    pub mod_name: String,
    pub installed_version: Option<String>,
}

/// One entry of a mod's published catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedVersion {
    pub version: String,
    pub status: String,
}

impl PublishedVersion {
    pub const AVAILABLE: &'static str = "available";

    pub fn available(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            status: Self::AVAILABLE.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == Self::AVAILABLE
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlSelector {
    Id(String),
    UriAndResource { uri: String, resource: String },
}

impl std::fmt::Display for ControlSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => f.write_str(id),
            Self::UriAndResource { uri, resource } => write!(f, "{uri} on {resource}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteControl {
    pub id: String,
    pub resource_id: String,
    pub type_uri: String,
    pub state: String,
    pub reason: Option<String>,
    pub details: Option<Value>,
    /// Remaining `turbot` metadata beyond id and resource id.
    pub metadata: BTreeMap<String, Value>,
}
