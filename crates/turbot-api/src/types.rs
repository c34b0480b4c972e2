//! Request and response types for the Turbot workspace API.
//!
//! All types match the JSON bodies of the `/api/v5/` endpoints.
//! Field names use camelCase via `#[serde(rename_all = "camelCase")]`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Metadata ─────────────────────────────────────────────────────────

/// The `turbot` block attached to every entity response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurbotMetadata {
    pub id: String,
    #[serde(default)]
    pub parent_id: String,
    /// Human-assigned aliases. Absent when the entity has none.
    #[serde(default)]
    pub akas: Option<Vec<String>>,
}

/// Envelope returned by create/update/install calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub turbot: TurbotMetadata,
}

// ── Resources ────────────────────────────────────────────────────────

/// Resource — from `GET /resources/{id}`.
///
/// `data` holds only the properties that were requested (or every
/// property when no projection was sent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceResponse {
    pub turbot: TurbotMetadata,
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// Body for `POST /resources` and `PUT /resources/{id}`.
#[derive(Debug, Serialize)]
pub struct ResourceRequest<'a> {
    #[serde(rename = "type")]
    pub resource_type: &'a str,
    pub parent: &'a str,
    pub data: &'a Map<String, Value>,
}

// ── Folders ──────────────────────────────────────────────────────────

/// Folder properties sent on create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderProperties {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FolderRequest<'a> {
    pub parent: &'a str,
    #[serde(flatten)]
    pub properties: &'a FolderProperties,
}

/// Folder — from `GET /folders/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderResponse {
    #[serde(default)]
    pub parent: String,
    #[serde(flatten)]
    pub properties: FolderProperties,
    pub turbot: TurbotMetadata,
}

// ── Mods ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct ModInstallRequest<'a> {
    pub parent: &'a str,
    pub org: &'a str,
    #[serde(rename = "mod")]
    pub mod_name: &'a str,
    pub version: &'a str,
}

/// Installed mod — from `GET /mods/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModResponse {
    #[serde(default)]
    pub parent: String,
    pub org: String,
    #[serde(rename = "mod")]
    pub mod_name: String,
    /// Currently installed version, if installation has completed.
    #[serde(default)]
    pub version: Option<String>,
    pub turbot: TurbotMetadata,
}

/// One published release of a mod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModVersion {
    pub version: String,
    /// `available` for installable releases; anything else is skipped.
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ModVersionList {
    #[serde(default)]
    pub items: Vec<ModVersion>,
}

// ── Controls ─────────────────────────────────────────────────────────

/// How to locate a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlSelector {
    /// Direct lookup by control id.
    Id(String),
    /// The control of a given type attached to a resource.
    UriAndResource { uri: String, resource_id: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlType {
    pub uri: String,
}

/// `turbot` block of a control: identity plus free-form metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlMetadata {
    pub id: String,
    #[serde(default)]
    pub resource_id: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Control — from `GET /controls/{id}` or `GET /controls?uri=&resourceId=`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlResponse {
    pub state: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(rename = "type", default)]
    pub control_type: ControlType,
    pub turbot: ControlMetadata,
}

// ── Errors ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}
