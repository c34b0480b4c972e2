// ── API-to-domain type conversions ──
//
// Bridges `turbot_api` wire types into the remote views in
// `crate::model::remote`, and domain selectors back into wire requests.

use serde_json::Value;

use turbot_api::types::{
    ControlResponse, FolderProperties, FolderResponse, ModResponse, ModVersion, ResourceResponse,
    TurbotMetadata,
};

use crate::model::{
    ControlSelector, EntityRef, FolderFields, PublishedVersion, RemoteControl, RemoteFolder,
    RemoteMod, RemoteResource,
};

impl From<TurbotMetadata> for EntityRef {
    fn from(meta: TurbotMetadata) -> Self {
        Self {
            id: meta.id,
            parent_id: meta.parent_id,
            akas: meta.akas,
        }
    }
}

impl From<ResourceResponse> for RemoteResource {
    fn from(resp: ResourceResponse) -> Self {
        Self {
            entity: resp.turbot.into(),
            data: resp.data,
        }
    }
}

impl From<FolderProperties> for FolderFields {
    fn from(props: FolderProperties) -> Self {
        Self {
            title: props.title,
            description: props.description,
            tags: props.tags,
        }
    }
}

impl From<&FolderFields> for FolderProperties {
    fn from(fields: &FolderFields) -> Self {
        Self {
            title: fields.title.clone(),
            description: fields.description.clone(),
            tags: fields.tags.clone(),
        }
    }
}

impl From<FolderResponse> for RemoteFolder {
    fn from(resp: FolderResponse) -> Self {
        Self {
            entity: resp.turbot.into(),
            parent: resp.parent,
            fields: resp.properties.into(),
        }
    }
}

impl From<ModResponse> for RemoteMod {
    fn from(resp: ModResponse) -> Self {
        Self {
            entity: resp.turbot.into(),
            parent: resp.parent,
            org: resp.org,
            mod_name: resp.mod_name,
            // Installation in progress reports an empty string
            installed_version: resp.version.filter(|v| !v.is_empty()),
        }
    }
}

impl From<ModVersion> for PublishedVersion {
    fn from(v: ModVersion) -> Self {
        Self {
            version: v.version,
            status: v.status,
        }
    }
}

impl From<ControlResponse> for RemoteControl {
    fn from(resp: ControlResponse) -> Self {
        Self {
            id: resp.turbot.id,
            resource_id: resp.turbot.resource_id,
            type_uri: resp.control_type.uri,
            state: resp.state,
            reason: resp.reason,
            details: resp.details.filter(|d| !d.is_null()),
            metadata: resp.turbot.extra,
        }
    }
}

impl From<&ControlSelector> for turbot_api::ControlSelector {
    fn from(selector: &ControlSelector) -> Self {
        match selector {
            ControlSelector::Id(id) => Self::Id(id.clone()),
            ControlSelector::UriAndResource { uri, resource } => Self::UriAndResource {
                uri: uri.clone(),
                resource_id: resource.clone(),
            },
        }
    }
}

/// Render a metadata value as flat text: strings verbatim, others as JSON.
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
