// ── Remote workspace seam ──
//
// Lifecycle controllers talk to the workspace only through `TurbotApi`.
// The production impl wraps `turbot_api::TurbotClient`; tests substitute
// an in-memory workspace.

use std::collections::BTreeMap;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{Map, Value};

use turbot_api::transport::{TlsMode, TransportConfig};
use turbot_api::{Credentials, TurbotClient};

use crate::config::{ConnectionConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{
    ControlSelector, EntityKind, EntityRef, FolderFields, PublishedVersion, RemoteControl,
    RemoteFolder, RemoteMod, RemoteResource,
};

/// Operations the reconciliation engine needs from a workspace.
///
/// Every id parameter also accepts an aka. A missing entity surfaces as
/// [`CoreError::NotFound`].
#[async_trait]
pub trait TurbotApi: Send + Sync {
    async fn create_resource(
        &self,
        resource_type: &str,
        parent: &str,
        data: &Map<String, Value>,
    ) -> Result<EntityRef, CoreError>;

    /// `properties` maps aliases to property paths; `None` reads everything.
    async fn read_resource(
        &self,
        id: &str,
        properties: Option<&BTreeMap<String, String>>,
    ) -> Result<RemoteResource, CoreError>;

    async fn update_resource(
        &self,
        id: &str,
        resource_type: &str,
        parent: &str,
        data: &Map<String, Value>,
    ) -> Result<EntityRef, CoreError>;

    async fn delete_resource(&self, id: &str) -> Result<(), CoreError>;

    async fn resource_exists(&self, id: &str) -> Result<bool, CoreError>;

    async fn create_folder(&self, parent: &str, fields: &FolderFields)
    -> Result<EntityRef, CoreError>;

    async fn read_folder(&self, id: &str) -> Result<RemoteFolder, CoreError>;

    async fn update_folder(
        &self,
        id: &str,
        parent: &str,
        fields: &FolderFields,
    ) -> Result<EntityRef, CoreError>;

    /// Starts an installation; the installed version converges later.
    async fn install_mod(
        &self,
        parent: &str,
        org: &str,
        mod_name: &str,
        version: &str,
    ) -> Result<EntityRef, CoreError>;

    async fn read_mod(&self, id: &str) -> Result<RemoteMod, CoreError>;

    async fn uninstall_mod(&self, id: &str) -> Result<(), CoreError>;

    async fn list_mod_versions(
        &self,
        org: &str,
        mod_name: &str,
    ) -> Result<Vec<PublishedVersion>, CoreError>;

    async fn read_control(&self, selector: &ControlSelector) -> Result<RemoteControl, CoreError>;
}

#[async_trait]
impl TurbotApi for TurbotClient {
    async fn create_resource(
        &self,
        resource_type: &str,
        parent: &str,
        data: &Map<String, Value>,
    ) -> Result<EntityRef, CoreError> {
        TurbotClient::create_resource(self, resource_type, parent, data)
            .await
            .map(EntityRef::from)
            .map_err(|e| CoreError::from_api(e, EntityKind::Resource, parent))
    }

    async fn read_resource(
        &self,
        id: &str,
        properties: Option<&BTreeMap<String, String>>,
    ) -> Result<RemoteResource, CoreError> {
        TurbotClient::read_resource(self, id, properties)
            .await
            .map(RemoteResource::from)
            .map_err(|e| CoreError::from_api(e, EntityKind::Resource, id))
    }

    async fn update_resource(
        &self,
        id: &str,
        resource_type: &str,
        parent: &str,
        data: &Map<String, Value>,
    ) -> Result<EntityRef, CoreError> {
        TurbotClient::update_resource(self, id, resource_type, parent, data)
            .await
            .map(EntityRef::from)
            .map_err(|e| CoreError::from_api(e, EntityKind::Resource, id))
    }

    async fn delete_resource(&self, id: &str) -> Result<(), CoreError> {
        TurbotClient::delete_resource(self, id)
            .await
            .map_err(|e| CoreError::from_api(e, EntityKind::Resource, id))
    }

    async fn resource_exists(&self, id: &str) -> Result<bool, CoreError> {
        TurbotClient::resource_exists(self, id)
            .await
            .map_err(|e| CoreError::from_api(e, EntityKind::Resource, id))
    }

    async fn create_folder(
        &self,
        parent: &str,
        fields: &FolderFields,
    ) -> Result<EntityRef, CoreError> {
        TurbotClient::create_folder(self, parent, &fields.into())
            .await
            .map(EntityRef::from)
            .map_err(|e| CoreError::from_api(e, EntityKind::Folder, parent))
    }

    async fn read_folder(&self, id: &str) -> Result<RemoteFolder, CoreError> {
        TurbotClient::read_folder(self, id)
            .await
            .map(RemoteFolder::from)
            .map_err(|e| CoreError::from_api(e, EntityKind::Folder, id))
    }

    async fn update_folder(
        &self,
        id: &str,
        parent: &str,
        fields: &FolderFields,
    ) -> Result<EntityRef, CoreError> {
        TurbotClient::update_folder(self, id, parent, &fields.into())
            .await
            .map(EntityRef::from)
            .map_err(|e| CoreError::from_api(e, EntityKind::Folder, id))
    }

    async fn install_mod(
        &self,
        parent: &str,
        org: &str,
        mod_name: &str,
        version: &str,
    ) -> Result<EntityRef, CoreError> {
        TurbotClient::install_mod(self, parent, org, mod_name, version)
            .await
            .map(EntityRef::from)
            .map_err(|e| CoreError::from_api(e, EntityKind::Mod, parent))
    }

    async fn read_mod(&self, id: &str) -> Result<RemoteMod, CoreError> {
        TurbotClient::read_mod(self, id)
            .await
            .map(RemoteMod::from)
            .map_err(|e| CoreError::from_api(e, EntityKind::Mod, id))
    }

    async fn uninstall_mod(&self, id: &str) -> Result<(), CoreError> {
        TurbotClient::uninstall_mod(self, id)
            .await
            .map_err(|e| CoreError::from_api(e, EntityKind::Mod, id))
    }

    async fn list_mod_versions(
        &self,
        org: &str,
        mod_name: &str,
    ) -> Result<Vec<PublishedVersion>, CoreError> {
        let versions = TurbotClient::list_mod_versions(self, org, mod_name)
            .await
            .map_err(|e| CoreError::from_api(e, EntityKind::Mod, &format!("{org}/{mod_name}")))?;
        Ok(versions.into_iter().map(PublishedVersion::from).collect())
    }

    async fn read_control(&self, selector: &ControlSelector) -> Result<RemoteControl, CoreError> {
        TurbotClient::read_control(self, &selector.into())
            .await
            .map(RemoteControl::from)
            .map_err(|e| CoreError::from_api(e, EntityKind::Control, &selector.to_string()))
    }
}

// ── Construction ─────────────────────────────────────────────────────

/// Build an authenticated client from connection settings.
pub fn connect(config: &ConnectionConfig) -> Result<TurbotClient, CoreError> {
    let credentials = Credentials::new(
        config.credentials.access_key.clone(),
        config.credentials.secret_key.expose_secret().to_owned().into(),
    );
    let transport = TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    };
    Ok(TurbotClient::new(
        config.workspace.as_str(),
        credentials,
        &transport,
    )?)
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
