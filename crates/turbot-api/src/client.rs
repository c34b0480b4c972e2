// Hand-crafted async HTTP client for the Turbot workspace API.
//
// Base path: /api/v5/
// Auth: HTTP basic with the workspace access key pair

use std::collections::BTreeMap;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{
    ControlResponse, ControlSelector, ErrorResponse, FolderProperties, FolderRequest,
    FolderResponse, MetadataResponse, ModInstallRequest, ModResponse, ModVersion, ModVersionList,
    ResourceRequest, ResourceResponse, TurbotMetadata,
};

const API_PREFIX: &str = "api/v5";

// ── Client ───────────────────────────────────────────────────────────

/// Async client for a Turbot workspace.
///
/// Every entity is addressable by its opaque id or by any of its akas;
/// path segments are percent-encoded so akas containing `/` or `:` are
/// passed through intact.
pub struct TurbotClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl TurbotClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a workspace URL, an access key pair, and transport config.
    pub fn new(
        workspace: &str,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(workspace)?;
        Ok(Self {
            http,
            base_url,
            credentials: Some(credentials),
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth).
    pub fn from_reqwest(workspace: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(workspace)?;
        Ok(Self {
            http,
            base_url,
            credentials: None,
        })
    }

    /// Attach credentials to a client built with [`from_reqwest`](Self::from_reqwest).
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// The API base URL (always ends with `/api/v5/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `/api/v5/` to the workspace URL unless it is already there.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(raw.to_owned()));
        }

        let path = url.path().trim_end_matches('/').to_owned();
        if path.ends_with(API_PREFIX) {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/{API_PREFIX}/"));
        }

        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append percent-encoded path segments onto the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // base_url was checked by normalize_base_url, so segments are available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.credentials {
            Some(credentials) => credentials.apply(builder),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");

        let resp = self.request(Method::GET, url).send().await?;
        self.handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        debug!("GET {url} params={params:?}");

        let resp = self.request(Method::GET, url).query(params).send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("POST {url}");

        let resp = self.request(Method::POST, url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("PUT {url}");

        let resp = self.request(Method::PUT, url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");

        let resp = self.request(Method::DELETE, url).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::InvalidCredentials;
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
            Error::Api {
                status: status.as_u16(),
                message: err.message.unwrap_or_else(|| status.to_string()),
                code: err.code,
            }
        } else {
            Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            }
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Resources ────────────────────────────────────────────────────

    pub async fn create_resource(
        &self,
        resource_type: &str,
        parent: &str,
        data: &Map<String, Value>,
    ) -> Result<TurbotMetadata, Error> {
        let body = ResourceRequest {
            resource_type,
            parent,
            data,
        };
        let resp: MetadataResponse = self.post(self.endpoint(&["resources"]), &body).await?;
        Ok(resp.turbot)
    }

    /// Read a resource by id or aka.
    ///
    /// `properties` maps response aliases to property paths; `None`
    /// returns every property.
    pub async fn read_resource(
        &self,
        id: &str,
        properties: Option<&BTreeMap<String, String>>,
    ) -> Result<ResourceResponse, Error> {
        let url = self.endpoint(&["resources", id]);
        match properties {
            Some(properties) => {
                let projection = serde_json::to_string(properties).map_err(|e| {
                    Error::Deserialization {
                        message: format!("failed to encode property projection: {e}"),
                        body: String::new(),
                    }
                })?;
                self.get_with_params(url, &[("properties", projection)])
                    .await
            }
            None => self.get(url).await,
        }
    }

    pub async fn update_resource(
        &self,
        id: &str,
        resource_type: &str,
        parent: &str,
        data: &Map<String, Value>,
    ) -> Result<TurbotMetadata, Error> {
        let body = ResourceRequest {
            resource_type,
            parent,
            data,
        };
        let resp: MetadataResponse = self.put(self.endpoint(&["resources", id]), &body).await?;
        Ok(resp.turbot)
    }

    /// Delete a resource (or folder) by id.
    pub async fn delete_resource(&self, id: &str) -> Result<(), Error> {
        self.delete(self.endpoint(&["resources", id])).await
    }

    /// Existence probe. A 404 is `Ok(false)`; any other failure is an error.
    pub async fn resource_exists(&self, id: &str) -> Result<bool, Error> {
        let props = BTreeMap::new();
        match self.read_resource(id, Some(&props)).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    // ── Folders ──────────────────────────────────────────────────────

    pub async fn create_folder(
        &self,
        parent: &str,
        properties: &FolderProperties,
    ) -> Result<TurbotMetadata, Error> {
        let body = FolderRequest { parent, properties };
        let resp: MetadataResponse = self.post(self.endpoint(&["folders"]), &body).await?;
        Ok(resp.turbot)
    }

    pub async fn read_folder(&self, id: &str) -> Result<FolderResponse, Error> {
        self.get(self.endpoint(&["folders", id])).await
    }

    pub async fn update_folder(
        &self,
        id: &str,
        parent: &str,
        properties: &FolderProperties,
    ) -> Result<TurbotMetadata, Error> {
        let body = FolderRequest { parent, properties };
        let resp: MetadataResponse = self.put(self.endpoint(&["folders", id]), &body).await?;
        Ok(resp.turbot)
    }

    // ── Mods ─────────────────────────────────────────────────────────

    /// Start an asynchronous mod installation under `parent`.
    ///
    /// Returns as soon as the mod resource exists; the installed version
    /// converges later.
    pub async fn install_mod(
        &self,
        parent: &str,
        org: &str,
        mod_name: &str,
        version: &str,
    ) -> Result<TurbotMetadata, Error> {
        let body = ModInstallRequest {
            parent,
            org,
            mod_name,
            version,
        };
        let resp: MetadataResponse = self.post(self.endpoint(&["mods"]), &body).await?;
        Ok(resp.turbot)
    }

    pub async fn read_mod(&self, id: &str) -> Result<ModResponse, Error> {
        self.get(self.endpoint(&["mods", id])).await
    }

    pub async fn uninstall_mod(&self, id: &str) -> Result<(), Error> {
        self.delete(self.endpoint(&["mods", id])).await
    }

    pub async fn list_mod_versions(
        &self,
        org: &str,
        mod_name: &str,
    ) -> Result<Vec<ModVersion>, Error> {
        let list: ModVersionList = self
            .get(self.endpoint(&["mods", org, mod_name, "versions"]))
            .await?;
        Ok(list.items)
    }

    // ── Controls ─────────────────────────────────────────────────────

    pub async fn read_control(&self, selector: &ControlSelector) -> Result<ControlResponse, Error> {
        match selector {
            ControlSelector::Id(id) => self.get(self.endpoint(&["controls", id])).await,
            ControlSelector::UriAndResource { uri, resource_id } => {
                self.get_with_params(
                    self.endpoint(&["controls"]),
                    &[("uri", uri.clone()), ("resourceId", resource_id.clone())],
                )
                .await
            }
        }
    }
}
