// ── Mod controller ──
//
// Install and update share one path: resolve the newest release the
// constraint allows, request the installation, then wait until the mod
// reports that version. The mod id is kept as soon as the workspace
// assigns it, so a failed or timed-out wait still leaves a state that a
// later read can pick up.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::{Context, Lifecycle, ReadOutcome, mark_gone, refresh_parent_akas, require, require_id};
use crate::akas::resolve_parent_akas;
use crate::error::CoreError;
use crate::model::{EntityKind, ModState};
use crate::poller::INSTALLED_VERSION_PROPERTY;
use crate::remote::TurbotApi;
use crate::version::resolve_latest_compatible;

/// The version a mod currently reports as installed, if any.
pub async fn installed_version(
    client: &dyn TurbotApi,
    id: &str,
) -> Result<Option<String>, CoreError> {
    let projection = BTreeMap::from([("version".to_owned(), INSTALLED_VERSION_PROPERTY.to_owned())]);
    let remote = client.read_resource(id, Some(&projection)).await?;
    Ok(remote
        .data
        .get("version")
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
        .map(str::to_owned))
}

impl ModState {
    fn validate(&self) -> Result<(), CoreError> {
        require("parent", &self.parent)?;
        require("org", &self.org)?;
        require("mod", &self.mod_name)
    }

    async fn install(&mut self, ctx: Context<'_>) -> Result<(), CoreError> {
        self.validate()?;
        let constraint = self.constraint().to_owned();

        let published = ctx
            .client
            .list_mod_versions(&self.org, &self.mod_name)
            .await?;
        let target = resolve_latest_compatible(&constraint, &published)?
            .ok_or_else(|| CoreError::NoCompatibleVersion {
                org: self.org.clone(),
                mod_name: self.mod_name.clone(),
                constraint: constraint.clone(),
            })?
            .to_string();

        let akas = resolve_parent_akas(ctx.client, &self.parent).await?;
        let installed = ctx
            .client
            .install_mod(&self.parent, &self.org, &self.mod_name, &constraint)
            .await?;
        info!(
            id = %installed.id,
            module = %self.qualified_name(),
            %target,
            "mod installation requested"
        );

        self.id = Some(installed.id.clone());
        self.parent_akas = Some(akas);
        self.latest_compatible_version = Some(target.clone());

        let client = ctx.client;
        ctx.poller
            .wait_for(&installed.id, &target, |id| {
                let id = id.to_owned();
                async move { installed_version(client, &id).await }
            })
            .await?;

        self.installed_version = Some(target);
        Ok(())
    }
}

#[async_trait]
impl Lifecycle for ModState {
    const KIND: EntityKind = EntityKind::Mod;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    async fn create(&mut self, ctx: Context<'_>) -> Result<(), CoreError> {
        self.install(ctx).await
    }

    async fn read(&mut self, ctx: Context<'_>) -> Result<ReadOutcome, CoreError> {
        let id = require_id(self.id())?;
        let remote = match ctx.client.read_mod(&id).await {
            Ok(remote) => remote,
            Err(e) if e.is_not_found() => return Ok(mark_gone(self, &id)),
            Err(e) => return Err(e),
        };

        let published = ctx
            .client
            .list_mod_versions(&remote.org, &remote.mod_name)
            .await?;
        let latest = resolve_latest_compatible(self.constraint(), &published)?;
        let akas = refresh_parent_akas(ctx.client, &remote.entity.parent_id).await?;

        if !remote.entity.id.is_empty() {
            self.id = Some(remote.entity.id);
        }
        self.parent = if remote.parent.is_empty() {
            remote.entity.parent_id
        } else {
            remote.parent
        };
        self.parent_akas = akas;
        self.org = remote.org;
        self.mod_name = remote.mod_name;
        self.installed_version = remote.installed_version;
        self.latest_compatible_version = latest.map(|v| v.to_string());
        Ok(ReadOutcome::Found)
    }

    async fn update(&mut self, ctx: Context<'_>) -> Result<(), CoreError> {
        require_id(self.id())?;
        self.install(ctx).await
    }

    async fn delete(&mut self, ctx: Context<'_>) -> Result<(), CoreError> {
        let id = require_id(self.id())?;
        ctx.client.uninstall_mod(&id).await?;
        info!(%id, module = %self.qualified_name(), "mod uninstalled");
        self.id = None;
        Ok(())
    }

    async fn exists(&self, ctx: Context<'_>) -> Result<bool, CoreError> {
        let Some(id) = self.id() else {
            return Ok(false);
        };
        match ctx.client.read_mod(id).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
