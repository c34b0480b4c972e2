// ── Generic resource controller ──

use async_trait::async_trait;
use tracing::info;

use super::{Context, Lifecycle, ReadOutcome, mark_gone, refresh_parent_akas, require, require_id};
use crate::akas::resolve_parent_akas;
use crate::body;
use crate::error::CoreError;
use crate::model::{EntityKind, ResourceState};

impl ResourceState {
    fn validate(&self) -> Result<(), CoreError> {
        require("parent", &self.parent)?;
        require("type", &self.resource_type)?;
        require("body", &self.body)
    }
}

#[async_trait]
impl Lifecycle for ResourceState {
    const KIND: EntityKind = EntityKind::Resource;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    async fn create(&mut self, ctx: Context<'_>) -> Result<(), CoreError> {
        self.validate()?;
        let data = body::parse_body(&self.body)?;
        let akas = resolve_parent_akas(ctx.client, &self.parent).await?;

        let created = ctx
            .client
            .create_resource(&self.resource_type, &self.parent, &data)
            .await?;
        info!(id = %created.id, resource_type = %self.resource_type, parent = %self.parent, "created resource");

        self.id = Some(created.id);
        self.parent_akas = Some(akas);
        self.body = body::normalize(&self.body);
        Ok(())
    }

    async fn read(&mut self, ctx: Context<'_>) -> Result<ReadOutcome, CoreError> {
        let id = require_id(self.id())?;
        // Ask only for what we manage; an empty body (import) takes everything.
        let projection = if self.body.trim().is_empty() {
            None
        } else {
            Some(body::properties_from_body(&self.body)?)
        };

        let remote = match ctx.client.read_resource(&id, projection.as_ref()).await {
            Ok(remote) => remote,
            Err(e) if e.is_not_found() => return Ok(mark_gone(self, &id)),
            Err(e) => return Err(e),
        };

        let akas = refresh_parent_akas(ctx.client, &remote.entity.parent_id).await?;
        self.body = body::body_from_properties(&remote.data)?;
        if !remote.entity.id.is_empty() {
            self.id = Some(remote.entity.id);
        }
        self.parent = remote.entity.parent_id;
        self.parent_akas = akas;
        Ok(ReadOutcome::Found)
    }

    async fn update(&mut self, ctx: Context<'_>) -> Result<(), CoreError> {
        let id = require_id(self.id())?;
        self.validate()?;
        let data = body::parse_body(&self.body)?;
        let akas = resolve_parent_akas(ctx.client, &self.parent).await?;

        ctx.client
            .update_resource(&id, &self.resource_type, &self.parent, &data)
            .await?;
        info!(%id, resource_type = %self.resource_type, "updated resource");

        self.parent_akas = Some(akas);
        self.body = body::normalize(&self.body);
        Ok(())
    }
}
