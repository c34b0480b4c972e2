// ── Folder controller ──

use async_trait::async_trait;
use tracing::info;

use super::{Context, Lifecycle, ReadOutcome, mark_gone, refresh_parent_akas, require, require_id};
use crate::akas::resolve_parent_akas;
use crate::error::CoreError;
use crate::model::{EntityKind, FolderFields, FolderState};

impl FolderState {
    fn validate(&self) -> Result<(), CoreError> {
        require("parent", &self.parent)?;
        require("title", &self.title)?;
        require("description", &self.description)
    }

    fn fields(&self) -> FolderFields {
        FolderFields {
            title: self.title.clone(),
            description: self.description.clone(),
            tags: self.tags.clone(),
        }
    }
}

#[async_trait]
impl Lifecycle for FolderState {
    const KIND: EntityKind = EntityKind::Folder;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    async fn create(&mut self, ctx: Context<'_>) -> Result<(), CoreError> {
        self.validate()?;
        let akas = resolve_parent_akas(ctx.client, &self.parent).await?;
        let created = ctx.client.create_folder(&self.parent, &self.fields()).await?;
        info!(id = %created.id, title = %self.title, "created folder");
        self.id = Some(created.id);
        self.parent_akas = Some(akas);
        Ok(())
    }

    async fn read(&mut self, ctx: Context<'_>) -> Result<ReadOutcome, CoreError> {
        let id = require_id(self.id())?;
        let remote = match ctx.client.read_folder(&id).await {
            Ok(remote) => remote,
            Err(e) if e.is_not_found() => return Ok(mark_gone(self, &id)),
            Err(e) => return Err(e),
        };

        self.parent_akas = refresh_parent_akas(ctx.client, &remote.entity.parent_id).await?;
        if !remote.entity.id.is_empty() {
            self.id = Some(remote.entity.id);
        }
        self.parent = if remote.parent.is_empty() {
            remote.entity.parent_id
        } else {
            remote.parent
        };
        self.title = remote.fields.title;
        self.description = remote.fields.description;
        self.tags = remote.fields.tags;
        Ok(ReadOutcome::Found)
    }

    async fn update(&mut self, ctx: Context<'_>) -> Result<(), CoreError> {
        let id = require_id(self.id())?;
        self.validate()?;
        let akas = resolve_parent_akas(ctx.client, &self.parent).await?;
        ctx.client
            .update_folder(&id, &self.parent, &self.fields())
            .await?;
        info!(%id, title = %self.title, "updated folder");
        self.parent_akas = Some(akas);
        Ok(())
    }
}
