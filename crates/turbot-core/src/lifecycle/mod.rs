// ── Entity lifecycle controllers ──
//
// One `Lifecycle` impl per entity kind. A controller owns the local
// state of one entity for the duration of one operation; every remote
// call goes through the `Context` passed in, never through globals.

mod control;
mod folder;
mod mods;
mod resource;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::akas::resolve_parent_akas;
use crate::error::CoreError;
use crate::model::EntityKind;
use crate::poller::ConvergencePoller;
use crate::remote::TurbotApi;

pub use mods::installed_version;

/// Remote handles for one operation.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub client: &'a dyn TurbotApi,
    pub poller: &'a ConvergencePoller,
}

impl<'a> Context<'a> {
    pub fn new(client: &'a dyn TurbotApi, poller: &'a ConvergencePoller) -> Self {
        Self { client, poller }
    }
}

/// Result of a read that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Local state was refreshed from the workspace.
    Found,
    /// The entity no longer exists remotely; the local id was cleared.
    Gone,
}

/// Create/read/update/delete/exists/import for one entity kind.
#[async_trait]
pub trait Lifecycle: Default + Send + Sync {
    const KIND: EntityKind;

    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: Option<String>);

    /// Create remotely and persist the assigned id plus derived fields.
    async fn create(&mut self, ctx: Context<'_>) -> Result<(), CoreError>;

    /// Refresh local state. A missing entity is [`ReadOutcome::Gone`], not an error.
    async fn read(&mut self, ctx: Context<'_>) -> Result<ReadOutcome, CoreError>;

    async fn update(&mut self, ctx: Context<'_>) -> Result<(), CoreError>;

    /// Delete remotely, then clear the local id. Remote errors, including
    /// not-found, propagate.
    async fn delete(&mut self, ctx: Context<'_>) -> Result<(), CoreError> {
        let id = require_id(self.id())?;
        ctx.client.delete_resource(&id).await?;
        info!(kind = %Self::KIND, %id, "deleted");
        self.set_id(None);
        Ok(())
    }

    async fn exists(&self, ctx: Context<'_>) -> Result<bool, CoreError> {
        match self.id() {
            Some(id) => ctx.client.resource_exists(id).await,
            None => Ok(false),
        }
    }

    /// Adopt an existing entity by id or aka.
    async fn import(id: &str, ctx: Context<'_>) -> Result<Self, CoreError> {
        let mut entity = Self::default();
        entity.set_id(Some(id.to_owned()));
        match entity.read(ctx).await? {
            ReadOutcome::Found => Ok(entity),
            ReadOutcome::Gone => Err(CoreError::NotFound {
                kind: Self::KIND,
                identifier: id.to_owned(),
            }),
        }
    }
}

// ── Shared helpers ───────────────────────────────────────────────────

pub(crate) fn require_id(id: Option<&str>) -> Result<String, CoreError> {
    id.filter(|id| !id.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| CoreError::Validation {
            field: "id".into(),
            reason: "entity has not been created or imported".into(),
        })
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::missing(field))
    } else {
        Ok(())
    }
}

/// Clear the id of an entity found missing during a read.
pub(crate) fn mark_gone<E: Lifecycle>(entity: &mut E, id: &str) -> ReadOutcome {
    warn!(kind = %E::KIND, id, "entity no longer exists, clearing local id");
    entity.set_id(None);
    ReadOutcome::Gone
}

/// Akas of the parent reported by a read. Root-level entities have none.
pub(crate) async fn refresh_parent_akas(
    client: &dyn TurbotApi,
    parent_id: &str,
) -> Result<Option<Vec<String>>, CoreError> {
    if parent_id.is_empty() {
        return Ok(None);
    }
    resolve_parent_akas(client, parent_id).await.map(Some)
}
