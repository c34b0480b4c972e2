// ── Control controller (read-only) ──

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::debug;

use super::{Context, Lifecycle, ReadOutcome, mark_gone};
use crate::convert::value_to_text;
use crate::error::CoreError;
use crate::model::{ControlSelector, ControlState, EntityKind, RemoteControl};

impl ControlState {
    /// Uri plus resource wins over id when both are given.
    pub fn selector(&self) -> Result<ControlSelector, CoreError> {
        let non_empty = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_owned);
        if let (Some(uri), Some(resource)) = (non_empty(&self.uri), non_empty(&self.resource)) {
            return Ok(ControlSelector::UriAndResource { uri, resource });
        }
        non_empty(&self.id)
            .map(ControlSelector::Id)
            .ok_or_else(|| CoreError::Validation {
                field: "id".into(),
                reason: "either id or both uri and resource are required".into(),
            })
    }

    fn apply(&mut self, remote: RemoteControl) {
        let mut turbot: BTreeMap<String, String> = remote
            .metadata
            .iter()
            .map(|(k, v)| (k.clone(), value_to_text(v)))
            .collect();
        turbot.insert("id".into(), remote.id.clone());
        turbot.insert("resourceId".into(), remote.resource_id.clone());

        self.id = Some(remote.id);
        self.uri = Some(remote.type_uri);
        self.resource = Some(remote.resource_id);
        self.state = Some(remote.state);
        self.reason = remote.reason;
        self.details = remote.details.as_ref().map(value_to_text);
        self.turbot = turbot;
    }
}

fn unsupported(operation: &'static str) -> CoreError {
    CoreError::Unsupported {
        operation,
        kind: EntityKind::Control,
    }
}

#[async_trait]
impl Lifecycle for ControlState {
    const KIND: EntityKind = EntityKind::Control;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    async fn create(&mut self, _ctx: Context<'_>) -> Result<(), CoreError> {
        Err(unsupported("create"))
    }

    async fn read(&mut self, ctx: Context<'_>) -> Result<ReadOutcome, CoreError> {
        let selector = self.selector()?;
        let remote = match ctx.client.read_control(&selector).await {
            Ok(remote) => remote,
            Err(e) if e.is_not_found() => return Ok(mark_gone(self, &selector.to_string())),
            Err(e) => return Err(e),
        };
        debug!(id = %remote.id, state = %remote.state, "read control");
        self.apply(remote);
        Ok(ReadOutcome::Found)
    }

    async fn update(&mut self, _ctx: Context<'_>) -> Result<(), CoreError> {
        Err(unsupported("update"))
    }

    async fn delete(&mut self, _ctx: Context<'_>) -> Result<(), CoreError> {
        Err(unsupported("delete"))
    }

    async fn exists(&self, ctx: Context<'_>) -> Result<bool, CoreError> {
        let Ok(selector) = self.selector() else {
            return Ok(false);
        };
        match ctx.client.read_control(&selector).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
