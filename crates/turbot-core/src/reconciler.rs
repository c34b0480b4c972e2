// ── Reconciler facade ──
//
// Owns a workspace client and a poller, and runs lifecycle operations
// for any entity kind against them. Cheaply cloneable.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::{PollPolicy, ReconcileConfig};
use crate::error::CoreError;
use crate::lifecycle::{Context, Lifecycle, ReadOutcome};
use crate::model::PublishedVersion;
use crate::poller::ConvergencePoller;
use crate::remote::{self, TurbotApi};
use crate::version::{ResolvedVersion, resolve_latest_compatible};

#[derive(Clone)]
pub struct Reconciler {
    inner: Arc<ReconcilerInner>,
}

struct ReconcilerInner {
    client: Arc<dyn TurbotApi>,
    poller: ConvergencePoller,
}

impl Reconciler {
    /// Wrap an existing workspace client.
    pub fn new(client: Arc<dyn TurbotApi>, poll: PollPolicy) -> Self {
        Self::with_poller(client, ConvergencePoller::new(poll))
    }

    pub fn with_poller(client: Arc<dyn TurbotApi>, poller: ConvergencePoller) -> Self {
        Self {
            inner: Arc::new(ReconcilerInner { client, poller }),
        }
    }

    /// Build an authenticated HTTP client from `config`.
    pub fn connect(config: &ReconcileConfig) -> Result<Self, CoreError> {
        let client = remote::connect(&config.connection)?;
        debug!(workspace = %config.connection.workspace, "workspace client ready");
        Ok(Self::new(Arc::new(client), config.poll))
    }

    /// Stop convergence waits when `token` is cancelled.
    pub fn with_cancellation(self, token: CancellationToken) -> Self {
        let poller = self.inner.poller.clone().with_cancellation(token);
        Self::with_poller(Arc::clone(&self.inner.client), poller)
    }

    pub fn context(&self) -> Context<'_> {
        Context::new(self.inner.client.as_ref(), &self.inner.poller)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        self.inner.poller.policy()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    pub async fn create<E: Lifecycle>(&self, entity: &mut E) -> Result<(), CoreError> {
        entity.create(self.context()).await
    }

    pub async fn read<E: Lifecycle>(&self, entity: &mut E) -> Result<ReadOutcome, CoreError> {
        entity.read(self.context()).await
    }

    pub async fn update<E: Lifecycle>(&self, entity: &mut E) -> Result<(), CoreError> {
        entity.update(self.context()).await
    }

    pub async fn delete<E: Lifecycle>(&self, entity: &mut E) -> Result<(), CoreError> {
        entity.delete(self.context()).await
    }

    pub async fn exists<E: Lifecycle>(&self, entity: &E) -> Result<bool, CoreError> {
        entity.exists(self.context()).await
    }

    pub async fn import<E: Lifecycle>(&self, id: &str) -> Result<E, CoreError> {
        E::import(id, self.context()).await
    }

    // ── Catalogue ────────────────────────────────────────────────────

    /// Published releases of a mod, plus the newest one `constraint` allows.
    pub async fn mod_versions(
        &self,
        org: &str,
        mod_name: &str,
        constraint: &str,
    ) -> Result<(Vec<PublishedVersion>, Option<ResolvedVersion>), CoreError> {
        let published = self.inner.client.list_mod_versions(org, mod_name).await?;
        let latest = resolve_latest_compatible(constraint, &published)?;
        Ok((published, latest))
    }
}
