// ── Convergence polling ──
//
// Mod installation is asynchronous: the workspace accepts the request,
// then eventually reports the installed version on the mod resource. An
// `InstallationJob` tracks one such wait; `ConvergencePoller` drives it
// with a bounded number of checks.

use std::future::Future;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::PollPolicy;
use crate::error::CoreError;

/// Property path under which the workspace reports a mod's installed version.
pub const INSTALLED_VERSION_PROPERTY: &str = "turbot.custom.installedVersion";

/// Lifecycle of a convergence wait. Every state but `Pending` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Converged,
    TimedOut,
    Failed,
}

/// One outstanding wait for an entity to report a target version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallationJob {
    entity_id: String,
    target: String,
    state: JobState,
    attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<String>,
}

impl InstallationJob {
    pub fn new(entity_id: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            target: target.into(),
            state: JobState::Pending,
            attempts: 0,
            failure: None,
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Checks made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_terminal(&self) -> bool {
        self.state != JobState::Pending
    }

    fn timeout_error(&self) -> CoreError {
        CoreError::InstallationTimeout {
            id: self.entity_id.clone(),
            target: self.target.clone(),
            attempts: self.attempts,
        }
    }
}

/// Drives [`InstallationJob`]s to a terminal state.
#[derive(Debug, Clone, Default)]
pub struct ConvergencePoller {
    policy: PollPolicy,
    cancel: Option<CancellationToken>,
}

impl ConvergencePoller {
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            cancel: None,
        }
    }

    /// Abort waits early when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Poll until `poll` reports `target` for `entity_id`.
    ///
    /// Returns the number of checks it took.
    pub async fn wait_for<F, Fut>(
        &self,
        entity_id: &str,
        target: &str,
        poll: F,
    ) -> Result<u32, CoreError>
    where
        F: FnMut(&str) -> Fut + Send,
        Fut: Future<Output = Result<Option<String>, CoreError>> + Send,
    {
        let mut job = InstallationJob::new(entity_id, target);
        self.drive(&mut job, poll).await
    }

    /// Advance `job` until it reaches a terminal state.
    ///
    /// Each check calls `poll` with the entity id. A reported version equal
    /// to the target converges the job; anything else (including nothing
    /// reported yet) sleeps one interval and checks again, until the
    /// attempt budget is spent. A poll error fails the job and is returned
    /// unchanged. Driving a job that is already terminal makes no calls.
    pub async fn drive<F, Fut>(&self, job: &mut InstallationJob, mut poll: F) -> Result<u32, CoreError>
    where
        F: FnMut(&str) -> Fut + Send,
        Fut: Future<Output = Result<Option<String>, CoreError>> + Send,
    {
        match job.state {
            JobState::Pending => {}
            JobState::Converged => return Ok(job.attempts),
            JobState::TimedOut => return Err(job.timeout_error()),
            JobState::Failed => {
                return Err(CoreError::InstallationFailed {
                    id: job.entity_id.clone(),
                    message: job.failure.clone().unwrap_or_default(),
                });
            }
        }

        while job.attempts < self.policy.max_attempts {
            let reported = poll(&job.entity_id).await;
            job.attempts += 1;

            let installed = match reported {
                Ok(installed) => installed,
                Err(e) => {
                    warn!(id = %job.entity_id, attempt = job.attempts, error = %e, "convergence check failed");
                    job.state = JobState::Failed;
                    job.failure = Some(e.to_string());
                    return Err(e);
                }
            };

            if installed.as_deref() == Some(job.target.as_str()) {
                job.state = JobState::Converged;
                info!(
                    id = %job.entity_id,
                    target = %job.target,
                    attempts = job.attempts,
                    "installation converged"
                );
                return Ok(job.attempts);
            }

            debug!(
                id = %job.entity_id,
                target = %job.target,
                installed = installed.as_deref().unwrap_or(""),
                attempt = job.attempts,
                max_attempts = self.policy.max_attempts,
                "installed version differs from target, sleeping"
            );
            self.sleep(job).await?;
        }

        job.state = JobState::TimedOut;
        warn!(
            id = %job.entity_id,
            target = %job.target,
            attempts = job.attempts,
            "installation did not converge"
        );
        Err(job.timeout_error())
    }

    async fn sleep(&self, job: &mut InstallationJob) -> Result<(), CoreError> {
        let Some(cancel) = &self.cancel else {
            tokio::time::sleep(self.policy.interval).await;
            return Ok(());
        };
        tokio::select! {
            () = cancel.cancelled() => {
                job.state = JobState::Failed;
                job.failure = Some("cancelled".into());
                Err(CoreError::Cancelled {
                    id: job.entity_id.clone(),
                    attempts: job.attempts,
                })
            }
            () = tokio::time::sleep(self.policy.interval) => Ok(()),
        }
    }
}
