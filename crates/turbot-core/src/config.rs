// ── Runtime reconciliation configuration ──
//
// These types describe how to reach a Turbot workspace and how long to
// wait for asynchronous work. They carry credential data and tuning but
// never touch disk; the CLI builds a `ReconcileConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Access key pair for a workspace.
#[derive(Debug, Clone)]
pub struct AccessKeyPair {
    pub access_key: String,
    pub secret_key: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Only for test workspaces behind self-signed certs.
    DangerAcceptInvalid,
}

/// How to reach one workspace.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Workspace URL (e.g., `https://acme.cloud.turbot.com`).
    pub workspace: Url,
    pub credentials: AccessKeyPair,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Attempt budget and spacing for convergence waits.
///
/// The defaults give a mod installation roughly thirteen minutes to
/// report its target version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(20);
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 40;

    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Upper bound on time spent sleeping between checks.
    pub fn budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL, Self::DEFAULT_MAX_ATTEMPTS)
    }
}

/// Everything a [`Reconciler`](crate::Reconciler) needs to run.
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    pub connection: ConnectionConfig,
    pub poll: PollPolicy,
}
