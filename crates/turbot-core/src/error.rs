// ── Core error types ──
//
// The reconciliation error taxonomy. Consumers never see HTTP status
// codes or JSON parse failures from the transport directly: the
// `From<turbot_api::Error>` impl folds them into domain variants, keeping
// the originating message.

use thiserror::Error;

use crate::model::EntityKind;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote state ─────────────────────────────────────────────────
    /// The entity does not exist remotely.
    #[error("{kind} not found: {identifier}")]
    NotFound { kind: EntityKind, identifier: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Opaque failure reported by the workspace client.
    #[error("API error: {message}")]
    Transport {
        message: String,
        /// Workspace error code (e.g. `invalid_parent`), when supplied.
        code: Option<String>,
        /// HTTP status code, if the failure came from a response.
        status: Option<u16>,
    },

    // ── Versions ─────────────────────────────────────────────────────
    #[error("Invalid version constraint '{constraint}': {reason}")]
    InvalidConstraint { constraint: String, reason: String },

    #[error("Invalid published version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("No available version of {org}/{mod_name} satisfies '{constraint}'")]
    NoCompatibleVersion {
        org: String,
        mod_name: String,
        constraint: String,
    },

    // ── Installation ─────────────────────────────────────────────────
    #[error(
        "Mod installation timed out: {id} did not reach version {target} after {attempts} checks"
    )]
    InstallationTimeout {
        id: String,
        target: String,
        attempts: u32,
    },

    #[error("Installation of {id} already failed: {message}")]
    InstallationFailed { id: String, message: String },

    #[error("Wait for {id} was cancelled after {attempts} checks")]
    Cancelled { id: String, attempts: u32 },

    // ── Local state ──────────────────────────────────────────────────
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Operation not supported: {operation} on {kind}")]
    Unsupported {
        operation: &'static str,
        kind: EntityKind,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` if the entity is absent remotely.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for a convergence wait that ran out of attempts.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::InstallationTimeout { .. })
    }

    pub(crate) fn missing(field: &str) -> Self {
        Self::Validation {
            field: field.to_owned(),
            reason: "a value is required".into(),
        }
    }

    /// Translate a client error raised while addressing `identifier`.
    pub(crate) fn from_api(err: turbot_api::Error, kind: EntityKind, identifier: &str) -> Self {
        if err.is_not_found() {
            return Self::NotFound {
                kind,
                identifier: identifier.to_owned(),
            };
        }
        Self::from(err)
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────
//
// Without the entity in hand a 404 stays a `Transport` error carrying the
// workspace's own message. `CoreError::from_api` is the path that knows
// what was being looked up.

impl From<turbot_api::Error> for CoreError {
    fn from(err: turbot_api::Error) -> Self {
        if err.is_auth_failure() {
            return CoreError::AuthenticationFailed {
                message: err.to_string(),
            };
        }

        match err {
            turbot_api::Error::Api {
                message,
                code,
                status,
            } => CoreError::Transport {
                message,
                code,
                status: Some(status),
            },
            turbot_api::Error::Transport(ref e) => CoreError::Transport {
                message: e.to_string(),
                code: None,
                status: e.status().map(|s| s.as_u16()),
            },
            turbot_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            turbot_api::Error::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("Workspace URL cannot be used as a base: {url}"),
            },
            turbot_api::Error::Tls(message) => CoreError::Config {
                message: format!("TLS error: {message}"),
            },
            turbot_api::Error::Deserialization { message, body: _ } => CoreError::Transport {
                message: format!("Deserialization error: {message}"),
                code: None,
                status: None,
            },
            turbot_api::Error::InvalidCredentials => CoreError::AuthenticationFailed {
                message: "Invalid access key or secret key".into(),
            },
        }
    }
}
