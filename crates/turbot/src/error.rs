//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use turbot_config::ConfigError;
use turbot_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const CANCELLED: i32 = 130;
    /// `plan --detailed-exitcode` found something to change.
    pub const PLAN_HAS_CHANGES: i32 = 2;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the workspace: {message}")]
    #[diagnostic(
        code(turbot::connection_failed),
        help(
            "Check the workspace URL and network access.\n\
             Use --insecure (-k) for self-signed certificates, or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(turbot::auth_failed),
        help("Verify the access key and secret key for profile '{profile}'.")
    )]
    AuthFailed { profile: String, message: String },

    #[error("No {key} configured for profile '{profile}'")]
    #[diagnostic(
        code(turbot::no_credentials),
        help(
            "Set TURBOT_ACCESS_KEY and TURBOT_SECRET_KEY, pass --access-key/--secret-key,\n\
             or name the variables with access_key_env/secret_key_env in the profile."
        )
    )]
    NoCredentials { profile: String, key: String },

    // ── Entities ─────────────────────────────────────────────────────
    #[error("{kind} '{identifier}' not found")]
    #[diagnostic(
        code(turbot::not_found),
        help("The id or aka may be wrong, or the {kind} was deleted outside this tool.")
    )]
    NotFound { kind: String, identifier: String },

    #[error("API error{}: {message}", code_suffix(.code.as_deref()))]
    #[diagnostic(code(turbot::api_error))]
    ApiError {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    #[error("{operation} is not supported for {kind}s")]
    #[diagnostic(
        code(turbot::unsupported),
        help("Controls are read-only; use `turbot control read`.")
    )]
    Unsupported { operation: String, kind: String },

    // ── Versions ─────────────────────────────────────────────────────
    #[error("Invalid version constraint '{constraint}': {reason}")]
    #[diagnostic(
        code(turbot::invalid_constraint),
        help("Use semver ranges such as \"^5\", \">=5.1, <6\" or \"*\".")
    )]
    InvalidConstraint { constraint: String, reason: String },

    #[error("No available version of {name} satisfies '{constraint}'")]
    #[diagnostic(
        code(turbot::no_compatible_version),
        help("Run: turbot mod versions --org <org> --mod <mod> to see published versions.")
    )]
    NoCompatibleVersion { name: String, constraint: String },

    // ── Installation ─────────────────────────────────────────────────
    #[error("Mod {id} did not reach version {target} after {attempts} checks")]
    #[diagnostic(
        code(turbot::install_timeout),
        help(
            "The installation may still complete. Run `turbot mod read` later,\n\
             or raise --poll-attempts / --poll-interval."
        )
    )]
    InstallTimeout {
        id: String,
        target: String,
        attempts: u32,
    },

    #[error("Wait for {id} was interrupted after {attempts} checks")]
    #[diagnostic(code(turbot::cancelled))]
    Cancelled { id: String, attempts: u32 },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(turbot::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(turbot::profile_not_found),
        help("Available profiles: {available}\nOr pass --workspace with credentials directly.")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No workspace configured")]
    #[diagnostic(
        code(turbot::no_config),
        help(
            "Add a profile to {path}\n\
             or pass --workspace (TURBOT_WORKSPACE)."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(turbot::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(turbot::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(turbot::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(turbot::render))]
    Render(String),
}

fn code_suffix(code: Option<&str>) -> String {
    code.map(|c| format!(" ({c})")).unwrap_or_default()
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. }
            | Self::ProfileNotFound { .. }
            | Self::ApiError {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::ApiError {
                status: Some(401 | 403),
                ..
            } => exit_code::AUTH,
            Self::InstallTimeout { .. } => exit_code::TIMEOUT,
            Self::Cancelled { .. } => exit_code::CANCELLED,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. }
            | Self::InvalidConstraint { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::Json(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { kind, identifier } => CliError::NotFound {
                kind: kind.to_string(),
                identifier,
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: "current".into(),
                message,
            },

            // No status means the request never got a response.
            CoreError::Transport {
                message,
                status: None,
                ..
            } => CliError::ConnectionFailed { message },

            CoreError::Transport {
                message,
                code,
                status,
            } => CliError::ApiError {
                message,
                code,
                status,
            },

            CoreError::InvalidConstraint { constraint, reason } => {
                CliError::InvalidConstraint { constraint, reason }
            }

            CoreError::InvalidVersion { version, reason } => CliError::ApiError {
                message: format!("workspace published an invalid version '{version}': {reason}"),
                code: Some("invalid_version".into()),
                status: None,
            },

            CoreError::NoCompatibleVersion {
                org,
                mod_name,
                constraint,
            } => CliError::NoCompatibleVersion {
                name: format!("{org}/{mod_name}"),
                constraint,
            },

            CoreError::InstallationTimeout {
                id,
                target,
                attempts,
            } => CliError::InstallTimeout {
                id,
                target,
                attempts,
            },

            CoreError::InstallationFailed { id, message } => CliError::ApiError {
                message: format!("installation of {id} failed: {message}"),
                code: None,
                status: None,
            },

            CoreError::Cancelled { id, attempts } => CliError::Cancelled { id, attempts },

            CoreError::Serialization { message } => CliError::Validation {
                field: "body".into(),
                reason: message,
            },

            CoreError::Validation { field, reason } => CliError::Validation { field, reason },

            CoreError::Unsupported { operation, kind } => CliError::Unsupported {
                operation: operation.into(),
                kind: kind.to_string(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "connection".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile, key } => CliError::NoCredentials {
                profile,
                key: key.into(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}
