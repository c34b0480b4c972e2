//! Shared configuration for Turbot tools.
//!
//! TOML profiles, credential resolution (env + plaintext), and
//! translation to `turbot_core::ReconcileConfig`. The CLI layers its
//! flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use turbot_core::{AccessKeyPair, ConnectionConfig, PollPolicy, ReconcileConfig, TlsVerification};

/// Environment variable consulted for the access key when a profile names none.
pub const ACCESS_KEY_ENV: &str = "TURBOT_ACCESS_KEY";
/// Environment variable consulted for the secret key when a profile names none.
pub const SECRET_KEY_ENV: &str = "TURBOT_SECRET_KEY";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("no {key} configured for profile '{profile}'")]
    NoCredentials { profile: String, key: &'static str },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named workspace profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile to use: `requested`, else the configured default.
    pub fn profile(&self, requested: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = requested
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between installation checks.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    /// Installation checks before giving up.
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
            poll_attempts: default_poll_attempts(),
        }
    }
}

fn default_output() -> String {
    "json".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    PollPolicy::DEFAULT_INTERVAL.as_secs()
}
fn default_poll_attempts() -> u32 {
    PollPolicy::DEFAULT_MAX_ATTEMPTS
}

/// A named workspace profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Workspace URL (e.g., "https://acme.cloud.turbot.com").
    pub workspace: String,

    /// Access key (plaintext; prefer an env var).
    pub access_key: Option<String>,

    /// Environment variable name containing the access key.
    pub access_key_env: Option<String>,

    /// Secret key (plaintext; prefer an env var).
    pub secret_key: Option<String>,

    /// Environment variable name containing the secret key.
    pub secret_key_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override seconds between installation checks.
    pub poll_interval: Option<u64>,

    /// Override installation check budget.
    pub poll_attempts: Option<u32>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "turbot", "turbot").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("turbot");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` merged with `TURBOT_*` variables.
///
/// Nested keys use a double underscore: `TURBOT_DEFAULTS__TIMEOUT=5`.
/// A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TURBOT_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the access key pair from the process environment and profile.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<AccessKeyPair, ConfigError> {
    resolve_credentials_with(profile, profile_name, |name| std::env::var(name).ok())
}

/// Credential chain with an explicit environment lookup.
///
/// For each key: the profile's `*_env` variable, then the global
/// `TURBOT_ACCESS_KEY` / `TURBOT_SECRET_KEY`, then the plaintext value.
pub fn resolve_credentials_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<AccessKeyPair, ConfigError> {
    let lookup = |named: Option<&String>, global: &str, plain: Option<&String>, key: &'static str| {
        named
            .and_then(|name| env(name.as_str()))
            .or_else(|| env(global))
            .or_else(|| plain.cloned())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::NoCredentials {
                profile: profile_name.into(),
                key,
            })
    };

    let access_key = lookup(
        profile.access_key_env.as_ref(),
        ACCESS_KEY_ENV,
        profile.access_key.as_ref(),
        "access key",
    )?;
    let secret_key = lookup(
        profile.secret_key_env.as_ref(),
        SECRET_KEY_ENV,
        profile.secret_key.as_ref(),
        "secret key",
    )?;

    Ok(AccessKeyPair {
        access_key,
        secret_key: SecretString::from(secret_key),
    })
}

/// TLS mode from profile flags: `insecure` wins over a custom CA.
pub fn resolve_tls(profile: &Profile, defaults: &Defaults) -> TlsVerification {
    if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

pub fn parse_workspace(raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "workspace".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// Build a `ReconcileConfig` from a profile, no CLI flag overrides.
pub fn profile_to_reconcile_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ReconcileConfig, ConfigError> {
    let workspace = parse_workspace(&profile.workspace)?;
    let credentials = resolve_credentials(profile, profile_name)?;

    Ok(ReconcileConfig {
        connection: ConnectionConfig {
            workspace,
            credentials,
            tls: resolve_tls(profile, defaults),
            timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        },
        poll: PollPolicy::new(
            Duration::from_secs(profile.poll_interval.unwrap_or(defaults.poll_interval)),
            profile.poll_attempts.unwrap_or(defaults.poll_attempts),
        ),
    })
}
