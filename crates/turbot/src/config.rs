//! CLI configuration: thin wrapper around `turbot_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--workspace, --access-key, --poll-interval, etc.).

use std::time::Duration;

use turbot_config::{ACCESS_KEY_ENV, SECRET_KEY_ENV};
use turbot_core::{ConnectionConfig, PollPolicy, ReconcileConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use turbot_config::{Config, Profile, config_path, load_config, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `ReconcileConfig` from the config file, profile and CLI overrides.
pub fn build_reconcile_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<ReconcileConfig, CliError> {
    build_reconcile_config_with(global, config, |name| std::env::var(name).ok())
}

/// As [`build_reconcile_config`], with an explicit environment lookup.
pub fn build_reconcile_config_with(
    global: &GlobalOpts,
    config: &Config,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ReconcileConfig, CliError> {
    let profile_name = active_profile_name(global, config);
    let mut profile = match config.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // An explicitly requested profile must exist.
        None if global.profile.is_some() => {
            let mut available: Vec<_> = config.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        None => Profile::default(),
    };

    // 1. Workspace URL (flag > env > profile)
    if let Some(ref workspace) = global.workspace {
        profile.workspace.clone_from(workspace);
    }
    if profile.workspace.trim().is_empty() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }
    let workspace = turbot_config::parse_workspace(&profile.workspace)?;

    // 2. Credentials: a flag shadows the profile's named variable and the
    //    global TURBOT_* variable.
    if global.access_key.is_some() {
        profile.access_key_env = None;
    }
    if global.secret_key.is_some() {
        profile.secret_key_env = None;
    }
    let lookup = |name: &str| match name {
        ACCESS_KEY_ENV if global.access_key.is_some() => global.access_key.clone(),
        SECRET_KEY_ENV if global.secret_key.is_some() => global.secret_key.clone(),
        _ => env(name),
    };
    let credentials = turbot_config::resolve_credentials_with(&profile, &profile_name, lookup)?;

    // 3. TLS verification
    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        turbot_config::resolve_tls(&profile, &config.defaults)
    };

    // 4. Timeouts and poll policy (flag > profile > defaults)
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(config.defaults.timeout);
    let poll_interval = global
        .poll_interval
        .or(profile.poll_interval)
        .unwrap_or(config.defaults.poll_interval);
    let poll_attempts = global
        .poll_attempts
        .or(profile.poll_attempts)
        .unwrap_or(config.defaults.poll_attempts);
    if poll_attempts == 0 {
        return Err(CliError::Validation {
            field: "poll_attempts".into(),
            reason: "must be at least 1".into(),
        });
    }

    Ok(ReconcileConfig {
        connection: ConnectionConfig {
            workspace,
            credentials,
            tls,
            timeout: Duration::from_secs(timeout),
        },
        poll: PollPolicy::new(Duration::from_secs(poll_interval), poll_attempts),
    })
}
