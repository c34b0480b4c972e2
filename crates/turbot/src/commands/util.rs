//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use turbot_core::Lifecycle;

use crate::cli::{GlobalOpts, TargetArgs};
use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

// ── State files ─────────────────────────────────────────────────────

/// Parse one entity state from a JSON file.
pub fn read_state<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: path.display().to_string(),
        reason: format!("invalid state JSON: {e}"),
    })
}

/// Write `state` as pretty JSON when a state file was given.
pub fn write_state<T: Serialize>(path: Option<&Path>, state: &T) -> Result<(), CliError> {
    let Some(path) = path else {
        return Ok(());
    };
    let mut rendered = serde_json::to_string_pretty(state)?;
    rendered.push('\n');
    std::fs::write(path, rendered)?;
    tracing::debug!(path = %path.display(), "state written");
    Ok(())
}

/// Stored state from `--state` (if the file exists) with `--id` applied on top.
pub fn load_target<E>(target: &TargetArgs) -> Result<E, CliError>
where
    E: Lifecycle + DeserializeOwned,
{
    let mut entity = match target.state.as_deref() {
        Some(path) if path.exists() => read_state(path)?,
        _ => E::default(),
    };
    if let Some(ref id) = target.id {
        entity.set_id(Some(id.clone()));
    }
    Ok(entity)
}

/// As [`load_target`], failing when no id is known.
pub fn load_existing<E>(target: &TargetArgs) -> Result<E, CliError>
where
    E: Lifecycle + DeserializeOwned,
{
    let entity: E = load_target(target)?;
    if entity.id().is_none_or(str::is_empty) {
        return Err(CliError::Validation {
            field: "id".into(),
            reason: format!(
                "no {} id known; pass --id or a --state file from a previous create or import",
                E::KIND
            ),
        });
    }
    Ok(entity)
}

/// Inline `--body` or the contents of `--body-file`.
pub fn read_body(inline: Option<String>, file: Option<PathBuf>) -> Result<Option<String>, CliError> {
    match (inline, file) {
        (Some(body), _) => Ok(Some(body)),
        (None, Some(path)) => Ok(Some(std::fs::read_to_string(path)?)),
        (None, None) => Ok(None),
    }
}

// ── Output ──────────────────────────────────────────────────────────

/// Print one entity state; `plain` prints its id.
pub fn print_entity<E>(entity: &E, global: &GlobalOpts) -> Result<(), CliError>
where
    E: Lifecycle + Serialize,
{
    let out = output::render_single(global.output, entity, |e| {
        e.id().unwrap_or_default().to_owned()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
