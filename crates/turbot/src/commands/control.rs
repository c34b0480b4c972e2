//! Control command handlers.

use std::path::Path;

use turbot_core::{ControlState, EntityKind, ReadOutcome, Reconciler};

use crate::cli::{ControlArgs, ControlCommand, GlobalOpts};
use crate::error::CliError;

use super::util;

pub async fn handle(
    reconciler: &Reconciler,
    args: ControlArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ControlCommand::Read {
            id,
            uri,
            resource,
            state,
        } => {
            let mut control = selector(id, uri, resource, state.as_deref())?;
            let identifier = describe(&control);

            // A control is only ever looked up, so a miss is an error.
            if reconciler.read(&mut control).await? == ReadOutcome::Gone {
                return Err(CliError::NotFound {
                    kind: EntityKind::Control.to_string(),
                    identifier,
                });
            }
            util::write_state(state.as_deref(), &control)?;
            util::print_entity(&control, global)
        }
    }
}

/// Build the lookup from flags, falling back to a stored state file.
fn selector(
    id: Option<String>,
    uri: Option<String>,
    resource: Option<String>,
    state: Option<&Path>,
) -> Result<ControlState, CliError> {
    match (id, uri, resource) {
        (Some(id), _, _) => Ok(ControlState::by_id(id)),
        (None, Some(uri), Some(resource)) => Ok(ControlState::by_uri(uri, resource)),
        _ => match state {
            Some(path) if path.exists() => util::read_state(path),
            _ => Err(CliError::Validation {
                field: "control".into(),
                reason: "pass --id, or --uri with --resource, or an existing --state file".into(),
            }),
        },
    }
}

fn describe(control: &ControlState) -> String {
    match (&control.uri, &control.resource, &control.id) {
        (Some(uri), Some(resource), _) => format!("{uri} on {resource}"),
        (_, _, Some(id)) => id.clone(),
        _ => String::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn flags_win_over_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("control.json");
        std::fs::write(&path, r#"{"id":"stored"}"#).unwrap();

        let control = selector(Some("flag".into()), None, None, Some(&path)).unwrap();
        assert_eq!(control.id.as_deref(), Some("flag"));

        let control = selector(None, None, None, Some(&path)).unwrap();
        assert_eq!(control.id.as_deref(), Some("stored"));
    }

    #[test]
    fn uri_lookup_is_described_by_uri_and_resource() {
        let control = selector(
            None,
            Some("tmod:@turbot/aws-s3#/control/types/bucketApproved".into()),
            Some("1234".into()),
            None,
        )
        .unwrap();
        assert_eq!(
            describe(&control),
            "tmod:@turbot/aws-s3#/control/types/bucketApproved on 1234"
        );
    }

    #[test]
    fn no_selector_is_rejected() {
        assert!(matches!(
            selector(None, None, None, None),
            Err(CliError::Validation { .. })
        ));
    }
}
