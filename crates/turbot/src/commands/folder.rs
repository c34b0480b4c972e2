//! Folder command handlers.

use std::collections::BTreeMap;

use turbot_core::{FolderState, Reconciler};

use crate::cli::{FolderArgs, FolderCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{lifecycle, util};

pub async fn handle(
    reconciler: &Reconciler,
    args: FolderArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        FolderCommand::Create {
            parent,
            title,
            description,
            tags,
            out,
        } => {
            let mut state = FolderState::new(parent, title, description);
            if !tags.is_empty() {
                state.tags = Some(tags.into_iter().collect());
            }
            reconciler.create(&mut state).await?;
            util::write_state(out.state.as_deref(), &state)?;
            output::status(
                &format!("Created folder {}", state.id.as_deref().unwrap_or_default()),
                global.quiet,
            );
            util::print_entity(&state, global)
        }

        FolderCommand::Update {
            target,
            parent,
            title,
            description,
            tags,
            clear_tags,
        } => {
            let mut state: FolderState = util::load_existing(&target)?;
            if let Some(parent) = parent {
                state.parent = parent;
            }
            if let Some(title) = title {
                state.title = title;
            }
            if let Some(description) = description {
                state.description = description;
            }
            if clear_tags {
                state.tags = Some(BTreeMap::new());
            } else if !tags.is_empty() {
                state.tags = Some(tags.into_iter().collect());
            }
            reconciler.update(&mut state).await?;
            util::write_state(target.state.as_deref(), &state)?;
            util::print_entity(&state, global)
        }

        FolderCommand::Read(target) => {
            lifecycle::read::<FolderState>(reconciler, &target, global).await
        }
        FolderCommand::Delete(target) => {
            lifecycle::delete::<FolderState>(reconciler, &target, global, "delete").await
        }
        FolderCommand::Exists(target) => {
            lifecycle::exists::<FolderState>(reconciler, &target, global).await
        }
        FolderCommand::Import(args) => {
            lifecycle::import::<FolderState>(reconciler, &args, global).await
        }
    }
}
