//! Resource command handlers.

use turbot_core::{Reconciler, ResourceState};

use crate::cli::{GlobalOpts, ResourceArgs, ResourceCommand};
use crate::error::CliError;
use crate::output;

use super::{lifecycle, util};

pub async fn handle(
    reconciler: &Reconciler,
    args: ResourceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ResourceCommand::Create {
            parent,
            resource_type,
            body,
            out,
        } => {
            let body = util::read_body(body.body, body.body_file)?.unwrap_or_default();
            let mut state = ResourceState::new(parent, resource_type, body);
            reconciler.create(&mut state).await?;
            util::write_state(out.state.as_deref(), &state)?;
            output::status(
                &format!("Created resource {}", state.id.as_deref().unwrap_or_default()),
                global.quiet,
            );
            util::print_entity(&state, global)
        }

        ResourceCommand::Update {
            target,
            parent,
            resource_type,
            body,
        } => {
            let mut state: ResourceState = util::load_existing(&target)?;
            if let Some(parent) = parent {
                state.parent = parent;
            }
            if let Some(resource_type) = resource_type {
                state.resource_type = resource_type;
            }
            if let Some(body) = util::read_body(body.body, body.body_file)? {
                state.body = body;
            }
            reconciler.update(&mut state).await?;
            util::write_state(target.state.as_deref(), &state)?;
            util::print_entity(&state, global)
        }

        ResourceCommand::Read(target) => {
            lifecycle::read::<ResourceState>(reconciler, &target, global).await
        }
        ResourceCommand::Delete(target) => {
            lifecycle::delete::<ResourceState>(reconciler, &target, global, "delete").await
        }
        ResourceCommand::Exists(target) => {
            lifecycle::exists::<ResourceState>(reconciler, &target, global).await
        }
        ResourceCommand::Import(args) => {
            lifecycle::import::<ResourceState>(reconciler, &args, global).await
        }
    }
}
