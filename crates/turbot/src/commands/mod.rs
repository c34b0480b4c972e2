//! Command dispatch: bridges CLI args -> reconciler calls -> output formatting.

pub mod config_cmd;
pub mod control;
pub mod folder;
pub mod lifecycle;
pub mod mods;
pub mod plan;
pub mod resource;
pub mod util;

use turbot_core::Reconciler;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a workspace-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    reconciler: &Reconciler,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Resource(args) => resource::handle(reconciler, args, global).await,
        Command::Folder(args) => folder::handle(reconciler, args, global).await,
        Command::Mod(args) => mods::handle(reconciler, args, global).await,
        Command::Control(args) => control::handle(reconciler, args, global).await,
        // Plan, Config and Completions are handled before connecting
        Command::Plan(_) | Command::Config(_) | Command::Completions(_) => {
            unreachable!("handled without a workspace connection")
        }
    }
}
