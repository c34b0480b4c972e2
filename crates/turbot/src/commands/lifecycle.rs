//! Handlers shared by every managed entity kind.
//!
//! Read, delete, exists and import behave the same for resources,
//! folders and mods; kind-specific create/update live in their modules.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use turbot_core::{Lifecycle, ReadOutcome, Reconciler};

use crate::cli::{GlobalOpts, ImportArgs, TargetArgs};
use crate::error::CliError;
use crate::output;

use super::util;

/// Refresh stored state. A vanished entity clears the id; it is not an error.
pub async fn read<E>(
    reconciler: &Reconciler,
    target: &TargetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    E: Lifecycle + Serialize + DeserializeOwned,
{
    let mut entity: E = util::load_existing(target)?;
    let id = entity.id().unwrap_or_default().to_owned();

    let outcome = reconciler.read(&mut entity).await?;
    util::write_state(target.state.as_deref(), &entity)?;
    if outcome == ReadOutcome::Gone {
        output::status(
            &format!("{} {id} no longer exists; local id cleared", E::KIND),
            global.quiet,
        );
    }
    util::print_entity(&entity, global)
}

pub async fn delete<E>(
    reconciler: &Reconciler,
    target: &TargetArgs,
    global: &GlobalOpts,
    verb: &str,
) -> Result<(), CliError>
where
    E: Lifecycle + Serialize + DeserializeOwned,
{
    let mut entity: E = util::load_existing(target)?;
    let id = entity.id().unwrap_or_default().to_owned();

    if !util::confirm(
        &format!("{} {verb}", E::KIND),
        &format!("About to {verb} {} '{id}'. This cannot be undone. Continue?", E::KIND),
        global.yes,
    )? {
        return Ok(());
    }

    reconciler.delete(&mut entity).await?;
    util::write_state(target.state.as_deref(), &entity)?;
    output::status(&format!("{} {id}: {verb} complete", E::KIND), global.quiet);
    Ok(())
}

/// Report whether the entity exists. Unknown ids report `false`.
pub async fn exists<E>(
    reconciler: &Reconciler,
    target: &TargetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    E: Lifecycle + DeserializeOwned,
{
    let entity: E = util::load_target(target)?;
    let exists = reconciler.exists(&entity).await?;
    let report = json!({
        "kind": E::KIND,
        "id": entity.id(),
        "exists": exists,
    });
    let out = output::render_single(global.output, &report, |_| exists.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn import<E>(
    reconciler: &Reconciler,
    args: &ImportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    E: Lifecycle + Serialize,
{
    let entity: E = reconciler.import(&args.id).await?;
    util::write_state(args.state.as_deref(), &entity)?;
    output::status(&format!("Imported {} {}", E::KIND, args.id), global.quiet);
    util::print_entity(&entity, global)
}
