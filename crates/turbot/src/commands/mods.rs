//! Mod command handlers.
//!
//! Install and update block until the installation reports the resolved
//! version. The state file is written even when that wait fails, so the
//! assigned id survives a timeout or Ctrl-C.

use serde::Serialize;
use tabled::Tabled;

use turbot_core::{ModState, PublishedVersion, Reconciler, ResolvedVersion};

use crate::cli::{GlobalOpts, ModArgs, ModCommand};
use crate::error::CliError;
use crate::output;

use super::{lifecycle, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Clone, Serialize, Tabled)]
struct VersionRow {
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Latest compatible")]
    #[tabled(display_with = "marker")]
    latest_compatible: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn marker(flag: &bool) -> String {
    if *flag { "*".into() } else { String::new() }
}

fn version_rows(
    published: Vec<PublishedVersion>,
    latest: Option<&ResolvedVersion>,
) -> Vec<VersionRow> {
    published
        .into_iter()
        .map(|entry| VersionRow {
            latest_compatible: latest.is_some_and(|l| l.published == entry.version),
            version: entry.version,
            status: entry.status,
        })
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    reconciler: &Reconciler,
    args: ModArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ModCommand::Install {
            parent,
            org,
            mod_name,
            version,
            out,
        } => {
            let mut state = ModState::new(parent, org, mod_name).with_version(version);
            announce_wait(reconciler, &state, global);
            let result = reconciler.create(&mut state).await;
            util::write_state(out.state.as_deref(), &state)?;
            result?;
            output::status(
                &format!(
                    "Installed {} {}",
                    state.qualified_name(),
                    state.installed_version.as_deref().unwrap_or_default()
                ),
                global.quiet,
            );
            util::print_entity(&state, global)
        }

        ModCommand::Update { target, version } => {
            let mut state: ModState = util::load_existing(&target)?;
            if let Some(version) = version {
                state.version = version;
            }
            announce_wait(reconciler, &state, global);
            let result = reconciler.update(&mut state).await;
            util::write_state(target.state.as_deref(), &state)?;
            result?;
            util::print_entity(&state, global)
        }

        ModCommand::Versions {
            org,
            mod_name,
            version,
        } => {
            let (published, latest) = reconciler.mod_versions(&org, &mod_name, &version).await?;
            match latest {
                Some(ref latest) => output::status(
                    &format!("Newest {org}/{mod_name} matching '{version}': {latest}"),
                    global.quiet,
                ),
                None => output::status(
                    &format!("No available {org}/{mod_name} release matches '{version}'"),
                    global.quiet,
                ),
            }
            let rows = version_rows(published, latest.as_ref());
            let out =
                output::render_list(global.output, &rows, VersionRow::clone, |r| {
                    r.version.clone()
                })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ModCommand::Read(target) => lifecycle::read::<ModState>(reconciler, &target, global).await,
        ModCommand::Uninstall(target) => {
            lifecycle::delete::<ModState>(reconciler, &target, global, "uninstall").await
        }
        ModCommand::Exists(target) => {
            lifecycle::exists::<ModState>(reconciler, &target, global).await
        }
        ModCommand::Import(args) => lifecycle::import::<ModState>(reconciler, &args, global).await,
    }
}

fn announce_wait(reconciler: &Reconciler, state: &ModState, global: &GlobalOpts) {
    let policy = reconciler.poll_policy();
    output::status(
        &format!(
            "Installing {} ({}); waiting up to {}s for it to report its version",
            state.qualified_name(),
            state.constraint(),
            policy.budget().as_secs()
        ),
        global.quiet,
    );
}
