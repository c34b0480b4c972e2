//! `turbot plan`: compare declared state with stored state.
//!
//! Offline by default. With `--refresh` the stored state is read from the
//! workspace first, the way a reconcile would see it.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tabled::Tabled;

use turbot_core::{
    ControlState, Diff, FieldChange, FolderState, Lifecycle, ModState, Plan, ReadOutcome,
    Reconciler, ResourceState,
};

use crate::cli::{GlobalOpts, OutputFormat, PlanArgs, PlanKind};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Stored")]
    old: String,
    #[tabled(rename = "Declared")]
    new: String,
    #[tabled(rename = "Replace")]
    replace: &'static str,
}

impl From<&FieldChange> for ChangeRow {
    fn from(c: &FieldChange) -> Self {
        Self {
            field: c.field,
            old: c.old.clone().unwrap_or_default(),
            new: c.new.clone().unwrap_or_default(),
            replace: if c.forces_replacement { "yes" } else { "" },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

/// Print the plan. Returns `true` when reconciling would change something.
pub async fn handle(
    reconciler: Option<&Reconciler>,
    args: &PlanArgs,
    global: &GlobalOpts,
) -> Result<bool, CliError> {
    let plan = match args.kind {
        PlanKind::Resource => plan_for::<ResourceState>(reconciler, args).await?,
        PlanKind::Folder => plan_for::<FolderState>(reconciler, args).await?,
        PlanKind::Mod => plan_for::<ModState>(reconciler, args).await?,
        PlanKind::Control => plan_for::<ControlState>(reconciler, args).await?,
    };

    let out = render(&plan, global.output)?;
    output::print_output(&out, global.quiet);
    Ok(!plan.is_noop())
}

async fn plan_for<E>(reconciler: Option<&Reconciler>, args: &PlanArgs) -> Result<Plan, CliError>
where
    E: Diff + Lifecycle + Serialize + DeserializeOwned,
{
    let desired: E = util::read_state(&args.desired)?;
    let mut stored: Option<E> = match args.current {
        Some(ref path) => Some(util::read_state(path)?),
        None => None,
    };

    let gone = match (reconciler, stored.as_mut()) {
        (Some(reconciler), Some(current)) if current.id().is_some() => {
            reconciler.read(current).await? == ReadOutcome::Gone
        }
        _ => false,
    };
    if gone {
        stored = None;
    }

    Ok(turbot_core::plan(&desired, stored.as_ref()))
}

fn action(plan: &Plan) -> &'static str {
    match plan {
        Plan::Create => "create",
        Plan::NoChange => "no-op",
        Plan::Update(_) => "update",
        Plan::Replace(_) => "replace",
    }
}

fn render(plan: &Plan, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let rows: Vec<ChangeRow> = plan.changes().iter().map(ChangeRow::from).collect();
            if rows.is_empty() {
                Ok(format!("Plan: {}", action(plan)))
            } else {
                Ok(format!(
                    "Plan: {}\n{}",
                    action(plan),
                    output::render_table(&rows)
                ))
            }
        }
        OutputFormat::Plain => Ok(action(plan).to_owned()),
        other => output::render_single(other, plan, |p| action(p).to_owned()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stored_resource() -> ResourceState {
        ResourceState {
            id: Some("321".into()),
            parent_akas: Some(vec!["175".into(), "tmod:@turbot/turbot#/".into()]),
            ..ResourceState::new("175", "tmod:@turbot/aws#/resource/types/account", r#"{"a":1}"#)
        }
    }

    #[test]
    fn type_change_renders_as_replace() {
        let mut desired = stored_resource();
        desired.resource_type = "tmod:@turbot/aws#/resource/types/region".into();
        let plan = turbot_core::plan(&desired, Some(&stored_resource()));

        let table = render(&plan, OutputFormat::Table).unwrap();
        assert!(table.starts_with("Plan: replace"));
        assert!(table.contains("yes"));
        assert_eq!(render(&plan, OutputFormat::Plain).unwrap(), "replace");
    }

    #[test]
    fn json_plan_is_tagged_by_action() {
        let plan = turbot_core::plan(&stored_resource(), None);
        let json: serde_json::Value =
            serde_json::from_str(&render(&plan, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["action"], "create");
    }

    #[test]
    fn layout_only_body_change_is_a_noop() {
        let mut desired = stored_resource();
        desired.body = "{\n  \"a\": 1\n}".into();
        let plan = turbot_core::plan(&desired, Some(&stored_resource()));
        assert_eq!(render(&plan, OutputFormat::Table).unwrap(), "Plan: no-op");
    }
}
