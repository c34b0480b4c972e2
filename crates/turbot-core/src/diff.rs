//! Change planning.
//!
//! Compares a declared entity against its stored state and decides what a
//! reconcile would do. Drift the suppression predicates explain away (a
//! parent given by aka, a body that differs only in layout) is not a change.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::lifecycle::Lifecycle;
use crate::model::{ControlState, FolderState, ModState, ResourceState};
use crate::suppress::{body_matches, installed_is_latest, parent_matches};

/// One field that would change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub field: &'static str,
    pub old: Option<String>,
    pub new: Option<String>,
    /// The change cannot be applied in place.
    pub forces_replacement: bool,
}

impl FieldChange {
    fn update(field: &'static str, old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            field,
            old: Some(old.into()),
            new: Some(new.into()),
            forces_replacement: false,
        }
    }

    fn replace(field: &'static str, old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            forces_replacement: true,
            ..Self::update(field, old, new)
        }
    }
}

/// What reconciling a declared entity would do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "changes", rename_all = "snake_case")]
pub enum Plan {
    Create,
    NoChange,
    Update(Vec<FieldChange>),
    Replace(Vec<FieldChange>),
}

impl Plan {
    pub fn changes(&self) -> &[FieldChange] {
        match self {
            Self::Update(changes) | Self::Replace(changes) => changes,
            Self::Create | Self::NoChange => &[],
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoChange)
    }
}

/// Field-level comparison of a declared entity (`self`) with stored state.
pub trait Diff {
    fn changes(&self, stored: &Self) -> Vec<FieldChange>;
}

/// Plan the reconcile of `desired` given what is stored, if anything.
pub fn plan<E: Diff + Lifecycle>(desired: &E, stored: Option<&E>) -> Plan {
    let Some(stored) = stored.filter(|s| s.id().is_some()) else {
        return Plan::Create;
    };
    let changes = desired.changes(stored);
    if changes.is_empty() {
        Plan::NoChange
    } else if changes.iter().any(|c| c.forces_replacement) {
        Plan::Replace(changes)
    } else {
        Plan::Update(changes)
    }
}

fn parent_change(
    declared: &str,
    stored: &str,
    stored_akas: Option<&[String]>,
) -> Option<FieldChange> {
    (declared != stored && !parent_matches(declared, stored_akas))
        .then(|| FieldChange::update("parent", stored, declared))
}

impl Diff for ResourceState {
    fn changes(&self, stored: &Self) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        changes.extend(parent_change(
            &self.parent,
            &stored.parent,
            stored.parent_akas.as_deref(),
        ));
        if self.resource_type != stored.resource_type {
            changes.push(FieldChange::replace(
                "type",
                &stored.resource_type,
                &self.resource_type,
            ));
        }
        if self.body != stored.body && !body_matches(&stored.body, &self.body) {
            changes.push(FieldChange::update("body", &stored.body, &self.body));
        }
        changes
    }
}

fn render_tags(tags: &BTreeMap<String, String>) -> String {
    tags.iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(",")
}

impl Diff for FolderState {
    fn changes(&self, stored: &Self) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        changes.extend(parent_change(
            &self.parent,
            &stored.parent,
            stored.parent_akas.as_deref(),
        ));
        if self.title != stored.title {
            changes.push(FieldChange::update("title", &stored.title, &self.title));
        }
        if self.description != stored.description {
            changes.push(FieldChange::update(
                "description",
                &stored.description,
                &self.description,
            ));
        }
        let (declared_tags, stored_tags) = (self.tags_or_empty(), stored.tags_or_empty());
        if declared_tags != stored_tags {
            changes.push(FieldChange::update(
                "tags",
                render_tags(&stored_tags),
                render_tags(&declared_tags),
            ));
        }
        changes
    }
}

impl Diff for ModState {
    fn changes(&self, stored: &Self) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        changes.extend(parent_change(
            &self.parent,
            &stored.parent,
            stored.parent_akas.as_deref(),
        ));
        if self.org != stored.org {
            changes.push(FieldChange::replace("org", &stored.org, &self.org));
        }
        if self.mod_name != stored.mod_name {
            changes.push(FieldChange::replace("mod", &stored.mod_name, &self.mod_name));
        }
        if self.constraint() != stored.constraint() {
            changes.push(FieldChange::update(
                "version",
                stored.constraint(),
                self.constraint(),
            ));
        } else if !installed_is_latest(
            stored.installed_version.as_deref(),
            stored.latest_compatible_version.as_deref(),
        ) {
            // A newer compatible release was published since the last install.
            changes.push(FieldChange {
                field: "installed_version",
                old: stored.installed_version.clone(),
                new: stored.latest_compatible_version.clone(),
                forces_replacement: false,
            });
        }
        changes
    }
}

impl Diff for ControlState {
    /// Controls are observed only; there is nothing to reconcile.
    fn changes(&self, _stored: &Self) -> Vec<FieldChange> {
        Vec::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::body::normalize;

    const ROOT: &str = "tmod:@turbot/turbot#/";

    fn stored_resource() -> ResourceState {
        ResourceState {
            id: Some("200".into()),
            parent: "175".into(),
            parent_akas: Some(vec!["175".into(), ROOT.into()]),
            resource_type: "tmod:@turbot/turbot#/resource/types/folder".into(),
            body: normalize(r#"{"title":"t","description":"d"}"#),
        }
    }

    #[test]
    fn nothing_stored_plans_create() {
        let desired = ResourceState::new(ROOT, "x", "{}");
        assert_eq!(plan(&desired, None), Plan::Create);
        let unsaved = ResourceState::default();
        assert_eq!(plan(&desired, Some(&unsaved)), Plan::Create);
    }

    #[test]
    fn aka_parent_and_reformatted_body_are_no_change() {
        let stored = stored_resource();
        let desired = ResourceState::new(
            ROOT,
            stored.resource_type.clone(),
            r#"{ "description": "d", "title": "t" }"#,
        );
        assert_eq!(plan(&desired, Some(&stored)), Plan::NoChange);
    }

    #[test]
    fn body_change_is_update() {
        let stored = stored_resource();
        let desired = ResourceState::new(ROOT, stored.resource_type.clone(), r#"{"title":"t2","description":"d"}"#);
        let plan = plan(&desired, Some(&stored));
        assert!(matches!(plan, Plan::Update(ref c) if c.len() == 1 && c[0].field == "body"));
    }

    #[test]
    fn type_change_forces_replacement() {
        let stored = stored_resource();
        let desired = ResourceState::new(ROOT, "tmod:@turbot/aws#/resource/types/account", stored.body.clone());
        let plan = plan(&desired, Some(&stored));
        assert!(matches!(plan, Plan::Replace(_)));
        assert_eq!(plan.changes()[0].field, "type");
    }

    #[test]
    fn unknown_parent_is_update() {
        let stored = stored_resource();
        let desired = ResourceState::new("tmod:@turbot/other#/", stored.resource_type.clone(), stored.body.clone());
        let changes = desired.changes(&stored);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "parent");
    }

    #[test]
    fn folder_missing_tags_equal_empty_tags() {
        let stored = FolderState {
            id: Some("300".into()),
            parent: "175".into(),
            parent_akas: Some(vec![ROOT.into()]),
            title: "Acme".into(),
            description: "d".into(),
            tags: Some(BTreeMap::new()),
        };
        let desired = FolderState::new(ROOT, "Acme", "d");
        assert!(plan(&desired, Some(&stored)).is_noop());
    }

    #[test]
    fn outdated_install_is_drift() {
        let stored = ModState {
            id: Some("3003".into()),
            parent: "175".into(),
            parent_akas: Some(vec![ROOT.into()]),
            installed_version: Some("5.1.0".into()),
            latest_compatible_version: Some("5.3.0".into()),
            ..ModState::new("175", "turbot", "aws")
        };
        let desired = ModState::new(ROOT, "turbot", "aws");
        let plan = plan(&desired, Some(&stored));
        let Plan::Update(changes) = plan else {
            panic!("expected update, got {plan:?}");
        };
        assert_eq!(changes[0].field, "installed_version");
        assert_eq!(changes[0].new.as_deref(), Some("5.3.0"));
    }

    #[test]
    fn current_install_is_no_change() {
        let stored = ModState {
            id: Some("3003".into()),
            parent_akas: Some(vec![ROOT.into()]),
            installed_version: Some("5.3.0".into()),
            latest_compatible_version: Some("5.3.0".into()),
            ..ModState::new("175", "turbot", "aws")
        };
        let desired = ModState::new(ROOT, "turbot", "aws").with_version("");
        assert!(plan(&desired, Some(&stored)).is_noop());
    }

    #[test]
    fn changing_mod_name_replaces() {
        let stored = ModState {
            id: Some("3003".into()),
            installed_version: Some("5.3.0".into()),
            latest_compatible_version: Some("5.3.0".into()),
            ..ModState::new("175", "turbot", "aws")
        };
        let desired = ModState::new("175", "turbot", "azure");
        assert!(matches!(plan(&desired, Some(&stored)), Plan::Replace(_)));
    }
}
