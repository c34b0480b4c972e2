// ── Installed mod ──

use serde::{Deserialize, Serialize};

/// Constraint used when none is declared.
pub const ANY_VERSION: &str = "*";

fn any_version() -> String {
    ANY_VERSION.to_owned()
}

/// A mod installation at a parent.
///
/// `version` is the declared constraint. `installed_version` and
/// `latest_compatible_version` are computed: the former as reported by
/// the workspace, the latter resolved from the published catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub parent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_akas: Option<Vec<String>>,
    pub org: String,
    #[serde(rename = "mod")]
    pub mod_name: String,
    #[serde(default = "any_version")]
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_compatible_version: Option<String>,
}

impl Default for ModState {
    fn default() -> Self {
        Self {
            id: None,
            parent: String::new(),
            parent_akas: None,
            org: String::new(),
            mod_name: String::new(),
            version: any_version(),
            installed_version: None,
            latest_compatible_version: None,
        }
    }
}

impl ModState {
    pub fn new(
        parent: impl Into<String>,
        org: impl Into<String>,
        mod_name: impl Into<String>,
    ) -> Self {
        Self {
            parent: parent.into(),
            org: org.into(),
            mod_name: mod_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_version(mut self, constraint: impl Into<String>) -> Self {
        self.version = constraint.into();
        self
    }

    /// The declared constraint, falling back to "any version" when blank.
    pub fn constraint(&self) -> &str {
        let trimmed = self.version.trim();
        if trimmed.is_empty() { ANY_VERSION } else { trimmed }
    }

    /// `org/mod`, as shown in logs and errors.
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.org, self.mod_name)
    }
}
