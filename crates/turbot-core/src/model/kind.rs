use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The four entity types the engine reconciles.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EntityKind {
    Resource,
    Folder,
    Mod,
    /// Read-only: controls are observed, never written.
    Control,
}

impl EntityKind {
    /// Whether the kind supports create/update/delete.
    pub fn is_managed(self) -> bool {
        !matches!(self, Self::Control)
    }
}
