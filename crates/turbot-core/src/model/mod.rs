// ── Reconciliation domain model ──
//
// Each entity type is stored as a flat record: the declared fields a
// user writes, plus the computed fields (`id`, `parent_akas`, installed
// versions) that the lifecycle controllers fill in. Records serialize to
// JSON so a caller can persist them between runs.

pub mod control;
pub mod folder;
pub mod kind;
pub mod mods;
pub mod remote;
pub mod resource;

pub use control::ControlState;
pub use folder::FolderState;
pub use kind::EntityKind;
pub use mods::ModState;
pub use remote::{
    ControlSelector, EntityRef, FolderFields, PublishedVersion, RemoteControl, RemoteFolder,
    RemoteMod, RemoteResource,
};
pub use resource::ResourceState;
