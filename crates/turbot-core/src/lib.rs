//! Reconciliation engine for Turbot workspace entities.
//!
//! Takes declared entity state (resources, folders, installed mods, and
//! read-only controls) and brings the workspace in line with it:
//!
//! - **[`Lifecycle`]** — create/read/update/delete/exists/import, one impl
//!   per entity kind, all going through a [`Context`] holding the
//!   workspace client and the convergence poller.
//! - **[`Reconciler`]** — facade owning the client and poller; what the
//!   CLI talks to.
//! - **Drift handling** — [`body`] normalizes resource bodies, [`akas`]
//!   resolves every identifier a parent answers to, [`suppress`] decides
//!   when differing text means the same thing, and [`diff`] turns that
//!   into a [`Plan`].
//! - **Mod versions** — [`version`] resolves the newest published release
//!   a constraint allows; [`poller`] waits for an installation to report
//!   it.

pub mod akas;
pub mod body;
pub mod config;
pub mod convert;
pub mod diff;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod poller;
pub mod reconciler;
pub mod remote;
pub mod suppress;
pub mod version;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AccessKeyPair, ConnectionConfig, PollPolicy, ReconcileConfig, TlsVerification};
pub use diff::{Diff, FieldChange, Plan, plan};
pub use error::CoreError;
pub use lifecycle::{Context, Lifecycle, ReadOutcome};
pub use model::{
    ControlSelector, ControlState, EntityKind, FolderState, ModState, PublishedVersion,
    ResourceState,
};
pub use poller::{ConvergencePoller, InstallationJob, JobState};
pub use reconciler::Reconciler;
pub use remote::TurbotApi;
pub use version::{ResolvedVersion, VersionConstraint, resolve_latest_compatible};
