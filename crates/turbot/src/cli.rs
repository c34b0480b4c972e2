//! Clap derive structures for the `turbot` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// turbot -- reconcile Turbot workspace entities from declared state
#[derive(Debug, Parser)]
#[command(
    name = "turbot",
    version,
    about = "Reconcile Turbot workspace resources, folders, mods and controls",
    long_about = "Create, read, update, delete and import Turbot workspace entities.\n\n\
        Entity state is JSON, one entity per file. Pass --state FILE to read\n\
        stored state from it and write the refreshed state back.",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Workspace profile to use
    #[arg(long, short = 'p', env = "TURBOT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Workspace URL (overrides profile)
    #[arg(long, short = 'w', env = "TURBOT_WORKSPACE", global = true)]
    pub workspace: Option<String>,

    /// Access key (overrides profile)
    #[arg(long, global = true)]
    pub access_key: Option<String>,

    /// Secret key (overrides profile)
    #[arg(long, global = true)]
    pub secret_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TURBOT_OUTPUT",
        default_value = "json",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "TURBOT_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "TURBOT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Seconds between mod installation checks
    #[arg(long, env = "TURBOT_POLL_INTERVAL", global = true)]
    pub poll_interval: Option<u64>,

    /// Mod installation checks before giving up
    #[arg(long, env = "TURBOT_POLL_ATTEMPTS", global = true)]
    pub poll_attempts: Option<u32>,
}

// ── Output ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON (default)
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Pretty table for lists, key/value lines for single entities
    Table,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage workspace resources
    #[command(alias = "res", alias = "r")]
    Resource(ResourceArgs),

    /// Manage folders
    #[command(alias = "f")]
    Folder(FolderArgs),

    /// Install, upgrade and uninstall mods
    #[command(name = "mod", alias = "m")]
    Mod(ModArgs),

    /// Inspect controls (read-only)
    #[command(alias = "ctl")]
    Control(ControlArgs),

    /// Show what reconciling a declared entity would change
    Plan(PlanArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SHARED ARGUMENT GROUPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where the stored state of an existing entity comes from.
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Entity id or aka (overrides the id in --state)
    #[arg(long)]
    pub id: Option<String>,

    /// JSON state file, read and written back in place
    #[arg(long)]
    pub state: Option<PathBuf>,
}

/// Import an existing entity.
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Entity id or aka
    pub id: String,

    /// Write the imported state to this file
    #[arg(long)]
    pub state: Option<PathBuf>,
}

/// Write newly created state to a file.
#[derive(Debug, Args)]
pub struct StateOut {
    /// Write the resulting state to this file
    #[arg(long)]
    pub state: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESOURCES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ResourceArgs {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourceCommand {
    /// Create a resource
    Create {
        /// Parent id or aka
        #[arg(long)]
        parent: String,

        /// Resource type URI (e.g. "tmod:@turbot/aws#/resource/types/account")
        #[arg(long = "type")]
        resource_type: String,

        #[command(flatten)]
        body: BodyArgs,

        #[command(flatten)]
        out: StateOut,
    },

    /// Refresh stored state from the workspace
    Read(TargetArgs),

    /// Apply declared changes to an existing resource
    Update {
        #[command(flatten)]
        target: TargetArgs,

        /// New parent id or aka
        #[arg(long)]
        parent: Option<String>,

        /// New resource type URI
        #[arg(long = "type")]
        resource_type: Option<String>,

        #[command(flatten)]
        body: OptionalBodyArgs,
    },

    /// Delete a resource
    #[command(alias = "rm")]
    Delete(TargetArgs),

    /// Check whether a resource exists
    Exists(TargetArgs),

    /// Adopt an existing resource
    Import(ImportArgs),
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct BodyArgs {
    /// Resource body as a JSON object
    #[arg(long)]
    pub body: Option<String>,

    /// Read the resource body from a JSON file
    #[arg(long)]
    pub body_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
#[group(required = false, multiple = false)]
pub struct OptionalBodyArgs {
    /// Replacement body as a JSON object
    #[arg(long)]
    pub body: Option<String>,

    /// Read the replacement body from a JSON file
    #[arg(long)]
    pub body_file: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FOLDERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FolderArgs {
    #[command(subcommand)]
    pub command: FolderCommand,
}

#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Create a folder
    Create {
        /// Parent id or aka
        #[arg(long)]
        parent: String,

        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        /// Tag as KEY=VALUE (repeatable)
        #[arg(long = "tag", value_parser = parse_tag)]
        tags: Vec<(String, String)>,

        #[command(flatten)]
        out: StateOut,
    },

    /// Refresh stored state from the workspace
    Read(TargetArgs),

    /// Apply declared changes to an existing folder
    Update {
        #[command(flatten)]
        target: TargetArgs,

        #[arg(long)]
        parent: Option<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Replace all tags with these KEY=VALUE pairs (repeatable)
        #[arg(long = "tag", value_parser = parse_tag)]
        tags: Vec<(String, String)>,

        /// Remove all tags
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,
    },

    /// Delete a folder
    #[command(alias = "rm")]
    Delete(TargetArgs),

    /// Check whether a folder exists
    Exists(TargetArgs),

    /// Adopt an existing folder
    Import(ImportArgs),
}

fn parse_tag(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty tag key in '{raw}'"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MODS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ModArgs {
    #[command(subcommand)]
    pub command: ModCommand,
}

#[derive(Debug, Subcommand)]
pub enum ModCommand {
    /// Install a mod and wait for it to report the resolved version
    Install {
        /// Parent id or aka
        #[arg(long)]
        parent: String,

        /// Publishing organisation (e.g. "turbot")
        #[arg(long)]
        org: String,

        /// Mod name (e.g. "aws")
        #[arg(long = "mod")]
        mod_name: String,

        /// Version constraint (e.g. "^5", ">=5.1, <6", "*")
        #[arg(long, default_value = "*")]
        version: String,

        #[command(flatten)]
        out: StateOut,
    },

    /// Refresh stored state from the workspace
    Read(TargetArgs),

    /// Re-resolve the constraint and install the newest compatible version
    #[command(alias = "upgrade")]
    Update {
        #[command(flatten)]
        target: TargetArgs,

        /// New version constraint
        #[arg(long)]
        version: Option<String>,
    },

    /// Uninstall a mod
    #[command(alias = "rm")]
    Uninstall(TargetArgs),

    /// Check whether a mod installation exists
    Exists(TargetArgs),

    /// Adopt an existing installation
    Import(ImportArgs),

    /// List published versions and the newest one a constraint allows
    Versions {
        #[arg(long)]
        org: String,

        #[arg(long = "mod")]
        mod_name: String,

        /// Version constraint to resolve
        #[arg(long, default_value = "*")]
        version: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONTROLS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ControlArgs {
    #[command(subcommand)]
    pub command: ControlCommand,
}

#[derive(Debug, Subcommand)]
pub enum ControlCommand {
    /// Read a control by id, or by control type URI and resource id
    Read {
        /// Control id
        #[arg(long, conflicts_with_all = ["uri", "resource"])]
        id: Option<String>,

        /// Control type URI
        #[arg(long, requires = "resource")]
        uri: Option<String>,

        /// Resource id the control targets
        #[arg(long, requires = "uri")]
        resource: Option<String>,

        /// Read the selector from, and write the result to, this file
        #[arg(long)]
        state: Option<PathBuf>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PLAN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Entity kind of both files
    #[arg(long)]
    pub kind: PlanKind,

    /// Declared state (JSON)
    #[arg(long)]
    pub desired: PathBuf,

    /// Stored state (JSON); omitted means the entity does not exist yet
    #[arg(long)]
    pub current: Option<PathBuf>,

    /// Read the stored state from the workspace before comparing
    #[arg(long, requires = "current")]
    pub refresh: bool,

    /// Exit with code 2 when the plan is not a no-op
    #[arg(long)]
    pub detailed_exitcode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanKind {
    Resource,
    Folder,
    Mod,
    Control,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration (secrets redacted)
    Show,

    /// Print the config file location
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
