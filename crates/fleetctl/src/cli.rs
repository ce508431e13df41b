//! Clap derive structures for the `fleetctl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fleetctl -- drive units on a fleet cluster
#[derive(Debug, Parser)]
#[command(
    name = "fleetctl",
    version,
    about = "Manage units on a fleet cluster from the command line",
    long_about = "Submit unit definitions to a fleet cluster, move them through\n\
        their lifecycle (load, start, stop, unload, destroy), and inspect\n\
        the state systemd reports for them on every machine.",
    propagate_version = true,
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
    /// Cluster profile to use
    #[arg(long, short = 'p', env = "FLEETCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// fleet API endpoint (overrides profile)
    #[arg(long, env = "FLEETCTL_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// API version segment (overrides profile)
    #[arg(long, env = "FLEETCTL_API_VERSION", global = true)]
    pub api_version: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FLEETCTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "FLEETCTL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "FLEETCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the state of every unit on every machine
    #[command(alias = "list")]
    ListUnits(ListArgs),

    /// List machines in the cluster
    #[command(alias = "machines")]
    ListMachines(ListArgs),

    /// List submitted units and their desired state
    ListUnitFiles(ListArgs),

    /// Submit unit definitions (JSON, YAML or TOML files)
    Submit(SubmitArgs),

    /// Set units to loaded, submitting definition files first
    Load(UnitsArgs),

    /// Set units to launched
    Start(UnitsArgs),

    /// Set units back to loaded
    Stop(UnitsArgs),

    /// Set units to inactive
    Unload(UnitsArgs),

    /// Remove units from the cluster
    Destroy(UnitsArgs),

    /// Show the current state fleet reports for units
    Status(UnitsArgs),

    /// Show the systemd state reported for one unit
    UnitState(UnitStateArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Do not truncate machine IDs
    #[arg(long)]
    pub full: bool,
}

#[derive(Debug, Args)]
pub struct UnitsArgs {
    /// Unit names, or definition files whose names are derived from the file name
    #[arg(required = true, value_name = "UNIT")]
    pub units: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Definition files, e.g. `web@.service.yaml`
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct UnitStateArgs {
    /// Unit name
    pub unit: String,
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
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Config key (endpoint, api_version, auth_mode, username, token_env, ca_cert, insecure, timeout)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password or token in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
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
