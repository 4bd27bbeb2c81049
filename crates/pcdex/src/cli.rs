//! Clap derive structures for the `pcdex` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use pcdex_core::{PcSortField, SortOrder};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// pcdex -- browse and curate a PC hardware inventory from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "pcdex",
    version,
    about = "Browse, tag, and annotate a PC hardware inventory",
    long_about = "A command-line dashboard for a PC hardware inventory server.\n\n\
        Lists machines with sorting and tag filtering, shows full component\n\
        detail, edits notes, and manages tags and tag assignments.",
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
    /// Inventory server URL (overrides the config file)
    #[arg(long, short = 'c', env = "PCDEX_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PCDEX_OUTPUT",
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
    #[arg(long, short = 'k', env = "PCDEX_INSECURE", global = true)]
    pub insecure: bool,

    /// Custom CA certificate (PEM)
    #[arg(long, env = "PCDEX_CA_CERT", global = true)]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "PCDEX_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
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

// ── Sort enums (CLI spellings of the core types) ─────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortByArg {
    SubmittedAt,
    Host,
    Cpu,
}

impl From<SortByArg> for PcSortField {
    fn from(arg: SortByArg) -> Self {
        match arg {
            SortByArg::SubmittedAt => Self::SubmittedAt,
            SortByArg::Host => Self::Host,
            SortByArg::Cpu => Self::Cpu,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortOrderArg {
    Asc,
    Desc,
}

impl From<SortOrderArg> for SortOrder {
    fn from(arg: SortOrderArg) -> Self {
        match arg {
            SortOrderArg::Asc => Self::Asc,
            SortOrderArg::Desc => Self::Desc,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse and curate inventoried machines
    #[command(alias = "pc", alias = "p")]
    Pcs(PcsArgs),

    /// Manage tags
    #[command(alias = "tag", alias = "t")]
    Tags(TagsArgs),

    /// Inspect the CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── pcs ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PcsArgs {
    #[command(subcommand)]
    pub command: PcsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PcsCommand {
    /// List machines
    #[command(alias = "ls")]
    List {
        /// Sort column
        #[arg(long, value_enum)]
        sort_by: Option<SortByArg>,

        /// Sort direction
        #[arg(long, value_enum)]
        order: Option<SortOrderArg>,

        /// Only machines carrying this tag (by name)
        #[arg(long)]
        tag: Option<String>,
    },

    /// Show one machine with full component detail
    Get {
        /// PC id
        id: String,
    },

    /// Replace the notes of a machine
    Notes {
        /// PC id
        id: String,

        /// New notes text (empty string clears)
        notes: String,
    },

    /// Delete a machine and all its component records
    #[command(alias = "rm")]
    Delete {
        /// PC id
        id: String,
    },

    /// Attach a tag to a machine
    Tag {
        /// PC id
        id: String,

        /// Tag id to attach
        #[arg(long = "tag")]
        tag_id: i64,
    },

    /// Detach a tag from a machine
    Untag {
        /// PC id
        id: String,

        /// Tag id to detach
        #[arg(long = "tag")]
        tag_id: i64,
    },

    /// List the tags attached to a machine
    Tags {
        /// PC id
        id: String,
    },
}

// ── tags ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TagsArgs {
    #[command(subcommand)]
    pub command: TagsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TagsCommand {
    /// List all tags
    #[command(alias = "ls")]
    List,

    /// Create a tag
    Create {
        /// Tag name (unique)
        name: String,

        /// Badge color as a hex code
        #[arg(long, default_value = "#228BE6")]
        color: String,
    },

    /// Delete a tag everywhere
    #[command(alias = "rm")]
    Delete {
        /// Tag id
        id: i64,
    },
}

// ── config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Show the resolved configuration
    Show,
}

// ── completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
