//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Glean - Extract knowledge graphs and claims from text with a language model.
#[derive(Debug, Parser)]
#[command(name = "glean")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "GLEAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print an extraction prompt to paste into a chat model
    Prompt(PromptArgs),

    /// Parse a saved model response
    Parse(ParseArgs),

    /// Run extraction against the configured model
    Extract(ExtractArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// What to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Kind {
    /// Entities and relationships
    Graph,
    /// Claims
    Claims,
}

/// Where the input text comes from.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Read text from a file
    #[arg(short = 'i', long = "file")]
    pub file: Option<PathBuf>,

    /// Read text from stdin
    #[arg(long, conflicts_with = "file")]
    pub stdin: bool,
}

/// Arguments for the prompt command.
#[derive(Debug, Parser)]
pub struct PromptArgs {
    /// Prompt to generate
    #[arg(value_enum)]
    pub kind: Kind,

    #[command(flatten)]
    pub input: InputArgs,

    /// Entity types, comma-separated (overrides the config)
    #[arg(long, value_delimiter = ',')]
    pub entity_types: Vec<String>,

    /// Entity names or types claims should be about (claims only)
    #[arg(long)]
    pub entity_specs: Option<String>,

    /// Kind of claims to look for (claims only)
    #[arg(long)]
    pub description: Option<String>,
}

/// Arguments for the parse command.
#[derive(Debug, Parser)]
pub struct ParseArgs {
    /// Kind of response being parsed
    #[arg(value_enum)]
    pub kind: Kind,

    #[command(flatten)]
    pub input: InputArgs,

    /// Write CSV files to this directory
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Model to use (overrides the config)
    #[arg(short, long, env = "GLEAN_MODEL")]
    pub model: Option<String>,

    /// Continuation rounds (0 = none, -1 = until the model says no)
    #[arg(long, allow_negative_numbers = true)]
    pub max_gleanings: Option<i64>,

    /// Also extract claims, even if disabled in the config
    #[arg(long)]
    pub claims: bool,

    /// Skip claim extraction
    #[arg(long, conflicts_with = "claims")]
    pub no_claims: bool,

    /// Write CSV files to this directory
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

/// Arguments for config management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config management actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Write the default configuration file
    Init {
        /// Where to write it (defaults to the standard location)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// Print the default configuration path
    Path,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl ExtractArgs {
    /// Whether claims should be extracted, given the config default
    pub fn wants_claims(&self, enabled_in_config: bool) -> bool {
        if self.no_claims {
            false
        } else {
            self.claims || enabled_in_config
        }
    }
}
