use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "toolconf",
    about = "Inspect and edit a managed toolbox configuration",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store settings file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Managed document location; overrides the settings file
    #[arg(short, long, global = true)]
    pub path: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the managed document if it does not exist
    Init(InitArgs),
    /// Print the current document and its version
    Get(GetArgs),
    /// Replace the document, checked against a version
    Update(UpdateArgs),
    /// Apply a batch of actions, retrying on conflict
    Apply(ApplyArgs),
    /// Print a declarative source with its groups inlined
    Inline(InlineArgs),
    /// Inline a declarative source and write it over the managed document
    Load(LoadArgs),
}

#[derive(Args)]
pub struct InitArgs {}

#[derive(Args)]
pub struct GetArgs {
    /// Print only the version stamp
    #[arg(long)]
    pub version_only: bool,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// JSON file holding the new document
    pub document: PathBuf,
    /// Version the edit was based on (hex)
    #[arg(long = "expect", required_unless_present = "force")]
    pub expect: Option<String>,
    /// Overwrite whatever is stored
    #[arg(long, conflicts_with = "expect")]
    pub force: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// JSON file holding an array of actions
    pub actions: PathBuf,
}

#[derive(Args)]
pub struct InlineArgs {
    /// JSON or YAML source
    pub source: PathBuf,
}

#[derive(Args)]
pub struct LoadArgs {
    /// JSON or YAML source
    pub source: PathBuf,
}
