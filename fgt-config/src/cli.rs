use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "fgt-config")]
#[command(about = "Inspect and query FortiGate configuration exports")]
pub struct Cli {
    /// Log parser activity to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Show the parsed tree of a configuration file.
    Inspect(InspectArgs),
    /// Print the value or children at a path.
    Get(GetArgs),
    /// List top-level sections and flag unexpected block kinds.
    Sections(SectionsArgs),
    /// Show VDOM layout and firmware header.
    Vdoms(VdomsArgs),
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    pub file: PathBuf,
    /// Inspect one VDOM instead of the global scope.
    #[arg(long)]
    pub vdom: Option<String>,
    /// Start at this path (`/` or space separated).
    #[arg(long)]
    pub path: Option<String>,
    #[arg(long, default_value_t = 3)]
    pub depth: usize,
    /// Print one `path = values` line per setting instead of a tree.
    #[arg(long)]
    pub flat: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct GetArgs {
    pub file: PathBuf,
    /// Path to resolve, e.g. "system interface/wan1/ip".
    pub path: String,
    #[arg(long)]
    pub vdom: Option<String>,
}

#[derive(Parser, Debug)]
pub struct SectionsArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub vdom: Option<String>,
    /// Only sections whose name starts with these words.
    #[arg(long)]
    pub prefix: Option<String>,
    /// Section catalog TOML file. Defaults to the embedded catalog.
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct VdomsArgs {
    pub file: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
