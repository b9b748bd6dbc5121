//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    collect::CollectArgs, completions::CompletionsArgs, config::ConfigCommands, list::ListArgs,
    normalize::NormalizeArgs, resolve::ResolveArgs,
};

#[derive(Parser)]
#[command(name = "xsdr")]
#[command(author, version, about = "Layered XSD import resolver")]
#[command(long_about = "Resolves XSD import and include locations against a classpath of schema directories and bundled schemas, relative to the importing document, or as plain URIs.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Extra classpath directory, searched before configured ones (repeatable)
    #[arg(long = "classpath", short = 'c', global = true, value_name = "DIR")]
    pub classpath: Vec<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a single schema location
    Resolve(ResolveArgs),

    /// Load a schema collection, following imports and includes
    Collect(CollectArgs),

    /// Show strict and lenient normalization of resource paths
    Normalize(NormalizeArgs),

    /// List schema resources visible on the classpath
    List(ListArgs),

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Auto,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// Markdown tables
    Md,
}
