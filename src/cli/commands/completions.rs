//! `xsdr completions` command - Shell completion scripts
//!
//! ```bash
//! source <(xsdr completions bash)
//! xsdr completions fish > ~/.config/fish/completions/xsdr.fish
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path).into_diagnostic()?),
        None => Box::new(io::stdout()),
    };
    generate(args.shell, &mut cmd, name, &mut out);
    out.flush().into_diagnostic()
}
