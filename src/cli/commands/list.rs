//! `xsdr list` command - List classpath resources

use console::style;
use miette::{IntoDiagnostic, Result};
use serde_json::json;

use crate::cli::helpers::{build_loader, render_table};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only list paths starting with this prefix
    #[arg(long)]
    pub prefix: Option<String>,
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let loader = build_loader(&config, global);

    let listing: Vec<_> = loader
        .classpath()
        .list()
        .into_iter()
        .filter(|l| args.prefix.as_deref().map_or(true, |p| l.path.starts_with(p)))
        .collect();

    if global.format == OutputFormat::Json {
        let out: Vec<_> = listing
            .iter()
            .map(|l| json!({ "path": l.path, "origin": l.origin.to_string() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out).into_diagnostic()?);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = listing
        .iter()
        .map(|l| vec![l.path.clone(), l.origin.to_string()])
        .collect();
    println!("{}", render_table(&["PATH", "ORIGIN"], &rows, global.format));

    if !global.quiet && global.format != OutputFormat::Tsv {
        println!(
            "\n{} resource(s) on {} classpath entr{}",
            listing.len(),
            loader.classpath().entries().len(),
            if loader.classpath().entries().len() == 1 { "y" } else { "ies" }
        );
        println!("{}", style("Use 'xsdr resolve <location> --explain' to trace a lookup").dim());
    }
    Ok(())
}
