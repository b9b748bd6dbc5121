//! `xsdr collect` command - Load a schema collection

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{build_loader, render_table, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::schema::{ClasspathUriResolver, SchemaCollection};

#[derive(clap::Args, Debug)]
pub struct CollectArgs {
    /// Root schema locations (default: configured roots)
    pub roots: Vec<String>,

    /// Load the roots only, without following imports and includes
    #[arg(long)]
    pub no_inline: bool,

    /// Print the content of every loaded document
    #[arg(long)]
    pub print: bool,
}

pub fn run(args: CollectArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let loader = build_loader(&config, global);
    let resolver = ClasspathUriResolver::new(loader.clone());

    let roots = if args.roots.is_empty() {
        config.roots()
    } else {
        args.roots
    };
    let inline = config.inline() && !args.no_inline;

    let documents = SchemaCollection::new(loader, resolver, roots)
        .inline(inline)
        .load()?;

    if global.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&documents).into_diagnostic()?);
        return Ok(());
    }

    if args.print {
        for doc in &documents {
            println!("{}", style(format!("==> {} <==", doc.system_id)).bold());
            println!("{}", doc.content);
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = documents
        .iter()
        .map(|doc| {
            vec![
                doc.system_id.clone(),
                doc.target_namespace.clone().unwrap_or_else(|| "-".to_string()),
                doc.references.len().to_string(),
                truncate_str(&doc.digest, 15),
            ]
        })
        .collect();
    println!(
        "{}",
        render_table(&["SYSTEM ID", "TARGET NAMESPACE", "REFS", "SHA-256"], &rows, global.format)
    );

    if !global.quiet && global.format != OutputFormat::Tsv {
        println!(
            "\n{} {} document(s) loaded{}",
            style("✓").green(),
            documents.len(),
            if inline { "" } else { " (roots only)" }
        );
    }
    Ok(())
}
