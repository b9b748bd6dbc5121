//! `xsdr resolve` command - Resolve a single schema location

use console::style;
use miette::{IntoDiagnostic, Result};
use serde_json::json;

use crate::cli::helpers::{build_loader, render_table};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::schema::{ClasspathUriResolver, ImportReference, Outcome, UriResolver};

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Schema location as written in the import (e.g. ../common.xsd)
    pub schema_location: String,

    /// URI of the importing document
    #[arg(long, short = 'b')]
    pub base: Option<String>,

    /// Namespace of the import
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Show what each lookup strategy found
    #[arg(long)]
    pub explain: bool,

    /// Print the resolved document
    #[arg(long, short = 'p')]
    pub print: bool,
}

pub fn run(args: ResolveArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let resolver = ClasspathUriResolver::new(build_loader(&config, global));

    let mut reference = ImportReference::new(&args.schema_location);
    if let Some(base) = &args.base {
        reference = reference.with_base_uri(base.as_str());
    }
    if let Some(ns) = &args.namespace {
        reference = reference.with_namespace(ns.as_str());
    }

    let attempts = args.explain.then(|| resolver.trace(&reference));

    if let (Some(attempts), false) = (&attempts, global.format == OutputFormat::Json) {
        let rows: Vec<Vec<String>> = attempts
            .iter()
            .map(|a| vec![a.strategy.to_string(), a.outcome.to_string()])
            .collect();
        println!("{}", render_table(&["STRATEGY", "OUTCOME"], &rows, global.format));
        if !attempts.iter().any(|a| matches!(a.outcome, Outcome::Found(_))) && !global.quiet {
            println!("{}", style("no strategy matched, trying fallback resolver").dim());
        }
    }

    let source = resolver.resolve_entity(&reference)?;
    let system_id = source.system_id().to_string();
    let content = if args.print {
        Some(source.read_to_string().into_diagnostic()?)
    } else {
        None
    };

    if global.format == OutputFormat::Json {
        let trace: Option<Vec<_>> = attempts.map(|attempts| {
            attempts
                .iter()
                .map(|a| json!({ "strategy": a.strategy.as_str(), "outcome": a.outcome.to_string() }))
                .collect()
        });
        let out = json!({
            "schema_location": reference.schema_location(),
            "base_uri": reference.base_uri(),
            "namespace": reference.namespace(),
            "system_id": system_id,
            "trace": trace,
            "content": content,
        });
        println!("{}", serde_json::to_string_pretty(&out).into_diagnostic()?);
        return Ok(());
    }

    if global.quiet {
        println!("{}", system_id);
    } else {
        println!("{} {} -> {}", style("✓").green(), reference, style(&system_id).cyan());
    }
    if let Some(content) = content {
        println!("{}", content);
    }
    Ok(())
}
