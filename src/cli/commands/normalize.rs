//! `xsdr normalize` command - Compare strict and lenient path normalization

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::render_table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::path::{clean_path, normalize};

#[derive(clap::Args, Debug)]
pub struct NormalizeArgs {
    /// Resource paths to normalize
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Normalized<'a> {
    path: &'a str,
    /// `None` when the path escapes its root
    strict: Option<String>,
    lenient: String,
}

pub fn run(args: NormalizeArgs, global: &GlobalOpts) -> Result<()> {
    let results: Vec<Normalized> = args
        .paths
        .iter()
        .map(|path| Normalized {
            path,
            strict: normalize(path),
            lenient: format!("/{}", clean_path(path)),
        })
        .collect();

    if global.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&results).into_diagnostic()?);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|r| {
            vec![
                r.path.to_string(),
                r.strict.clone().unwrap_or_else(|| "<invalid>".to_string()),
                r.lenient.clone(),
            ]
        })
        .collect();
    println!("{}", render_table(&["PATH", "STRICT", "LENIENT"], &rows, global.format));
    Ok(())
}
