//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use tabled::{builder::Builder, settings::Style};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, DefaultResourceLoader};

/// Build the resource loader from configuration and `--classpath` flags
pub fn build_loader(config: &Config, global: &GlobalOpts) -> DefaultResourceLoader {
    DefaultResourceLoader::new(config.build_classpath(&global.classpath))
}

/// Truncate a string to max_len, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Render rows for a table-like output format
///
/// JSON is handled by the callers, which serialize their own types.
pub fn render_table(headers: &[&str], rows: &[Vec<String>], format: OutputFormat) -> String {
    if format == OutputFormat::Tsv {
        return rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut builder = Builder::default();
    builder.push_record(headers.iter().copied());
    for row in rows {
        builder.push_record(row.iter().map(String::as_str));
    }

    let mut table = builder.build();
    match format {
        OutputFormat::Md => table.with(Style::markdown()),
        _ => table.with(Style::rounded()),
    };
    table.to_string()
}
