//! `xsdr config` command - Configuration inspection
//!
//! Shows the effective configuration and where it comes from.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values
    Show,

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("classpath", "Extra classpath directories, searched before bundled schemas"),
    ("roots", "Root schema locations loaded by `xsdr collect`"),
    ("inline", "Follow imports and includes when collecting (true/false)"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show => run_show(global),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let classpath = config.build_classpath(&global.classpath);

    if global.format == OutputFormat::Json {
        let out = serde_json::json!({
            "classpath": classpath.entries().iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            "roots": config.roots(),
            "inline": config.inline(),
        });
        println!("{}", serde_json::to_string_pretty(&out).into_diagnostic()?);
        return Ok(());
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    println!("{}:", style("classpath").cyan());
    for entry in classpath.entries() {
        println!("  - {}", entry);
    }
    println!("{}:", style("roots").cyan());
    for root in config.roots() {
        println!("  - {}", root);
    }
    println!("{}: {}", style("inline").cyan(), config.inline());

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("{}", style("  1. --classpath flags").dim());
    println!("{}", style("  2. Environment (XSDR_CLASSPATH, XSDR_ROOTS)").dim());
    println!("{}", style("  3. Project config (.xsdr/config.yaml)").dim());
    println!("{}", style("  4. Global config").dim());
    Ok(())
}

fn run_path() -> Result<()> {
    match Config::project_config_path() {
        Some(path) => println!("project: {}", path.display()),
        None => println!("project: {}", style("(none found)").dim()),
    }
    match Config::global_config_path() {
        Some(path) => {
            let marker = if path.exists() { "" } else { " (not created)" };
            println!("global:  {}{}", path.display(), style(marker).dim());
        }
        None => println!("global:  {}", style("(no config directory)").dim()),
    }
    Ok(())
}

fn run_keys() -> Result<()> {
    for (key, description) in VALID_KEYS {
        println!("{:<12} {}", style(key).cyan(), description);
    }
    Ok(())
}
