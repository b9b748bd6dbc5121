use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;
use xsdr::cli::{Cli, Commands, GlobalOpts};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logging(&global);

    match cli.command {
        Commands::Resolve(args) => xsdr::cli::commands::resolve::run(args, &global),
        Commands::Collect(args) => xsdr::cli::commands::collect::run(args, &global),
        Commands::Normalize(args) => xsdr::cli::commands::normalize::run(args, &global),
        Commands::List(args) => xsdr::cli::commands::list::run(args, &global),
        Commands::Config(cmd) => xsdr::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => xsdr::cli::commands::completions::run(args),
    }
}

/// Log to stderr; `XSDR_LOG` overrides the level picked from the flags
fn init_logging(global: &GlobalOpts) {
    let default_level = if global.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("XSDR_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("xsdr={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
