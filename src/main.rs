use anyhow::Result;
use carteira::cli::Cli;
use carteira::dispatcher::{dispatch_command, AppContext};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let ctx = AppContext::from_cli(&cli)?;
    dispatch_command(cli.command, &ctx)
}
