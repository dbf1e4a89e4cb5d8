use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use snapdiff::cli::Cli;
use snapdiff::config::Config;
use snapdiff::dispatcher::dispatch_command;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    if !use_color {
        colored::control::set_override(false);
    }

    // Initialize logging; stderr keeps stdout clean for --json
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color && std::io::stderr().is_terminal())
        .init();

    let config =
        Config::resolve(cli.config.as_deref()).context("Failed to load configuration")?;

    dispatch_command(cli.command, &config, cli.json)
}
