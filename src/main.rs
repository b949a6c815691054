use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use webshell::browser::Browser;
use webshell::config::{Overrides, ShellConfig};
use webshell::host::HostCapability;

/// Browser-like shell around a single web page.
#[derive(Debug, Parser)]
#[command(name = "webshell", version, about)]
struct Cli {
    /// Config file (default: <config dir>/webshell/config.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Page to open at startup
    #[arg(short, long)]
    url: Option<String>,

    /// Window title
    #[arg(short, long)]
    title: Option<String>,

    /// Host shell to emulate instead of detecting it
    #[arg(long, value_enum)]
    shell: Option<HostCapability>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let overrides = Overrides {
        url: cli.url,
        title: cli.title,
        shell: cli.shell,
    };
    let config = ShellConfig::load(cli.config.as_deref(), &overrides).context("Failed to load configuration")?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    info!("Starting WebShell...");

    // Initialize and run browser (must run on main thread on macOS)
    Browser::new(config)?.run()?;

    Ok(())
}
