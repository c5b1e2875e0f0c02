//! ddd-toolkit CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::cognitive_complexity)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ddd_toolkit::config::ToolkitConfig;
use ddd_toolkit::observability::{self, ObservabilityConfig};
use ddd_toolkit_cli_lib::commands::{
    BindingsCommand, BootCommand, MakeModuleCommand, ModifyMigrationCommand,
};

#[derive(Parser)]
#[command(name = "ddd-toolkit")]
#[command(version)]
#[command(about = "Scaffolding for modular DDD applications", long_about = None)]
struct Cli {
    /// Configuration file (default: ./ddd-toolkit.toml and the user config)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Application root, overrides `project.base_path`
    #[arg(long, global = true, value_name = "DIR")]
    base_path: Option<PathBuf>,

    /// Emit JSON log lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate module artifacts (no flags generates the default set)
    MakeModule(MakeModuleCommand),
    /// Create a migration that modifies an existing table
    ModifyMigration(ModifyMigrationCommand),
    /// List repository bindings found in the modules directory
    Bindings(BindingsCommand),
    /// Run host discovery and print what would be loaded
    Boot,
}

fn load_config(cli: &Cli) -> Result<ToolkitConfig> {
    let config = match &cli.config {
        Some(path) => ToolkitConfig::load_from(path)
            .with_context(|| format!("Failed to load configuration: {}", path.display()))?,
        None => ToolkitConfig::load().context("Failed to load configuration")?,
    };

    Ok(match &cli.base_path {
        Some(base_path) => config.with_base_path(base_path),
        None => config,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = ObservabilityConfig::new("ddd-toolkit");
    if cli.log_json {
        logging = logging.with_json();
    }
    observability::init(&logging).context("Failed to initialise logging")?;

    let config = load_config(&cli)?;
    tracing::debug!(base_path = %config.project.base_path.display(), "configuration loaded");

    match &cli.command {
        Commands::MakeModule(cmd) => cmd.execute(&config)?,
        Commands::ModifyMigration(cmd) => cmd.execute(&config)?,
        Commands::Bindings(cmd) => cmd.execute(&config)?,
        Commands::Boot => BootCommand::execute(&config)?,
    }

    Ok(())
}
