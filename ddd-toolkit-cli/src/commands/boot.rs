//! `boot`: run host discovery and print what a host would load

use anyhow::{Context, Result};
use console::style;
use ddd_toolkit::bindings::BindingTable;
use ddd_toolkit::config::ToolkitConfig;
use ddd_toolkit::host::bootstrap;

/// Host discovery dry run
pub struct BootCommand;

impl BootCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the modules directory cannot be created or read.
    pub fn execute(config: &ToolkitConfig) -> Result<()> {
        let mut container = BindingTable::new();
        let report = bootstrap(config, &mut container).context("Host bootstrap failed")?;
        let base = &config.project.base_path;

        println!("\n{}", style("Bindings").cyan().bold());
        for (interface, implementation) in container.iter() {
            println!("  {interface} {} {implementation}", style("→").dim());
        }

        println!("\n{}", style("Routes").cyan().bold());
        for path in &report.route_files {
            println!("  {}", path.strip_prefix(base).unwrap_or(path).display());
        }

        println!("\n{}", style("Migrations").cyan().bold());
        for path in &report.migration_dirs {
            println!("  {}", path.strip_prefix(base).unwrap_or(path).display());
        }

        if config.discovery.views {
            println!("\n{}", style("Views").cyan().bold());
            for view in &report.view_namespaces {
                println!(
                    "  {} {}",
                    style(&view.module).green(),
                    style(view.path.strip_prefix(base).unwrap_or(&view.path).display()).dim()
                );
            }
        }

        Ok(())
    }
}
