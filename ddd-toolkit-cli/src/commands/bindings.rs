//! `bindings`: list repository bindings, optionally refreshing the manifest

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use ddd_toolkit::bindings::{BindingManifest, BindingScanner};
use ddd_toolkit::config::ToolkitConfig;

/// Scan modules for contract/implementation pairs
#[derive(Debug, Clone, Default, Args)]
pub struct BindingsCommand {
    /// Record the scanned pairs in the binding manifest
    #[arg(long)]
    pub write: bool,
}

impl BindingsCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the scan fails or the manifest cannot be updated.
    pub fn execute(&self, config: &ToolkitConfig) -> Result<()> {
        let found = BindingScanner::new(config)
            .scan()
            .context("Failed to scan module bindings")?;

        println!(
            "\n{} {} binding(s) under {}",
            style("Found").cyan().bold(),
            found.len(),
            style(config.modules_root().display()).dim()
        );
        for candidate in &found {
            println!(
                "  {} {} {}",
                style(&candidate.interface_class).green(),
                style("→").dim(),
                candidate.implementation_class
            );
        }

        if self.write {
            let path = config.manifest_path();
            let mut manifest = BindingManifest::load(&path)
                .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
            let added = found
                .into_iter()
                .filter(|candidate| manifest.insert(candidate.clone()))
                .count();
            manifest
                .save(&path)
                .with_context(|| format!("Failed to write manifest: {}", path.display()))?;

            println!(
                "\n{} {} new binding(s) recorded in {}",
                style("Manifest:").green().bold(),
                added,
                style(path.display()).dim()
            );
        }

        Ok(())
    }
}
