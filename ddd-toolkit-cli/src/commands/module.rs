//! `make-module`: generate module artifacts
//!
//! # Example
//!
//! ```bash
//! ddd-toolkit make-module Billing:Invoices/LineItem -R -S -C
//! ```

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use ddd_toolkit::config::ToolkitConfig;
use ddd_toolkit::layout::ArtifactKind;
use ddd_toolkit::naming::ModuleSpec;

use super::print_result;
use crate::scaffold::ScaffoldGenerator;

/// Artifact selection flags
///
/// With no flag (or `--all`) the default set is generated: data, migration,
/// model, repository, service, controller, resource and route.
#[derive(Debug, Clone, Default, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct ArtifactFlags {
    /// Generate the default artifact set
    #[arg(short = 'A', long)]
    pub all: bool,
    /// Generate a data object
    #[arg(short = 'D', long)]
    pub data: bool,
    /// Generate a DTO
    #[arg(short = 'Y', long)]
    pub dto: bool,
    /// Generate a create-table migration
    #[arg(short = 'M', long)]
    pub migration: bool,
    /// Generate a model
    #[arg(short = 'O', long)]
    pub model: bool,
    /// Generate a repository interface and implementation
    #[arg(short = 'R', long)]
    pub repository: bool,
    /// Generate a service
    #[arg(short = 'S', long)]
    pub service: bool,
    /// Generate a controller
    #[arg(short = 'C', long)]
    pub controller: bool,
    /// Generate a form request
    #[arg(short = 'Q', long)]
    pub request: bool,
    /// Generate a JSON resource
    #[arg(short = 'E', long)]
    pub resource: bool,
    /// Generate the module route file
    #[arg(short = 'T', long)]
    pub route: bool,
    /// Generate a seeder and register it in the seeder aggregator
    #[arg(short = 'X', long)]
    pub seeder: bool,
}

impl ArtifactFlags {
    /// Kinds to generate, in generation order
    #[must_use]
    pub fn kinds(&self) -> Vec<ArtifactKind> {
        let requested = [
            (self.data, ArtifactKind::Data),
            (self.dto, ArtifactKind::Dto),
            (self.migration, ArtifactKind::Migration),
            (self.model, ArtifactKind::Model),
            (self.repository, ArtifactKind::Repository),
            (self.service, ArtifactKind::Service),
            (self.controller, ArtifactKind::Controller),
            (self.request, ArtifactKind::Request),
            (self.resource, ArtifactKind::Resource),
            (self.route, ArtifactKind::Route),
            (self.seeder, ArtifactKind::Seeder),
        ];

        let selected: Vec<ArtifactKind> = requested
            .into_iter()
            .filter_map(|(on, kind)| on.then_some(kind))
            .collect();

        if self.all || selected.is_empty() {
            ArtifactKind::GENERATE_ALL.to_vec()
        } else {
            selected
        }
    }
}

/// Generate artifacts for one module specifier
#[derive(Debug, Clone, Args)]
pub struct MakeModuleCommand {
    /// Module specifier: `Module`, `Module:Name` or `Module:SubDir/Name`
    #[arg(value_name = "SPEC")]
    pub spec: String,

    /// Artifact selection
    #[command(flatten)]
    pub flags: ArtifactFlags,
}

impl MakeModuleCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the specifier is invalid or any artifact failed.
    /// Remaining artifacts are still generated after a failure.
    pub fn execute(&self, config: &ToolkitConfig) -> Result<()> {
        let spec = ModuleSpec::parse(&self.spec)?;
        let kinds = self.flags.kinds();

        println!(
            "\n{} {} {}",
            style("Scaffolding").cyan().bold(),
            style(&spec).green().bold(),
            style("...").cyan().bold()
        );

        let generator =
            ScaffoldGenerator::new(config.clone()).context("Failed to prepare templates")?;
        let report = generator.generate_many(&kinds, &spec);

        for result in &report.results {
            print_result(result, &config.project.base_path);
        }
        for (kind, err) in &report.failures {
            println!(
                "  {} {}: {}",
                style("✗").red().bold(),
                style(kind).red(),
                err
            );
        }

        if !report.is_success() {
            bail!(
                "{} of {} artifacts failed for {}",
                report.failures.len(),
                kinds.len(),
                spec
            );
        }

        println!(
            "\n{} {} file(s) created for module {}",
            style("Done:").green().bold(),
            report.created(),
            style(spec.module_name()).green().bold()
        );

        Ok(())
    }
}
