//! `modify-migration`: create a migration that alters an existing table

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use ddd_toolkit::config::ToolkitConfig;
use ddd_toolkit::migration::{ColumnOperations, MigrationEdit};

use super::print_result;
use crate::scaffold::ScaffoldGenerator;

/// Create a column-modification migration
#[derive(Debug, Clone, Args)]
pub struct ModifyMigrationCommand {
    /// Module the migration belongs to
    pub module: String,

    /// Table to modify
    pub table: String,

    /// Add a nullable string column
    #[arg(long = "add-column", visible_alias = "ac", value_name = "NAME")]
    pub add_column: Option<String>,

    /// Rename a column
    #[arg(long = "rename-column", visible_alias = "rc", value_name = "OLD:NEW")]
    pub rename_column: Option<String>,

    /// Drop a column
    #[arg(long = "drop-column", visible_alias = "dc", value_name = "NAME")]
    pub drop_column: Option<String>,

    /// Change a string column to text
    #[arg(long = "modify-column", visible_alias = "mc", value_name = "NAME")]
    pub modify_column: Option<String>,
}

impl ModifyMigrationCommand {
    /// Column operations given on the command line
    #[must_use]
    pub fn operations(&self) -> ColumnOperations {
        ColumnOperations {
            add: self.add_column.clone(),
            rename: self.rename_column.clone(),
            drop: self.drop_column.clone(),
            modify: self.modify_column.clone(),
        }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if no operation is given, an operation is malformed,
    /// or the migration cannot be written.
    pub fn execute(&self, config: &ToolkitConfig) -> Result<()> {
        let edit = MigrationEdit::build(&self.table, &self.operations())?;

        println!(
            "\n{} {} {}",
            style("Creating migration").cyan().bold(),
            style(&edit.class_name).green().bold(),
            style("...").cyan().bold()
        );

        let generator =
            ScaffoldGenerator::new(config.clone()).context("Failed to prepare templates")?;
        let result = generator
            .generate_modify_migration(&self.module, &edit)
            .with_context(|| format!("Failed to create migration for table '{}'", self.table))?;

        print_result(&result, &config.project.base_path);
        Ok(())
    }
}
