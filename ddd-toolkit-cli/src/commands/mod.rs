//! CLI command implementations

pub mod bindings;
pub mod boot;
pub mod migration;
pub mod module;

pub use bindings::BindingsCommand;
pub use boot::BootCommand;
pub use migration::ModifyMigrationCommand;
pub use module::{ArtifactFlags, MakeModuleCommand};

use std::path::Path;

use console::{style, Emoji};

use crate::scaffold::{WriteOutcome, WriteResult};

static CREATED: Emoji = Emoji("✓ ", "+ ");
static UPDATED: Emoji = Emoji("↻ ", "~ ");
static SKIPPED: Emoji = Emoji("• ", "- ");

/// Print one write result, with the path relative to `base` where possible
pub(crate) fn print_result(result: &WriteResult, base: &Path) {
    let shown = result.path.strip_prefix(base).unwrap_or(&result.path);
    match result.outcome {
        WriteOutcome::Created => println!(
            "  {}{} {}",
            CREATED,
            style(result.kind).green(),
            style(shown.display()).dim()
        ),
        WriteOutcome::Updated => println!(
            "  {}{} {}",
            UPDATED,
            style(result.kind).cyan(),
            style(shown.display()).dim()
        ),
        WriteOutcome::SkippedExists => println!(
            "  {}{} {} {}",
            SKIPPED,
            style(result.kind).yellow(),
            style(shown.display()).dim(),
            style("(already exists)").yellow()
        ),
    }
}
