//! Artifact templates

use ddd_toolkit::error::{Result, ToolkitError};
use ddd_toolkit::layout::ArtifactKind;
use handlebars::Handlebars;

pub mod php;
pub use php::*;

/// Name the modify-migration template is registered under
pub const MODIFY_MIGRATION: &str = "modify-migration";

/// Template text for an artifact kind
#[must_use]
pub const fn template_for(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Data => DATA_TEMPLATE,
        ArtifactKind::Dto => DTO_TEMPLATE,
        ArtifactKind::Migration => CREATE_MIGRATION_TEMPLATE,
        ArtifactKind::Model => MODEL_TEMPLATE,
        ArtifactKind::Contract => CONTRACT_TEMPLATE,
        ArtifactKind::Repository => REPOSITORY_TEMPLATE,
        ArtifactKind::Service => SERVICE_TEMPLATE,
        ArtifactKind::Controller => CONTROLLER_TEMPLATE,
        ArtifactKind::Request => REQUEST_TEMPLATE,
        ArtifactKind::Resource => RESOURCE_TEMPLATE,
        ArtifactKind::Route => ROUTE_TEMPLATE,
        ArtifactKind::Seeder => SEEDER_TEMPLATE,
    }
}

/// Registry name of an artifact kind's template
#[must_use]
pub const fn template_name(kind: ArtifactKind) -> &'static str {
    kind.label()
}

/// Build a registry holding every artifact template
///
/// # Errors
///
/// Returns [`ToolkitError::Template`] if a template fails to compile.
pub fn registry() -> Result<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();

    // Generated code, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    for kind in ArtifactKind::ALL {
        handlebars
            .register_template_string(template_name(kind), template_for(kind))
            .map_err(|e| ToolkitError::Template(format!("{kind}: {e}")))?;
    }
    handlebars
        .register_template_string(MODIFY_MIGRATION, MODIFY_MIGRATION_TEMPLATE)
        .map_err(|e| ToolkitError::Template(format!("{MODIFY_MIGRATION}: {e}")))?;

    Ok(handlebars)
}
