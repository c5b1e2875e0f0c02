//! Module scaffold generator
//!
//! Resolves each requested artifact through the module layout, renders its
//! template and writes it. Existing files are never overwritten. Repository
//! generation also records the contract/implementation pair in the binding
//! manifest, and seeder generation registers the seeder in the aggregator.

use std::fs;
use std::path::{Path, PathBuf};

use ddd_toolkit::bindings::{BindingCandidate, BindingManifest};
use ddd_toolkit::config::ToolkitConfig;
use ddd_toolkit::error::{Result, ToolkitError};
use ddd_toolkit::layout::{ArtifactDescriptor, ArtifactKind, ModuleLayout};
use ddd_toolkit::migration::MigrationEdit;
use ddd_toolkit::naming::{Inflect, ModuleSpec};
use ddd_toolkit::seeder::register_seeder;
use handlebars::Handlebars;
use serde_json::{json, Map, Value};

use crate::templates::{self, MODIFY_MIGRATION};

/// Migration timestamp format (`Y_m_d_His`)
pub const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H%M%S";

/// Indentation of statements inside a migration closure
const STATEMENT_INDENT: &str = "            ";

/// What happened to one target file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// File was written
    Created,
    /// Existing file was modified in place (seeder aggregator)
    Updated,
    /// File already existed and was left untouched
    SkippedExists,
}

/// Result of one file write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    /// Artifact the file belongs to
    pub kind: ArtifactKind,
    /// Target path
    pub path: PathBuf,
    /// Outcome
    pub outcome: WriteOutcome,
}

/// Outcome of a multi-artifact run
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Files written or skipped, in generation order
    pub results: Vec<WriteResult>,
    /// Artifacts that failed, in generation order
    pub failures: Vec<(ArtifactKind, ToolkitError)>,
}

impl GenerationReport {
    /// Whether every artifact succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of files created
    #[must_use]
    pub fn created(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome == WriteOutcome::Created)
            .count()
    }
}

/// Scaffold generator
pub struct ScaffoldGenerator {
    config: ToolkitConfig,
    layout: ModuleLayout,
    templates: Handlebars<'static>,
    timestamp: Option<String>,
}

impl ScaffoldGenerator {
    /// Create a generator for a configured project
    ///
    /// # Errors
    ///
    /// Returns an error if the templates fail to compile.
    pub fn new(config: ToolkitConfig) -> Result<Self> {
        Ok(Self {
            layout: ModuleLayout::new(&config),
            templates: templates::registry()?,
            config,
            timestamp: None,
        })
    }

    /// Use a fixed migration timestamp instead of the current local time
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Layout the generator resolves paths with
    #[must_use]
    pub const fn layout(&self) -> &ModuleLayout {
        &self.layout
    }

    fn timestamp(&self) -> String {
        self.timestamp.clone().unwrap_or_else(|| {
            chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
        })
    }

    /// Generate every kind in `kinds`, in order
    ///
    /// A failed artifact is recorded and the remaining ones are still
    /// attempted.
    pub fn generate_many(&self, kinds: &[ArtifactKind], spec: &ModuleSpec) -> GenerationReport {
        let mut report = GenerationReport::default();
        for &kind in kinds {
            match self.generate(kind, spec) {
                Ok(results) => report.results.extend(results),
                Err(err) => {
                    tracing::error!(%kind, error = %err, "artifact generation failed");
                    report.failures.push((kind, err));
                }
            }
        }
        report
    }

    /// Generate the default artifact set
    pub fn generate_all(&self, spec: &ModuleSpec) -> GenerationReport {
        self.generate_many(&ArtifactKind::GENERATE_ALL, spec)
    }

    /// Generate one artifact kind
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or file cannot be written, a template
    /// fails to render, or the seeder aggregator cannot be updated.
    pub fn generate(&self, kind: ArtifactKind, spec: &ModuleSpec) -> Result<Vec<WriteResult>> {
        match kind {
            ArtifactKind::Repository => self.generate_repository(spec),
            ArtifactKind::Seeder => self.generate_seeder(spec),
            ArtifactKind::Migration => self.generate_create_migration(spec).map(|r| vec![r]),
            _ => {
                let descriptor = self.layout.describe(kind, spec);
                let path = descriptor.file_path(&self.config.project.file_extension);
                self.write(&descriptor, &path, spec).map(|r| vec![r])
            }
        }
    }

    fn generate_repository(&self, spec: &ModuleSpec) -> Result<Vec<WriteResult>> {
        let extension = &self.config.project.file_extension;
        let contract = self.layout.describe(ArtifactKind::Contract, spec);
        let repository = self.layout.describe(ArtifactKind::Repository, spec);

        let results = vec![
            self.write(&contract, &contract.file_path(extension), spec)?,
            self.write(&repository, &repository.file_path(extension), spec)?,
        ];

        let manifest_path = self.config.manifest_path();
        let mut manifest = BindingManifest::load(&manifest_path)?;
        let candidate = BindingCandidate::from_descriptors(
            &contract,
            &repository,
            self.layout.modules_root(),
            extension,
        );
        if manifest.insert(candidate) {
            manifest.save(&manifest_path)?;
            tracing::info!(
                interface = %contract.qualified_class(),
                manifest = %manifest_path.display(),
                "recorded repository binding"
            );
        }

        Ok(results)
    }

    fn generate_seeder(&self, spec: &ModuleSpec) -> Result<Vec<WriteResult>> {
        let descriptor = self.layout.describe(ArtifactKind::Seeder, spec);
        let path = descriptor.file_path(&self.config.project.file_extension);
        let mut results = vec![self.write(&descriptor, &path, spec)?];

        let aggregator = self.config.aggregator_path();
        let existed = aggregator.exists();
        let splice = register_seeder(&aggregator, &descriptor.qualified_class())?;
        if splice.changed() {
            results.push(WriteResult {
                kind: ArtifactKind::Seeder,
                path: aggregator,
                outcome: if existed {
                    WriteOutcome::Updated
                } else {
                    WriteOutcome::Created
                },
            });
        }

        Ok(results)
    }

    /// Create-table migrations are skipped when any timestamp already
    /// carries the same `create_<table>_table` name
    fn generate_create_migration(&self, spec: &ModuleSpec) -> Result<WriteResult> {
        let descriptor = self.layout.describe(ArtifactKind::Migration, spec);
        let suffix = format!(
            "_{}.{}",
            descriptor.file_stem, self.config.project.file_extension
        );

        if let Some(existing) = Self::find_suffixed(&descriptor.directory, &suffix)? {
            tracing::debug!(path = %existing.display(), "create migration already exists, skipping");
            return Ok(WriteResult {
                kind: ArtifactKind::Migration,
                path: existing,
                outcome: WriteOutcome::SkippedExists,
            });
        }

        let path = descriptor
            .directory
            .join(format!("{}{suffix}", self.timestamp()));
        self.write(&descriptor, &path, spec)
    }

    /// Generate a table-modifying migration in `module`
    ///
    /// Only a file at the exact timestamped path counts as existing, so the
    /// same operation can be repeated in a later migration.
    ///
    /// # Errors
    ///
    /// Returns a usage error for an empty module name, otherwise the same
    /// errors as [`ScaffoldGenerator::generate`].
    pub fn generate_modify_migration(&self, module: &str, edit: &MigrationEdit) -> Result<WriteResult> {
        let spec = ModuleSpec::parse(module)?;
        let descriptor = self.layout.describe(ArtifactKind::Migration, &spec);

        let indent = |statements: &[String]| {
            statements
                .iter()
                .map(|statement| format!("{STATEMENT_INDENT}{statement}"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        let context = json!({
            "table": edit.table_name,
            "up_statements": indent(&edit.up_statements),
            "down_statements": indent(&edit.down_statements),
        });

        let path = descriptor.directory.join(format!(
            "{}.{}",
            edit.file_stem(&self.timestamp()),
            self.config.project.file_extension
        ));
        self.render_to(ArtifactKind::Migration, MODIFY_MIGRATION, &context, &path)
    }

    fn find_suffixed(dir: &Path, suffix: &str) -> Result<Option<PathBuf>> {
        if !dir.is_dir() {
            return Ok(None);
        }

        let mut matches = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| ToolkitError::filesystem(dir, e))? {
            let entry = entry.map_err(|e| ToolkitError::filesystem(dir, e))?;
            if entry.file_name().to_string_lossy().ends_with(suffix) {
                matches.push(entry.path());
            }
        }
        matches.sort();
        Ok(matches.into_iter().next())
    }

    /// Render `descriptor`'s template to `path` unless the file exists
    fn write(&self, descriptor: &ArtifactDescriptor, path: &Path, spec: &ModuleSpec) -> Result<WriteResult> {
        let context = self.context(descriptor, spec);
        self.render_to(
            descriptor.kind,
            templates::template_name(descriptor.kind),
            &context,
            path,
        )
    }

    fn render_to(
        &self,
        kind: ArtifactKind,
        template: &str,
        context: &Value,
        path: &Path,
    ) -> Result<WriteResult> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ToolkitError::filesystem(parent, e))?;
        }

        if path.exists() {
            tracing::debug!(%kind, path = %path.display(), "file already exists, skipping");
            return Ok(WriteResult {
                kind,
                path: path.to_path_buf(),
                outcome: WriteOutcome::SkippedExists,
            });
        }

        let rendered = self
            .templates
            .render(template, context)
            .map_err(|e| ToolkitError::Template(format!("{template}: {e}")))?;

        fs::write(path, rendered).map_err(|e| ToolkitError::filesystem(path, e))?;
        tracing::debug!(%kind, path = %path.display(), "file created");

        Ok(WriteResult {
            kind,
            path: path.to_path_buf(),
            outcome: WriteOutcome::Created,
        })
    }

    /// Template variables for one artifact
    fn context(&self, descriptor: &ArtifactDescriptor, spec: &ModuleSpec) -> Value {
        let mut context = Map::new();
        context.insert("namespace".into(), json!(descriptor.namespace));
        context.insert("class_name".into(), json!(descriptor.class_name));
        context.insert("variable".into(), json!(Inflect::camel(spec.file_name())));

        match descriptor.kind {
            ArtifactKind::Migration => {
                context.insert("table".into(), json!(Inflect::table_name(spec.file_name())));
            }
            // models map to the module's table
            ArtifactKind::Model => {
                context.insert("table".into(), json!(Inflect::table_name(spec.module_name())));
            }
            ArtifactKind::Route => {
                context.insert(
                    "route_prefix".into(),
                    json!(Inflect::route_prefix(spec.module_name())),
                );
            }
            _ => {}
        }

        for related in self.layout.related(descriptor.kind, spec) {
            let Some(key) = Self::related_key(related.kind) else {
                continue;
            };
            context.insert(format!("{key}_class"), json!(related.qualified_class()));
            context.insert(format!("{key}_name"), json!(related.class_name));
        }

        Value::Object(context)
    }

    const fn related_key(kind: ArtifactKind) -> Option<&'static str> {
        match kind {
            ArtifactKind::Contract => Some("contract"),
            ArtifactKind::Model => Some("model"),
            ArtifactKind::Service => Some("service"),
            ArtifactKind::Dto => Some("dto"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(dir: &Path) -> ScaffoldGenerator {
        ScaffoldGenerator::new(ToolkitConfig::default().with_base_path(dir))
            .unwrap()
            .with_timestamp("2025_01_02_030405")
    }

    #[test]
    fn test_context_includes_related_names() {
        let dir = tempfile::tempdir().unwrap();
        let generator = generator(dir.path());
        let spec = ModuleSpec::parse("Blog:Post").unwrap();
        let descriptor = generator.layout().describe(ArtifactKind::Controller, &spec);

        let context = generator.context(&descriptor, &spec);

        assert_eq!(context["class_name"], "PostController");
        assert_eq!(context["variable"], "post");
        assert_eq!(
            context["service_class"],
            "App\\Modules\\Blog\\Application\\Services\\PostService"
        );
        assert_eq!(context["service_name"], "PostService");
    }

    #[test]
    fn test_model_uses_module_table() {
        let dir = tempfile::tempdir().unwrap();
        let generator = generator(dir.path());
        let spec = ModuleSpec::parse("Blog:Post").unwrap();
        let descriptor = generator.layout().describe(ArtifactKind::Model, &spec);

        assert_eq!(generator.context(&descriptor, &spec)["table"], "blogs");
    }

    #[test]
    fn test_generate_writes_then_skips() {
        let dir = tempfile::tempdir().unwrap();
        let generator = generator(dir.path());
        let spec = ModuleSpec::parse("Blog:Post").unwrap();

        let first = generator.generate(ArtifactKind::Service, &spec).unwrap();
        assert_eq!(first[0].outcome, WriteOutcome::Created);

        let second = generator.generate(ArtifactKind::Service, &spec).unwrap();
        assert_eq!(second[0].outcome, WriteOutcome::SkippedExists);
        assert_eq!(first[0].path, second[0].path);
    }

    #[test]
    fn test_create_migration_name_and_rerun() {
        let dir = tempfile::tempdir().unwrap();
        let spec = ModuleSpec::parse("Blog:Post").unwrap();

        let first = generator(dir.path())
            .generate(ArtifactKind::Migration, &spec)
            .unwrap();
        assert!(first[0]
            .path
            .ends_with("Blog/Infrastructure/Database/Migrations/2025_01_02_030405_create_posts_table.php"));

        let rerun = generator(dir.path())
            .with_timestamp("2025_06_07_080910")
            .generate(ArtifactKind::Migration, &spec)
            .unwrap();
        assert_eq!(rerun[0].outcome, WriteOutcome::SkippedExists);
        assert_eq!(rerun[0].path, first[0].path);
    }

    #[test]
    fn test_generate_many_reports_failures_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let generator = generator(dir.path());
        let spec = ModuleSpec::parse("Blog:Post").unwrap();

        // A file where the data directory should be blocks that artifact only
        let blocker = generator
            .layout()
            .module_dir("Blog")
            .join("Application");
        fs::create_dir_all(blocker.parent().unwrap()).unwrap();
        fs::write(&blocker, "").unwrap();

        let report = generator.generate_many(&[ArtifactKind::Data, ArtifactKind::Route], &spec);

        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, ArtifactKind::Data);
        assert_eq!(report.created(), 1);
        assert_eq!(report.results[0].kind, ArtifactKind::Route);
    }
}
