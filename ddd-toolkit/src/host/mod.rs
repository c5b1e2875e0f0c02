//! Host bootstrap
//!
//! Prepares the modules directory, registers repository bindings and
//! collects the per-module route files, migration directories and view
//! namespaces the host application loads. Nothing is loaded here; paths
//! are only discovered and returned.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::bindings::{register_bindings, BindingCandidate, Container};
use crate::config::ToolkitConfig;
use crate::error::{Result, ToolkitError};
use crate::layout::ArtifactKind;

/// Route file loaded for every module
pub const WEB_ROUTES: &str = "web";

/// Route file loaded when API routes are enabled
pub const API_ROUTES: &str = "api";

/// View directory registered under a module namespace
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ViewNamespace {
    /// Module name used as the view namespace
    pub module: String,
    /// Directory holding the module's views
    pub path: PathBuf,
}

/// Everything discovered during bootstrap
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostReport {
    /// Repository pairs bound into the container
    pub bindings: Vec<BindingCandidate>,
    /// Route files, sorted
    pub route_files: Vec<PathBuf>,
    /// Module migration directories, sorted
    pub migration_dirs: Vec<PathBuf>,
    /// Module view namespaces, sorted
    pub view_namespaces: Vec<ViewNamespace>,
}

/// Bootstrap the host against `container`
///
/// # Errors
///
/// Returns an error if the modules root cannot be created or read, or if
/// binding registration fails.
pub fn bootstrap<C: Container + ?Sized>(
    config: &ToolkitConfig,
    container: &mut C,
) -> Result<HostReport> {
    let modules_root = config.modules_root();
    fs::create_dir_all(&modules_root).map_err(|e| ToolkitError::filesystem(&modules_root, e))?;

    let bindings = register_bindings(config, container)?;
    let modules = module_dirs(&modules_root)?;

    let mut report = HostReport {
        bindings,
        ..HostReport::default()
    };

    let mut route_names = vec![config.source_file(WEB_ROUTES)];
    if config.discovery.api_routes {
        route_names.push(config.source_file(API_ROUTES));
    }

    for (module, dir) in &modules {
        let routes_dir = dir.join(ArtifactKind::Route.path_suffix());
        report
            .route_files
            .extend(files_named(&routes_dir, &route_names)?);

        let migrations_dir = dir.join(ArtifactKind::Migration.path_suffix());
        if migrations_dir.is_dir() {
            report.migration_dirs.push(migrations_dir);
        }

        if config.discovery.views {
            let views_dir = dir.join("Interface").join(&config.discovery.views_dir);
            if views_dir.is_dir() {
                report.view_namespaces.push(ViewNamespace {
                    module: module.clone(),
                    path: views_dir,
                });
            }
        }
    }

    report.route_files.sort();
    report.migration_dirs.sort();
    report.view_namespaces.sort();

    tracing::info!(
        modules = modules.len(),
        bindings = report.bindings.len(),
        routes = report.route_files.len(),
        migrations = report.migration_dirs.len(),
        views = report.view_namespaces.len(),
        "host bootstrap complete"
    );

    Ok(report)
}

fn module_dirs(root: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut modules = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| ToolkitError::filesystem(root, e))? {
        let entry = entry.map_err(|e| ToolkitError::filesystem(root, e))?;
        let path = entry.path();
        if path.is_dir() {
            modules.push((entry.file_name().to_string_lossy().into_owned(), path));
        }
    }
    modules.sort();
    Ok(modules)
}

fn files_named(dir: &Path, names: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| {
            let path = e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
            ToolkitError::filesystem(path, e.into())
        })?;
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| names.iter().any(|wanted| wanted == name));
        if entry.file_type().is_file() && matches {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::BindingTable;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<?php\n").unwrap();
    }

    #[test]
    fn test_bootstrap_creates_modules_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = ToolkitConfig::default().with_base_path(dir.path());

        let report = bootstrap(&config, &mut BindingTable::new()).unwrap();

        assert!(config.modules_root().is_dir());
        assert_eq!(report, HostReport::default());
    }

    #[test]
    fn test_bootstrap_discovers_module_assets() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ToolkitConfig::default().with_base_path(dir.path());
        let root = config.modules_root();

        touch(&root.join("Blog/Interface/Routes/web.php"));
        touch(&root.join("Blog/Interface/Routes/api.php"));
        touch(&root.join("Shop/Interface/Routes/Admin/web.php"));
        touch(&root.join("Blog/Infrastructure/Database/Migrations/2025_01_01_000000_create_blogs_table.php"));
        touch(&root.join("Blog/Interface/Views/index.blade.php"));
        touch(&root.join("Blog/Domain/Contracts/PostRepositoryInterface.php"));
        touch(&root.join("Blog/Infrastructure/Repositories/PostRepository.php"));

        let mut table = BindingTable::new();
        let report = bootstrap(&config, &mut table).unwrap();

        assert_eq!(
            report.route_files,
            [
                root.join("Blog/Interface/Routes/web.php"),
                root.join("Shop/Interface/Routes/Admin/web.php"),
            ]
        );
        assert_eq!(
            report.migration_dirs,
            [root.join("Blog/Infrastructure/Database/Migrations")]
        );
        assert!(report.view_namespaces.is_empty());
        assert_eq!(report.bindings.len(), 1);
        assert_eq!(table.len(), 1);

        config.discovery.api_routes = true;
        config.discovery.views = true;
        let report = bootstrap(&config, &mut BindingTable::new()).unwrap();

        assert_eq!(report.route_files.len(), 3);
        assert!(report
            .route_files
            .contains(&root.join("Blog/Interface/Routes/api.php")));
        assert_eq!(
            report.view_namespaces,
            [ViewNamespace {
                module: "Blog".to_string(),
                path: root.join("Blog/Interface/Views"),
            }]
        );
    }
}
