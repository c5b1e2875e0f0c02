//! Repository contract bindings
//!
//! Every module may pair repository contracts (`Domain/Contracts`) with
//! implementations (`Infrastructure/Repositories`). A pair is bound in the
//! dependency container only when both files exist.
//!
//! Two sources feed the container:
//!
//! - [`BindingScanner`] walks the module tree and mirrors each contract's
//!   relative directory under the repositories directory.
//! - [`BindingManifest`] records the pairs the generator wrote, so hosts can
//!   bind without scanning.
//!
//! [`register_bindings`] binds the union of both.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::config::ToolkitConfig;
use crate::error::{Result, ToolkitError};
use crate::layout::{ArtifactDescriptor, ArtifactKind, ModuleLayout};
use crate::naming::NAMESPACE_SEPARATOR;

/// A contract/implementation pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BindingCandidate {
    /// Fully-qualified contract name
    pub interface_class: String,
    /// Fully-qualified implementation name
    pub implementation_class: String,
    /// Contract file, relative to the modules root
    pub contract_path: PathBuf,
    /// Implementation file, relative to the modules root
    pub implementation_path: PathBuf,
}

impl BindingCandidate {
    /// Build a candidate from generated descriptors
    ///
    /// Paths outside `modules_root` are kept as given.
    #[must_use]
    pub fn from_descriptors(
        contract: &ArtifactDescriptor,
        implementation: &ArtifactDescriptor,
        modules_root: &Path,
        extension: &str,
    ) -> Self {
        let relative = |descriptor: &ArtifactDescriptor| {
            let path = descriptor.file_path(extension);
            path.strip_prefix(modules_root)
                .map(Path::to_path_buf)
                .unwrap_or(path)
        };

        Self {
            interface_class: contract.qualified_class(),
            implementation_class: implementation.qualified_class(),
            contract_path: relative(contract),
            implementation_path: relative(implementation),
        }
    }

    /// Whether both files are present under `modules_root`
    #[must_use]
    pub fn exists_under(&self, modules_root: &Path) -> bool {
        modules_root.join(&self.contract_path).is_file()
            && modules_root.join(&self.implementation_path).is_file()
    }
}

/// Walks module directories for contract/implementation pairs
#[derive(Debug, Clone)]
pub struct BindingScanner {
    layout: ModuleLayout,
    extension: String,
    interface_suffix: String,
}

impl BindingScanner {
    /// Create a scanner for a configured project
    #[must_use]
    pub fn new(config: &ToolkitConfig) -> Self {
        Self {
            layout: ModuleLayout::new(config),
            extension: config.project.file_extension.clone(),
            interface_suffix: config.bindings.interface_suffix.clone(),
        }
    }

    /// Collect every pair whose implementation file exists
    ///
    /// A missing modules root yields an empty set. Contracts without an
    /// implementation are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ToolkitError::Filesystem`] if a directory cannot be read.
    pub fn scan(&self) -> Result<BTreeSet<BindingCandidate>> {
        let root = self.layout.modules_root();
        let mut found = BTreeSet::new();

        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "modules root missing, nothing to scan");
            return Ok(found);
        }

        let entries = fs::read_dir(root).map_err(|e| ToolkitError::filesystem(root, e))?;
        let mut modules = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ToolkitError::filesystem(root, e))?;
            if entry.path().is_dir() {
                modules.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        modules.sort();

        for module in modules {
            self.scan_module(&module, &mut found)?;
        }

        Ok(found)
    }

    fn scan_module(&self, module: &str, found: &mut BTreeSet<BindingCandidate>) -> Result<()> {
        let contracts = self.layout.contracts_dir(module);
        let repositories = self.layout.repositories_dir(module);
        if !contracts.is_dir() || !repositories.is_dir() {
            return Ok(());
        }

        for entry in WalkDir::new(&contracts).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().map_or_else(|| contracts.clone(), Path::to_path_buf);
                ToolkitError::filesystem(path, e.into())
            })?;

            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(self.extension.as_str())
            {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            // contracts without the suffix pair with a repository of the same name
            let implementation = match stem.strip_suffix(self.interface_suffix.as_str()) {
                Some("") => continue,
                Some(stripped) => stripped,
                None => stem,
            };

            let relative_dir = path
                .parent()
                .and_then(|parent| parent.strip_prefix(&contracts).ok())
                .map(Path::to_path_buf)
                .unwrap_or_default();
            let implementation_path = repositories
                .join(&relative_dir)
                .join(format!("{implementation}.{}", self.extension));

            if !implementation_path.is_file() {
                tracing::debug!(
                    contract = %path.display(),
                    "no implementation for contract, skipping"
                );
                continue;
            }

            let sub_namespace: String = relative_dir
                .components()
                .map(|c| format!("{NAMESPACE_SEPARATOR}{}", c.as_os_str().to_string_lossy()))
                .collect();
            let module_namespace = self.layout.module_namespace(module);
            let root = self.layout.modules_root();

            found.insert(BindingCandidate {
                interface_class: format!(
                    "{module_namespace}{NAMESPACE_SEPARATOR}{}{sub_namespace}{NAMESPACE_SEPARATOR}{stem}",
                    ArtifactKind::Contract.namespace_suffix()
                ),
                implementation_class: format!(
                    "{module_namespace}{NAMESPACE_SEPARATOR}{}{sub_namespace}{NAMESPACE_SEPARATOR}{implementation}",
                    ArtifactKind::Repository.namespace_suffix()
                ),
                contract_path: path.strip_prefix(root).unwrap_or(path).to_path_buf(),
                implementation_path: implementation_path
                    .strip_prefix(root)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| implementation_path.clone()),
            });
        }

        Ok(())
    }
}

/// Pairs recorded by the generator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingManifest {
    bindings: BTreeSet<BindingCandidate>,
}

impl BindingManifest {
    /// Load a manifest; a missing file is an empty manifest
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ToolkitError::filesystem(path, e))?;
        serde_json::from_str(&content).map_err(|source| ToolkitError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the manifest as pretty JSON, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ToolkitError::filesystem(parent, e))?;
        }

        let mut json = serde_json::to_string_pretty(self).map_err(|source| ToolkitError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;
        json.push('\n');
        fs::write(path, json).map_err(|e| ToolkitError::filesystem(path, e))
    }

    /// Add a pair, returning `false` if it was already recorded
    pub fn insert(&mut self, candidate: BindingCandidate) -> bool {
        self.bindings.insert(candidate)
    }

    /// Recorded pairs in deterministic order
    pub fn entries(&self) -> impl Iterator<Item = &BindingCandidate> {
        self.bindings.iter()
    }

    /// Recorded pairs whose files still exist
    pub fn verified<'a>(&'a self, modules_root: &'a Path) -> impl Iterator<Item = &'a BindingCandidate> {
        self.bindings
            .iter()
            .filter(move |candidate| candidate.exists_under(modules_root))
    }

    /// Number of recorded pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing is recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Dependency container that accepts contract bindings
pub trait Container {
    /// Bind `interface` to `implementation`
    fn bind(&mut self, interface: &str, implementation: &str);
}

/// In-memory container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    bindings: BTreeMap<String, String>,
}

impl BindingTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Implementation bound to `interface`
    #[must_use]
    pub fn resolve(&self, interface: &str) -> Option<&str> {
        self.bindings.get(interface).map(String::as_str)
    }

    /// Bound pairs, ordered by contract
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings
            .iter()
            .map(|(interface, implementation)| (interface.as_str(), implementation.as_str()))
    }

    /// Number of bound contracts
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing is bound
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Container for BindingTable {
    fn bind(&mut self, interface: &str, implementation: &str) {
        self.bindings
            .insert(interface.to_string(), implementation.to_string());
    }
}

/// Bind every known pair into `container`
///
/// Binds the verified manifest entries together with a fresh scan, and
/// returns what was bound.
///
/// # Errors
///
/// Returns an error if the manifest is unreadable or the scan fails.
pub fn register_bindings<C: Container + ?Sized>(
    config: &ToolkitConfig,
    container: &mut C,
) -> Result<Vec<BindingCandidate>> {
    let modules_root = config.modules_root();
    let manifest = BindingManifest::load(&config.manifest_path())?;

    let mut candidates: BTreeSet<BindingCandidate> =
        manifest.verified(&modules_root).cloned().collect();
    candidates.extend(BindingScanner::new(config).scan()?);

    for candidate in &candidates {
        tracing::debug!(
            interface = %candidate.interface_class,
            implementation = %candidate.implementation_class,
            "binding repository"
        );
        container.bind(&candidate.interface_class, &candidate.implementation_class);
    }

    tracing::info!(count = candidates.len(), "repository bindings registered");
    Ok(candidates.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::ModuleSpec;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<?php\n").unwrap();
    }

    fn project() -> (tempfile::TempDir, ToolkitConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = ToolkitConfig::default().with_base_path(dir.path());
        (dir, config)
    }

    #[test]
    fn test_scan_binds_pair() {
        let (_dir, config) = project();
        let root = config.modules_root();
        touch(&root.join("Blog/Domain/Contracts/PostRepositoryInterface.php"));
        touch(&root.join("Blog/Infrastructure/Repositories/PostRepository.php"));

        let found = BindingScanner::new(&config).scan().unwrap();
        let candidate = found.iter().next().unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(
            candidate.interface_class,
            "App\\Modules\\Blog\\Domain\\Contracts\\PostRepositoryInterface"
        );
        assert_eq!(
            candidate.implementation_class,
            "App\\Modules\\Blog\\Infrastructure\\Repositories\\PostRepository"
        );
        assert_eq!(
            candidate.contract_path,
            PathBuf::from("Blog/Domain/Contracts/PostRepositoryInterface.php")
        );
    }

    #[test]
    fn test_scan_mirrors_sub_directories() {
        let (_dir, config) = project();
        let root = config.modules_root();
        touch(&root.join("Billing/Domain/Contracts/Invoices/LineItemRepositoryInterface.php"));
        touch(&root.join("Billing/Infrastructure/Repositories/Invoices/LineItemRepository.php"));

        let found = BindingScanner::new(&config).scan().unwrap();
        let candidate = found.iter().next().unwrap();

        assert_eq!(
            candidate.interface_class,
            "App\\Modules\\Billing\\Domain\\Contracts\\Invoices\\LineItemRepositoryInterface"
        );
        assert_eq!(
            candidate.implementation_class,
            "App\\Modules\\Billing\\Infrastructure\\Repositories\\Invoices\\LineItemRepository"
        );
    }

    #[test]
    fn test_contract_without_implementation_is_skipped() {
        let (_dir, config) = project();
        let root = config.modules_root();
        touch(&root.join("Blog/Domain/Contracts/PostRepositoryInterface.php"));
        fs::create_dir_all(root.join("Blog/Infrastructure/Repositories")).unwrap();

        assert!(BindingScanner::new(&config).scan().unwrap().is_empty());
    }

    #[test]
    fn test_contract_without_suffix_pairs_by_name() {
        let (_dir, config) = project();
        let root = config.modules_root();
        touch(&root.join("Blog/Domain/Contracts/PostStore.php"));
        touch(&root.join("Blog/Infrastructure/Repositories/PostStore.php"));
        touch(&root.join("Blog/Domain/Contracts/Interface.php"));

        let found = BindingScanner::new(&config).scan().unwrap();
        let candidate = found.iter().next().unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(
            candidate.interface_class,
            "App\\Modules\\Blog\\Domain\\Contracts\\PostStore"
        );
        assert_eq!(
            candidate.implementation_class,
            "App\\Modules\\Blog\\Infrastructure\\Repositories\\PostStore"
        );
    }

    #[test]
    fn test_other_extensions_are_ignored() {
        let (_dir, config) = project();
        let root = config.modules_root();
        touch(&root.join("Blog/Domain/Contracts/PostRepositoryInterface.txt"));
        touch(&root.join("Blog/Infrastructure/Repositories/PostRepository.txt"));

        assert!(BindingScanner::new(&config).scan().unwrap().is_empty());
    }

    #[test]
    fn test_missing_modules_root_scans_empty() {
        let (_dir, config) = project();
        assert!(BindingScanner::new(&config).scan().unwrap().is_empty());
    }

    #[test]
    fn test_manifest_round_trip_and_insert_is_idempotent() {
        let (dir, config) = project();
        let layout = ModuleLayout::new(&config);
        let spec = ModuleSpec::parse("Blog:Post").unwrap();
        let candidate = BindingCandidate::from_descriptors(
            &layout.describe(ArtifactKind::Contract, &spec),
            &layout.describe(ArtifactKind::Repository, &spec),
            &config.modules_root(),
            "php",
        );

        let mut manifest = BindingManifest::default();
        assert!(manifest.insert(candidate.clone()));
        assert!(!manifest.insert(candidate.clone()));

        let path = dir.path().join("bootstrap/cache/module-bindings.json");
        manifest.save(&path).unwrap();

        let loaded = BindingManifest::load(&path).unwrap();
        assert_eq!(loaded, manifest);
        assert_eq!(
            loaded.entries().next().unwrap().implementation_path,
            PathBuf::from("Blog/Infrastructure/Repositories/PostRepository.php")
        );
    }

    #[test]
    fn test_corrupt_manifest_is_error() {
        let (dir, _config) = project();
        let path = dir.path().join("bindings.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            BindingManifest::load(&path),
            Err(ToolkitError::Manifest { .. })
        ));
    }

    #[test]
    fn test_register_bindings_skips_stale_manifest_entries() {
        let (_dir, config) = project();
        let root = config.modules_root();
        touch(&root.join("Blog/Domain/Contracts/PostRepositoryInterface.php"));
        touch(&root.join("Blog/Infrastructure/Repositories/PostRepository.php"));

        let mut manifest = BindingManifest::default();
        manifest.insert(BindingCandidate {
            interface_class: "App\\Modules\\Gone\\Domain\\Contracts\\GoneRepositoryInterface".into(),
            implementation_class: "App\\Modules\\Gone\\Infrastructure\\Repositories\\GoneRepository".into(),
            contract_path: PathBuf::from("Gone/Domain/Contracts/GoneRepositoryInterface.php"),
            implementation_path: PathBuf::from("Gone/Infrastructure/Repositories/GoneRepository.php"),
        });
        manifest.save(&config.manifest_path()).unwrap();

        let mut table = BindingTable::new();
        let bound = register_bindings(&config, &mut table).unwrap();

        assert_eq!(bound.len(), 1);
        assert_eq!(
            table.resolve("App\\Modules\\Blog\\Domain\\Contracts\\PostRepositoryInterface"),
            Some("App\\Modules\\Blog\\Infrastructure\\Repositories\\PostRepository")
        );
        assert!(table
            .resolve("App\\Modules\\Gone\\Domain\\Contracts\\GoneRepositoryInterface")
            .is_none());
    }
}
