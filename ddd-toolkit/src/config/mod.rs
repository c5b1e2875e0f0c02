//! Configuration management for ddd-toolkit
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `DDD_` prefix, `__` for nesting)
//! 2. `./ddd-toolkit.toml` (project)
//! 3. `~/.config/ddd-toolkit/config.toml` (user config, XDG)
//! 4. Hardcoded defaults (fallback)
//!
//! Environment variable format: `DDD_SECTION__FIELD_NAME`
//! - Example: `DDD_PROJECT__MODULES_DIR=src/Modules`
//!
//! # Example Configuration
//!
//! ```toml
//! # ddd-toolkit.toml
//! [project]
//! base_path = "."
//! modules_dir = "app/Modules"
//! root_namespace = 'App\Modules'
//! file_extension = "php"
//!
//! [seeders]
//! aggregator = "database/seeders/DatabaseSeeder.php"
//!
//! [bindings]
//! manifest = "bootstrap/cache/module-bindings.json"
//! interface_suffix = "Interface"
//!
//! [discovery]
//! api_routes = false
//! views = true
//! views_dir = "Views"
//! ```
//!
//! # Usage
//!
//! ```rust
//! use ddd_toolkit::config::ToolkitConfig;
//!
//! let config = ToolkitConfig::default();
//! assert!(config.modules_root().ends_with("app/Modules"));
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Name of the project-local configuration file
pub const LOCAL_CONFIG_FILE: &str = "ddd-toolkit.toml";

/// Project layout settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectSettings {
    /// Root of the host application
    pub base_path: PathBuf,

    /// Directory holding all modules, relative to `base_path`
    pub modules_dir: PathBuf,

    /// Namespace that mirrors `modules_dir`
    pub root_namespace: String,

    /// Extension of generated source files
    pub file_extension: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            modules_dir: PathBuf::from("app/Modules"),
            root_namespace: "App\\Modules".to_string(),
            file_extension: "php".to_string(),
        }
    }
}

/// Seeder aggregator settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SeederSettings {
    /// Aggregator file, relative to `base_path`
    pub aggregator: PathBuf,
}

impl Default for SeederSettings {
    fn default() -> Self {
        Self {
            aggregator: PathBuf::from("database/seeders/DatabaseSeeder.php"),
        }
    }
}

/// Repository binding settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BindingSettings {
    /// Manifest of generated contract/implementation pairs, relative to `base_path`
    pub manifest: PathBuf,

    /// Suffix stripped from a contract name to find its implementation
    pub interface_suffix: String,
}

impl Default for BindingSettings {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("bootstrap/cache/module-bindings.json"),
            interface_suffix: "Interface".to_string(),
        }
    }
}

/// Host discovery settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Also collect `api.php` route files
    pub api_routes: bool,

    /// Collect per-module view directories
    pub views: bool,

    /// View directory name under each module's `Interface` layer
    pub views_dir: String,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            api_routes: false,
            views: false,
            views_dir: "Views".to_string(),
        }
    }
}

/// Complete ddd-toolkit configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ToolkitConfig {
    /// Project layout
    #[serde(default)]
    pub project: ProjectSettings,

    /// Seeder aggregator
    #[serde(default)]
    pub seeders: SeederSettings,

    /// Repository bindings
    #[serde(default)]
    pub bindings: BindingSettings,

    /// Host discovery
    #[serde(default)]
    pub discovery: DiscoverySettings,
}

impl ToolkitConfig {
    /// Load configuration from the standard locations
    ///
    /// Precedence (lowest first): defaults, user config, `./ddd-toolkit.toml`,
    /// `DDD_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file cannot be parsed or a value
    /// has the wrong type.
    pub fn load() -> Result<Self> {
        let mut figment = Self::defaults()?;

        let user_config = Self::recommended_path();
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        let config = figment
            .merge(Env::prefixed("DDD_").split("__").lowercase(true))
            .extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Environment variables still override values from the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid TOML or values of the
    /// wrong type.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::defaults()?
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("DDD_").split("__").lowercase(true))
            .extract()?;
        Ok(config)
    }

    /// Default values as the lowest-priority figment provider
    fn defaults() -> Result<Figment> {
        let defaults = toml::to_string(&Self::default())
            .map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(Figment::new().merge(Toml::string(&defaults)))
    }

    /// Get the recommended XDG config path
    ///
    /// ```rust
    /// use ddd_toolkit::config::ToolkitConfig;
    ///
    /// let path = ToolkitConfig::recommended_path();
    /// assert!(path.ends_with("config.toml"));
    /// ```
    #[must_use]
    pub fn recommended_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from(LOCAL_CONFIG_FILE),
            |config_dir| config_dir.join("ddd-toolkit").join("config.toml"),
        )
    }

    /// Return a copy rooted at another application directory
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.project.base_path = base_path.into();
        self
    }

    /// Absolute-or-relative path of the modules root
    #[must_use]
    pub fn modules_root(&self) -> PathBuf {
        self.project.base_path.join(&self.project.modules_dir)
    }

    /// Path of the seeder aggregator file
    #[must_use]
    pub fn aggregator_path(&self) -> PathBuf {
        self.project.base_path.join(&self.seeders.aggregator)
    }

    /// Path of the binding manifest
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.project.base_path.join(&self.bindings.manifest)
    }

    /// File name for a generated source file stem
    #[must_use]
    pub fn source_file(&self, stem: &str) -> String {
        format!("{stem}.{}", self.project.file_extension)
    }
}
