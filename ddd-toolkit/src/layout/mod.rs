//! Layered module layout
//!
//! One table describes every artifact kind: which layer directory it lives
//! in, whether the specifier's sub-directories apply, how its class name is
//! derived and which other artifacts it references. Paths and namespaces are
//! both rendered from the same segment list.
//!
//! ```text
//! <modules-root>/<Module>/
//!   Domain/Contracts/[<subdir>/]<Name>RepositoryInterface
//!   Application/{Data,DTO,Services}/[<subdir>/]<Name>{Data,DTO,Service}
//!   Infrastructure/Database/{Migrations,Models,Seeders}/...
//!   Infrastructure/Repositories/[<subdir>/]<Name>Repository
//!   Interface/{Controllers,Requests,Resources,Routes}/...
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::ToolkitConfig;
use crate::naming::{Inflect, ModuleSpec, NAMESPACE_SEPARATOR};

/// Kind of generated artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    /// Validated data object
    Data,
    /// Plain data-transfer object
    Dto,
    /// Create-table schema migration
    Migration,
    /// ORM model
    Model,
    /// Repository interface (paired with [`ArtifactKind::Repository`])
    Contract,
    /// Repository implementation
    Repository,
    /// Application service
    Service,
    /// HTTP controller
    Controller,
    /// Form request
    Request,
    /// JSON resource
    Resource,
    /// Module route file
    Route,
    /// Database seeder
    Seeder,
}

/// How a kind's class name is built from the specifier's file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassRule {
    /// `<prefix><Name><suffix>`
    Affix {
        /// Text before the name
        prefix: &'static str,
        /// Text after the name
        suffix: &'static str,
    },
    /// Singular form of the name
    Singular,
    /// `create_<table>_table`, where table is the plural snake form of the name
    CreateTable,
    /// A fixed file stem
    Fixed(&'static str),
}

/// Static layout facts for one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindLayout {
    /// Layer/component directory segments below the module directory
    pub segments: &'static [&'static str],
    /// Whether the specifier's sub-directories are appended
    pub uses_sub_dir: bool,
    /// Class/file-stem rule
    pub class_rule: ClassRule,
    /// Artifacts whose namespaces the template references
    pub related: &'static [ArtifactKind],
}

const fn affix(prefix: &'static str, suffix: &'static str) -> ClassRule {
    ClassRule::Affix { prefix, suffix }
}

impl ArtifactKind {
    /// Every kind, in declaration order
    pub const ALL: [Self; 12] = [
        Self::Data,
        Self::Dto,
        Self::Migration,
        Self::Model,
        Self::Contract,
        Self::Repository,
        Self::Service,
        Self::Controller,
        Self::Request,
        Self::Resource,
        Self::Route,
        Self::Seeder,
    ];

    /// Kinds produced by "generate all", in generation order
    ///
    /// DTO, Request and Seeder must be requested explicitly.
    pub const GENERATE_ALL: [Self; 8] = [
        Self::Data,
        Self::Migration,
        Self::Model,
        Self::Repository,
        Self::Service,
        Self::Controller,
        Self::Resource,
        Self::Route,
    ];

    /// Layout table entry for this kind
    #[must_use]
    pub const fn layout(self) -> KindLayout {
        match self {
            Self::Data => KindLayout {
                segments: &["Application", "Data"],
                uses_sub_dir: true,
                class_rule: affix("", "Data"),
                related: &[],
            },
            Self::Dto => KindLayout {
                segments: &["Application", "DTO"],
                uses_sub_dir: true,
                class_rule: affix("", "DTO"),
                related: &[],
            },
            Self::Migration => KindLayout {
                segments: &["Infrastructure", "Database", "Migrations"],
                uses_sub_dir: false,
                class_rule: ClassRule::CreateTable,
                related: &[],
            },
            Self::Model => KindLayout {
                segments: &["Infrastructure", "Database", "Models"],
                uses_sub_dir: true,
                class_rule: ClassRule::Singular,
                related: &[],
            },
            Self::Contract => KindLayout {
                segments: &["Domain", "Contracts"],
                uses_sub_dir: true,
                class_rule: affix("", "RepositoryInterface"),
                related: &[],
            },
            Self::Repository => KindLayout {
                segments: &["Infrastructure", "Repositories"],
                uses_sub_dir: true,
                class_rule: affix("", "Repository"),
                related: &[Self::Contract, Self::Model],
            },
            Self::Service => KindLayout {
                segments: &["Application", "Services"],
                uses_sub_dir: true,
                class_rule: affix("", "Service"),
                related: &[Self::Contract],
            },
            Self::Controller => KindLayout {
                segments: &["Interface", "Controllers"],
                uses_sub_dir: true,
                class_rule: affix("", "Controller"),
                related: &[Self::Service],
            },
            Self::Request => KindLayout {
                segments: &["Interface", "Requests"],
                uses_sub_dir: true,
                class_rule: affix("Submit", "Request"),
                related: &[Self::Dto],
            },
            Self::Resource => KindLayout {
                segments: &["Interface", "Resources"],
                uses_sub_dir: true,
                class_rule: affix("", "Resources"),
                related: &[],
            },
            Self::Route => KindLayout {
                segments: &["Interface", "Routes"],
                uses_sub_dir: false,
                class_rule: ClassRule::Fixed("web"),
                related: &[],
            },
            Self::Seeder => KindLayout {
                segments: &["Infrastructure", "Database", "Seeders"],
                uses_sub_dir: true,
                class_rule: affix("", "Seeder"),
                related: &[],
            },
        }
    }

    /// Human-readable label used in progress output
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Data => "Data",
            Self::Dto => "DTO",
            Self::Migration => "Migration",
            Self::Model => "Model",
            Self::Contract => "Repository interface",
            Self::Repository => "Repository",
            Self::Service => "Service",
            Self::Controller => "Controller",
            Self::Request => "Form request",
            Self::Resource => "Resource",
            Self::Route => "Route file",
            Self::Seeder => "Seeder",
        }
    }

    /// Layer path suffix, e.g. `Infrastructure/Repositories`
    #[must_use]
    pub fn path_suffix(self) -> PathBuf {
        self.layout().segments.iter().collect()
    }

    /// Layer namespace suffix, e.g. `Infrastructure\Repositories`
    #[must_use]
    pub fn namespace_suffix(self) -> String {
        self.layout().segments.join(&NAMESPACE_SEPARATOR.to_string())
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fully resolved location and name of one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    /// Artifact kind
    pub kind: ArtifactKind,
    /// Directory the file is written to
    pub directory: PathBuf,
    /// Namespace declared by the file
    pub namespace: String,
    /// Class name declared by the file
    pub class_name: String,
    /// File name without extension
    pub file_stem: String,
}

impl ArtifactDescriptor {
    /// Fully-qualified class name
    #[must_use]
    pub fn qualified_class(&self) -> String {
        format!("{}{NAMESPACE_SEPARATOR}{}", self.namespace, self.class_name)
    }

    /// Path of the file for a given extension
    #[must_use]
    pub fn file_path(&self, extension: &str) -> PathBuf {
        self.directory.join(format!("{}.{extension}", self.file_stem))
    }
}

/// Resolves descriptors for a configured project
#[derive(Debug, Clone)]
pub struct ModuleLayout {
    modules_root: PathBuf,
    root_namespace: String,
}

impl ModuleLayout {
    /// Create a layout from the toolkit configuration
    #[must_use]
    pub fn new(config: &ToolkitConfig) -> Self {
        Self {
            modules_root: config.modules_root(),
            root_namespace: config.project.root_namespace.clone(),
        }
    }

    /// Create a layout from explicit roots
    pub fn with_roots(modules_root: impl Into<PathBuf>, root_namespace: impl Into<String>) -> Self {
        Self {
            modules_root: modules_root.into(),
            root_namespace: root_namespace.into(),
        }
    }

    /// Directory holding all modules
    #[must_use]
    pub fn modules_root(&self) -> &Path {
        &self.modules_root
    }

    /// Directory of one module
    #[must_use]
    pub fn module_dir(&self, module_name: &str) -> PathBuf {
        self.modules_root.join(module_name)
    }

    /// Namespace of one module
    #[must_use]
    pub fn module_namespace(&self, module_name: &str) -> String {
        format!("{}{NAMESPACE_SEPARATOR}{module_name}", self.root_namespace)
    }

    /// Resolve the descriptor of `kind` for `spec`
    #[must_use]
    pub fn describe(&self, kind: ArtifactKind, spec: &ModuleSpec) -> ArtifactDescriptor {
        let layout = kind.layout();

        let mut directory = self.module_dir(spec.module_name()).join(kind.path_suffix());
        let mut namespace = format!(
            "{}{NAMESPACE_SEPARATOR}{}",
            self.module_namespace(spec.module_name()),
            kind.namespace_suffix()
        );
        if layout.uses_sub_dir && !spec.sub_dir().is_empty() {
            directory.push(spec.sub_dir_path());
            namespace.push(NAMESPACE_SEPARATOR);
            namespace.push_str(&spec.sub_namespace());
        }

        let class_name = match layout.class_rule {
            ClassRule::Affix { prefix, suffix } => format!("{prefix}{}{suffix}", spec.file_name()),
            ClassRule::Singular => Inflect::singular(spec.file_name()),
            ClassRule::CreateTable => {
                format!("create_{}_table", Inflect::table_name(spec.file_name()))
            }
            ClassRule::Fixed(stem) => stem.to_string(),
        };

        ArtifactDescriptor {
            kind,
            directory,
            namespace,
            file_stem: class_name.clone(),
            class_name,
        }
    }

    /// Descriptors of the artifacts `kind` references, in table order
    #[must_use]
    pub fn related(&self, kind: ArtifactKind, spec: &ModuleSpec) -> Vec<ArtifactDescriptor> {
        kind.layout()
            .related
            .iter()
            .map(|&related| self.describe(related, spec))
            .collect()
    }

    /// Migrations directory of a module (sub-directories never apply)
    #[must_use]
    pub fn migrations_dir(&self, module_name: &str) -> PathBuf {
        self.module_dir(module_name)
            .join(ArtifactKind::Migration.path_suffix())
    }

    /// Contracts root of a module
    #[must_use]
    pub fn contracts_dir(&self, module_name: &str) -> PathBuf {
        self.module_dir(module_name)
            .join(ArtifactKind::Contract.path_suffix())
    }

    /// Repositories root of a module
    #[must_use]
    pub fn repositories_dir(&self, module_name: &str) -> PathBuf {
        self.module_dir(module_name)
            .join(ArtifactKind::Repository.path_suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn layout() -> ModuleLayout {
        ModuleLayout::with_roots("app/Modules", "App\\Modules")
    }

    #[test]
    fn test_repository_descriptor() {
        let spec = ModuleSpec::parse("Billing:Invoices/LineItem").unwrap();
        let repo = layout().describe(ArtifactKind::Repository, &spec);

        assert_eq!(
            repo.directory,
            PathBuf::from("app/Modules/Billing/Infrastructure/Repositories/Invoices")
        );
        assert_eq!(
            repo.namespace,
            "App\\Modules\\Billing\\Infrastructure\\Repositories\\Invoices"
        );
        assert_eq!(repo.class_name, "LineItemRepository");
        assert_eq!(
            repo.file_path("php"),
            PathBuf::from("app/Modules/Billing/Infrastructure/Repositories/Invoices/LineItemRepository.php")
        );
    }

    #[test]
    fn test_repository_related_contract_and_model() {
        let spec = ModuleSpec::parse("Billing:Invoice").unwrap();
        let related = layout().related(ArtifactKind::Repository, &spec);

        assert_eq!(related.len(), 2);
        assert_eq!(
            related[0].qualified_class(),
            "App\\Modules\\Billing\\Domain\\Contracts\\InvoiceRepositoryInterface"
        );
        assert_eq!(
            related[1].qualified_class(),
            "App\\Modules\\Billing\\Infrastructure\\Database\\Models\\Invoice"
        );
    }

    #[test]
    fn test_class_rules() {
        let spec = ModuleSpec::parse("Billing:Invoice").unwrap();
        let l = layout();

        assert_eq!(l.describe(ArtifactKind::Request, &spec).class_name, "SubmitInvoiceRequest");
        assert_eq!(l.describe(ArtifactKind::Resource, &spec).class_name, "InvoiceResources");
        assert_eq!(l.describe(ArtifactKind::Model, &spec).class_name, "Invoice");
        assert_eq!(l.describe(ArtifactKind::Dto, &spec).class_name, "InvoiceDTO");
        assert_eq!(l.describe(ArtifactKind::Route, &spec).file_stem, "web");
        assert_eq!(
            l.describe(ArtifactKind::Migration, &spec).file_stem,
            "create_invoices_table"
        );
    }

    #[test]
    fn test_sub_dir_not_applied_to_migration_and_route() {
        let spec = ModuleSpec::parse("Billing:Invoices/LineItem").unwrap();
        let l = layout();

        assert_eq!(
            l.describe(ArtifactKind::Migration, &spec).directory,
            PathBuf::from("app/Modules/Billing/Infrastructure/Database/Migrations")
        );
        assert_eq!(
            l.describe(ArtifactKind::Route, &spec).directory,
            PathBuf::from("app/Modules/Billing/Interface/Routes")
        );
        assert_eq!(
            l.describe(ArtifactKind::Seeder, &spec).directory,
            PathBuf::from("app/Modules/Billing/Infrastructure/Database/Seeders/Invoices")
        );
    }

    #[test]
    fn test_generate_all_excludes_explicit_kinds() {
        assert!(!ArtifactKind::GENERATE_ALL.contains(&ArtifactKind::Dto));
        assert!(!ArtifactKind::GENERATE_ALL.contains(&ArtifactKind::Request));
        assert!(!ArtifactKind::GENERATE_ALL.contains(&ArtifactKind::Seeder));
        assert_eq!(ArtifactKind::GENERATE_ALL[0], ArtifactKind::Data);
        assert_eq!(ArtifactKind::GENERATE_ALL[7], ArtifactKind::Route);
    }

    fn segment() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{1,8}"
    }

    proptest! {
        #[test]
        fn prop_path_mirrors_namespace(
            module in segment(),
            dirs in proptest::collection::vec(segment(), 0..4),
            file in segment(),
            kind_index in 0usize..ArtifactKind::ALL.len(),
        ) {
            let spec = ModuleSpec::from_parts(&module, &dirs, &file).unwrap();
            let kind = ArtifactKind::ALL[kind_index];
            let descriptor = layout().describe(kind, &spec);

            let relative = descriptor.directory.strip_prefix("app/Modules").unwrap();
            let from_path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("\\");
            let from_namespace = descriptor.namespace.strip_prefix("App\\Modules\\").unwrap();

            prop_assert_eq!(from_path, from_namespace);
        }
    }
}
