//! ddd-toolkit: conventions and plumbing for modular DDD applications
//!
//! Applications are split into modules, each laid out in four layers:
//! `Domain`, `Application`, `Infrastructure` and `Interface`. This crate
//! knows that layout and the operations built on top of it:
//!
//! - **naming**: parse `Module[:[subdir/...]Name]` specifiers
//! - **layout**: resolve the directory, namespace and class of every artifact
//! - **bindings**: pair repository contracts with implementations
//! - **migration**: model column-modification migrations
//! - **seeder**: register module seeders in the seeder aggregator
//! - **host**: discover what a host application loads at boot
//!
//! # Quick Start
//!
//! ```rust
//! use ddd_toolkit::prelude::*;
//!
//! let config = ToolkitConfig::default();
//! let layout = ModuleLayout::new(&config);
//! let spec = ModuleSpec::parse("Billing:Invoices/LineItem")?;
//!
//! let repository = layout.describe(ArtifactKind::Repository, &spec);
//! assert_eq!(
//!     repository.qualified_class(),
//!     "App\\Modules\\Billing\\Infrastructure\\Repositories\\Invoices\\LineItemRepository"
//! );
//! # Ok::<(), ddd_toolkit::error::ToolkitError>(())
//! ```

// Lint configuration is handled at the workspace level in Cargo.toml

pub mod bindings;
pub mod config;
pub mod error;
pub mod host;
pub mod layout;
pub mod migration;
pub mod naming;
pub mod observability;
pub mod seeder;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use ddd_toolkit::prelude::*;
    //! ```

    pub use crate::bindings::{
        register_bindings, BindingCandidate, BindingManifest, BindingScanner, BindingTable,
        Container,
    };
    pub use crate::config::ToolkitConfig;
    pub use crate::error::{Result, ToolkitError};
    pub use crate::host::{bootstrap, HostReport, ViewNamespace};
    pub use crate::layout::{ArtifactDescriptor, ArtifactKind, ModuleLayout};
    pub use crate::migration::{ColumnOperations, MigrationEdit};
    pub use crate::naming::{Inflect, ModuleSpec};
    pub use crate::seeder::{register_seeder, SeederAggregator, SpliceOutcome};
}
