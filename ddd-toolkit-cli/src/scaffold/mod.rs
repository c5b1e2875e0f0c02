//! Module scaffolding
//!
//! Turns a module specifier and a set of artifact kinds into source files
//! under the module layout.

pub mod generator;

pub use generator::{GenerationReport, ScaffoldGenerator, WriteOutcome, WriteResult, TIMESTAMP_FORMAT};
