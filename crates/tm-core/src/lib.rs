//! tm-core - Core library for Tidemark
//!
//! This crate provides project configuration, the migration definition type,
//! and the script sources that load definitions from disk or memory.

pub mod config;
pub mod error;
pub mod migration;
pub mod project;
pub mod source;
pub mod sql_utils;

pub use config::{Config, DatabaseConfig};
pub use error::{CoreError, CoreResult};
pub use migration::MigrationDefinition;
pub use project::Project;
pub use source::{
    sort_by_version_ascending, DirectoryScriptSource, InMemoryScriptSource, ScriptSource,
};
