//! tm-db - Version ledger for Tidemark
//!
//! This crate provides the reader/writer capability traits the migration
//! engine depends on, and a DuckDB-backed ledger implementing both.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbLedger;
pub use error::{DbError, DbResult};
pub use traits::{VersionLedger, VersionReader, VersionRecord, VersionWriter, NO_VERSION};
