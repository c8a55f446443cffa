//! Migration definitions
//!
//! A migration file is a YAML document holding one versioned change set:
//!
//! ```yaml
//! version: 3
//! description: add orders table
//! up:
//!   - CREATE TABLE orders (id INTEGER PRIMARY KEY, amount DECIMAL(10, 2))
//! down:
//!   - DROP TABLE orders
//! ```

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One versioned change set.
///
/// Immutable once loaded. The ledger only records that a version was applied,
/// never the statements themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationDefinition {
    /// Version id, unique across a script source
    pub version: i64,

    /// Free-text label persisted into the ledger when applied
    #[serde(default)]
    pub description: String,

    /// Statements applied when moving forward onto this version
    #[serde(rename = "up", default)]
    pub up_statements: Vec<String>,

    /// Statements applied when reverting away from this version
    #[serde(rename = "down", default)]
    pub down_statements: Vec<String>,
}

impl MigrationDefinition {
    /// Create a definition from its parts
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up_statements: Vec<String>,
        down_statements: Vec<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up_statements,
            down_statements,
        }
    }

    /// Parse a definition from YAML text.
    ///
    /// `origin` names the text's location in error messages.
    pub fn from_yaml_str(content: &str, origin: &str) -> CoreResult<Self> {
        let definition: MigrationDefinition =
            serde_yaml::from_str(content).map_err(|e| CoreError::MigrationParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        if definition.version < 0 {
            return Err(CoreError::InvalidVersion {
                version: definition.version,
                path: origin.to_string(),
            });
        }

        Ok(definition)
    }

    /// Load a definition from a migration file
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content, &path.display().to_string())
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
