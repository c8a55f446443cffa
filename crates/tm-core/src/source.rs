//! Script sources: where migration definitions come from
//!
//! A [`ScriptSource`] hands back every known definition sorted ascending by
//! version with no duplicates, or fails without returning anything.

use crate::error::{CoreError, CoreResult};
use crate::migration::MigrationDefinition;
use std::path::{Path, PathBuf};

/// Supplies the full, ordered set of migration definitions.
pub trait ScriptSource {
    /// Load every definition, sorted ascending by version.
    ///
    /// Fails with [`CoreError::DuplicateVersion`] when two definitions share a
    /// version, and with a load error when storage cannot be read or a
    /// definition cannot be parsed.
    fn load_all(&self) -> CoreResult<Vec<MigrationDefinition>>;
}

/// Sort definitions ascending by version, rejecting duplicate versions.
///
/// Returns a new sequence; the input is consumed.
pub fn sort_by_version_ascending(
    definitions: Vec<MigrationDefinition>,
) -> CoreResult<Vec<MigrationDefinition>> {
    let labeled = definitions
        .into_iter()
        .enumerate()
        .map(|(i, def)| (format!("entry #{}", i + 1), def))
        .collect();
    sort_labeled(labeled)
}

/// Sort `(origin, definition)` pairs by version and check uniqueness, naming
/// both origins when a version repeats.
fn sort_labeled(
    mut entries: Vec<(String, MigrationDefinition)>,
) -> CoreResult<Vec<MigrationDefinition>> {
    entries.sort_by_key(|(_, def)| def.version);

    if let Some(pair) = entries
        .windows(2)
        .find(|pair| pair[0].1.version == pair[1].1.version)
    {
        return Err(CoreError::DuplicateVersion {
            version: pair[0].1.version,
            first: pair[0].0.clone(),
            second: pair[1].0.clone(),
        });
    }

    Ok(entries.into_iter().map(|(_, def)| def).collect())
}

/// Reads `*.yml` / `*.yaml` migration files from one or more directories.
///
/// Directories are not searched recursively. A missing directory contributes
/// no files; an unreadable or malformed file fails the whole load.
#[derive(Debug, Clone)]
pub struct DirectoryScriptSource {
    paths: Vec<PathBuf>,
}

impl DirectoryScriptSource {
    /// Create a source over the given directories
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Directories this source reads from
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// List migration files in `dir`, in path order
    fn migration_files(dir: &Path) -> CoreResult<Vec<PathBuf>> {
        let dir_str = dir.to_str().ok_or_else(|| CoreError::InvalidPattern {
            pattern: dir.display().to_string(),
            message: "path is not valid UTF-8".to_string(),
        })?;
        let escaped = glob::Pattern::escape(dir_str);

        let mut files = Vec::new();
        for ext in ["yml", "yaml"] {
            let pattern = format!("{}/*.{}", escaped, ext);
            let matches = glob::glob(&pattern).map_err(|e| CoreError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            for entry in matches {
                let path = entry.map_err(|e| CoreError::IoWithPath {
                    path: e.path().display().to_string(),
                    source: e.into_error(),
                })?;
                if path.is_file() {
                    files.push(path);
                }
            }
        }
        files.sort();
        Ok(files)
    }
}

impl ScriptSource for DirectoryScriptSource {
    fn load_all(&self) -> CoreResult<Vec<MigrationDefinition>> {
        let mut entries = Vec::new();

        for dir in &self.paths {
            if !dir.exists() {
                log::debug!("Migration path {} does not exist, skipping", dir.display());
                continue;
            }

            for file in Self::migration_files(dir)? {
                log::debug!("Loading migration file {}", file.display());
                let definition = MigrationDefinition::from_file(&file)?;
                entries.push((file.display().to_string(), definition));
            }
        }

        sort_labeled(entries)
    }
}

/// A script source over definitions already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScriptSource {
    definitions: Vec<MigrationDefinition>,
}

impl InMemoryScriptSource {
    /// Wrap a collection of definitions in any order
    pub fn new(definitions: Vec<MigrationDefinition>) -> Self {
        Self { definitions }
    }
}

impl ScriptSource for InMemoryScriptSource {
    fn load_all(&self) -> CoreResult<Vec<MigrationDefinition>> {
        sort_by_version_ascending(self.definitions.clone())
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
