//! Project discovery and loading

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::source::DirectoryScriptSource;
use std::path::{Path, PathBuf};

/// Represents a Tidemark project: a directory holding `tidemark.yml` and
/// the migration directories it names.
#[derive(Debug)]
pub struct Project {
    /// Project root directory
    pub root: PathBuf,

    /// Project configuration
    pub config: Config,
}

impl Project {
    /// Load a project from a directory
    pub fn load(path: &Path) -> CoreResult<Self> {
        let root = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        if !root.exists() {
            return Err(CoreError::ProjectNotFound {
                path: root.display().to_string(),
            });
        }

        let config = Config::load_from_dir(&root)?;
        Ok(Self { root, config })
    }

    /// Load a project whose config lives at an explicit path.
    ///
    /// Migration paths still resolve against `root`.
    pub fn load_with_config(root: &Path, config_path: &Path) -> CoreResult<Self> {
        let mut project = Self {
            root: root.to_path_buf(),
            config: Config::load(config_path)?,
        };
        if !project.root.is_absolute() {
            project.root = std::env::current_dir()?.join(&project.root);
        }
        Ok(project)
    }

    /// Absolute migration directories for this project
    pub fn migration_dirs(&self) -> Vec<PathBuf> {
        self.config.migration_paths_absolute(&self.root)
    }

    /// Build the directory-backed script source for this project
    pub fn script_source(&self) -> DirectoryScriptSource {
        DirectoryScriptSource::new(self.migration_dirs())
    }
}

#[cfg(test)]
#[path = "project_test.rs"]
mod tests;
