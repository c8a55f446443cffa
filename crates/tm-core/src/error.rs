//! Error types for tm-core

use thiserror::Error;

/// Core error type for Tidemark
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Project directory not found
    #[error("[E004] Project directory not found: {path}")]
    ProjectNotFound { path: String },

    /// E005: Migration file could not be parsed into a definition
    #[error("[E005] Failed to parse migration file {path}: {message}")]
    MigrationParseError { path: String, message: String },

    /// E006: Two migration definitions share a version
    #[error("[E006] Duplicate migration version {version} in {first} and {second}")]
    DuplicateVersion {
        version: i64,
        first: String,
        second: String,
    },

    /// E007: Migration version is outside the allowed range
    #[error("[E007] Invalid migration version {version} in {path}: versions must be >= 0")]
    InvalidVersion { version: i64, path: String },

    /// E008: Migration path pattern could not be expanded
    #[error("[E008] Invalid migration path pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// E014: IO error
    #[error("[E014] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E016: IO error with file path context
    #[error("[E016] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E015: YAML parse error
    #[error("[E015] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
