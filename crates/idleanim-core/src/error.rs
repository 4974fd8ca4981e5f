//! Core error types for idleanim-core.
//!
//! Only the library surfaces that touch the filesystem can fail at runtime:
//! catalog loading, asset materialization and configuration. Misuse of the
//! lifecycle protocol (double freeze, resume without freeze) is a programming
//! error and panics instead of returning one of these.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for idleanim-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Catalog-related errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while reading the manifest or materializing an animation.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Failed to read a manifest or asset file
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a manifest or asset description
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// No animation with this name exists in the catalog
    #[error("Animation '{0}' not found")]
    NotFound(String),

    /// The animation exists but its playable form cannot be built
    #[error("Can't decode animation '{name}': {message}")]
    Decode { name: String, message: String },

    /// The manifest itself is structurally invalid
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

impl CatalogError {
    pub(crate) fn decode(name: &str, message: impl Into<String>) -> Self {
        CatalogError::Decode {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
