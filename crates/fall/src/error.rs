//! # World Error Types
//!
//! Recoverable failures of the world crate. Broken invariants (a missing
//! component, a stale pool index) are not listed here: they panic.

use std::path::PathBuf;

use fall_procedural::ChunkError;
use thiserror::Error;

/// Errors that can occur while setting up or configuring a world.
#[derive(Error, Debug)]
pub enum FallError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`crate::WorldConfig`].
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A config value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No item is registered under this name.
    #[error("item not found: {0}")]
    UnknownItem(String),

    /// The chunk generator rejected its settings.
    #[error(transparent)]
    Chunk(#[from] ChunkError),
}

/// Result type for world operations.
pub type FallResult<T> = Result<T, FallError>;
