//! Error type shared by configuration loading, loader resolution and formatting.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving webpack bundles.
#[derive(Debug, Error)]
pub enum AssetError {
  /// The `LOADER_CLASS` path could not be resolved to a registered loader factory.
  #[error("{path} doesn't look like a valid module path")]
  Import {
    /// Dotted class path taken from the configuration.
    path: String,
  },

  /// No loader configuration is defined under the requested name.
  #[error("no webpack loader configuration named '{name}'")]
  ConfigNotFound {
    /// Requested configuration name.
    name: String,
  },

  /// Failed to read the settings file from disk.
  #[error("failed to read {}: {source}", .path.display())]
  ConfigIo {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },

  /// Failed to parse the JSON settings file.
  #[error("failed to parse {}: {source}", .path.display())]
  ConfigParse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },

  /// An `IGNORE` entry is not a valid regular expression.
  #[error("invalid IGNORE pattern '{pattern}' in configuration '{config}': {source}")]
  IgnorePattern {
    /// Configuration the pattern belongs to.
    config: String,
    /// Offending pattern.
    pattern: String,
    /// Source regex error.
    source: regex::Error,
  },

  /// `STATICFILES_STORAGE` names a storage this crate does not provide.
  #[error("unknown static files storage '{name}'")]
  UnknownStorage {
    /// Storage name taken from the settings.
    name: String,
  },

  /// The process-wide registry was used before [`crate::global::install`].
  #[error("no webpack asset registry has been installed")]
  NotInstalled,

  /// Error raised by a loader implementation.
  #[error(transparent)]
  Loader(#[from] anyhow::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, AssetError>;
