//! Storage backends turning chunk paths into public URLs.

use std::sync::Arc;

use crate::asset_paths::is_absolute_url;
use crate::config::Settings;
use crate::error::{AssetError, Result};

/// Resolves a stored file path into the URL it is served from.
pub trait Storage: Send + Sync {
  /// Public URL for the given path.
  fn url(&self, path: &str) -> String;
}

/// Storage serving files beneath a fixed base URL, such as `STATIC_URL`.
#[derive(Debug, Clone)]
pub struct StaticFilesStorage {
  base_url: String,
}

impl StaticFilesStorage {
  /// Create a storage rooted at `base_url`; a trailing `/` is added when missing.
  pub fn new(base_url: impl Into<String>) -> Self {
    let mut base_url = base_url.into();
    if !base_url.ends_with('/') {
      base_url.push('/');
    }
    Self { base_url }
  }

  /// Base URL every relative path is joined onto.
  pub fn base_url(&self) -> &str {
    &self.base_url
  }
}

impl Storage for StaticFilesStorage {
  fn url(&self, path: &str) -> String {
    if is_absolute_url(path) {
      return path.to_string();
    }
    format!("{}{}", self.base_url, path.trim_start_matches('/'))
  }
}

/// Build the storage named by `STATICFILES_STORAGE`.
///
/// Dotted class paths are matched on their last segment, so
/// `django.contrib.staticfiles.storage.StaticFilesStorage` selects the static storage.
pub fn storage_from_settings(settings: &Settings) -> Result<Arc<dyn Storage>> {
  let name = settings.staticfiles_storage.as_str();
  let class = name.rsplit_once('.').map_or(name, |(_, class)| class);
  match class {
    "static" | "StaticFilesStorage" => Ok(Arc::new(StaticFilesStorage::new(
      settings.static_url.clone(),
    ))),
    _ => Err(AssetError::UnknownStorage {
      name: name.to_string(),
    }),
  }
}
