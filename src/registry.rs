//! Cached loader registry and the bundle formatting helpers built on it.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::OnceCell;

use crate::asset_paths::{chunk_file_name, filter_by_extension};
use crate::config::Settings;
use crate::error::{AssetError, Result};
use crate::loader::{BundleLoader, LoaderClasses};
use crate::models::{Bundle, Chunk};
use crate::storage::{Storage, storage_from_settings};
use crate::tags::TagKind;

/// Owns one loader per configuration name and formats their bundles.
///
/// Loaders are built on first use from the named configuration and kept for the lifetime of
/// the registry. Each name owns its own slot: concurrent first access never produces two
/// loaders for one name, and a loader factory may ask the registry for another name's loader.
pub struct WebpackAssets {
  settings: Settings,
  classes: LoaderClasses,
  storage: Arc<dyn Storage>,
  loaders: Mutex<HashMap<String, LoaderSlot>>,
}

type LoaderSlot = Arc<OnceCell<Arc<dyn BundleLoader>>>;

impl WebpackAssets {
  /// Create a registry using the storage named by `STATICFILES_STORAGE`.
  pub fn new(settings: Settings, classes: LoaderClasses) -> Result<Self> {
    let storage = storage_from_settings(&settings)?;
    Ok(Self::with_storage(settings, classes, storage))
  }

  /// Create a registry with an explicit storage backend.
  pub fn with_storage(
    settings: Settings,
    classes: LoaderClasses,
    storage: Arc<dyn Storage>,
  ) -> Self {
    Self {
      settings,
      classes,
      storage,
      loaders: Mutex::new(HashMap::new()),
    }
  }

  /// Settings the registry was built from.
  pub fn settings(&self) -> &Settings {
    &self.settings
  }

  /// Return the loader for a configuration, constructing and caching it on first request.
  pub fn get_loader(&self, config_name: &str) -> Result<Arc<dyn BundleLoader>> {
    let slot = self.slot(config_name);

    if let Some(loader) = slot.get() {
      tracing::trace!(config = config_name, "reusing cached webpack loader");
      return Ok(Arc::clone(loader));
    }

    // The map lock is released here; only callers for this name wait on the slot.
    let loader = slot.get_or_try_init(|| {
      let config = self.settings.load_config(config_name)?;
      let factory = self.classes.resolve(&config.loader_class)?;
      let loader = factory(config_name, &config)?;
      tracing::debug!(
        config = config_name,
        loader_class = %config.loader_class,
        "constructed webpack loader"
      );
      Ok::<_, AssetError>(loader)
    })?;

    Ok(Arc::clone(loader))
  }

  fn slot(&self, config_name: &str) -> LoaderSlot {
    let mut loaders = self
      .loaders
      .lock()
      .unwrap_or_else(PoisonError::into_inner);
    Arc::clone(loaders.entry(config_name.to_string()).or_default())
  }

  fn bundle(
    &self,
    bundle_name: &str,
    extension: Option<&str>,
    config_name: &str,
  ) -> Result<Box<dyn Iterator<Item = Chunk>>> {
    let bundle: Bundle = self.get_loader(config_name)?.get_bundle(bundle_name)?;
    Ok(match extension.filter(|extension| !extension.is_empty()) {
      Some(extension) => Box::new(filter_by_extension(bundle, extension)),
      None => Box::new(bundle.into_iter()),
    })
  }

  /// Chunks of the named bundle, optionally narrowed to one extension such as `js` or `css`.
  pub fn get_files(
    &self,
    bundle_name: &str,
    extension: Option<&str>,
    config_name: &str,
  ) -> Result<Vec<Chunk>> {
    Ok(self.bundle(bundle_name, extension, config_name)?.collect())
  }

  /// `<script>` and `<link>` tags for the named bundle, in bundle order.
  ///
  /// Each chunk URL is reduced to its file name and resolved through the storage. `attrs` is
  /// spliced into every tag without escaping. Chunks that are neither JavaScript nor CSS
  /// produce no tag.
  pub fn get_as_tags(
    &self,
    bundle_name: &str,
    extension: Option<&str>,
    config_name: &str,
    attrs: &str,
  ) -> Result<Vec<String>> {
    let tags: Vec<String> = self
      .bundle(bundle_name, extension, config_name)?
      .filter_map(|chunk| {
        let kind = TagKind::for_chunk_name(&chunk.name)?;
        let url = self.storage.url(chunk_file_name(&chunk.url));
        Some(kind.render(&url, attrs))
      })
      .collect();

    tracing::trace!(bundle = bundle_name, count = tags.len(), "rendered bundle tags");
    Ok(tags)
  }

  /// Public URL of a webpack asset: the build's `publicPath`, or `STATIC_URL`, followed by
  /// `asset_name`. The asset is not checked against the manifest.
  pub fn get_static(&self, asset_name: &str, config_name: &str) -> Result<String> {
    let assets = self.get_loader(config_name)?.get_assets()?;
    let prefix = assets
      .public_path
      .as_deref()
      .unwrap_or(&self.settings.static_url);
    Ok(format!("{prefix}{asset_name}"))
  }
}

impl fmt::Debug for WebpackAssets {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut cached: Vec<String> = self
      .loaders
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .iter()
      .filter(|(_, slot)| slot.get().is_some())
      .map(|(name, _)| name.clone())
      .collect();
    cached.sort();
    f.debug_struct("WebpackAssets")
      .field("settings", &self.settings)
      .field("classes", &self.classes)
      .field("cached_loaders", &cached)
      .finish_non_exhaustive()
  }
}
