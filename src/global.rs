//! Process-wide registry and free-function helpers delegating to it.

use std::sync::{Arc, OnceLock};

use crate::error::{AssetError, Result};
use crate::loader::BundleLoader;
use crate::models::Chunk;
use crate::registry::WebpackAssets;

static REGISTRY: OnceLock<WebpackAssets> = OnceLock::new();

/// Install the registry used by the free functions in this module.
///
/// Only the first call succeeds; later calls hand their registry back unchanged.
pub fn install(assets: WebpackAssets) -> std::result::Result<(), WebpackAssets> {
  REGISTRY.set(assets)
}

/// The installed registry, if any.
pub fn installed() -> Option<&'static WebpackAssets> {
  REGISTRY.get()
}

fn registry() -> Result<&'static WebpackAssets> {
  installed().ok_or(AssetError::NotInstalled)
}

/// See [`WebpackAssets::get_loader`].
pub fn get_loader(config_name: &str) -> Result<Arc<dyn BundleLoader>> {
  registry()?.get_loader(config_name)
}

/// See [`WebpackAssets::get_files`].
pub fn get_files(
  bundle_name: &str,
  extension: Option<&str>,
  config_name: &str,
) -> Result<Vec<Chunk>> {
  registry()?.get_files(bundle_name, extension, config_name)
}

/// See [`WebpackAssets::get_as_tags`].
pub fn get_as_tags(
  bundle_name: &str,
  extension: Option<&str>,
  config_name: &str,
  attrs: &str,
) -> Result<Vec<String>> {
  registry()?.get_as_tags(bundle_name, extension, config_name, attrs)
}

/// See [`WebpackAssets::get_static`].
pub fn get_static(asset_name: &str, config_name: &str) -> Result<String> {
  registry()?.get_static(asset_name, config_name)
}
