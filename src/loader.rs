//! Loader trait and the table of loader classes that configurations refer to by name.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::config::LoaderConfig;
use crate::error::{AssetError, Result};
use crate::models::{Assets, Bundle};

/// Reads a webpack build manifest and answers bundle queries for one configuration.
pub trait BundleLoader: Send + Sync {
  /// Ordered chunks making up the named bundle.
  fn get_bundle(&self, bundle_name: &str) -> anyhow::Result<Bundle>;

  /// Asset-level information such as the build's public path.
  fn get_assets(&self) -> anyhow::Result<Assets>;
}

/// Constructor invoked with `(config_name, config)` the first time a configuration is used.
pub type LoaderFactory =
  Arc<dyn Fn(&str, &LoaderConfig) -> anyhow::Result<Arc<dyn BundleLoader>> + Send + Sync>;

/// Loader classes addressable by the dotted path used in `LOADER_CLASS`.
#[derive(Clone, Default)]
pub struct LoaderClasses {
  factories: BTreeMap<String, LoaderFactory>,
}

impl LoaderClasses {
  /// Create an empty class table.
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a loader constructor under a dotted class path, replacing any previous entry.
  pub fn register<F>(mut self, dotted_path: impl Into<String>, factory: F) -> Self
  where
    F: Fn(&str, &LoaderConfig) -> anyhow::Result<Arc<dyn BundleLoader>> + Send + Sync + 'static,
  {
    self.factories.insert(dotted_path.into(), Arc::new(factory));
    self
  }

  /// Look up the constructor for a dotted class path.
  ///
  /// Paths without a module and class part, and paths nothing was registered under, fail
  /// with the same import error.
  pub fn resolve(&self, dotted_path: &str) -> Result<&LoaderFactory> {
    let import_error = || AssetError::Import {
      path: dotted_path.to_string(),
    };

    match dotted_path.rsplit_once('.') {
      Some((module, class)) if !module.is_empty() && !class.is_empty() => {}
      _ => return Err(import_error()),
    }

    self.factories.get(dotted_path).ok_or_else(import_error)
  }

  /// Registered class paths in sorted order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.factories.keys().map(String::as_str)
  }
}

impl fmt::Debug for LoaderClasses {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.names()).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Empty;

  impl BundleLoader for Empty {
    fn get_bundle(&self, _bundle_name: &str) -> anyhow::Result<Bundle> {
      Ok(Vec::new())
    }

    fn get_assets(&self) -> anyhow::Result<Assets> {
      Ok(Assets::default())
    }
  }

  fn classes() -> LoaderClasses {
    LoaderClasses::new().register("app.loaders.Empty", |_, _| {
      Ok(Arc::new(Empty) as Arc<dyn BundleLoader>)
    })
  }

  #[test]
  fn resolves_registered_class() {
    let classes = classes();
    let factory = classes.resolve("app.loaders.Empty").unwrap();
    let loader = factory("DEFAULT", &LoaderConfig::default()).unwrap();
    assert!(loader.get_bundle("main").unwrap().is_empty());
  }

  #[test]
  fn rejects_paths_without_a_class_part() {
    let classes = classes();
    for path in ["Empty", "app.", ".Empty", ""] {
      let err = classes.resolve(path).err().unwrap();
      assert_eq!(
        err.to_string(),
        format!("{path} doesn't look like a valid module path")
      );
    }
  }

  #[test]
  fn rejects_unregistered_class() {
    let err = classes().resolve("app.loaders.Missing").err().unwrap();
    assert!(matches!(err, AssetError::Import { path } if path == "app.loaders.Missing"));
  }

  #[test]
  fn debug_lists_registered_names() {
    assert_eq!(format!("{:?}", classes()), r#"["app.loaders.Empty"]"#);
  }
}
