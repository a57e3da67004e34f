//! Settings loader describing static URLs, storage and named webpack configurations.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::error::{AssetError, Result};

const DEFAULT_CONFIG_FILE: &str = "webpack_loader.json";

/// Configuration name used when callers do not pick one.
pub const DEFAULT_CONFIG_NAME: &str = "DEFAULT";

/// Loader class used when a configuration does not name one.
pub const DEFAULT_LOADER_CLASS: &str = "webpack_assets.loader.WebpackLoader";

/// Framework-wide settings consumed by the asset helpers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Settings {
  /// Development mode; disables loader caching unless a configuration overrides it.
  pub debug: bool,
  /// URL prefix static files are served from.
  pub static_url: String,
  /// Name of the storage used to turn chunk paths into URLs.
  pub staticfiles_storage: String,
  /// Named loader configurations.
  pub webpack_loader: BTreeMap<String, LoaderConfig>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      debug: false,
      static_url: "/static/".into(),
      staticfiles_storage: "static".into(),
      webpack_loader: BTreeMap::from([(DEFAULT_CONFIG_NAME.to_string(), LoaderConfig::default())]),
    }
  }
}

impl Settings {
  /// Attempt to load settings from the provided directory.
  ///
  /// A missing, unreadable or malformed file yields the defaults and is reported through
  /// `tracing`.
  pub fn discover(dir: &Path) -> Self {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    Self::from_path(&candidate).unwrap_or_else(|err| {
      tracing::warn!(
        path = %candidate.display(),
        error = %err,
        "falling back to default webpack settings"
      );
      Self::default()
    })
  }

  /// Read settings from a specific JSON file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| AssetError::ConfigIo {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| AssetError::ConfigParse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Resolve a named loader configuration, merged with defaults and with its ignore
  /// patterns compiled.
  pub fn load_config(&self, name: &str) -> Result<LoaderConfig> {
    let mut config = self
      .webpack_loader
      .get(name)
      .cloned()
      .ok_or_else(|| AssetError::ConfigNotFound {
        name: name.to_string(),
      })?;

    config.cache.get_or_insert(!self.debug);
    config.ignores = config
      .ignore
      .iter()
      .map(|pattern| {
        Regex::new(&format!("^(?:{pattern})")).map_err(|source| AssetError::IgnorePattern {
          config: name.to_string(),
          pattern: pattern.clone(),
          source,
        })
      })
      .collect::<Result<_>>()?;

    Ok(config)
  }
}

/// One named webpack build configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct LoaderConfig {
  /// Whether loaders may cache the parsed manifest. Unset means "not in debug mode".
  pub cache: Option<bool>,
  /// Directory, relative to the static root, that bundles are emitted into.
  pub bundle_dir_name: String,
  /// Path of the webpack stats file describing the build.
  pub stats_file: PathBuf,
  /// Seconds between polls while webpack is still compiling.
  pub poll_interval: f64,
  /// Seconds to wait for compilation before giving up; `None` waits forever.
  pub timeout: Option<f64>,
  /// Regular expressions matched against the start of chunk names to skip.
  pub ignore: Vec<String>,
  /// Dotted path of the loader class to instantiate.
  pub loader_class: String,
  #[serde(skip)]
  ignores: Vec<Regex>,
}

impl Default for LoaderConfig {
  fn default() -> Self {
    Self {
      cache: None,
      bundle_dir_name: "webpack_bundles/".into(),
      stats_file: PathBuf::from("webpack-stats.json"),
      poll_interval: 0.1,
      timeout: None,
      ignore: vec![r".+\.hot-update.js".into(), r".+\.map".into()],
      loader_class: DEFAULT_LOADER_CLASS.into(),
      ignores: Vec::new(),
    }
  }
}

impl LoaderConfig {
  /// Whether the loader should cache manifest contents.
  pub fn cache_enabled(&self) -> bool {
    self.cache.unwrap_or(false)
  }

  /// Poll interval as a [`Duration`]; invalid values collapse to zero.
  pub fn poll_duration(&self) -> Duration {
    Duration::try_from_secs_f64(self.poll_interval).unwrap_or_default()
  }

  /// Compilation timeout as a [`Duration`], if one is configured and valid.
  pub fn timeout_duration(&self) -> Option<Duration> {
    self
      .timeout
      .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
  }

  /// Returns `true` when the chunk name matches one of the compiled `IGNORE` patterns.
  ///
  /// Patterns are only compiled by [`Settings::load_config`]; a configuration built any other
  /// way ignores nothing.
  pub fn is_ignored(&self, chunk_name: &str) -> bool {
    self
      .ignores
      .iter()
      .any(|pattern| pattern.is_match(chunk_name))
  }
}

#[cfg(test)]
mod tests {
  use std::io;
  use std::sync::{Arc, Mutex};

  use super::*;
  use tempfile::tempdir;

  #[test]
  fn defaults_define_a_single_default_configuration() {
    let settings = Settings::default();
    assert_eq!(settings.static_url, "/static/");
    assert_eq!(settings.staticfiles_storage, "static");
    assert_eq!(
      settings.webpack_loader.keys().collect::<Vec<_>>(),
      vec![DEFAULT_CONFIG_NAME]
    );
  }

  #[test]
  fn named_configurations_are_merged_with_defaults() {
    let settings: Settings = serde_json::from_str(
      r#"{
        "STATIC_URL": "/assets/",
        "WEBPACK_LOADER": {
          "DEFAULT": {"BUNDLE_DIR_NAME": "bundles/"},
          "ADMIN": {"LOADER_CLASS": "admin.loaders.Stats", "TIMEOUT": 2.5}
        }
      }"#,
    )
    .unwrap();

    let default = settings.load_config("DEFAULT").unwrap();
    assert_eq!(default.bundle_dir_name, "bundles/");
    assert_eq!(default.stats_file, PathBuf::from("webpack-stats.json"));
    assert_eq!(default.loader_class, DEFAULT_LOADER_CLASS);

    let admin = settings.load_config("ADMIN").unwrap();
    assert_eq!(admin.loader_class, "admin.loaders.Stats");
    assert_eq!(admin.bundle_dir_name, "webpack_bundles/");
    assert_eq!(admin.timeout_duration(), Some(Duration::from_millis(2500)));
    assert_eq!(admin.poll_duration(), Duration::from_millis(100));
  }

  #[test]
  fn missing_configuration_is_reported() {
    let err = Settings::default().load_config("MISSING").unwrap_err();
    assert!(matches!(err, AssetError::ConfigNotFound { name } if name == "MISSING"));
  }

  #[test]
  fn cache_follows_debug_unless_overridden() {
    let mut settings = Settings::default();
    assert!(settings.load_config("DEFAULT").unwrap().cache_enabled());

    settings.debug = true;
    assert!(!settings.load_config("DEFAULT").unwrap().cache_enabled());

    settings
      .webpack_loader
      .get_mut("DEFAULT")
      .unwrap()
      .cache = Some(true);
    assert!(settings.load_config("DEFAULT").unwrap().cache_enabled());
  }

  #[test]
  fn default_ignore_patterns_skip_hot_updates_and_source_maps() {
    let config = Settings::default().load_config("DEFAULT").unwrap();
    assert!(config.is_ignored("main.1a2b.hot-update.js"));
    assert!(config.is_ignored("main.js.map"));
    assert!(!config.is_ignored("main.js"));
    assert!(!LoaderConfig::default().is_ignored("main.js.map"));
  }

  #[test]
  fn invalid_ignore_pattern_is_a_configuration_error() {
    let mut settings = Settings::default();
    settings
      .webpack_loader
      .get_mut("DEFAULT")
      .unwrap()
      .ignore = vec!["(".into()];

    let err = settings.load_config("DEFAULT").unwrap_err();
    assert!(matches!(err, AssetError::IgnorePattern { pattern, .. } if pattern == "("));
  }

  #[derive(Clone, Default)]
  struct CapturedLog(Arc<Mutex<Vec<u8>>>);

  impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
      self.0.lock().unwrap().extend_from_slice(buf);
      Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
      Ok(())
    }
  }

  fn discover_with_log(dir: &Path) -> (Settings, String) {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
      .with_writer(move || writer.clone())
      .with_ansi(false)
      .finish();

    let settings = tracing::subscriber::with_default(subscriber, || Settings::discover(dir));
    let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
    (settings, output)
  }

  #[test]
  fn discover_warns_when_settings_file_is_missing() {
    let dir = tempdir().unwrap();
    let (settings, log) = discover_with_log(dir.path());

    assert_eq!(settings.static_url, "/static/");
    assert!(log.contains("WARN"));
    assert!(log.contains("falling back to default webpack settings"));
    assert!(log.contains(DEFAULT_CONFIG_FILE));
  }

  #[test]
  fn discover_warns_when_settings_file_is_malformed() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "not json").unwrap();
    let (settings, log) = discover_with_log(dir.path());

    assert_eq!(settings.static_url, "/static/");
    assert!(log.contains("WARN"));
    assert!(log.contains("failed to parse"));
  }

  #[test]
  fn from_path_reads_settings_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(DEFAULT_CONFIG_FILE);
    fs::write(&path, r#"{"STATIC_URL": "/s/", "DEBUG": true}"#).unwrap();

    let settings = Settings::from_path(&path).unwrap();
    assert_eq!(settings.static_url, "/s/");
    assert!(settings.debug);
    assert!(settings.webpack_loader.contains_key(DEFAULT_CONFIG_NAME));
  }

  #[test]
  fn from_path_reports_parse_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(DEFAULT_CONFIG_FILE);
    fs::write(&path, "{").unwrap();

    let err = Settings::from_path(&path).unwrap_err();
    assert!(matches!(err, AssetError::ConfigParse { .. }));
  }
}
