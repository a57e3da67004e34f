//! Records exchanged with bundle loaders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One file entry within a bundle manifest.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Chunk {
  /// File name of the chunk, used for extension matching.
  pub name: String,
  /// Relative or absolute path the chunk is served from.
  pub url: String,
  /// Remaining manifest fields, preserved verbatim.
  #[serde(flatten)]
  pub extra: BTreeMap<String, Value>,
}

impl Chunk {
  /// Create a chunk carrying only a name and URL.
  pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      url: url.into(),
      extra: BTreeMap::new(),
    }
  }
}

/// Ordered chunks making up a named bundle.
pub type Bundle = Vec<Chunk>;

/// Asset-level information reported by a loader.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Assets {
  /// Public path prefix configured in the webpack build, if any.
  #[serde(rename = "publicPath", default, skip_serializing_if = "Option::is_none")]
  pub public_path: Option<String>,
  /// Remaining manifest fields, preserved verbatim.
  #[serde(flatten)]
  pub extra: BTreeMap<String, Value>,
}
