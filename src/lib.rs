#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod config;
pub mod error;
pub mod global;
pub mod loader;
pub mod models;
pub mod registry;
pub mod storage;
pub mod tags;

pub use config::{DEFAULT_CONFIG_NAME, LoaderConfig, Settings};
pub use error::{AssetError, Result};
pub use loader::{BundleLoader, LoaderClasses, LoaderFactory};
pub use models::{Assets, Bundle, Chunk};
pub use registry::WebpackAssets;
pub use storage::{StaticFilesStorage, Storage};
