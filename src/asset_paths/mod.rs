//! Helpers for narrowing bundles and normalising chunk paths.
//!
//! Filtering and path handling are split into focused submodules so they can be tested
//! without a loader.

mod bundle;
mod filters;

pub use bundle::chunk_file_name;
pub use filters::{filter_by_extension, is_absolute_url};
