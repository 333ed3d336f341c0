//! Content loaders for reading game data from files.
//!
//! This module converts RON/TOML files into the tables and configuration the
//! runtime consumes.

pub mod config;
pub mod content;
pub mod factory;

pub use config::ConfigLoader;
pub use content::{ContentCatalog, ContentLoader};
pub use factory::ContentFactory;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
