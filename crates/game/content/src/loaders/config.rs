//! Tuning configuration loader.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::loaders::{LoadResult, read_file};

/// Loader for configuration structs stored as TOML.
///
/// Generic over the target type so the runtime can load its own
/// configuration without this crate depending on it.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a configuration value from a TOML file.
    pub fn load<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} (in {})", e, path.display()))
    }

    /// Parse a configuration value from TOML text.
    pub fn parse<T: DeserializeOwned>(content: &str) -> LoadResult<T> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}
