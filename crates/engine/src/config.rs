//! Engine configuration via `arbor.toml`
//!
//! On first open a default `arbor.toml` is written to the data directory.
//! To change settings, edit the file and restart.

use arbor_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name placed in the database data directory.
pub const CONFIG_FILE_NAME: &str = "arbor.toml";

/// Engine configuration loaded from `arbor.toml`.
///
/// # Example
///
/// ```toml
/// pool_capacity = 64
/// pool_warmup = 0
/// parallel_sort_threshold = 4096
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of idle node handles kept by the handle pool.
    #[serde(default = "default_pool_capacity")]
    pub pool_capacity: usize,
    /// Handles pre-allocated when the pool is created.
    #[serde(default)]
    pub pool_warmup: usize,
    /// Node sets at least this large are sorted on the rayon pool.
    #[serde(default = "default_parallel_sort_threshold")]
    pub parallel_sort_threshold: usize,
}

fn default_pool_capacity() -> usize {
    64
}

fn default_parallel_sort_threshold() -> usize {
    4096
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pool_capacity: default_pool_capacity(),
            pool_warmup: 0,
            parallel_sort_threshold: default_parallel_sort_threshold(),
        }
    }
}

impl EngineConfig {
    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the warmup exceeds the pool capacity or
    /// the sort threshold is zero.
    pub fn validate(&self) -> Result<()> {
        if self.pool_warmup > self.pool_capacity {
            return Err(Error::config(format!(
                "pool_warmup ({}) exceeds pool_capacity ({}) in {}",
                self.pool_warmup, self.pool_capacity, CONFIG_FILE_NAME
            )));
        }
        if self.parallel_sort_threshold == 0 {
            return Err(Error::config(format!(
                "parallel_sort_threshold must be positive in {}",
                CONFIG_FILE_NAME
            )));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# arbordb engine configuration
#
# Idle node handles kept for reuse by query evaluation (default: 64)
pool_capacity = 64

# Handles allocated up front when the engine starts (default: 0)
pool_warmup = 0

# Node sets with at least this many nodes are sorted in parallel (default: 4096)
parallel_sort_threshold = 4096
"#
    }

    /// Parse and validate config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text cannot be parsed or is invalid.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Load `arbor.toml` from a data directory, creating it if missing.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        Self::write_default_if_missing(&path)?;
        Self::from_file(&path)
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
