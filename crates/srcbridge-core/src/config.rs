//! Persistent configuration for srcbridge.
//!
//! Loads/saves a TOML config at `~/.srcbridge/config.toml`.

use crate::BridgeError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Indexing configuration: which files to admit, which directories to skip,
/// and how many extraction workers to run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Extensions counted as source files (compared lower-case, no dot).
    pub source_extensions: Vec<String>,
    /// Extensions counted as header files.
    pub header_extensions: Vec<String>,
    /// Directory names skipped during the walk. Hidden directories are
    /// always skipped in addition to these.
    pub excluded_dirs: Vec<String>,
    /// Extraction worker count. 0 means one per available CPU.
    pub workers: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            source_extensions: strings(&["c", "cpp", "cc", "cxx"]),
            header_extensions: strings(&["h", "hpp", "hh", "hxx"]),
            excluded_dirs: strings(&[
                ".git",
                ".svn",
                ".hg",
                "build",
                "cmake-build-debug",
                "cmake-build-release",
                "out",
                "target",
                "node_modules",
                "vendor",
                "third_party",
                "external",
            ]),
            workers: 0,
        }
    }
}

impl IndexConfig {
    /// Load configuration from the given path.
    pub fn load(path: &Path) -> Result<Self, BridgeError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| BridgeError::Config(e.to_string()))
    }

    /// Save configuration to the given path.
    pub fn save(&self, path: &Path) -> Result<(), BridgeError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| BridgeError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from the default path, or return defaults if the file doesn't exist.
    pub fn load_or_default() -> Self {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Default config path: `~/.srcbridge/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".srcbridge")
            .join("config.toml")
    }

    /// True if the extension (lower-case, no dot) is admitted at all.
    pub fn admits_extension(&self, ext: &str) -> bool {
        self.source_extensions.iter().any(|e| e == ext)
            || self.header_extensions.iter().any(|e| e == ext)
    }

    /// Effective worker count.
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
