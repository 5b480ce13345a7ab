//! Path management for findash
//!
//! Resolves where the registry and category files live.
//!
//! ## Path Resolution Order
//!
//! 1. `FINDASH_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/findash` or `~/.config/findash`
//! 3. Windows: `%APPDATA%\findash`

use std::path::PathBuf;

use crate::error::{FindashError, FindashResult};

/// Manages all paths used by findash
#[derive(Debug, Clone)]
pub struct FindashPaths {
    base_dir: PathBuf,
}

impl FindashPaths {
    /// Create a new FindashPaths instance using the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> FindashResult<Self> {
        let base_dir = if let Ok(custom) = std::env::var("FINDASH_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create FindashPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the budget registry file
    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    /// Get the path to the expense category store
    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    /// Get the path to the income category store
    pub fn income_categories_file(&self) -> PathBuf {
        self.data_dir().join("income_categories.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> FindashResult<()> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FindashError::Io(format!("Failed to create base directory: {}", e)))?;
        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| FindashError::Io(format!("Failed to create data directory: {}", e)))?;
        Ok(())
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> FindashResult<PathBuf> {
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| {
            std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .map_err(|_| {
                    FindashError::Io("Could not determine home directory".into())
                })
        })?;
    Ok(config_base.join("findash"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> FindashResult<PathBuf> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| FindashError::Io("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("findash"))
}
