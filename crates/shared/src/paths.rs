//! File path utilities for the data directory.

use std::path::{Path, PathBuf};

/// Path manager for everything under the data directory
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Create a new DataPaths with the given root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the vault database path
    pub fn vault_db(&self) -> PathBuf {
        self.root.join("vault.db")
    }

    /// Get the logs directory
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Create all necessary directories
    pub fn create_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let paths = DataPaths::new("/data");

        assert_eq!(paths.vault_db(), PathBuf::from("/data/vault.db"));
        assert_eq!(paths.logs_dir(), PathBuf::from("/data/logs"));
    }

    #[test]
    fn test_create_dirs() -> std::io::Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let paths = DataPaths::new(temp_dir.path().join("data"));

        paths.create_dirs()?;

        assert!(paths.root().exists());
        assert!(paths.logs_dir().exists());

        Ok(())
    }
}
