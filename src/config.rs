//! Krypt Vault - Configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{VaultError, VaultResult};
use crate::paths::VaultPaths;
use crate::thumbs::DEFAULT_THUMB_SIZE;

/// Name of the config file inside a vault root
pub const CONFIG_FILE: &str = "krypt.json";

/// Vault configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Private vault directory (`files/`, `thumbs/`)
    pub vault_dir: PathBuf,
    /// Plaintext thumbnail cache
    pub thumbs_cache_dir: PathBuf,
    /// Where decrypted files are written
    pub decrypted_dir: PathBuf,
    /// SQLite index database
    pub index_db: PathBuf,
    /// Backup archives, one subdirectory per account
    pub backup_dir: PathBuf,
    /// Thumbnail edge length in pixels
    pub thumb_size: u32,
    /// Version that wrote the file
    pub version: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self::for_root(Path::new("krypt"))
    }
}

impl VaultConfig {
    /// Standard layout below a single root directory
    pub fn for_root(root: &Path) -> Self {
        Self {
            vault_dir: root.join("vault"),
            thumbs_cache_dir: root.join("cache").join("thumbs"),
            decrypted_dir: root.join("Krypt"),
            index_db: root.join("db").join("index.db"),
            backup_dir: root.join("backups"),
            thumb_size: DEFAULT_THUMB_SIZE,
            version: crate::VERSION.into(),
        }
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> VaultResult<Self> {
        let data = fs::read(path)
            .map_err(|e| VaultError::ConfigError(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_slice(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `<root>/krypt.json`, or the standard layout if it does not exist
    pub fn load_or_default(root: &Path) -> VaultResult<Self> {
        let path = root.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::for_root(root))
        }
    }

    /// Save as pretty JSON
    pub fn save(&self, path: &Path) -> VaultResult<()> {
        self.validate()?;
        let json = serde_json::to_vec_pretty(self)?;
        crate::secure_fs::write_atomic(path, &json)
    }

    fn validate(&self) -> VaultResult<()> {
        if self.thumb_size == 0 {
            return Err(VaultError::ConfigError("thumb_size must be positive".into()));
        }
        if self.vault_dir.as_os_str().is_empty() {
            return Err(VaultError::ConfigError("vault_dir is empty".into()));
        }
        Ok(())
    }

    pub fn paths(&self) -> VaultPaths {
        VaultPaths::new(&self.vault_dir, &self.thumbs_cache_dir, &self.decrypted_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let mut config = VaultConfig::for_root(dir.path());
        config.thumb_size = 128;

        let path = dir.path().join(CONFIG_FILE);
        config.save(&path).unwrap();

        assert_eq!(VaultConfig::load(&path).unwrap(), config);
        assert_eq!(VaultConfig::load_or_default(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, br#"{"thumb_size": 64}"#).unwrap();

        let config = VaultConfig::load(&path).unwrap();
        assert_eq!(config.thumb_size, 64);
        assert_eq!(config.vault_dir, PathBuf::from("krypt/vault"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, br#"{"thumb_size": 0}"#).unwrap();
        assert!(matches!(VaultConfig::load(&path), Err(VaultError::ConfigError(_))));

        fs::write(&path, b"not json").unwrap();
        assert!(matches!(
            VaultConfig::load(&path),
            Err(VaultError::SerializationError(_))
        ));

        assert!(VaultConfig::load(&dir.path().join("absent.json")).is_err());
    }
}
