//! Krypt Vault - Account & Platform Collaborators
//!
//! The core never owns the account, the key, the platform media index or the
//! backup store. It talks to them through the traits below.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use walkdir::WalkDir;

use crate::crypto::VaultKey;
use crate::error::{VaultError, VaultResult};

// ═══════════════════════════════════════════════════════════════════════════
// ACCOUNT
// ═══════════════════════════════════════════════════════════════════════════

/// Current symmetric key of the active account; `None` when locked/logged out
pub trait UserKeyProvider: Send + Sync {
    fn get_key(&self) -> Option<VaultKey>;
}

/// Name of the active account; `None` when nobody is logged in
pub trait UsernameProvider: Send + Sync {
    fn get_username(&self) -> Option<String>;
}

/// Both halves of the active session.
///
/// Implementors must answer from current state on every call; callers never
/// cache the values.
pub trait AccountContext: UserKeyProvider + UsernameProvider {}

impl<T: UserKeyProvider + UsernameProvider> AccountContext for T {}

/// In-process account holding a name and key until locked
pub struct StaticAccount {
    session: RwLock<Option<(String, VaultKey)>>,
}

impl StaticAccount {
    /// Create an unlocked account
    pub fn new(name: impl Into<String>, key: VaultKey) -> Self {
        Self {
            session: RwLock::new(Some((name.into(), key))),
        }
    }

    /// Create an account with nobody logged in
    pub fn logged_out() -> Self {
        Self {
            session: RwLock::new(None),
        }
    }

    /// Switch to another account
    pub fn login(&self, name: impl Into<String>, key: VaultKey) {
        *self.session.write() = Some((name.into(), key));
    }

    /// Forget name and key
    pub fn logout(&self) {
        *self.session.write() = None;
    }
}

impl UserKeyProvider for StaticAccount {
    fn get_key(&self) -> Option<VaultKey> {
        self.session.read().as_ref().map(|(_, key)| key.clone())
    }
}

impl UsernameProvider for StaticAccount {
    fn get_username(&self) -> Option<String> {
        self.session.read().as_ref().map(|(name, _)| name.clone())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// MEDIA STORE
// ═══════════════════════════════════════════════════════════════════════════

/// Platform media index notifications. Failures never fail a workflow.
pub trait MediaStore: Send + Sync {
    /// Make freshly decrypted files visible to the gallery
    fn scan_added_media(&self, paths: &[PathBuf]) -> VaultResult<()>;

    /// Remove originals from external storage and from the media index
    fn delete_files_from_external_storage_and_media_store(
        &self,
        paths: &[PathBuf],
    ) -> VaultResult<()>;
}

/// Desktop stand-in: there is no media index to notify, deletions hit the disk
#[derive(Debug, Default)]
pub struct LocalMediaStore;

impl MediaStore for LocalMediaStore {
    fn scan_added_media(&self, paths: &[PathBuf]) -> VaultResult<()> {
        for path in paths {
            log::info!("media available: {}", path.display());
        }
        Ok(())
    }

    fn delete_files_from_external_storage_and_media_store(
        &self,
        paths: &[PathBuf],
    ) -> VaultResult<()> {
        let mut first_error = None;
        for path in paths {
            if let Err(e) = std::fs::remove_file(path) {
                log::warn!("failed to delete original {}: {}", path.display(), e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(VaultError::Io(e)),
            None => Ok(()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// BACKUPS
// ═══════════════════════════════════════════════════════════════════════════

/// Lists the backup archives belonging to an account
pub trait BackupFileProvider: Send + Sync {
    fn get_all_backup_files(&self, account_name: &str) -> VaultResult<Vec<PathBuf>>;
}

/// Backups stored as plain files under `<root>/<account>/`
#[derive(Debug, Clone)]
pub struct DirBackupProvider {
    root: PathBuf,
}

impl DirBackupProvider {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl BackupFileProvider for DirBackupProvider {
    fn get_all_backup_files(&self, account_name: &str) -> VaultResult<Vec<PathBuf>> {
        let dir = self.root.join(account_name);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&dir) {
            let entry = entry.map_err(|e| VaultError::Io(e.into()))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}
