//! Krypt Vault - Secure Filesystem Operations
//!
//! Atomic writes for ciphertext artifacts and the small delete/length surface
//! the index needs, behind a trait so it can be faked.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::VaultResult;

/// File operations used when reconciling the index with the disk
pub trait FileSystem: Send + Sync {
    /// Delete a file; `false` if it could not be removed
    fn delete(&self, path: &Path) -> bool;

    /// Byte length of a file; 0 if it does not exist or cannot be read
    fn length(&self, path: &Path) -> u64;
}

/// The real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn delete(&self, path: &Path) -> bool {
        match fs::remove_file(path) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("failed to delete {}: {}", path.display(), e);
                false
            }
        }
    }

    fn length(&self, path: &Path) -> u64 {
        fs::metadata(path).map(|m| m.len()).unwrap_or(0)
    }
}

/// Sibling temp path used while an artifact is being written
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write a file atomically: temp file, fsync, rename.
///
/// On any error the temp file is removed and nothing exists at `path` that
/// was not there before.
pub fn write_atomic(path: &Path, data: &[u8]) -> VaultResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = temp_path_for(path);

    let result = (|| -> VaultResult<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_creates_parent_and_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("files/abc.jpg");

        write_atomic(&target, b"encrypted data").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"encrypted data");
        assert!(!temp_path_for(&target).exists());
    }

    #[test]
    fn test_write_atomic_failure_leaves_nothing() {
        let dir = tempdir().unwrap();
        // Parent is a regular file, so the directory cannot be created
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let target = blocker.join("out.enc");

        assert!(write_atomic(&target, b"data").is_err());
        assert!(!target.exists());
    }

    #[test]
    fn test_os_file_system() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.enc");
        fs::write(&path, b"12345").unwrap();

        let fs_ops = OsFileSystem;
        assert_eq!(fs_ops.length(&path), 5);
        assert!(fs_ops.delete(&path));
        assert!(!fs_ops.delete(&path));
        assert_eq!(fs_ops.length(&path), 0);
    }
}
