//! Krypt Vault - Path & Naming
//!
//! Where ciphertext, thumbnails and decrypted output land on disk.
//!
//! ```text
//! <vault>/
//! ├── files/     # encrypted artifacts, <uuid>.<ext>
//! └── thumbs/    # encrypted thumbnails, same name as the plain thumbnail
//! <thumbs_cache>/ # plaintext thumbnails, removed after encryption
//! <decrypted>/    # user-visible decrypted output
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::VaultResult;

/// Encrypted artifacts directory name
const FILES_DIR: &str = "files";

/// Encrypted thumbnails directory name
const THUMBS_DIR: &str = "thumbs";

/// Suffix of generated thumbnail files
const THUMB_SUFFIX: &str = "_thumb.jpg";

/// Path generator rooted at the vault's three directories
#[derive(Debug, Clone)]
pub struct VaultPaths {
    vault_dir: PathBuf,
    thumbs_cache_dir: PathBuf,
    decrypted_dir: PathBuf,
}

impl VaultPaths {
    pub fn new(vault_dir: &Path, thumbs_cache_dir: &Path, decrypted_dir: &Path) -> Self {
        Self {
            vault_dir: vault_dir.to_path_buf(),
            thumbs_cache_dir: thumbs_cache_dir.to_path_buf(),
            decrypted_dir: decrypted_dir.to_path_buf(),
        }
    }

    pub fn vault_dir(&self) -> &Path {
        &self.vault_dir
    }

    pub fn files_dir(&self) -> PathBuf {
        self.vault_dir.join(FILES_DIR)
    }

    pub fn encrypted_thumbs_dir(&self) -> PathBuf {
        self.vault_dir.join(THUMBS_DIR)
    }

    pub fn decrypted_dir(&self) -> &Path {
        &self.decrypted_dir
    }

    /// Fresh destination for an encrypted artifact, keeping the source extension
    pub fn generate_file_path_for_photos(&self, source: &Path) -> PathBuf {
        let id = Uuid::new_v4().simple().to_string();
        let name = match source.extension().and_then(|e| e.to_str()) {
            Some(ext) if !ext.is_empty() => format!("{}.{}", id, ext),
            _ => id,
        };
        self.files_dir().join(name)
    }

    /// Plaintext thumbnail path in the cache for an artifact destination
    pub fn create_thumbnail_path(&self, dest: &Path) -> VaultResult<PathBuf> {
        fs::create_dir_all(&self.thumbs_cache_dir)?;

        let stem = dest
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self.thumbs_cache_dir.join(format!("{}{}", stem, THUMB_SUFFIX)))
    }

    /// Encrypted thumbnail path; keeps the plain thumbnail's file name
    pub fn generate_encrypted_file_path_for_photos_thumbnail(&self, plain_thumb: &Path) -> PathBuf {
        let name = get_name_of_file_with_extension(&plain_thumb.to_string_lossy());
        self.encrypted_thumbs_dir().join(name)
    }

    /// Output path for a decrypted file; never collides with an existing file
    pub fn generate_decrypted_photo_path_in_krypt_folder(&self, encrypted: &Path) -> PathBuf {
        let name = get_name_of_file_with_extension(&encrypted.to_string_lossy());
        let candidate = self.decrypted_dir.join(&name);
        if !candidate.exists() {
            return candidate;
        }

        let as_path = Path::new(&name);
        let stem = as_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());
        let ext = as_path.extension().map(|e| e.to_string_lossy().into_owned());

        (1u32..)
            .map(|n| {
                let numbered = match &ext {
                    Some(ext) => format!("{} ({}).{}", stem, n, ext),
                    None => format!("{} ({})", stem, n),
                };
                self.decrypted_dir.join(numbered)
            })
            .find(|p| !p.exists())
            .unwrap_or(candidate)
    }
}

/// Trailing segment after the last `/`; the whole string without one
pub fn get_name_of_file_with_extension(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => path[idx + 1..].to_string(),
        None => path.to_string(),
    }
}
