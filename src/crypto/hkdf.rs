//! Krypt Vault - HKDF Key Derivation
//!
//! Per-file content and MAC keys derived from the account key.

use hkdf::Hkdf;
use sha2::Sha256;

use super::keys::{contexts, VaultKey, KEY_LEN};
use crate::error::{VaultError, VaultResult};

/// Derive a subkey from a parent key with a salt and info string
pub fn derive_subkey(parent: &VaultKey, salt: &[u8], info: &[u8]) -> VaultResult<VaultKey> {
    let hk = Hkdf::<Sha256>::new(Some(salt), parent.expose());
    let mut okm = zeroize::Zeroizing::new([0u8; KEY_LEN]);

    hk.expand(info, &mut *okm)
        .map_err(|e| VaultError::KeyDerivationFailed(e.to_string()))?;

    Ok(VaultKey::new(*okm))
}

/// Keys protecting a single ciphertext artifact
pub struct FileKeys {
    /// AES-256-GCM key
    pub enc: VaultKey,
    /// HMAC-SHA256 key
    pub mac: VaultKey,
}

/// Derive the per-file key pair from the account key and the file's salt
pub fn derive_file_keys(account_key: &VaultKey, salt: &[u8]) -> VaultResult<FileKeys> {
    Ok(FileKeys {
        enc: derive_subkey(account_key, salt, contexts::FILE)?,
        mac: derive_subkey(account_key, salt, contexts::MAC)?,
    })
}
