//! Krypt Vault - Key Management
//!
//! The account's symmetric key, plus random salt/nonce material.

use std::fmt;

use rand::RngCore;
use secrecy::{ExposeSecret, Secret};

use crate::error::{VaultError, VaultResult};

/// Key length for AES-256
pub const KEY_LEN: usize = 32;

/// Nonce length for AES-GCM
pub const NONCE_LEN: usize = 12;

/// Per-file HKDF salt length
pub const SALT_LEN: usize = 16;

/// HKDF info strings
pub mod contexts {
    /// Per-file content encryption key
    pub const FILE: &[u8] = b"KRYPT:FILE:v1";

    /// Per-file MAC key
    pub const MAC: &[u8] = b"KRYPT:MAC:v1";

    /// Prefix of the Argon2 salt used for passphrase-derived account keys
    pub const ACCOUNT_SALT: &[u8] = b"KRYPT:ACCOUNT:v1:";
}

/// Account symmetric key, zeroized on drop
pub struct VaultKey {
    inner: Secret<[u8; KEY_LEN]>,
}

impl VaultKey {
    /// Create a new vault key from bytes
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self {
            inner: Secret::new(bytes),
        }
    }

    /// Build a key from a slice, rejecting anything that is not 32 bytes
    pub fn from_slice(bytes: &[u8]) -> VaultResult<Self> {
        let arr: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
            VaultError::KeyDerivationFailed(format!(
                "expected {} key bytes, got {}",
                KEY_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self::new(arr))
    }

    /// Expose the key bytes (use with caution)
    pub fn expose(&self) -> &[u8; KEY_LEN] {
        self.inner.expose_secret()
    }

    /// Generate a random key
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::new(bytes)
    }

    /// Derive an account key from a passphrase with Argon2id.
    ///
    /// The salt is bound to the account name so two accounts sharing a
    /// passphrase still get different keys.
    pub fn from_passphrase(passphrase: &str, account_name: &str) -> VaultResult<Self> {
        use argon2::{Algorithm, Argon2, Params, Version};

        let mut salt = contexts::ACCOUNT_SALT.to_vec();
        salt.extend_from_slice(account_name.as_bytes());

        let params = Params::new(65536, 3, 4, Some(KEY_LEN))
            .map_err(|e| VaultError::KeyDerivationFailed(e.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut key = zeroize::Zeroizing::new([0u8; KEY_LEN]);
        argon2
            .hash_password_into(passphrase.as_bytes(), &salt, &mut *key)
            .map_err(|e| VaultError::KeyDerivationFailed(e.to_string()))?;

        Ok(Self::new(*key))
    }
}

impl Clone for VaultKey {
    fn clone(&self) -> Self {
        Self::new(*self.expose())
    }
}

impl fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VaultKey([REDACTED])")
    }
}

/// Generate a random nonce for AES-GCM
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);
    nonce
}

/// Generate a random per-file salt
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}
