//! File encryption engine for Krypt Vault
//!
//! Ciphertext file layout:
//! ```text
//! [MAGIC 8B]["KRYPTENC"]
//! [VERSION 1B][0x01]
//! [SALT 16B][random, HKDF salt for the per-file keys]
//! [NONCE 12B][random]
//! [CIPHERTEXT variable][AES-256-GCM, AAD = header]
//! [TAG 16B][GCM auth tag]
//! [HMAC 32B][HMAC-SHA256 of all above]
//! ```
//!
//! Everything needed to decrypt lives in the file; the account key is the
//! only outside input.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::account::UserKeyProvider;
use crate::crypto::{
    compute_hmac, decrypt_aes_gcm, derive_file_keys, encrypt_aes_gcm, generate_nonce,
    generate_salt, verify_hmac, VaultKey, HMAC_LEN, NONCE_LEN, SALT_LEN, TAG_LEN,
};
use crate::error::{VaultError, VaultResult};
use crate::secure_fs::write_atomic;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes identifying a Krypt ciphertext artifact
const MAGIC: &[u8; 8] = b"KRYPTENC";

/// Current format version
const VERSION: u8 = 0x01;

/// Header size: MAGIC(8) + VERSION(1) + SALT(16) + NONCE(12)
const HEADER_SIZE: usize = 8 + 1 + SALT_LEN + NONCE_LEN;

/// Minimum valid file size
const MIN_FILE_SIZE: usize = HEADER_SIZE + TAG_LEN + HMAC_LEN;

// ---------------------------------------------------------------------------
// FileCrypt
// ---------------------------------------------------------------------------

/// Encrypts and decrypts single files with the active account's key
pub struct FileCrypt {
    keys: Arc<dyn UserKeyProvider>,
}

impl FileCrypt {
    pub fn new(keys: Arc<dyn UserKeyProvider>) -> Self {
        Self { keys }
    }

    fn current_key(&self) -> VaultResult<VaultKey> {
        self.keys.get_key().ok_or(VaultError::KeyUnavailable)
    }

    /// Encrypt `source` into a new file at `dest`. `false` on any failure.
    pub fn encrypt_file_to_path(&self, source: &Path, dest: &Path) -> bool {
        match self.try_encrypt_file_to_path(source, dest) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("encrypt {} failed: {}", source.display(), e);
                false
            }
        }
    }

    /// Decrypt `source` into a new file at `dest`. `false` on any failure.
    pub fn decrypt_file_to_path(&self, source: &Path, dest: &Path) -> bool {
        match self.try_decrypt_file_to_path(source, dest) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("decrypt {} failed: {}", source.display(), e);
                false
            }
        }
    }

    /// Encrypt a file; returns the plaintext size in bytes
    pub fn try_encrypt_file_to_path(&self, source: &Path, dest: &Path) -> VaultResult<u64> {
        let key = self.current_key()?;
        let plaintext = zeroize::Zeroizing::new(read_existing(source)?);

        let sealed = seal(&key, &plaintext)?;
        write_atomic(dest, &sealed)?;

        Ok(plaintext.len() as u64)
    }

    /// Decrypt a file; returns the plaintext size in bytes
    pub fn try_decrypt_file_to_path(&self, source: &Path, dest: &Path) -> VaultResult<u64> {
        let key = self.current_key()?;
        let data = read_existing(source)?;

        let plaintext = zeroize::Zeroizing::new(open(&key, &data)?);
        write_atomic(dest, &plaintext)?;

        Ok(plaintext.len() as u64)
    }

    /// Encrypt an in-memory buffer (text notes) into a file at `dest`
    pub fn encrypt_bytes_to_path(&self, plaintext: &[u8], dest: &Path) -> VaultResult<()> {
        let key = self.current_key()?;
        let sealed = seal(&key, plaintext)?;
        write_atomic(dest, &sealed)
    }

    /// Decrypt a file into memory
    pub fn decrypt_path_to_bytes(&self, source: &Path) -> VaultResult<Vec<u8>> {
        let key = self.current_key()?;
        let data = read_existing(source)?;
        open(&key, &data)
    }

    /// Check the HMAC of an artifact without decrypting it
    pub fn verify_integrity(&self, path: &Path) -> VaultResult<bool> {
        let key = self.current_key()?;
        let data = read_existing(path)?;

        if data.len() < MIN_FILE_SIZE || &data[0..8] != MAGIC {
            return Ok(false);
        }

        let keys = derive_file_keys(&key, &data[9..9 + SALT_LEN])?;
        let hmac_start = data.len() - HMAC_LEN;
        Ok(verify_hmac(&keys.mac, &data[..hmac_start], &data[hmac_start..]))
    }
}

fn read_existing(path: &Path) -> VaultResult<Vec<u8>> {
    if !path.exists() {
        return Err(VaultError::FileNotFound(path.display().to_string()));
    }
    Ok(fs::read(path)?)
}

/// Build a complete artifact from plaintext
fn seal(account_key: &VaultKey, plaintext: &[u8]) -> VaultResult<Vec<u8>> {
    let salt = generate_salt();
    let nonce = generate_nonce();
    let keys = derive_file_keys(account_key, &salt)?;

    let mut output = Vec::with_capacity(HEADER_SIZE + plaintext.len() + TAG_LEN + HMAC_LEN);
    output.extend_from_slice(MAGIC);
    output.push(VERSION);
    output.extend_from_slice(&salt);
    output.extend_from_slice(&nonce);

    let ciphertext = encrypt_aes_gcm(&keys.enc, &nonce, plaintext, &output)?;
    output.extend_from_slice(&ciphertext);

    let hmac = compute_hmac(&keys.mac, &output)?;
    output.extend_from_slice(&hmac);

    Ok(output)
}

/// Validate and decrypt a complete artifact
fn open(account_key: &VaultKey, data: &[u8]) -> VaultResult<Vec<u8>> {
    if data.len() < MIN_FILE_SIZE {
        return Err(VaultError::InvalidFileFormat("File too small".into()));
    }

    if &data[0..8] != MAGIC {
        return Err(VaultError::InvalidFileFormat("Invalid magic bytes".into()));
    }

    let version = data[8];
    if version != VERSION {
        return Err(VaultError::InvalidFileFormat(format!(
            "Unsupported version: {}",
            version
        )));
    }

    let salt = &data[9..9 + SALT_LEN];
    let keys = derive_file_keys(account_key, salt)?;

    let hmac_start = data.len() - HMAC_LEN;
    if !verify_hmac(&keys.mac, &data[..hmac_start], &data[hmac_start..]) {
        return Err(VaultError::HmacVerificationFailed);
    }

    let header = &data[..HEADER_SIZE];
    let nonce = &data[9 + SALT_LEN..HEADER_SIZE];
    let ciphertext = &data[HEADER_SIZE..hmac_start];

    decrypt_aes_gcm(&keys.enc, nonce, ciphertext, header)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
