//! Krypt Vault - AEAD Encryption
//!
//! AES-256-GCM with associated data, and HMAC-SHA256 for whole-file integrity.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::keys::{VaultKey, NONCE_LEN};
use crate::error::{VaultError, VaultResult};

type HmacSha256 = Hmac<Sha256>;

/// GCM authentication tag size
pub const TAG_LEN: usize = 16;

/// HMAC-SHA256 size
pub const HMAC_LEN: usize = 32;

/// Encrypt with AES-256-GCM; returns ciphertext with the tag appended
pub fn encrypt_aes_gcm(
    key: &VaultKey,
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
    aad: &[u8],
) -> VaultResult<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.expose())
        .map_err(|e| VaultError::EncryptionFailed(e.to_string()))?;

    cipher
        .encrypt(Nonce::from_slice(nonce), Payload { msg: plaintext, aad })
        .map_err(|_| VaultError::EncryptionFailed("AES-GCM encryption failed".into()))
}

/// Decrypt AES-256-GCM ciphertext (tag appended)
pub fn decrypt_aes_gcm(
    key: &VaultKey,
    nonce: &[u8],
    ciphertext: &[u8],
    aad: &[u8],
) -> VaultResult<Vec<u8>> {
    if nonce.len() != NONCE_LEN {
        return Err(VaultError::DecryptionFailed("Invalid nonce length".into()));
    }

    let cipher = Aes256Gcm::new_from_slice(key.expose())
        .map_err(|e| VaultError::DecryptionFailed(e.to_string()))?;

    cipher
        .decrypt(Nonce::from_slice(nonce), Payload { msg: ciphertext, aad })
        .map_err(|_| VaultError::DecryptionFailed("Authentication failed".into()))
}

/// Compute HMAC-SHA256 over data
pub fn compute_hmac(key: &VaultKey, data: &[u8]) -> VaultResult<[u8; HMAC_LEN]> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key.expose())
        .map_err(|e| VaultError::EncryptionFailed(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

/// Verify HMAC-SHA256 in constant time
pub fn verify_hmac(key: &VaultKey, data: &[u8], expected: &[u8]) -> bool {
    match <HmacSha256 as Mac>::new_from_slice(key.expose()) {
        Ok(mut mac) => {
            mac.update(data);
            mac.verify_slice(expected).is_ok()
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::generate_nonce;

    #[test]
    fn test_aes_gcm_roundtrip_with_aad() {
        let key = VaultKey::generate();
        let nonce = generate_nonce();

        let ct = encrypt_aes_gcm(&key, &nonce, b"holiday.jpg bytes", b"header").unwrap();
        assert_eq!(ct.len(), b"holiday.jpg bytes".len() + TAG_LEN);

        let pt = decrypt_aes_gcm(&key, &nonce, &ct, b"header").unwrap();
        assert_eq!(pt, b"holiday.jpg bytes");

        assert!(decrypt_aes_gcm(&key, &nonce, &ct, b"other header").is_err());
    }

    #[test]
    fn test_wrong_key_fails() {
        let nonce = generate_nonce();
        let ct = encrypt_aes_gcm(&VaultKey::generate(), &nonce, b"secret", b"").unwrap();
        assert!(decrypt_aes_gcm(&VaultKey::generate(), &nonce, &ct, b"").is_err());
    }

    #[test]
    fn test_hmac() {
        let key = VaultKey::generate();
        let mac = compute_hmac(&key, b"ciphertext").unwrap();

        assert!(verify_hmac(&key, b"ciphertext", &mac));
        assert!(!verify_hmac(&key, b"tampered", &mac));
        assert!(!verify_hmac(&key, b"ciphertext", &mac[..16]));
    }

    #[test]
    fn test_hmac_known_vector_and_wrong_key() {
        let mut bytes = [0u8; 32];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        let key = VaultKey::new(bytes);

        let mac = compute_hmac(&key, b"KRYPTENC").unwrap();
        assert_eq!(
            hex::encode(mac),
            "3506eba321aa138b7bcf5c198723ee6a027e936021e0947ee8dfffdb2d05385f"
        );
        assert!(verify_hmac(&key, b"KRYPTENC", &mac));
        assert!(!verify_hmac(&VaultKey::new([0xAA; 32]), b"KRYPTENC", &mac));
    }
}
