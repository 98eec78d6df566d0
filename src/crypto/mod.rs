//! Krypt Vault - Cryptographic Core
//!
//! Account key handling, HKDF sub-keys and AES-256-GCM / HMAC primitives.

pub mod keys;
pub mod aead;
pub mod hkdf;

pub use keys::*;
pub use aead::*;
pub use hkdf::*;
