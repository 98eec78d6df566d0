//! Krypt Vault - Error Types

use thiserror::Error;

/// Result type for vault operations
pub type VaultResult<T> = Result<T, VaultError>;

/// Vault error types
#[derive(Error, Debug)]
pub enum VaultError {
    // ═══════════════════════════════════════════════════════════════
    // ACCOUNT ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("No active account")]
    NoActiveAccount,

    #[error("No key available for the active account")]
    KeyUnavailable,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // ═══════════════════════════════════════════════════════════════
    // CRYPTO ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("HMAC verification failed - file corrupted or tampered")]
    HmacVerificationFailed,

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    // ═══════════════════════════════════════════════════════════════
    // FILE ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ═══════════════════════════════════════════════════════════════
    // INDEX ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("No indexed file with id {0} for this account")]
    RecordNotFound(i64),

    // ═══════════════════════════════════════════════════════════════
    // THUMBNAIL ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("Thumbnail generation failed: {0}")]
    ThumbnailFailed(String),

    #[error("Image processing error: {0}")]
    ImageError(String),

    // ═══════════════════════════════════════════════════════════════
    // SERIALIZATION / CONFIG ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Config error: {0}")]
    ConfigError(String),
}

/// Coarse failure classification carried in batch reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    NoAccount,
    NoKey,
    Io,
    Crypto,
    Storage,
    Thumbnail,
    Other,
}

impl VaultError {
    /// Classify this error for callers that only branch on the kind of failure
    pub fn reason(&self) -> FailureReason {
        match self {
            VaultError::NoActiveAccount => FailureReason::NoAccount,
            VaultError::KeyUnavailable => FailureReason::NoKey,
            VaultError::Io(_) | VaultError::FileNotFound(_) => FailureReason::Io,
            VaultError::EncryptionFailed(_)
            | VaultError::DecryptionFailed(_)
            | VaultError::HmacVerificationFailed
            | VaultError::InvalidFileFormat(_)
            | VaultError::KeyDerivationFailed(_) => FailureReason::Crypto,
            VaultError::DatabaseError(_) | VaultError::RecordNotFound(_) => FailureReason::Storage,
            VaultError::ThumbnailFailed(_) | VaultError::ImageError(_) => FailureReason::Thumbnail,
            VaultError::SerializationError(_) | VaultError::ConfigError(_) => FailureReason::Other,
        }
    }

    /// Check if this is a security-critical error
    pub fn is_security_critical(&self) -> bool {
        matches!(
            self,
            VaultError::HmacVerificationFailed | VaultError::DecryptionFailed(_)
        )
    }
}

impl From<rusqlite::Error> for VaultError {
    fn from(e: rusqlite::Error) -> Self {
        VaultError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(e: serde_json::Error) -> Self {
        VaultError::SerializationError(e.to_string())
    }
}

impl From<image::ImageError> for VaultError {
    fn from(e: image::ImageError) -> Self {
        VaultError::ImageError(e.to_string())
    }
}
