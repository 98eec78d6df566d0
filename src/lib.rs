//! # Krypt Vault
//!
//! Encrypted media/text vault core: per-file encryption, an account-scoped
//! index of encrypted artifacts, and batch encrypt/decrypt workflows.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     BATCH ORCHESTRATOR                    │
//! │        encrypt / decrypt / notes / delete / states        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  FILE CRYPT  │  │  VAULT PATHS │  │ FILES REPOSITORY│  │
//! │  │  AES-256-GCM │  │  uuid names  │  │ account-scoped  │  │
//! │  │  + HMAC      │  │  thumbs/out  │  │ SQLite index    │  │
//! │  └──────┬───────┘  └──────────────┘  └────────┬────────┘  │
//! │         │                                     │           │
//! │  ┌──────┴──────────┐  ┌───────────────┐  ┌────┴────────┐  │
//! │  │ USER KEY (HKDF) │  │ THUMBNAILS    │  │ MEDIA STORE │  │
//! │  └─────────────────┘  └───────────────┘  └─────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Model
//!
//! - Every artifact encrypted with AES-256-GCM under a per-file HKDF key
//! - Whole-file HMAC-SHA256 checked before decryption
//! - Artifacts written atomically; a failed write leaves nothing behind
//! - Plaintext thumbnails removed as soon as they are encrypted
//! - Key material zeroized on drop

pub mod account;
pub mod batch;
pub mod config;
pub mod crypto;
pub mod error;
pub mod file_crypt;
pub mod index;
pub mod paths;
pub mod secure_fs;
pub mod thumbs;
pub mod vault;

pub use account::{AccountContext, StaticAccount, UserKeyProvider, UsernameProvider};
pub use batch::{BatchOrchestrator, BatchReport, BatchState, DecryptOptions, EncryptOptions};
pub use config::VaultConfig;
pub use crypto::VaultKey;
pub use error::{FailureReason, VaultError, VaultResult};
pub use file_crypt::FileCrypt;
pub use index::{FileKind, FileRecord, FileType, FilesRepository};
pub use thumbs::ThumbnailEngine;
pub use vault::KryptVault;

/// Krypt Vault version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
