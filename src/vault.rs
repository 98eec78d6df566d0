//! Krypt Vault - Main Vault Assembly
//!
//! Wires configuration, account, index and orchestrator together.

use std::sync::Arc;

use crate::account::{AccountContext, DirBackupProvider, LocalMediaStore, MediaStore, UserKeyProvider, UsernameProvider};
use crate::batch::BatchOrchestrator;
use crate::config::VaultConfig;
use crate::error::VaultResult;
use crate::file_crypt::FileCrypt;
use crate::index::{FileIndexStore, FilesRepository, SqliteFileIndex};
use crate::secure_fs::OsFileSystem;
use crate::thumbs::{ThumbnailEngine, ThumbnailGenerator};

/// Krypt Vault - Main entry point
pub struct KryptVault {
    config: VaultConfig,
    orchestrator: Arc<BatchOrchestrator>,
}

impl KryptVault {
    // ═══════════════════════════════════════════════════════════════════════
    // INITIALIZATION
    // ═══════════════════════════════════════════════════════════════════════

    /// Open the vault described by `config` with the local media store
    pub fn open<A>(config: VaultConfig, account: Arc<A>) -> VaultResult<Self>
    where
        A: AccountContext + 'static,
    {
        Self::open_with(config, account, Arc::new(LocalMediaStore))
    }

    /// Open with a custom media store
    pub fn open_with<A>(
        config: VaultConfig,
        account: Arc<A>,
        media_store: Arc<dyn MediaStore>,
    ) -> VaultResult<Self>
    where
        A: AccountContext + 'static,
    {
        std::fs::create_dir_all(&config.vault_dir)?;

        let store: Arc<dyn FileIndexStore> = Arc::new(SqliteFileIndex::open(&config.index_db)?);
        let repo = Arc::new(FilesRepository::new(
            store,
            account.clone() as Arc<dyn UsernameProvider>,
            Arc::new(DirBackupProvider::new(&config.backup_dir)),
            Arc::new(OsFileSystem),
        ));
        let thumbs: Arc<dyn ThumbnailGenerator> = Arc::new(ThumbnailEngine::new(config.thumb_size));

        let orchestrator = Arc::new(BatchOrchestrator::new(
            FileCrypt::new(account as Arc<dyn UserKeyProvider>),
            config.paths(),
            repo,
            thumbs,
            media_store,
        ));

        log::info!("vault opened at {}", config.vault_dir.display());
        Ok(Self {
            config,
            orchestrator,
        })
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn orchestrator(&self) -> &Arc<BatchOrchestrator> {
        &self.orchestrator
    }

    pub fn repository(&self) -> &Arc<FilesRepository> {
        self.orchestrator.repository()
    }
}
