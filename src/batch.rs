//! Krypt Vault - Batch Orchestrator
//!
//! Runs multi-file encrypt/decrypt workflows over the crypto engine, the
//! path utility and the file index. Batches are best-effort: items that fail
//! are reported, items that succeeded are never rolled back.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::account::MediaStore;
use crate::error::{FailureReason, VaultError, VaultResult};
use crate::file_crypt::FileCrypt;
use crate::index::{FileKind, FileRecord, FileType, FilesRepository};
use crate::paths::{get_name_of_file_with_extension, VaultPaths};
use crate::thumbs::ThumbnailGenerator;

// ═══════════════════════════════════════════════════════════════════════════
// STATE & REPORTS
// ═══════════════════════════════════════════════════════════════════════════

/// Progress of the current batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchState {
    #[default]
    Default,
    OperationStart,
    OperationFinished,
    /// At least one item failed; completed items are kept
    OperationFailed,
}

impl BatchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchState::OperationFinished | BatchState::OperationFailed)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EncryptOptions {
    /// Ask the media store to delete originals that were encrypted
    pub delete_originals: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct DecryptOptions {
    /// Remove decrypted records and their ciphertext from the vault
    pub delete_after: bool,
    /// Tell the media store about the decrypted outputs
    pub notify_media_scanner: bool,
}

impl Default for DecryptOptions {
    fn default() -> Self {
        Self {
            delete_after: false,
            notify_media_scanner: true,
        }
    }
}

/// Outcome of one batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub state: BatchState,
    /// Number of inputs (sources or selectors)
    pub requested: usize,
    /// Ciphertext produced (encrypt) or plaintext written (decrypt)
    pub succeeded: Vec<PathBuf>,
    /// Input that failed and why
    pub failed: Vec<(String, FailureReason)>,
}

impl BatchReport {
    fn new(requested: usize) -> Self {
        Self {
            state: BatchState::OperationStart,
            requested,
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// Body of an encrypted text note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNote {
    pub title: String,
    pub content: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// ORCHESTRATOR
// ═══════════════════════════════════════════════════════════════════════════

/// Coordinates encrypt/decrypt batches for the active account
pub struct BatchOrchestrator {
    crypt: FileCrypt,
    paths: VaultPaths,
    repo: Arc<FilesRepository>,
    thumbs: Arc<dyn ThumbnailGenerator>,
    media_store: Arc<dyn MediaStore>,
    state: watch::Sender<BatchState>,
    /// Held for the duration of a batch
    running: Mutex<()>,
}

impl BatchOrchestrator {
    pub fn new(
        crypt: FileCrypt,
        paths: VaultPaths,
        repo: Arc<FilesRepository>,
        thumbs: Arc<dyn ThumbnailGenerator>,
        media_store: Arc<dyn MediaStore>,
    ) -> Self {
        let (state, _) = watch::channel(BatchState::Default);
        Self {
            crypt,
            paths,
            repo,
            thumbs,
            media_store,
            state,
            running: Mutex::new(()),
        }
    }

    /// Observe batch state changes
    pub fn subscribe(&self) -> watch::Receiver<BatchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> BatchState {
        *self.state.borrow()
    }

    pub fn repository(&self) -> &Arc<FilesRepository> {
        &self.repo
    }

    pub fn crypt(&self) -> &FileCrypt {
        &self.crypt
    }

    fn publish(&self, state: BatchState) {
        self.state.send_replace(state);
    }

    fn finish(&self, mut report: BatchReport, state: BatchState) -> BatchReport {
        report.state = state;
        self.publish(state);
        log::info!(
            "batch {:?}: {}/{} succeeded",
            state,
            report.succeeded.len(),
            report.requested
        );
        report
    }

    /// Run a media-store call without letting it affect the batch.
    ///
    /// Dispatched to the blocking pool inside a tokio runtime, inline otherwise.
    fn notify<F>(&self, what: &'static str, call: F)
    where
        F: FnOnce(&dyn MediaStore) -> VaultResult<()> + Send + 'static,
    {
        let store = Arc::clone(&self.media_store);
        let run = move || {
            if let Err(e) = call(store.as_ref()) {
                log::warn!("{} failed: {}", what, e);
            }
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(run);
            }
            Err(_) => run(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ENCRYPT
    // ═══════════════════════════════════════════════════════════════════════

    /// Encrypt `sources` into the vault and index them as `file_type`.
    ///
    /// Finished only if every source was encrypted and indexed.
    pub fn encrypt(
        &self,
        sources: &[PathBuf],
        file_type: FileType,
        options: EncryptOptions,
    ) -> BatchReport {
        let _running = self.running.lock();
        self.publish(BatchState::OperationStart);

        let mut report = BatchReport::new(sources.len());
        let mut staged = Vec::new();
        let mut encrypted_sources = Vec::new();

        for source in sources {
            match self.encrypt_one(source, file_type) {
                Ok(record) => {
                    log::debug!("encrypted {} -> {}", source.display(), record.file_path.display());
                    report.succeeded.push(record.file_path.clone());
                    encrypted_sources.push(source.clone());
                    staged.push(record);
                }
                Err(e) => {
                    log::warn!("encrypt {} failed: {}", source.display(), e);
                    report.failed.push((source.display().to_string(), e.reason()));
                }
            }
        }

        let indexed = staged.is_empty() || self.index_staged(&staged);

        if options.delete_originals && indexed && !encrypted_sources.is_empty() {
            self.notify("delete originals", move |store| {
                store.delete_files_from_external_storage_and_media_store(&encrypted_sources)
            });
        }

        let state = if report.failed.is_empty() && indexed {
            BatchState::OperationFinished
        } else {
            BatchState::OperationFailed
        };
        self.finish(report, state)
    }

    fn index_staged(&self, staged: &[FileRecord]) -> bool {
        match self.repo.insert_files(staged) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("indexing {} encrypted file(s) failed: {}", staged.len(), e);
                false
            }
        }
    }

    /// Encrypt one source; the plaintext thumbnail never outlives this call
    fn encrypt_one(&self, source: &Path, file_type: FileType) -> VaultResult<FileRecord> {
        let dest = self.paths.generate_file_path_for_photos(source);
        let plain_thumb = if file_type.is_media() {
            self.create_thumbnail(source, &dest)
        } else {
            None
        };

        let result = self
            .crypt
            .try_encrypt_file_to_path(source, &dest)
            .map(|_| {
                let thumbnail = plain_thumb.as_deref().and_then(|t| self.encrypt_thumbnail(t));
                FileRecord::new(&dest, kind_for(file_type, source, thumbnail))
            });

        if let Some(thumb) = plain_thumb {
            if let Err(e) = fs::remove_file(&thumb) {
                log::warn!("failed to remove plain thumbnail {}: {}", thumb.display(), e);
            }
        }

        result
    }

    fn create_thumbnail(&self, source: &Path, dest: &Path) -> Option<PathBuf> {
        let thumb = self
            .paths
            .create_thumbnail_path(dest)
            .and_then(|thumb| {
                self.thumbs.create_thumbnail_from_path(source, &thumb)?;
                Ok(thumb)
            });
        match thumb {
            Ok(thumb) => Some(thumb),
            Err(e) => {
                log::debug!("no thumbnail for {}: {}", source.display(), e);
                None
            }
        }
    }

    /// Encrypted thumbnail path, or `None` if it could not be encrypted
    fn encrypt_thumbnail(&self, plain_thumb: &Path) -> Option<PathBuf> {
        let dest = self
            .paths
            .generate_encrypted_file_path_for_photos_thumbnail(plain_thumb);
        self.crypt
            .encrypt_file_to_path(plain_thumb, &dest)
            .then_some(dest)
    }

    /// Encrypt a text note and index it
    pub fn encrypt_text(&self, title: &str, content: &str) -> VaultResult<FileRecord> {
        let _running = self.running.lock();

        let note = TextNote {
            title: title.to_string(),
            content: content.to_string(),
        };
        let body = zeroize::Zeroizing::new(serde_json::to_vec(&note)?);
        let dest = self.paths.generate_file_path_for_photos(Path::new("note.txt"));

        self.crypt.encrypt_bytes_to_path(&body, &dest)?;

        let mut record = FileRecord::new(&dest, FileKind::Text);
        match self.repo.insert_files(std::slice::from_ref(&record)) {
            Ok(ids) => {
                record.id = ids.first().copied();
                Ok(record)
            }
            Err(e) => {
                // Unindexed ciphertext is unreachable
                let _ = fs::remove_file(&dest);
                Err(e)
            }
        }
    }

    /// Decrypt a text note record
    pub fn read_text(&self, record: &FileRecord) -> VaultResult<TextNote> {
        if record.file_type() != FileType::Text {
            return Err(VaultError::InvalidFileFormat(format!(
                "{} is not a text note",
                record.file_path.display()
            )));
        }
        let body = zeroize::Zeroizing::new(self.crypt.decrypt_path_to_bytes(&record.file_path)?);
        Ok(serde_json::from_slice(&body)?)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // DECRYPT
    // ═══════════════════════════════════════════════════════════════════════

    /// Decrypt the media records matching `selectors` into the output folder.
    ///
    /// Fails only if there were selectors and nothing could be decrypted.
    pub fn decrypt(&self, selectors: &[String], options: DecryptOptions) -> BatchReport {
        let _running = self.running.lock();
        self.publish(BatchState::OperationStart);

        let mut report = BatchReport::new(selectors.len());
        let mut decrypted = Vec::new();

        for record in self.repo.map_thumbnails_and_name_to_file_entity(selectors) {
            let output = self
                .paths
                .generate_decrypted_photo_path_in_krypt_folder(&record.file_path);
            match self.crypt.try_decrypt_file_to_path(&record.file_path, &output) {
                Ok(_) => {
                    log::debug!("decrypted {} -> {}", record.file_path.display(), output.display());
                    report.succeeded.push(output);
                    decrypted.push(record);
                }
                Err(e) => {
                    log::warn!("decrypt {} failed: {}", record.file_path.display(), e);
                    report.failed.push((record.file_path_str(), e.reason()));
                }
            }
        }

        if !selectors.is_empty() && decrypted.is_empty() {
            return self.finish(report, BatchState::OperationFailed);
        }

        if options.notify_media_scanner && !report.succeeded.is_empty() {
            let outputs = report.succeeded.clone();
            self.notify("media scan", move |store| store.scan_added_media(&outputs));
        }

        if options.delete_after && !decrypted.is_empty() {
            self.repo
                .delete_encrypted_files_from_krypt_db_and_file_system(&decrypted);
        }

        self.finish(report, BatchState::OperationFinished)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // HOUSEKEEPING
    // ═══════════════════════════════════════════════════════════════════════

    /// Delete records (and their files) by id; unknown ids are skipped.
    /// Returns how many records were removed.
    pub fn delete_files(&self, ids: &[i64]) -> usize {
        let _running = self.running.lock();

        let records: Vec<FileRecord> = ids
            .iter()
            .filter_map(|&id| self.repo.get_file_by_id(id))
            .collect();
        if records.is_empty() {
            return 0;
        }
        self.repo
            .delete_encrypted_files_from_krypt_db_and_file_system(&records)
    }

    /// Whether a photo decrypt picker has anything to show
    pub fn has_encrypted_photos(&self) -> bool {
        self.repo.get_photos_count() > 0
    }

    /// Whether a media decrypt picker has anything to show
    pub fn has_encrypted_media(&self) -> bool {
        self.repo.get_medias_count() > 0
    }

    // ═══════════════════════════════════════════════════════════════════════
    // BACKGROUND
    // ═══════════════════════════════════════════════════════════════════════

    /// Run [`encrypt`](Self::encrypt) on the blocking pool.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_encrypt(
        self: &Arc<Self>,
        sources: Vec<PathBuf>,
        file_type: FileType,
        options: EncryptOptions,
    ) -> JoinHandle<BatchReport> {
        let this = Arc::clone(self);
        tokio::task::spawn_blocking(move || this.encrypt(&sources, file_type, options))
    }

    /// Run [`decrypt`](Self::decrypt) on the blocking pool.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_decrypt(
        self: &Arc<Self>,
        selectors: Vec<String>,
        options: DecryptOptions,
    ) -> JoinHandle<BatchReport> {
        let this = Arc::clone(self);
        tokio::task::spawn_blocking(move || this.decrypt(&selectors, options))
    }
}

/// Record kind for a freshly encrypted source
fn kind_for(file_type: FileType, source: &Path, thumbnail: Option<PathBuf>) -> FileKind {
    match file_type {
        FileType::Audio => FileKind::Audio {
            meta: serde_json::json!({
                "name": get_name_of_file_with_extension(&source.to_string_lossy()),
                "date": chrono::Utc::now().timestamp_millis(),
            }),
        },
        other => FileKind::with_thumbnail(other, thumbnail),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
