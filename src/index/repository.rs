//! Krypt Vault - Files Repository
//!
//! Account-aware facade over a [`FileIndexStore`]. The active account is
//! resolved on every call; with nobody logged in, reads return empty/zero
//! values and writes fail with [`VaultError::NoActiveAccount`].

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::record::{FileRecord, FileType};
use super::store::{FileIndexStore, Order};
use crate::account::{BackupFileProvider, UsernameProvider};
use crate::error::{VaultError, VaultResult};
use crate::paths::get_name_of_file_with_extension;
use crate::secure_fs::FileSystem;

/// Catalogue of the active account's encrypted artifacts
pub struct FilesRepository {
    store: Arc<dyn FileIndexStore>,
    accounts: Arc<dyn UsernameProvider>,
    backups: Arc<dyn BackupFileProvider>,
    fs: Arc<dyn FileSystem>,
}

impl FilesRepository {
    pub fn new(
        store: Arc<dyn FileIndexStore>,
        accounts: Arc<dyn UsernameProvider>,
        backups: Arc<dyn BackupFileProvider>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            store,
            accounts,
            backups,
            fs,
        }
    }

    fn account(&self) -> Option<String> {
        self.accounts.get_username()
    }

    fn require_account(&self) -> VaultResult<String> {
        self.account().ok_or(VaultError::NoActiveAccount)
    }

    /// Run a read against the active account; empty on no account or error
    fn read_or_default<T: Default>(
        &self,
        what: &str,
        f: impl FnOnce(&str) -> VaultResult<T>,
    ) -> T {
        let Some(account) = self.account() else {
            return T::default();
        };
        match f(&account) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("index read '{}' failed: {}", what, e);
                T::default()
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // WRITES
    // ═══════════════════════════════════════════════════════════════════════

    /// Insert records for the active account in one transaction.
    ///
    /// `account_name` on the input is ignored and overwritten.
    pub fn insert_files(&self, records: &[FileRecord]) -> VaultResult<Vec<i64>> {
        let account = self.require_account()?;
        let ids = self.store.insert_all(&account, records)?;
        log::debug!("indexed {} file(s) for {}", ids.len(), account);
        Ok(ids)
    }

    /// Replace one of the active account's records; a record without an
    /// id is inserted
    pub fn update_file(&self, record: &FileRecord) -> VaultResult<i64> {
        let account = self.require_account()?;
        self.store.upsert(&account, record)
    }

    /// Remove records from the index, then best-effort delete their files.
    ///
    /// Only records whose rows the active account actually removed are
    /// unlinked. Nothing is unlinked when there is no account or the index
    /// delete fails. Returns the number of records removed.
    pub fn delete_encrypted_files_from_krypt_db_and_file_system(&self, records: &[FileRecord]) -> usize {
        let Some(account) = self.account() else {
            log::warn!("delete of {} record(s) skipped: no active account", records.len());
            return 0;
        };

        let removed = match self.store.delete_all(&account, records) {
            Ok(removed) => removed,
            Err(e) => {
                log::warn!("index delete of {} record(s) failed: {}", records.len(), e);
                return 0;
            }
        };
        if removed.len() < records.len() {
            log::warn!(
                "{} of {} record(s) not indexed for {}; their files are kept",
                records.len() - removed.len(),
                records.len(),
                account
            );
        }

        for record in &removed {
            self.fs.delete(&record.file_path);
            if record.file_type().is_media() {
                if let Some(thumb) = record.kind.thumbnail() {
                    self.fs.delete(thumb);
                }
            }
        }
        removed.len()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COUNTS & SIZES
    // ═══════════════════════════════════════════════════════════════════════

    /// One entry per file type; a failed per-type count reads as 0
    pub fn get_all_files_type_counts(&self) -> BTreeMap<FileType, u64> {
        let account = self.account();
        FileType::ALL
            .iter()
            .map(|&file_type| {
                let count = account
                    .as_deref()
                    .map(|a| self.store.count_by_type(a, file_type).unwrap_or(0))
                    .unwrap_or(0);
                (file_type, count)
            })
            .collect()
    }

    fn count_of(&self, types: &[FileType]) -> u64 {
        self.read_or_default("count", |account| {
            types
                .iter()
                .map(|&t| self.store.count_by_type(account, t))
                .sum::<VaultResult<u64>>()
        })
    }

    /// Photos plus videos
    pub fn get_medias_count(&self) -> u64 {
        self.count_of(&FileType::MEDIA)
    }

    pub fn get_photos_count(&self) -> u64 {
        self.count_of(&[FileType::Photo])
    }

    pub fn get_videos_count(&self) -> u64 {
        self.count_of(&[FileType::Video])
    }

    pub fn get_audios_count(&self) -> u64 {
        self.count_of(&[FileType::Audio])
    }

    /// Bytes used by the account's backups and indexed artifacts
    pub fn get_all_files_size(&self) -> u64 {
        let Some(account) = self.account() else {
            return 0;
        };

        let backups = self.backups.get_all_backup_files(&account).unwrap_or_else(|e| {
            log::warn!("backup listing failed: {}", e);
            Vec::new()
        });
        let indexed: Vec<PathBuf> = self
            .store
            .list(&account, &[], Order::Oldest)
            .map(|records| records.into_iter().map(|r| r.file_path).collect())
            .unwrap_or_else(|e| {
                log::warn!("index listing failed: {}", e);
                Vec::new()
            });

        backups
            .iter()
            .chain(indexed.iter())
            .map(|path| self.fs.length(path))
            .sum()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // LOOKUPS
    // ═══════════════════════════════════════════════════════════════════════

    /// Media records matching any selector, newest first.
    ///
    /// A bare name matches records whose file path contains it. A path is
    /// reduced to its file name, which may appear in the thumbnail or the
    /// file path.
    pub fn map_thumbnails_and_name_to_file_entity(&self, selectors: &[String]) -> Vec<FileRecord> {
        self.get_all_encrypted_media()
            .into_iter()
            .filter(|record| {
                let file_path = record.file_path_str();
                let meta_data = record.meta_data();
                selectors.iter().any(|selector| {
                    if !selector.contains('/') {
                        file_path.contains(selector.as_str())
                    } else {
                        let name = get_name_of_file_with_extension(selector);
                        meta_data.contains(&name) || file_path.contains(&name)
                    }
                })
            })
            .collect()
    }

    pub fn get_file_by_id(&self, id: i64) -> Option<FileRecord> {
        self.read_or_default("by id", |account| self.store.get_by_id(account, id))
    }

    /// Audio record by id; `None` if the id belongs to another type
    pub fn get_audio_by_id(&self, id: i64) -> Option<FileRecord> {
        self.get_file_by_id(id)
            .filter(|r| r.file_type() == FileType::Audio)
    }

    /// Photo or video whose thumbnail matches the `LIKE` pattern
    pub fn get_file_by_thumb_path(&self, thumb: &str) -> Option<FileRecord> {
        self.read_or_default("by thumb", |account| {
            self.store.find_by_thumb(account, thumb, &FileType::MEDIA)
        })
    }

    pub fn get_all_files(&self) -> Vec<FileRecord> {
        self.read_or_default("all", |account| self.store.list(account, &[], Order::Oldest))
    }

    /// Photos and videos, newest first
    pub fn get_all_encrypted_media(&self) -> Vec<FileRecord> {
        self.read_or_default("media", |account| {
            self.store.list(account, &FileType::MEDIA, Order::Newest)
        })
    }

    /// Photos, newest first
    pub fn get_all_images(&self) -> Vec<FileRecord> {
        self.read_or_default("images", |account| {
            self.store.list(account, &[FileType::Photo], Order::Newest)
        })
    }

    /// Videos, newest first
    pub fn get_all_videos(&self) -> Vec<FileRecord> {
        self.read_or_default("videos", |account| {
            self.store.list(account, &[FileType::Video], Order::Newest)
        })
    }

    pub fn get_all_audio_files(&self) -> Vec<FileRecord> {
        self.read_or_default("audio", |account| {
            self.store.list(account, &[FileType::Audio], Order::Oldest)
        })
    }

    pub fn get_all_text_files(&self) -> Vec<FileRecord> {
        self.read_or_default("text", |account| {
            self.store.list(account, &[FileType::Text], Order::Oldest)
        })
    }

    pub fn get_last_encrypted_media_thumbnail(&self) -> Option<PathBuf> {
        self.last_thumbnail(&FileType::MEDIA)
    }

    pub fn get_last_encrypted_photo_thumbnail(&self) -> Option<PathBuf> {
        self.last_thumbnail(&[FileType::Photo])
    }

    pub fn get_last_encrypted_video_thumbnail(&self) -> Option<PathBuf> {
        self.last_thumbnail(&[FileType::Video])
    }

    /// Thumbnail of the last record in storage order that has one
    fn last_thumbnail(&self, types: &[FileType]) -> Option<PathBuf> {
        self.read_or_default("last thumbnail", |account| {
            self.store.list(account, types, Order::Oldest)
        })
        .iter()
        .rev()
        .find_map(|r| r.kind.thumbnail().map(PathBuf::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::StaticAccount;
    use crate::crypto::VaultKey;
    use crate::index::record::FileKind;
    use crate::index::store::SqliteFileIndex;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// SQLite store that counts batch deletes
    struct CountingStore {
        inner: SqliteFileIndex,
        delete_calls: AtomicUsize,
        deleted: Mutex<Vec<FileRecord>>,
        fail_counts_for: Option<FileType>,
        fail_deletes: bool,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: SqliteFileIndex::open_in_memory().unwrap(),
                delete_calls: AtomicUsize::new(0),
                deleted: Mutex::new(Vec::new()),
                fail_counts_for: None,
                fail_deletes: false,
            }
        }
    }

    impl FileIndexStore for CountingStore {
        fn insert_all(&self, account: &str, records: &[FileRecord]) -> VaultResult<Vec<i64>> {
            self.inner.insert_all(account, records)
        }
        fn upsert(&self, account: &str, record: &FileRecord) -> VaultResult<i64> {
            self.inner.upsert(account, record)
        }
        fn delete_all(&self, account: &str, records: &[FileRecord]) -> VaultResult<Vec<FileRecord>> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            self.deleted.lock().extend_from_slice(records);
            if self.fail_deletes {
                return Err(VaultError::DatabaseError("delete failed".into()));
            }
            self.inner.delete_all(account, records)
        }
        fn count_by_type(&self, account: &str, file_type: FileType) -> VaultResult<u64> {
            if self.fail_counts_for == Some(file_type) {
                return Err(VaultError::DatabaseError("count failed".into()));
            }
            self.inner.count_by_type(account, file_type)
        }
        fn list(&self, account: &str, types: &[FileType], order: Order) -> VaultResult<Vec<FileRecord>> {
            self.inner.list(account, types, order)
        }
        fn get_by_id(&self, account: &str, id: i64) -> VaultResult<Option<FileRecord>> {
            self.inner.get_by_id(account, id)
        }
        fn find_by_thumb(
            &self,
            account: &str,
            thumb: &str,
            types: &[FileType],
        ) -> VaultResult<Option<FileRecord>> {
            self.inner.find_by_thumb(account, thumb, types)
        }
    }

    /// Filesystem fake: fixed lengths, records deletions
    #[derive(Default)]
    struct FakeFs {
        lengths: HashMap<PathBuf, u64>,
        deleted: Mutex<Vec<PathBuf>>,
    }

    impl FileSystem for FakeFs {
        fn delete(&self, path: &Path) -> bool {
            self.deleted.lock().push(path.to_path_buf());
            false
        }
        fn length(&self, path: &Path) -> u64 {
            self.lengths.get(path).copied().unwrap_or(0)
        }
    }

    struct FixedBackups(VaultResult<Vec<PathBuf>>);

    impl BackupFileProvider for FixedBackups {
        fn get_all_backup_files(&self, _account: &str) -> VaultResult<Vec<PathBuf>> {
            match &self.0 {
                Ok(paths) => Ok(paths.clone()),
                Err(_) => Err(VaultError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "backup dir unreadable",
                ))),
            }
        }
    }

    struct Fixture {
        repo: FilesRepository,
        store: Arc<CountingStore>,
        fs: Arc<FakeFs>,
        account: Arc<StaticAccount>,
    }

    fn fixture_with(store: CountingStore, fs: FakeFs, backups: FixedBackups) -> Fixture {
        let store = Arc::new(store);
        let fs = Arc::new(fs);
        let account = Arc::new(StaticAccount::new("alice", VaultKey::new([1; 32])));
        let repo = FilesRepository::new(
            store.clone(),
            account.clone(),
            Arc::new(backups),
            fs.clone(),
        );
        Fixture {
            repo,
            store,
            fs,
            account,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(CountingStore::new(), FakeFs::default(), FixedBackups(Ok(Vec::new())))
    }

    fn photo(path: &str, thumb: &str) -> FileRecord {
        FileRecord::new(
            path,
            FileKind::from_columns(FileType::Photo, thumb),
        )
    }

    #[test]
    fn test_insert_overwrites_account_and_scopes_reads() {
        let f = fixture();
        let mut record = photo("/v/files/a.jpg", "");
        record.account_name = "mallory".into();

        f.repo.insert_files(&[record]).unwrap();

        let all = f.repo.get_all_files();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].account_name, "alice");

        f.account.login("bob", VaultKey::new([2; 32]));
        assert!(f.repo.get_all_files().is_empty());
        assert_eq!(f.repo.get_medias_count(), 0);
    }

    #[test]
    fn test_no_account_gives_zero_values() {
        let f = fixture();
        f.repo
            .insert_files(&[photo("/v/files/a.jpg", ""), FileRecord::new("/v/files/n", FileKind::Text)])
            .unwrap();
        f.account.logout();

        let counts = f.repo.get_all_files_type_counts();
        assert_eq!(counts.len(), FileType::ALL.len());
        assert!(counts.values().all(|&c| c == 0));

        assert_eq!(f.repo.get_medias_count(), 0);
        assert_eq!(f.repo.get_all_files_size(), 0);
        assert!(f.repo.get_all_encrypted_media().is_empty());
        assert!(f.repo.get_file_by_id(1).is_none());
        assert!(matches!(
            f.repo.insert_files(&[photo("/v/files/b.jpg", "")]),
            Err(VaultError::NoActiveAccount)
        ));
        assert!(matches!(
            f.repo.update_file(&photo("/v/files/b.jpg", "")),
            Err(VaultError::NoActiveAccount)
        ));
    }

    #[test]
    fn test_type_counts_idempotent_and_failure_is_zero() {
        let mut store = CountingStore::new();
        store.fail_counts_for = Some(FileType::Video);
        let f = fixture_with(store, FakeFs::default(), FixedBackups(Ok(Vec::new())));

        f.repo
            .insert_files(&[
                photo("/v/files/a.jpg", ""),
                photo("/v/files/b.jpg", ""),
                FileRecord::new("/v/files/c.mp4", FileKind::Video { thumbnail: None }),
                FileRecord::new("/v/files/d.txt", FileKind::Text),
            ])
            .unwrap();

        let first = f.repo.get_all_files_type_counts();
        let second = f.repo.get_all_files_type_counts();
        assert_eq!(first, second);

        assert_eq!(first[&FileType::Photo], 2);
        assert_eq!(first[&FileType::Video], 0);
        assert_eq!(first[&FileType::Audio], 0);
        assert_eq!(first[&FileType::Text], 1);
        assert_eq!(f.repo.get_photos_count(), 2);
    }

    #[test]
    fn test_selector_matching() {
        let f = fixture();
        f.repo
            .insert_files(&[
                photo("media1", ""),
                photo("/path/media2", ""),
                photo("media3", ""),
                photo("media", "media2"),
            ])
            .unwrap();

        let selectors = vec!["media1".to_string(), "/path/media2".to_string()];
        let matched = f.repo.map_thumbnails_and_name_to_file_entity(&selectors);

        let paths: Vec<_> = matched.iter().map(|r| r.file_path_str()).collect();
        assert_eq!(paths, vec!["media", "/path/media2", "media1"]);
    }

    #[test]
    fn test_selector_matching_ignores_audio_and_text() {
        let f = fixture();
        f.repo
            .insert_files(&[
                FileRecord::new("/v/files/memo.m4a", FileKind::Audio { meta: serde_json::Value::Null }),
                FileRecord::new("/v/files/memo.txt", FileKind::Text),
            ])
            .unwrap();

        assert!(f
            .repo
            .map_thumbnails_and_name_to_file_entity(&["memo".to_string()])
            .is_empty());
    }

    #[test]
    fn test_delete_removes_rows_then_files() {
        let f = fixture();
        f.repo
            .insert_files(&[
                photo("media1", ""),
                photo("/path/media2", ""),
                photo("media3", ""),
                photo("media", "media2"),
                FileRecord::new(
                    "voice",
                    FileKind::Audio {
                        meta: serde_json::json!({"name": "voice.m4a"}),
                    },
                ),
            ])
            .unwrap();

        let records = f.repo.get_all_files();
        assert_eq!(f.repo.delete_encrypted_files_from_krypt_db_and_file_system(&records), 5);

        assert_eq!(f.store.delete_calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.store.deleted.lock().len(), 5);
        assert!(f.repo.get_all_files().is_empty());

        let deleted: Vec<_> = f
            .fs
            .deleted
            .lock()
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            deleted,
            vec!["media1", "/path/media2", "media3", "media", "media2", "voice"]
        );
    }

    #[test]
    fn test_delete_leaves_other_accounts_files_alone() {
        let f = fixture();
        f.repo
            .insert_files(&[photo("/v/files/a.jpg", "/v/thumbs/a_thumb.jpg")])
            .unwrap();
        let alice_records = f.repo.get_all_files();

        f.account.login("bob", VaultKey::new([2; 32]));
        let removed = f
            .repo
            .delete_encrypted_files_from_krypt_db_and_file_system(&alice_records);

        assert_eq!(removed, 0);
        assert!(f.fs.deleted.lock().is_empty());

        f.account.login("alice", VaultKey::new([1; 32]));
        assert_eq!(f.repo.get_all_files(), alice_records);
    }

    #[test]
    fn test_delete_only_unlinks_removed_rows() {
        let f = fixture();
        f.repo.insert_files(&[photo("/v/files/a.jpg", "")]).unwrap();
        let mut records = f.repo.get_all_files();

        let mut stale = photo("/v/files/gone.jpg", "");
        stale.id = Some(9_999);
        records.push(stale);

        assert_eq!(f.repo.delete_encrypted_files_from_krypt_db_and_file_system(&records), 1);
        assert_eq!(*f.fs.deleted.lock(), vec![PathBuf::from("/v/files/a.jpg")]);
    }

    #[test]
    fn test_delete_keeps_files_without_account_or_on_index_error() {
        let f = fixture();
        f.repo.insert_files(&[photo("/v/files/a.jpg", "")]).unwrap();
        let records = f.repo.get_all_files();

        f.account.logout();
        assert_eq!(f.repo.delete_encrypted_files_from_krypt_db_and_file_system(&records), 0);
        assert_eq!(f.store.delete_calls.load(Ordering::SeqCst), 0);
        assert!(f.fs.deleted.lock().is_empty());

        let mut store = CountingStore::new();
        store.fail_deletes = true;
        let f = fixture_with(store, FakeFs::default(), FixedBackups(Ok(Vec::new())));
        f.repo.insert_files(&[photo("/v/files/a.jpg", "")]).unwrap();
        let records = f.repo.get_all_files();

        assert_eq!(f.repo.delete_encrypted_files_from_krypt_db_and_file_system(&records), 0);
        assert_eq!(f.store.delete_calls.load(Ordering::SeqCst), 1);
        assert!(f.fs.deleted.lock().is_empty());
        assert_eq!(f.repo.get_all_files().len(), 1);
    }

    #[test]
    fn test_update_cannot_take_over_another_accounts_record() {
        let f = fixture();
        let ids = f.repo.insert_files(&[photo("/v/files/a.jpg", "/v/thumbs/a_thumb.jpg")]).unwrap();
        let original = f.repo.get_file_by_id(ids[0]).unwrap();

        f.account.login("bob", VaultKey::new([2; 32]));
        let mut foreign = photo("/v/files/bob.jpg", "");
        foreign.id = Some(ids[0]);
        assert!(matches!(
            f.repo.update_file(&foreign),
            Err(VaultError::RecordNotFound(id)) if id == ids[0]
        ));
        assert!(f.repo.get_all_files().is_empty());

        f.account.login("alice", VaultKey::new([1; 32]));
        assert_eq!(f.repo.get_all_files(), vec![original]);
    }

    #[test]
    fn test_all_files_size_sums_backups_and_index() {
        let mut fs = FakeFs::default();
        fs.lengths.insert(PathBuf::from("/backups/alice/1.bak"), 100);
        fs.lengths.insert(PathBuf::from("/backups/alice/2.bak"), 20);
        fs.lengths.insert(PathBuf::from("/v/files/a.jpg"), 3);
        fs.lengths.insert(PathBuf::from("/v/files/b.jpg"), 4);

        let backups = FixedBackups(Ok(vec![
            PathBuf::from("/backups/alice/1.bak"),
            PathBuf::from("/backups/alice/2.bak"),
        ]));
        let f = fixture_with(CountingStore::new(), fs, backups);
        f.repo
            .insert_files(&[photo("/v/files/a.jpg", ""), photo("/v/files/b.jpg", "")])
            .unwrap();

        assert_eq!(f.repo.get_all_files_size(), 127);
    }

    #[test]
    fn test_all_files_size_without_backups() {
        let mut fs = FakeFs::default();
        fs.lengths.insert(PathBuf::from("/v/files/a.jpg"), 3);

        let failing = FixedBackups(Err(VaultError::NoActiveAccount));
        let f = fixture_with(CountingStore::new(), fs, failing);
        f.repo.insert_files(&[photo("/v/files/a.jpg", "")]).unwrap();

        assert_eq!(f.repo.get_all_files_size(), 3);
    }

    #[test]
    fn test_lookups_and_update() {
        let f = fixture();
        let ids = f
            .repo
            .insert_files(&[
                photo("/v/files/a.jpg", "/v/thumbs/a_thumb.jpg"),
                FileRecord::new(
                    "/v/files/b.mp4",
                    FileKind::Video {
                        thumbnail: Some(PathBuf::from("/v/thumbs/b_thumb.jpg")),
                    },
                ),
                photo("/v/files/c.jpg", ""),
                FileRecord::new("/v/files/d.m4a", FileKind::Audio { meta: serde_json::Value::Null }),
            ])
            .unwrap();

        assert_eq!(
            f.repo.get_last_encrypted_media_thumbnail(),
            Some(PathBuf::from("/v/thumbs/b_thumb.jpg"))
        );
        assert_eq!(
            f.repo.get_last_encrypted_photo_thumbnail(),
            Some(PathBuf::from("/v/thumbs/a_thumb.jpg"))
        );

        let by_thumb = f.repo.get_file_by_thumb_path("/v/thumbs/b_thumb.jpg").unwrap();
        assert_eq!(by_thumb.id, Some(ids[1]));

        assert!(f.repo.get_audio_by_id(ids[3]).is_some());
        assert!(f.repo.get_audio_by_id(ids[0]).is_none());

        let images: Vec<_> = f.repo.get_all_images().into_iter().map(|r| r.id).collect();
        assert_eq!(images, vec![Some(ids[2]), Some(ids[0])]);
        assert_eq!(f.repo.get_all_videos().len(), 1);
        assert_eq!(f.repo.get_all_audio_files().len(), 1);

        let mut video = f.repo.get_file_by_id(ids[1]).unwrap();
        video.kind = FileKind::Video { thumbnail: None };
        f.repo.update_file(&video).unwrap();

        assert_eq!(f.repo.get_last_encrypted_video_thumbnail(), None);
        assert_eq!(f.repo.get_all_files().len(), 4);
    }
}
