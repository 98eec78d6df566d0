//! Krypt Vault - File Index Storage (SQLite)
//!
//! Row-level access to the `files` table. Every call takes the owning
//! account explicitly; resolving the active account is the repository's job.

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::record::{FileKind, FileRecord, FileType, RecordStatus};
use crate::error::{VaultError, VaultResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS files (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    type        TEXT NOT NULL,
    filePath    TEXT NOT NULL,
    metaData    TEXT NOT NULL DEFAULT '',
    accountName TEXT NOT NULL,
    status      TEXT NOT NULL DEFAULT 'committed'
);

CREATE INDEX IF NOT EXISTS idx_files_account_type ON files(accountName, type);
"#;

const COLUMNS: &str = "id, type, filePath, metaData, accountName, status";

/// Ordering of multi-row results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Storage order (ascending id)
    Oldest,
    /// Descending id
    Newest,
}

impl Order {
    fn sql(&self) -> &'static str {
        match self {
            Order::Oldest => "ORDER BY id ASC",
            Order::Newest => "ORDER BY id DESC",
        }
    }
}

/// Account-scoped persistence for [`FileRecord`]s
pub trait FileIndexStore: Send + Sync {
    /// Insert records in one transaction; returns the assigned ids
    fn insert_all(&self, account: &str, records: &[FileRecord]) -> VaultResult<Vec<i64>>;

    /// Replace every column of the account's row with the record's id, or
    /// insert a new row when the record has no id.
    ///
    /// An id the account does not own is `RecordNotFound`; no row changes.
    fn upsert(&self, account: &str, record: &FileRecord) -> VaultResult<i64>;

    /// Delete records in one transaction; returns the records that matched
    /// at least one of the account's rows
    fn delete_all(&self, account: &str, records: &[FileRecord]) -> VaultResult<Vec<FileRecord>>;

    fn count_by_type(&self, account: &str, file_type: FileType) -> VaultResult<u64>;

    /// Records of the given types; an empty slice means every type
    fn list(&self, account: &str, types: &[FileType], order: Order) -> VaultResult<Vec<FileRecord>>;

    fn get_by_id(&self, account: &str, id: i64) -> VaultResult<Option<FileRecord>>;

    /// Lowest-id record of the given types whose `metaData` is `LIKE` the pattern
    fn find_by_thumb(
        &self,
        account: &str,
        thumb: &str,
        types: &[FileType],
    ) -> VaultResult<Option<FileRecord>>;
}

/// SQLite-backed index
pub struct SqliteFileIndex {
    conn: Mutex<Connection>,
}

impl SqliteFileIndex {
    /// Open (or create) the index database at `path`
    pub fn open(path: &Path) -> VaultResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::init(Connection::open(path)?)
    }

    /// Private in-memory database
    pub fn open_in_memory() -> VaultResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> VaultResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<FileRecord> {
        let type_str: String = row.get(1)?;
        let file_type: FileType = type_str.parse().map_err(|_| {
            rusqlite::Error::InvalidColumnType(1, type_str.clone(), rusqlite::types::Type::Text)
        })?;
        let file_path: String = row.get(2)?;
        let meta_data: String = row.get(3)?;
        let status: String = row.get(5)?;

        Ok(FileRecord {
            id: Some(row.get(0)?),
            kind: FileKind::from_columns(file_type, &meta_data),
            file_path: file_path.into(),
            account_name: row.get(4)?,
            status: RecordStatus::parse(&status),
        })
    }
}

/// `?2, ?3, ...` placeholders for a type filter following the account param
fn type_placeholders(count: usize) -> String {
    (0..count)
        .map(|i| format!("?{}", i + 2))
        .collect::<Vec<_>>()
        .join(", ")
}

impl FileIndexStore for SqliteFileIndex {
    fn insert_all(&self, account: &str, records: &[FileRecord]) -> VaultResult<Vec<i64>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let mut ids = Vec::with_capacity(records.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO files (type, filePath, metaData, accountName, status)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.file_type().as_str(),
                    record.file_path_str(),
                    record.meta_data(),
                    account,
                    RecordStatus::Committed.as_str(),
                ])?;
                ids.push(tx.last_insert_rowid());
            }
        }

        tx.commit()?;
        Ok(ids)
    }

    fn upsert(&self, account: &str, record: &FileRecord) -> VaultResult<i64> {
        let conn = self.conn.lock();

        let Some(id) = record.id else {
            conn.execute(
                "INSERT INTO files (type, filePath, metaData, accountName, status)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.file_type().as_str(),
                    record.file_path_str(),
                    record.meta_data(),
                    account,
                    record.status.as_str(),
                ],
            )?;
            return Ok(conn.last_insert_rowid());
        };

        let changed = conn.execute(
            "UPDATE files SET type = ?1, filePath = ?2, metaData = ?3, status = ?4
             WHERE id = ?5 AND accountName = ?6",
            params![
                record.file_type().as_str(),
                record.file_path_str(),
                record.meta_data(),
                record.status.as_str(),
                id,
                account,
            ],
        )?;
        if changed == 0 {
            return Err(VaultError::RecordNotFound(id));
        }
        Ok(id)
    }

    fn delete_all(&self, account: &str, records: &[FileRecord]) -> VaultResult<Vec<FileRecord>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let mut removed = Vec::new();
        {
            let mut by_id =
                tx.prepare("DELETE FROM files WHERE accountName = ?1 AND id = ?2")?;
            let mut by_path =
                tx.prepare("DELETE FROM files WHERE accountName = ?1 AND filePath = ?2")?;
            for record in records {
                let rows = match record.id {
                    Some(id) => by_id.execute(params![account, id])?,
                    None => by_path.execute(params![account, record.file_path_str()])?,
                };
                if rows > 0 {
                    removed.push(record.clone());
                }
            }
        }

        tx.commit()?;
        Ok(removed)
    }

    fn count_by_type(&self, account: &str, file_type: FileType) -> VaultResult<u64> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM files WHERE accountName = ?1 AND type = ?2",
            params![account, file_type.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn list(&self, account: &str, types: &[FileType], order: Order) -> VaultResult<Vec<FileRecord>> {
        let sql = if types.is_empty() {
            format!(
                "SELECT {} FROM files WHERE accountName = ?1 {}",
                COLUMNS,
                order.sql()
            )
        } else {
            format!(
                "SELECT {} FROM files WHERE accountName = ?1 AND type IN ({}) {}",
                COLUMNS,
                type_placeholders(types.len()),
                order.sql()
            )
        };

        let mut values = vec![account.to_string()];
        values.extend(types.iter().map(|t| t.as_str().to_string()));

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), Self::row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    fn get_by_id(&self, account: &str, id: i64) -> VaultResult<Option<FileRecord>> {
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT {} FROM files WHERE accountName = ?1 AND id = ?2",
            COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![account, id], Self::row_to_record)
            .optional()?)
    }

    fn find_by_thumb(
        &self,
        account: &str,
        thumb: &str,
        types: &[FileType],
    ) -> VaultResult<Option<FileRecord>> {
        let types = if types.is_empty() { &FileType::ALL[..] } else { types };
        let pattern_idx = types.len() + 2;
        let sql = format!(
            "SELECT {} FROM files WHERE accountName = ?1 AND type IN ({})
             AND metaData LIKE ?{} ORDER BY id ASC LIMIT 1",
            COLUMNS,
            type_placeholders(types.len()),
            pattern_idx
        );

        let mut values = vec![account.to_string()];
        values.extend(types.iter().map(|t| t.as_str().to_string()));
        values.push(thumb.to_string());

        let conn = self.conn.lock();
        Ok(conn
            .query_row(&sql, params_from_iter(values.iter()), Self::row_to_record)
            .optional()?)
    }
}
