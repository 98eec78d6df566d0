//! Krypt Vault - File Index
//!
//! Account-scoped catalogue of encrypted artifacts: SQLite storage plus the
//! repository the rest of the crate talks to.

pub mod record;
pub mod repository;
pub mod store;

pub use record::{FileKind, FileRecord, FileType, RecordStatus};
pub use repository::FilesRepository;
pub use store::{FileIndexStore, Order, SqliteFileIndex};
