//! Krypt Vault - Index Records
//!
//! `FileRecord` is what the index stores per ciphertext artifact. The
//! type-dependent `metaData` column is modelled as [`FileKind`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VaultError;

/// Kind of content an artifact holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Photo,
    Video,
    Audio,
    Text,
}

impl FileType {
    /// Every type, in display order
    pub const ALL: [FileType; 4] = [
        FileType::Photo,
        FileType::Video,
        FileType::Audio,
        FileType::Text,
    ];

    /// Types shown by the media picker
    pub const MEDIA: [FileType; 2] = [FileType::Photo, FileType::Video];

    /// Value persisted in the `type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Photo => "photo",
            FileType::Video => "video",
            FileType::Audio => "audio",
            FileType::Text => "text",
        }
    }

    pub fn is_media(&self) -> bool {
        matches!(self, FileType::Photo | FileType::Video)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "photo" => Ok(FileType::Photo),
            "video" => Ok(FileType::Video),
            "audio" => Ok(FileType::Audio),
            "text" => Ok(FileType::Text),
            other => Err(VaultError::DatabaseError(format!("unknown file type: {}", other))),
        }
    }
}

/// Type plus its type-specific metadata
#[derive(Debug, Clone, PartialEq)]
pub enum FileKind {
    /// Encrypted thumbnail, if one could be produced
    Photo { thumbnail: Option<PathBuf> },
    Video { thumbnail: Option<PathBuf> },
    /// Free-form JSON (name, date, ...)
    Audio { meta: serde_json::Value },
    Text,
}

impl FileKind {
    pub fn file_type(&self) -> FileType {
        match self {
            FileKind::Photo { .. } => FileType::Photo,
            FileKind::Video { .. } => FileType::Video,
            FileKind::Audio { .. } => FileType::Audio,
            FileKind::Text => FileType::Text,
        }
    }

    /// Encrypted thumbnail of a photo or video
    pub fn thumbnail(&self) -> Option<&Path> {
        match self {
            FileKind::Photo { thumbnail } | FileKind::Video { thumbnail } => thumbnail.as_deref(),
            _ => None,
        }
    }

    /// Kind for a media type with an optional thumbnail; other types ignore it
    pub fn with_thumbnail(file_type: FileType, thumbnail: Option<PathBuf>) -> Self {
        match file_type {
            FileType::Photo => FileKind::Photo { thumbnail },
            FileType::Video => FileKind::Video { thumbnail },
            FileType::Audio => FileKind::Audio {
                meta: serde_json::Value::Null,
            },
            FileType::Text => FileKind::Text,
        }
    }

    /// Serialize into the `metaData` column
    pub fn meta_data(&self) -> String {
        match self {
            FileKind::Photo { thumbnail } | FileKind::Video { thumbnail } => thumbnail
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
            FileKind::Audio { meta } if meta.is_null() => String::new(),
            FileKind::Audio {
                meta: serde_json::Value::String(raw),
            } => raw.clone(),
            FileKind::Audio { meta } => meta.to_string(),
            FileKind::Text => String::new(),
        }
    }

    /// Rebuild from the `(type, metaData)` column pair.
    ///
    /// Audio metadata that is not valid JSON is kept as a JSON string.
    pub fn from_columns(file_type: FileType, meta_data: &str) -> Self {
        let trimmed = meta_data.trim();
        match file_type {
            FileType::Photo | FileType::Video => {
                let thumbnail = (!trimmed.is_empty()).then(|| PathBuf::from(meta_data));
                FileKind::with_thumbnail(file_type, thumbnail)
            }
            FileType::Audio => {
                let meta = if trimmed.is_empty() {
                    serde_json::Value::Null
                } else {
                    serde_json::from_str(meta_data)
                        .unwrap_or_else(|_| serde_json::Value::String(meta_data.to_string()))
                };
                FileKind::Audio { meta }
            }
            FileType::Text => FileKind::Text,
        }
    }
}

/// Write state of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordStatus {
    Pending,
    #[default]
    Committed,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Committed => "committed",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "pending" => RecordStatus::Pending,
            _ => RecordStatus::Committed,
        }
    }
}

/// One indexed ciphertext artifact
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    /// Assigned by the index on insert; `None` before that
    pub id: Option<i64>,
    pub kind: FileKind,
    /// Encrypted artifact
    pub file_path: PathBuf,
    pub account_name: String,
    pub status: RecordStatus,
}

impl FileRecord {
    /// New record, not yet inserted. The account is filled in on insert.
    pub fn new(file_path: impl Into<PathBuf>, kind: FileKind) -> Self {
        Self {
            id: None,
            kind,
            file_path: file_path.into(),
            account_name: String::new(),
            status: RecordStatus::Committed,
        }
    }

    pub fn file_type(&self) -> FileType {
        self.kind.file_type()
    }

    pub fn meta_data(&self) -> String {
        self.kind.meta_data()
    }

    /// `filePath` as stored
    pub fn file_path_str(&self) -> String {
        self.file_path.to_string_lossy().into_owned()
    }
}
