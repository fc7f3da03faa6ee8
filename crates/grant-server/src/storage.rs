//! On-disk storage for uploaded application files.
//!
//! Bytes live in a single flat directory. Each stored name is prefixed with
//! the upload time in milliseconds and a random number so that two uploads
//! of the same file never collide. The database row only records the path.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

/// Longest sanitized original name kept in a stored file name.
const MAX_NAME_LEN: usize = 120;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to draw a random file suffix: {0}")]
    Random(getrandom::Error),
}

impl StorageError {
    fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether the addressed file does not exist.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Flat upload directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub async fn ensure_dir(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StorageError::io("create", &self.dir, e))
    }

    /// Write `bytes` under a fresh unique name derived from `original_name`.
    /// Returns the path the bytes were written to.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if no random suffix is available or the write
    /// fails.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        self.ensure_dir().await?;
        let suffix = getrandom::u32().map_err(StorageError::Random)?;
        let stored_name = format!(
            "{}-{suffix}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(original_name)
        );
        let path = self.dir.join(stored_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::io("write", &path, e))?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "upload stored");
        Ok(path)
    }

    /// # Errors
    ///
    /// Returns `StorageError::Io`; check [`StorageError::is_missing`] to tell
    /// a vanished file from other failures.
    pub async fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| StorageError::io("read", path, e))
    }

    /// Remove stored bytes. A file that is already gone is not an error;
    /// any other failure is logged and swallowed.
    pub async fn remove_best_effort(&self, path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "upload removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove upload");
            }
        }
    }

    /// Every regular file currently in the upload directory, sorted.
    /// A missing directory holds no files.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory exists but cannot be read.
    pub async fn list(&self) -> Result<Vec<PathBuf>, StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io("list", &self.dir, e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io("list", &self.dir, e))?
        {
            let is_file = entry
                .file_type()
                .await
                .map_err(|e| StorageError::io("stat", &entry.path(), e))?
                .is_file();
            if is_file {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Reduce a client-supplied name to a safe final path component.
///
/// Directory parts are dropped and anything outside ASCII letters, digits,
/// `.`, `-` and `_` becomes `_`.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
