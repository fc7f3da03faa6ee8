//! Offline maintenance tasks behind the `import` and `check-files` commands.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use grant_core::entities::ImportSummary;
use grant_db::service::GrantService;
use serde::Serialize;

use crate::storage::UploadStore;

/// Import a JSON array of grant records from `path`.
///
/// # Errors
///
/// Fails if the file cannot be read, is not a JSON array, or the database
/// is unavailable. Individual bad records are counted, not fatal.
pub async fn import_file(service: &GrantService, path: &Path) -> anyhow::Result<ImportSummary> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let records: Vec<serde_json::Value> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of grant records", path.display()))?;
    tracing::info!(records = records.len(), file = %path.display(), "importing grants");
    Ok(service.import_grants(records).await?)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingFile {
    pub id: i64,
    pub file_path: String,
}

/// Disagreements between `application_files` rows and the upload directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileCheckReport {
    pub rows_checked: usize,
    pub files_on_disk: usize,
    /// Rows whose stored bytes are gone.
    pub missing: Vec<MissingFile>,
    /// Files in the upload directory no row points at.
    pub orphans: Vec<PathBuf>,
}

impl FileCheckReport {
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.missing.is_empty() && self.orphans.is_empty()
    }
}

/// Compare stored file rows with the upload directory. Reports only; nothing
/// is repaired.
///
/// # Errors
///
/// Fails if the database or the upload directory cannot be read.
pub async fn check_files(
    service: &GrantService,
    uploads: &UploadStore,
) -> anyhow::Result<FileCheckReport> {
    let rows = service.list_file_paths().await?;
    let on_disk = uploads.list().await?;

    let mut referenced = BTreeSet::new();
    let mut missing = Vec::new();
    for (id, file_path) in &rows {
        let path = PathBuf::from(file_path);
        let exists = tokio::fs::try_exists(&path)
            .await
            .with_context(|| format!("failed to stat {file_path}"))?;
        if !exists {
            tracing::warn!(file_id = id, path = %file_path, "stored bytes missing");
            missing.push(MissingFile {
                id: *id,
                file_path: file_path.clone(),
            });
        }
        referenced.insert(path);
    }

    let orphans: Vec<PathBuf> = on_disk
        .iter()
        .filter(|path| !referenced.contains(*path))
        .cloned()
        .collect();
    for orphan in &orphans {
        tracing::warn!(path = %orphan.display(), "upload has no file row");
    }

    Ok(FileCheckReport {
        rows_checked: rows.len(),
        files_on_disk: on_disk.len(),
        missing,
        orphans,
    })
}
