//! Application file endpoints.
//!
//! An upload writes the bytes first and then the row; if the row cannot be
//! written the bytes are removed again. Deleting removes the row first and
//! the bytes afterwards, best effort.

use std::path::Path;

use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use grant_core::entities::{ApplicationFile, NewApplicationFile};
use grant_core::enums::FileCategory;
use grant_db::updates::file::FileUpdate;

use super::{ApiJson, ApiPath, AppState, deleted};
use crate::error::ApiError;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

struct UploadedPart {
    file_name: String,
    content_type: Option<String>,
    bytes: Bytes,
}

/// Parsed multipart upload form.
#[derive(Default)]
struct UploadForm {
    file: Option<UploadedPart>,
    version_label: Option<String>,
    is_final: bool,
    notes: Option<String>,
    file_category: FileCategory,
    file_subcategory: Option<String>,
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl UploadForm {
    async fn read(multipart: &mut Multipart, max_file_bytes: u64) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    if u64::try_from(bytes.len()).unwrap_or(u64::MAX) > max_file_bytes {
                        return Err(ApiError::PayloadTooLarge(format!(
                            "file exceeds the {max_file_bytes} byte limit"
                        )));
                    }
                    form.file = Some(UploadedPart {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
                "version_label" => form.version_label = non_empty(field.text().await?),
                "is_final" => {
                    form.is_final = field.text().await?.trim().eq_ignore_ascii_case("true");
                }
                "notes" => form.notes = non_empty(field.text().await?),
                "file_category" => {
                    if let Some(raw) = non_empty(field.text().await?) {
                        form.file_category = FileCategory::parse(&raw).ok_or_else(|| {
                            ApiError::validation(format!("unknown file_category '{raw}'"))
                        })?;
                    }
                }
                "file_subcategory" => form.file_subcategory = non_empty(field.text().await?),
                other => tracing::debug!(field = other, "ignoring unknown upload field"),
            }
        }

        Ok(form)
    }
}

pub(super) async fn upload_file(
    State(state): State<AppState>,
    ApiPath(grant_id): ApiPath<i64>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApplicationFile>, ApiError> {
    let mut multipart = multipart?;
    // Unknown grants are rejected before any bytes reach the disk.
    state.service.get_grant(grant_id).await?;

    let form = UploadForm::read(&mut multipart, state.max_file_bytes).await?;
    let part = form
        .file
        .ok_or_else(|| ApiError::validation("multipart field 'file' is required"))?;

    let path = state.uploads.save(&part.file_name, &part.bytes).await?;
    let file_name = if part.file_name.trim().is_empty() {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        part.file_name
    };
    let new_file = NewApplicationFile {
        file_name,
        file_path: path.to_string_lossy().into_owned(),
        file_type: part.content_type,
        file_size: i64::try_from(part.bytes.len()).ok(),
        version_label: form.version_label,
        is_final: form.is_final,
        notes: form.notes,
        file_category: form.file_category,
        file_subcategory: form.file_subcategory,
    };

    match state.service.insert_file(grant_id, &new_file).await {
        Ok(file) => {
            tracing::info!(
                grant_id,
                file_id = file.id,
                size = part.bytes.len(),
                "file uploaded"
            );
            Ok(Json(file))
        }
        Err(e) => {
            state.uploads.remove_best_effort(&path).await;
            Err(e.into())
        }
    }
}

pub(super) async fn list_files(
    State(state): State<AppState>,
    ApiPath(grant_id): ApiPath<i64>,
) -> Result<Json<Vec<ApplicationFile>>, ApiError> {
    Ok(Json(state.service.list_files(grant_id).await?))
}

pub(super) async fn update_file(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<FileUpdate>,
) -> Result<Json<ApplicationFile>, ApiError> {
    Ok(Json(state.service.update_file(id, update).await?))
}

/// Quote-safe ASCII rendering of a name for `Content-Disposition`.
fn disposition_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub(super) async fn download_file(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let file = state.service.get_file(id).await?;
    let bytes = match state.uploads.read(Path::new(&file.file_path)).await {
        Ok(bytes) => bytes,
        Err(e) if e.is_missing() => {
            tracing::warn!(file_id = id, path = %file.file_path, "stored bytes are missing");
            return Err(ApiError::NotFound(format!("File {id} has no stored content")));
        }
        Err(e) => return Err(e.into()),
    };

    let content_type = file
        .file_type
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());
    let disposition = format!(
        "attachment; filename=\"{}\"",
        disposition_name(&file.file_name)
    );
    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

pub(super) async fn delete_file(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let file = state.service.delete_file(id).await?;
    state
        .uploads
        .remove_best_effort(Path::new(&file.file_path))
        .await;
    tracing::info!(file_id = id, grant_id = file.grant_id, "file deleted");
    Ok(deleted())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn disposition_name_escapes_quotes_and_non_ascii() {
        assert_eq!(disposition_name("Budget 2026.xlsx"), "Budget 2026.xlsx");
        assert_eq!(disposition_name("say \"hi\".txt"), "say _hi_.txt");
        assert_eq!(disposition_name("naïve\r\n.pdf"), "na_ve__.pdf");
    }

    #[test]
    fn blank_form_values_are_absent() {
        assert_eq!(non_empty("  ".into()), None);
        assert_eq!(non_empty(" v2 ".into()), Some("v2".into()));
    }
}
