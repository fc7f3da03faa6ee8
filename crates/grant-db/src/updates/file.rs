//! Application file metadata update.

use grant_core::enums::FileCategory;
use serde::{Deserialize, Serialize};

/// Metadata fields a caller may change after upload. Absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_final: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_category: Option<FileCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_subcategory: Option<String>,
}

impl FileUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.version_label.is_none()
            && self.is_final.is_none()
            && self.notes.is_none()
            && self.file_category.is_none()
            && self.file_subcategory.is_none()
    }
}
