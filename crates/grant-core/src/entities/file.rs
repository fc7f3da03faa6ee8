use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::FileCategory;

/// An uploaded document attached to a grant.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ApplicationFile {
    pub id: i64,
    pub grant_id: i64,
    /// Name the file was uploaded with.
    pub file_name: String,
    /// Where the bytes live on disk.
    pub file_path: String,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub version_label: Option<String>,
    pub is_final: bool,
    pub notes: Option<String>,
    pub file_category: FileCategory,
    pub file_subcategory: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Metadata for a file whose bytes have already been stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewApplicationFile {
    pub file_name: String,
    pub file_path: String,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub version_label: Option<String>,
    pub is_final: bool,
    pub notes: Option<String>,
    pub file_category: FileCategory,
    pub file_subcategory: Option<String>,
}
