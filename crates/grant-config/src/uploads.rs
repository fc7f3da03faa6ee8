//! Upload storage configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest accepted upload: 10 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

fn default_dir() -> PathBuf {
    PathBuf::from("uploads")
}

const fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct UploadsConfig {
    /// Directory holding uploaded file bytes.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = UploadsConfig::default();
        assert_eq!(config.dir, PathBuf::from("uploads"));
        assert_eq!(config.max_file_bytes, 10_485_760);
    }
}
