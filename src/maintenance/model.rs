use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One node returned by a listing call: either a dataset or a folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathEntry {
    pub path: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default, rename = "createdDate")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "type")]
    pub dataset_type: String,
    #[serde(default)]
    pub valuation: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub depth: u32,
}

impl PathEntry {
    pub fn dataset(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn folder(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            depth: 1,
            ..Default::default()
        }
    }

    pub fn is_folder(&self) -> bool {
        self.depth > 0
    }

    pub fn is_dataset(&self) -> bool {
        !self.is_folder()
    }
}

/// Entries in the order the remote side returned them.
pub type ListingResult = Vec<PathEntry>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedFile {
    pub uri: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedVersion {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub deleted_files: Vec<DeletedFile>,
}

/// Result of one delete call against one dataset path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub dataset_path: String,
    #[serde(default)]
    pub total_size: u64,
    #[serde(default, rename = "deletedVersions")]
    pub versions: Vec<DeletedVersion>,
}

impl DeleteOutcome {
    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    pub fn file_count(&self) -> usize {
        self.versions.iter().map(|v| v.deleted_files.len()).sum()
    }
}
