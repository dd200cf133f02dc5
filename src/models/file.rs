// src/models/file.rs

use serde::{Deserialize, Serialize};

/// Metadata the storage collaborator reports for a file.
/// `name` is only used to derive the extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub id: String,
    pub name: String,
    pub size: u64,
}

/// JSON body returned by the preview endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct PreviewPayload {
    /// Sanitized markup.
    pub content: String,
    pub filename: String,
    pub file_id: String,
}

/// Query string accepted by both delivery endpoints.
#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub file_id: Option<String>,
}
