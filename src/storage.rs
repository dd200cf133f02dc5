// src/storage.rs

//! Storage collaborator.
//!
//! The viewer never owns files; it asks a `FileStore` for metadata and bytes
//! by id. Authentication happens in front of the router, so a store only has
//! to answer "does this id exist" and "give me its bytes".

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tokio::fs;

use crate::models::file::FileInfo;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("read failed: {0}")]
    Read(String),
}

/// Retrieve-by-id interface the delivery handlers depend on.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn file_info(&self, id: &str) -> Result<FileInfo, StorageError>;

    async fn file_bytes(&self, id: &str) -> Result<Vec<u8>, StorageError>;
}

/// Ids are opaque, but they become path segments here.
static FILE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,128}$").expect("file id pattern is valid"));

/// Directory-backed store.
///
/// Layout: `<root>/<file_id>/<original filename>`. The directory for an id
/// holds a single regular file; if there are several, the first by name wins.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn locate(&self, id: &str) -> Result<(PathBuf, FileInfo), StorageError> {
        if !FILE_ID.is_match(id) {
            return Err(StorageError::NotFound(id.to_string()));
        }

        let dir = self.root.join(id);
        let mut entries = fs::read_dir(&dir).await.map_err(|e| io_error(id, e))?;

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(id, e))? {
            let meta = entry.metadata().await.map_err(|e| io_error(id, e))?;
            if meta.is_file() {
                files.push((entry.path(), entry.file_name(), meta.len()));
            }
        }
        files.sort_by(|a, b| a.1.cmp(&b.1));

        let (path, name, size) = files
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        let info = FileInfo {
            id: id.to_string(),
            name: name.to_string_lossy().into_owned(),
            size,
        };
        Ok((path, info))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn file_info(&self, id: &str) -> Result<FileInfo, StorageError> {
        let (_, info) = self.locate(id).await?;
        Ok(info)
    }

    async fn file_bytes(&self, id: &str) -> Result<Vec<u8>, StorageError> {
        let (path, _) = self.locate(id).await?;
        fs::read(&path).await.map_err(|e| io_error(id, e))
    }
}

fn io_error(id: &str, err: io::Error) -> StorageError {
    if err.kind() == io::ErrorKind::NotFound {
        StorageError::NotFound(id.to_string())
    } else {
        StorageError::Read(format!("{}: {}", id, err))
    }
}

/// In-memory store, filled before it is shared.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileStore {
    files: HashMap<String, (String, Vec<u8>)>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, id: &str, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(id, name, bytes);
        self
    }

    pub fn insert(&mut self, id: &str, name: &str, bytes: impl Into<Vec<u8>>) {
        self.files
            .insert(id.to_string(), (name.to_string(), bytes.into()));
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn file_info(&self, id: &str) -> Result<FileInfo, StorageError> {
        let (name, bytes) = self
            .files
            .get(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        Ok(FileInfo {
            id: id.to_string(),
            name: name.clone(),
            size: bytes.len() as u64,
        })
    }

    async fn file_bytes(&self, id: &str) -> Result<Vec<u8>, StorageError> {
        self.files
            .get(id)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}
