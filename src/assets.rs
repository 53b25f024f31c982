//! Lookup of stored files behind downloadable search results.
//!
//! Funnelback indexes files by their public URL. When the hosting application
//! keeps its own metadata for those files, an [`AssetResolver`] lets the search
//! service show the stored title instead of the crawled one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata of a stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Path relative to the asset store root
    pub path: String,

    /// Display title
    pub title: String,
}

impl FileMetadata {
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
        }
    }
}

/// Resolves an asset path to stored file metadata.
///
/// Lookups are best effort: `None` covers both "not found" and "store
/// unavailable", and the caller falls back to the crawled title.
#[async_trait]
pub trait AssetResolver: Send + Sync + std::fmt::Debug {
    async fn resolve(&self, path: &str) -> Option<FileMetadata>;
}

/// Derive an asset store path from a result's index URL.
///
/// The URL is split on runs of `/` or `\`, empty segments are dropped, and the
/// first three segments (scheme, host and the assets root) are discarded:
/// `https://example.govt.nz/assets/Uploads/report.pdf` becomes
/// `Uploads/report.pdf`.
pub fn asset_path_from_url(url: &str) -> String {
    url.split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .skip(3)
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolver backed by a map of path to metadata
#[derive(Debug, Default, Clone)]
pub struct InMemoryAssetResolver {
    files: HashMap<String, FileMetadata>,
}

impl InMemoryAssetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file under its own path
    pub fn insert(&mut self, file: FileMetadata) {
        self.files.insert(file.path.clone(), file);
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_file(mut self, path: impl Into<String>, title: impl Into<String>) -> Self {
        self.insert(FileMetadata::new(path, title));
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[async_trait]
impl AssetResolver for InMemoryAssetResolver {
    async fn resolve(&self, path: &str) -> Option<FileMetadata> {
        self.files.get(path).cloned()
    }
}
