//! Full-mode source: walk a directory tree.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use super::{FileSource, has_extension};
use crate::core::{DeployError, FileRecord};

/// Every file under `root` whose extension is allowed, recursing into
/// subdirectories.
///
/// Entries are visited in file-name order so the batch order is stable across
/// platforms. Symlinks are not followed.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirectorySource {
    /// Create a source for `root` accepting `extensions` (without dots).
    pub fn new(root: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            extensions,
        }
    }

    /// The directory being walked.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn walk(&self) -> Result<Vec<FileRecord>> {
        if !self.root.is_dir() {
            return Err(DeployError::SourceError {
                operation: "read content blocks directory".to_string(),
                path: self.root.display().to_string(),
                reason: "directory does not exist".to_string(),
            }
            .into());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| DeployError::SourceError {
                operation: "walk".to_string(),
                path: e.path().map_or_else(|| self.root.display().to_string(), |p| p.display().to_string()),
                reason: e.to_string(),
            })?;

            let path = entry.path();
            if !entry.file_type().is_file() || !has_extension(path, &self.extensions) {
                trace!("Skipping {}", path.display());
                continue;
            }

            let content = std::fs::read_to_string(path).map_err(|e| DeployError::SourceError {
                operation: "read".to_string(),
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

            files.push(FileRecord::new(path.to_string_lossy().replace('\\', "/"), content));
        }

        debug!("Found {} content block files under {}", files.len(), self.root.display());
        Ok(files)
    }
}

impl FileSource for DirectorySource {
    async fn collect(&self) -> Result<Vec<FileRecord>> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.walk()).await?
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}
