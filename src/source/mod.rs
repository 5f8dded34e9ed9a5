//! Where a batch of content block files comes from.
//!
//! - [`DirectorySource`] - every eligible file under a directory (full mode)
//! - [`CommitDiffSource`] - files changed between two commits on GitHub
//!   (incremental mode)
//!
//! Both yield [`FileRecord`]s with UTF-8 content in a stable order and filter
//! by file extension.

mod commit_diff;
mod directory;

pub use commit_diff::{CommitDiffSource, GitHubClient, Repository, base_from_event_file};
pub use directory::DirectorySource;

use anyhow::Result;
use std::future::Future;
use std::path::Path;

use crate::core::FileRecord;

/// A producer of content block files for one run.
pub trait FileSource: Send + Sync {
    /// Collect the batch.
    fn collect(&self) -> impl Future<Output = Result<Vec<FileRecord>>> + Send;

    /// Short description for log messages.
    fn describe(&self) -> String;
}

/// Whether `path` has one of `extensions` (compared without the dot, case-sensitive).
pub(crate) fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext))
}
