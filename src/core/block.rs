//! Content block file records and naming rules.

use std::fmt;

/// Name of a content block, derived from its file path.
pub type BlockName = String;

/// A content block file as produced by a file source.
///
/// `path` is whatever the source reports (an absolute filesystem path in full
/// mode, a repository-relative path in incremental mode); only its final
/// segment matters for naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path of the file, `/`-separated
    pub path: String,
    /// UTF-8 template content
    pub content: String,
}

impl FileRecord {
    /// Create a new file record.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// The block name this file deploys as.
    #[must_use]
    pub fn block_name(&self) -> BlockName {
        block_name_from_path(&self.path)
    }
}

impl fmt::Display for FileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Derive a block name from a file path.
///
/// Takes the final `/`-separated segment and strips the last extension:
///
/// ```rust
/// use blockdeploy::core::block_name_from_path;
///
/// assert_eq!(block_name_from_path("content_blocks/promo/header.liquid"), "header");
/// assert_eq!(block_name_from_path("content_blocks/footer.v2.liquid"), "footer.v2");
/// assert_eq!(block_name_from_path("content_blocks/README"), "");
/// assert_eq!(block_name_from_path(""), "");
/// ```
///
/// A segment without a dot yields an empty name; such files are never
/// produced by the sources because they filter on extension.
#[must_use]
pub fn block_name_from_path(path: &str) -> BlockName {
    let file_name = path.rsplit('/').next().unwrap_or_default();
    match file_name.rfind('.') {
        Some(idx) => file_name[..idx].to_string(),
        None => String::new(),
    }
}

/// Prepend `prefix` to a block name for the remote store.
///
/// Prefixing happens only at the publish boundary; references inside the
/// dependency graph always use unprefixed names.
#[must_use]
pub fn prefixed_name(name: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}{name}")
    }
}
