//! Content block reference extraction.
//!
//! A block embeds another block with the marker
//! `{{content_blocks.${name}}}`. The name may contain ASCII word characters
//! and hyphens; anything else does not form a reference. The marker syntax is
//! the only bit-exact contract between templates and the resolver.
//!
//! # Usage
//!
//! ```rust
//! use blockdeploy::resolver::reference_extractor::extract_references;
//!
//! let template = "Hi {{content_blocks.${greeting}}}! {{content_blocks.${footer}}}";
//! assert_eq!(extract_references(template), vec!["greeting", "footer"]);
//! ```

use regex::Regex;
use std::sync::LazyLock;

use crate::core::BlockName;

/// `{{content_blocks.${NAME}}}` with NAME captured.
static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{content_blocks\.\$\{([A-Za-z0-9_-]+)\}\}\}")
        .expect("content block reference pattern is valid")
});

/// Extract referenced block names from template content.
///
/// Returns names in order of appearance. Duplicates are kept: a block that
/// references `footer` twice yields `footer` twice. Content without any
/// marker yields an empty vector.
#[must_use]
pub fn extract_references(content: &str) -> Vec<BlockName> {
    REFERENCE_RE
        .captures_iter(content)
        .filter_map(|cap| cap.get(1))
        .map(|name| name.as_str().to_string())
        .collect()
}
