//! Sample batches and a fixed file source.

use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::FileRecord;
use crate::source::FileSource;

/// A [`FileSource`] that returns a fixed batch.
#[derive(Debug, Default)]
pub struct StaticSource {
    files: Vec<FileRecord>,
    collected: AtomicUsize,
}

impl StaticSource {
    /// Source yielding `files` in the given order.
    pub fn new(files: Vec<FileRecord>) -> Self {
        Self {
            files,
            collected: AtomicUsize::new(0),
        }
    }

    /// How many times `collect` has been called.
    pub fn collect_count(&self) -> usize {
        self.collected.load(Ordering::SeqCst)
    }
}

impl FileSource for StaticSource {
    async fn collect(&self) -> Result<Vec<FileRecord>> {
        self.collected.fetch_add(1, Ordering::SeqCst);
        Ok(self.files.clone())
    }

    fn describe(&self) -> String {
        format!("{} static files", self.files.len())
    }
}

/// `file2` references `file1`; listed dependent first.
pub fn dependent_pair() -> Vec<FileRecord> {
    vec![
        FileRecord::new("content_blocks/file2.liquid", "Content of file2 {{content_blocks.${file1}}}"),
        FileRecord::new("content_blocks/file1.liquid", "Content of file1"),
    ]
}

/// `a` references `b` and `c`, both of which reference `d`.
pub fn diamond() -> Vec<FileRecord> {
    vec![
        FileRecord::new("content_blocks/a.liquid", "{{content_blocks.${b}}} {{content_blocks.${c}}}"),
        FileRecord::new("content_blocks/b.liquid", "{{content_blocks.${d}}}"),
        FileRecord::new("content_blocks/c.liquid", "{{content_blocks.${d}}}"),
        FileRecord::new("content_blocks/d.liquid", "base"),
    ]
}
