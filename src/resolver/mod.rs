//! Dependency resolution and publish ordering.
//!
//! This module turns an unordered batch of content block files into a
//! publish sequence in which every block comes after the blocks it
//! references. It is pure: no network or disk access happens here, and every
//! error is raised before the caller publishes anything.
//!
//! # Pipeline
//!
//! 1. [`reference_extractor`] finds `{{content_blocks.${name}}}` markers
//! 2. [`dependency_graph`] builds the name → references graph and the
//!    name → file lookup
//! 3. [`resolve`] walks the graph depth-first and emits files in order
//!
//! # Resolution rules
//!
//! Graph keys are visited in the order files were supplied. For each
//! dependency `d` of a block:
//!
//! - `d` already emitted in this run **and** present in the remote store:
//!   satisfied
//! - `d` not part of the batch: [`DeployError::UnresolvedReference`]
//! - otherwise `d` is resolved first, so it is emitted before its dependent
//!
//! A block that exists remotely but is not part of the batch can therefore not
//! be referenced. This mirrors the behavior deployments have always had and
//! is kept deliberately; see `DESIGN.md`.
//!
//! Re-entering a block that is still being resolved fails with
//! [`DeployError::CircularReference`] naming the cycle.
//!
//! # Example
//!
//! ```rust
//! use blockdeploy::core::FileRecord;
//! use blockdeploy::resolver::resolve_batch;
//! use std::collections::HashSet;
//!
//! let files = vec![
//!     FileRecord::new("content_blocks/file2.liquid", "... {{content_blocks.${file1}}} ..."),
//!     FileRecord::new("content_blocks/file1.liquid", "plain"),
//! ];
//!
//! let ordered = resolve_batch(&files, &HashSet::new()).unwrap();
//! let names: Vec<String> = ordered.iter().map(|f| f.block_name()).collect();
//! assert_eq!(names, vec!["file1", "file2"]);
//! ```

pub mod dependency_graph;
pub mod reference_extractor;

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::core::{BlockName, DeployError, FileRecord};

pub use dependency_graph::{DependencyGraph, FileLookup, build_graph};
pub use reference_extractor::extract_references;

/// Resolve a batch into publish order.
///
/// Every call starts from empty state, so resolving the same inputs twice
/// yields the same sequence.
///
/// # Errors
///
/// - [`DeployError::UnresolvedReference`] when a dependency is not in `lookup`
///   and not exempt
/// - [`DeployError::CircularReference`] when blocks in the batch form a cycle
pub fn resolve(
    graph: &DependencyGraph,
    lookup: &FileLookup,
    existing: &HashSet<BlockName>,
) -> Result<Vec<FileRecord>, DeployError> {
    let mut resolution = Resolution::new(graph, lookup, existing);

    for name in graph.names() {
        if !resolution.resolved.contains(name) {
            resolution.resolve_one(name)?;
        }
    }

    debug!("Resolved publish order for {} blocks", resolution.ordered.len());
    Ok(resolution.ordered)
}

/// Build the graph for `files` and resolve it.
pub fn resolve_batch(
    files: &[FileRecord],
    existing: &HashSet<BlockName>,
) -> Result<Vec<FileRecord>, DeployError> {
    let (graph, lookup) = build_graph(files);
    resolve(&graph, &lookup, existing)
}

/// Per-call resolver state.
struct Resolution<'a> {
    graph: &'a DependencyGraph,
    lookup: &'a FileLookup,
    existing: &'a HashSet<BlockName>,
    /// Names already emitted; only grows
    resolved: HashSet<BlockName>,
    /// Names currently on the DFS stack, outermost first
    in_progress: Vec<BlockName>,
    ordered: Vec<FileRecord>,
}

impl<'a> Resolution<'a> {
    fn new(
        graph: &'a DependencyGraph,
        lookup: &'a FileLookup,
        existing: &'a HashSet<BlockName>,
    ) -> Self {
        Self {
            graph,
            lookup,
            existing,
            resolved: HashSet::new(),
            in_progress: Vec::new(),
            ordered: Vec::new(),
        }
    }

    fn resolve_one(&mut self, name: &str) -> Result<(), DeployError> {
        if self.resolved.contains(name) {
            return Ok(());
        }

        if let Some(start) = self.in_progress.iter().position(|n| n == name) {
            let mut cycle: Vec<&str> = self.in_progress[start..].iter().map(String::as_str).collect();
            cycle.push(name);
            return Err(DeployError::CircularReference {
                chain: cycle.join(" → "),
            });
        }

        self.in_progress.push(name.to_string());

        let graph = self.graph;
        for dependency in graph.dependencies(name) {
            if self.resolved.contains(dependency) && self.existing.contains(dependency) {
                trace!("Dependency '{}' of '{}' is placed and exists remotely", dependency, name);
                continue;
            }

            if !self.lookup.contains_key(dependency) {
                return Err(DeployError::UnresolvedReference {
                    name: dependency.clone(),
                });
            }

            self.resolve_one(dependency)?;
        }

        self.in_progress.pop();
        self.emit(name);
        Ok(())
    }

    fn emit(&mut self, name: &str) {
        if self.resolved.contains(name) {
            return;
        }
        if let Some(file) = self.lookup.get(name) {
            debug!("Publish position {}: '{}'", self.ordered.len() + 1, name);
            self.ordered.push(file.clone());
            self.resolved.insert(name.to_string());
        }
    }
}
