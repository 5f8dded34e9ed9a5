//! Dependency graph construction for a batch of content blocks.
//!
//! The graph maps each block name to the names it references, in the order
//! the references appear. Keys keep the order in which files were supplied so
//! resolution is deterministic for a given input.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::reference_extractor::extract_references;
use crate::core::{BlockName, FileRecord};

/// Block name → file, built alongside the [`DependencyGraph`].
///
/// On a name collision the later file wins.
pub type FileLookup = HashMap<BlockName, FileRecord>;

/// Block name → referenced block names.
///
/// Iteration order is first-insertion order. Re-inserting an existing key
/// keeps its position and replaces its dependency list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    order: Vec<BlockName>,
    edges: HashMap<BlockName, Vec<BlockName>>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the references of `name`.
    pub fn insert(&mut self, name: impl Into<BlockName>, dependencies: Vec<BlockName>) {
        let name = name.into();
        if !self.edges.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.edges.insert(name, dependencies);
    }

    /// Direct dependencies of `name`, empty when the name is unknown.
    pub fn dependencies(&self, name: &str) -> &[BlockName] {
        self.edges.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether `name` is a key of the graph.
    pub fn contains(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    /// Block names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &BlockName> {
        self.order.iter()
    }

    /// Number of blocks in the graph.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of references (edges), duplicates included.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

/// Build the dependency graph and file lookup for a batch.
///
/// Files are processed in input order: each file's block name is derived from
/// its path, the file is stored in the lookup (last write wins), and its
/// references are recorded in the graph.
pub fn build_graph(files: &[FileRecord]) -> (DependencyGraph, FileLookup) {
    let mut graph = DependencyGraph::new();
    let mut lookup = FileLookup::with_capacity(files.len());

    for file in files {
        let name = file.block_name();
        let dependencies = extract_references(&file.content);
        trace!("Block '{}' references {:?}", name, dependencies);

        if lookup.insert(name.clone(), file.clone()).is_some() {
            debug!("Block name '{}' is produced by more than one file; using {}", name, file.path);
        }
        graph.insert(name, dependencies);
    }

    debug!(
        "Built dependency graph with {} blocks and {} references",
        graph.len(),
        graph.edge_count()
    );
    (graph, lookup)
}
