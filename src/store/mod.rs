//! Remote content store abstraction.
//!
//! The publisher talks to the store through the [`ContentStore`] trait so the
//! ordering logic can be exercised without a network. [`BrazeClient`] is the
//! HTTP implementation used by the CLI.

mod braze;

pub use braze::BrazeClient;

use anyhow::Result;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::future::Future;

use crate::core::BlockName;

/// Operations the deployer needs from a content store.
///
/// All three may fail with a [`DeployError::RemoteOperationFailure`]
/// (wrapped in `anyhow::Error`); callers propagate it unchanged.
///
/// [`DeployError::RemoteOperationFailure`]: crate::core::DeployError::RemoteOperationFailure
pub trait ContentStore: Send + Sync {
    /// Every block currently in the store, by name.
    fn list(&self) -> impl Future<Output = Result<RemoteInventory>> + Send;

    /// Create a new block called `name`.
    fn create(&self, name: &str, content: &str) -> impl Future<Output = Result<BlockReceipt>> + Send;

    /// Replace the content of the block with remote id `id`.
    fn update(&self, id: &str, content: &str) -> impl Future<Output = Result<BlockReceipt>> + Send;
}

/// Remote block name → remote block id.
///
/// The key set is the "existing blocks" of a run. Names here are the names as
/// stored remotely, prefix included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteInventory {
    ids: HashMap<BlockName, String>,
}

impl RemoteInventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an inventory from `(name, id)` pairs.
    pub fn from_ids<I, N, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<BlockName>,
        D: Into<String>,
    {
        Self {
            ids: entries.into_iter().map(|(name, id)| (name.into(), id.into())).collect(),
        }
    }

    /// Record a block; a later duplicate name replaces the earlier id.
    pub fn insert(&mut self, name: impl Into<BlockName>, id: impl Into<String>) {
        self.ids.insert(name.into(), id.into());
    }

    /// Whether a block called `name` exists remotely.
    pub fn contains(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    /// Remote id of `name`.
    pub fn id_for(&self, name: &str) -> Option<&str> {
        self.ids.get(name).map(String::as_str)
    }

    /// The set of existing block names.
    pub fn names(&self) -> HashSet<BlockName> {
        self.ids.keys().cloned().collect()
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the store holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Response body of a create or update call.
///
/// Every field is optional; the store omits some of them depending on the
/// operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BlockReceipt {
    /// Id of the created block
    #[serde(default)]
    pub content_block_id: Option<String>,
    /// Liquid tag for embedding the block in messages
    #[serde(default)]
    pub liquid_tag: Option<String>,
    /// Status message, `"success"` on success
    #[serde(default)]
    pub message: Option<String>,
}
