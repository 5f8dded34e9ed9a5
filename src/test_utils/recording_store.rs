//! In-memory content store that records its calls.

use anyhow::Result;
use std::sync::Mutex;

use crate::core::DeployError;
use crate::store::{BlockReceipt, ContentStore, RemoteInventory};

/// One call made against a [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// `list()`
    List,
    /// `create(name, content)`
    Create {
        /// Block name
        name: String,
        /// Block content
        content: String,
    },
    /// `update(id, content)`
    Update {
        /// Remote id
        id: String,
        /// Block content
        content: String,
    },
}

impl StoreCall {
    /// Shorthand for [`StoreCall::Create`].
    pub fn create(name: &str, content: &str) -> Self {
        Self::Create {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    /// Shorthand for [`StoreCall::Update`].
    pub fn update(id: &str, content: &str) -> Self {
        Self::Update {
            id: id.to_string(),
            content: content.to_string(),
        }
    }
}

/// A [`ContentStore`] that answers `list()` from a fixed inventory and records
/// every call in order.
///
/// The call with index `n` (zero-based, counting `list` too) fails with a
/// [`DeployError::RemoteOperationFailure`] when configured through
/// [`fail_on_call`](Self::fail_on_call). The failing call is still recorded.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inventory: RemoteInventory,
    fail_on: Option<usize>,
    calls: Mutex<Vec<StoreCall>>,
}

impl RecordingStore {
    /// Store with no existing blocks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `list()` with `inventory`.
    #[must_use]
    pub fn with_inventory(mut self, inventory: RemoteInventory) -> Self {
        self.inventory = inventory;
        self
    }

    /// Fail the call at zero-based index `n`.
    #[must_use]
    pub fn fail_on_call(mut self, n: usize) -> Self {
        self.fail_on = Some(n);
        self
    }

    /// Calls made so far.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: StoreCall, operation: &str, target: &str) -> Result<()> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len();
        calls.push(call);

        if self.fail_on == Some(index) {
            return Err(DeployError::RemoteOperationFailure {
                operation: operation.to_string(),
                target: target.to_string(),
                status: Some(500),
                reason: "injected failure".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl ContentStore for RecordingStore {
    async fn list(&self) -> Result<RemoteInventory> {
        self.record(StoreCall::List, "list", "content_blocks")?;
        Ok(self.inventory.clone())
    }

    async fn create(&self, name: &str, content: &str) -> Result<BlockReceipt> {
        self.record(StoreCall::create(name, content), "create", name)?;
        Ok(BlockReceipt {
            content_block_id: Some(format!("new-{name}")),
            liquid_tag: Some(format!("{{{{content_blocks.${{{name}}}}}}}")),
            message: Some("success".to_string()),
        })
    }

    async fn update(&self, id: &str, content: &str) -> Result<BlockReceipt> {
        self.record(StoreCall::update(id, content), "update", id)?;
        Ok(BlockReceipt {
            message: Some("success".to_string()),
            ..BlockReceipt::default()
        })
    }
}
