//! Sequential create-or-update publishing of a resolved batch.

use anyhow::Result;
use tracing::{debug, info};

use crate::core::{BlockName, FileRecord, prefixed_name};
use crate::store::{ContentStore, RemoteInventory};

/// What a publish pass did, in publish order.
///
/// Names are the remote names, prefix included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishSummary {
    /// Blocks created
    pub created: Vec<BlockName>,
    /// Blocks whose content was replaced
    pub updated: Vec<BlockName>,
}

impl PublishSummary {
    /// Total number of store calls made.
    pub fn total(&self) -> usize {
        self.created.len() + self.updated.len()
    }
}

/// Publish `ordered` to `store` one block at a time.
///
/// A block whose prefixed name is in `inventory` is updated through its remote
/// id, anything else is created. Each call finishes before the next starts.
///
/// # Errors
///
/// The first store failure stops the pass and is returned unchanged. Blocks
/// published before it stay published.
pub async fn publish<S: ContentStore>(
    store: &S,
    ordered: &[FileRecord],
    inventory: &RemoteInventory,
    prefix: &str,
) -> Result<PublishSummary> {
    let mut summary = PublishSummary::default();

    for file in ordered {
        let name = prefixed_name(&file.block_name(), prefix);

        match inventory.id_for(&name) {
            Some(id) => {
                debug!("Updating content block {} ({}) from {}", name, id, file.path);
                store.update(id, &file.content).await?;
                info!("Updated content block {}", name);
                summary.updated.push(name);
            }
            None => {
                debug!("Creating content block {} from {}", name, file.path);
                store.create(&name, &file.content).await?;
                info!("Created content block {}", name);
                summary.created.push(name);
            }
        }
    }

    Ok(summary)
}
