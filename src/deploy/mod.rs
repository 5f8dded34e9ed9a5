//! One deployment run: list, collect, resolve, publish.
//!
//! [`Deployer`] ties a [`ContentStore`] to a [`FileSource`]. The remote
//! inventory is listed first so the resolver knows which blocks already
//! exist; nothing is published until the whole batch has resolved, so a
//! missing reference or a cycle leaves the store untouched.
//!
//! # Example
//!
//! ```rust,no_run
//! use blockdeploy::deploy::Deployer;
//! use blockdeploy::source::DirectorySource;
//! use blockdeploy::store::BrazeClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = BrazeClient::new("https://rest.iad-01.braze.com", "api-key")?;
//! let source = DirectorySource::new("content_blocks", vec!["liquid".to_string()]);
//!
//! let report = Deployer::new(store).with_prefix("stg_").run(&source).await?;
//! println!("created {}, updated {}", report.summary.created.len(), report.summary.updated.len());
//! # Ok(())
//! # }
//! ```

mod publisher;

pub use publisher::{PublishSummary, publish};

use anyhow::Result;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::core::{BlockName, DeployError, FileRecord};
use crate::resolver::{build_graph, resolve};
use crate::source::FileSource;
use crate::store::{ContentStore, RemoteInventory};

/// Which files a run deploys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeployMode {
    /// Every eligible file in the content blocks directory
    #[default]
    #[serde(alias = "init")]
    #[value(alias = "init")]
    Full,
    /// Files changed between two commits
    #[serde(alias = "update")]
    #[value(alias = "update")]
    Incremental,
}

impl FromStr for DeployMode {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "init" => Ok(Self::Full),
            "incremental" | "update" => Ok(Self::Incremental),
            other => Err(DeployError::ConfigError {
                message: format!(
                    "unknown deployment mode '{other}' (expected full, init, incremental or update)"
                ),
            }),
        }
    }
}

impl fmt::Display for DeployMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Incremental => write!(f, "incremental"),
        }
    }
}

/// Outcome of [`Deployer::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployReport {
    /// Remote names in the order they were published
    pub planned: Vec<BlockName>,
    /// Create/update split
    pub summary: PublishSummary,
}

/// Deploys batches of content blocks to a store.
pub struct Deployer<S: ContentStore> {
    store: S,
    prefix: String,
}

impl<S: ContentStore> Deployer<S> {
    /// Create a deployer publishing unprefixed names.
    pub fn new(store: S) -> Self {
        Self {
            store,
            prefix: String::new(),
        }
    }

    /// Prepend `prefix` to every remote block name.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// The store this deployer publishes to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// List, collect and resolve `source` and publish the result.
    ///
    /// # Errors
    ///
    /// Resolution errors are returned before any create or update call. A
    /// store failure during publishing stops the run; earlier blocks stay
    /// published.
    pub async fn run<F: FileSource>(&self, source: &F) -> Result<DeployReport> {
        let (ordered, inventory) = self.prepare(source).await?;
        let planned = self.remote_names(&ordered);

        let summary = publish(&self.store, &ordered, &inventory, &self.prefix).await?;
        info!(
            "Deployment finished: created {}, updated {}",
            summary.created.len(),
            summary.updated.len()
        );

        Ok(DeployReport {
            planned,
            summary,
        })
    }

    /// Remote names `run` would publish, in order, without publishing.
    pub async fn plan<F: FileSource>(&self, source: &F) -> Result<Vec<BlockName>> {
        let (ordered, _) = self.prepare(source).await?;
        Ok(self.remote_names(&ordered))
    }

    async fn prepare<F: FileSource>(
        &self,
        source: &F,
    ) -> Result<(Vec<FileRecord>, RemoteInventory)> {
        let inventory = self.store.list().await?;
        info!("Found {} existing content blocks", inventory.len());

        let files = source.collect().await?;
        info!("Collected {} files from {}", files.len(), source.describe());
        for file in &files {
            debug!("  {}", file.path);
        }

        let (graph, lookup) = build_graph(&files);
        let ordered = resolve(&graph, &lookup, &inventory.names())?;

        Ok((ordered, inventory))
    }

    fn remote_names(&self, ordered: &[FileRecord]) -> Vec<BlockName> {
        ordered
            .iter()
            .map(|file| crate::core::prefixed_name(&file.block_name(), &self.prefix))
            .collect()
    }
}
