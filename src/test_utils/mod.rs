//! Test utilities for blockdeploy
//!
//! This module provides in-memory doubles for the two network seams and a
//! logging helper, so deployment logic can be tested without HTTP.
//!
//! - [`RecordingStore`] - a [`ContentStore`](crate::store::ContentStore) that
//!   records every call and can be told to fail
//! - [`StaticSource`] - a [`FileSource`](crate::source::FileSource) over a
//!   fixed batch
//! - [`fixtures`] - small ready-made batches
//!
//! # Example
//!
//! ```rust,no_run
//! use blockdeploy::deploy::Deployer;
//! use blockdeploy::test_utils::{RecordingStore, StaticSource, StoreCall, fixtures};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let deployer = Deployer::new(RecordingStore::new());
//! deployer.run(&StaticSource::new(fixtures::dependent_pair())).await?;
//!
//! assert_eq!(deployer.store().calls()[0], StoreCall::List);
//! # Ok(())
//! # }
//! ```

pub mod fixtures;
mod recording_store;

pub use fixtures::StaticSource;
pub use recording_store::{RecordingStore, StoreCall};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG` when set, otherwise leaves logging off.
///
/// ```bash
/// RUST_LOG=blockdeploy=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
