//! Configuration management for blockdeploy
//!
//! Settings come from three layers, highest precedence first:
//!
//! 1. Command-line flags and their environment variables (`BRAZE_API_KEY`,
//!    `BRAZE_REST_ENDPOINT`, `DEPLOYMENT_MODE`, `GITHUB_*`, ...)
//! 2. The project file `blockdeploy.toml` in the workspace, or the file named
//!    by `--config`
//! 3. Built-in defaults from [`crate::constants`]
//!
//! Secrets are only accepted through layer 1. The project file rejects unknown
//! keys, so an `api_key` entry fails to load rather than being silently used.
//!
//! # Modules
//!
//! - `file` - [`FileConfig`], the parsed project file
//! - `settings` - [`DeploySettings`], the merged result validated for the
//!   chosen deployment mode

mod file;
mod settings;

pub use file::FileConfig;
pub use settings::{DeploySettings, IncrementalSettings, Overrides};
