//! The optional `blockdeploy.toml` project file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::constants::CONFIG_FILE_NAME;
use crate::core::DeployError;
use crate::deploy::DeployMode;

/// Settings read from `blockdeploy.toml`.
///
/// Every field is optional; command-line flags and environment variables take
/// precedence. Secrets (the store API key and the GitHub token) are
/// deliberately absent so the file can be committed.
///
/// ```toml
/// endpoint = "https://rest.iad-01.braze.com"
/// prefix = "stg_"
/// mode = "full"
/// content_dir = "content_blocks"
/// extensions = ["liquid"]
/// log_level = "info"
/// request_timeout_secs = 60
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Content store REST endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Prefix prepended to remote block names
    #[serde(default)]
    pub prefix: Option<String>,
    /// Default deployment mode
    #[serde(default)]
    pub mode: Option<DeployMode>,
    /// Content blocks directory, relative to the workspace
    #[serde(default)]
    pub content_dir: Option<String>,
    /// File extensions treated as content blocks (without dots)
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    /// Log level used when neither `--log-level` nor `LOG_LEVEL` is set
    #[serde(default)]
    pub log_level: Option<String>,
    /// Per-request HTTP timeout
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Load a config file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid TOML for this schema.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .map_err(DeployError::from)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `explicit` if given, else `blockdeploy.toml` in `workspace` if it
    /// exists, else defaults.
    ///
    /// An explicitly named file must exist.
    pub async fn load_with_optional(explicit: Option<&Path>, workspace: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(DeployError::ConfigError {
                    message: format!("config file {} does not exist", path.display()),
                }
                .into());
            }
            return Self::load_from(path).await;
        }

        let path = Self::default_path(workspace);
        if path.exists() {
            Self::load_from(&path).await
        } else {
            Ok(Self::default())
        }
    }

    /// `blockdeploy.toml` inside `workspace`.
    pub fn default_path(workspace: &Path) -> PathBuf {
        workspace.join(CONFIG_FILE_NAME)
    }
}
