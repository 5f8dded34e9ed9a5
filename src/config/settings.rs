//! Merged settings for one run.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::FileConfig;
use crate::constants::{
    CONTENT_BLOCKS_DIR, DEFAULT_FILE_EXTENSIONS, DEFAULT_GITHUB_API_URL, DEFAULT_REQUEST_TIMEOUT,
};
use crate::core::DeployError;
use crate::deploy::DeployMode;
use crate::source::{Repository, base_from_event_file};

/// Values supplied on the command line or through the environment.
///
/// `None` means "not given"; the file config or a default fills it in.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub mode: Option<DeployMode>,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub prefix: Option<String>,
    pub workspace: Option<PathBuf>,
    pub github_token: Option<String>,
    pub repository: Option<String>,
    pub base: Option<String>,
    pub head: Option<String>,
    pub github_api_url: Option<String>,
    /// GitHub Actions event payload, consulted for the base commit
    pub event_path: Option<PathBuf>,
}

/// Where incremental mode reads its changes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncrementalSettings {
    pub repository: Repository,
    pub base: String,
    pub head: String,
    pub github_api_url: String,
    pub github_token: Option<String>,
}

/// Fully resolved settings for a deployment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploySettings {
    pub mode: DeployMode,
    pub api_key: String,
    pub endpoint: String,
    /// Empty when no prefix is configured
    pub prefix: String,
    pub workspace: PathBuf,
    /// Content blocks directory relative to the workspace / repository root
    pub content_dir: String,
    pub extensions: Vec<String>,
    pub request_timeout: Duration,
    /// Present exactly when `mode` is [`DeployMode::Incremental`]
    pub incremental: Option<IncrementalSettings>,
}

impl DeploySettings {
    /// Merge `overrides` over `file` over defaults and check that every
    /// setting the chosen mode needs is present.
    ///
    /// # Errors
    ///
    /// [`DeployError::MissingSetting`] for an absent API key, endpoint, or (in
    /// incremental mode) repository, base or head commit;
    /// [`DeployError::ConfigError`] for a malformed repository.
    pub fn resolve(overrides: Overrides, file: FileConfig) -> Result<Self> {
        let mode = overrides.mode.or(file.mode).unwrap_or_default();
        let api_key = required(overrides.api_key, "API key", "Pass --api-key or set BRAZE_API_KEY")?;
        let endpoint = required(
            overrides.endpoint.or(file.endpoint),
            "REST endpoint",
            "Pass --endpoint, set BRAZE_REST_ENDPOINT or add `endpoint` to blockdeploy.toml",
        )?;

        let incremental = match mode {
            DeployMode::Full => None,
            DeployMode::Incremental => Some(IncrementalSettings {
                base: required(
                    match non_empty(overrides.base) {
                        Some(base) => Some(base),
                        None => event_base(overrides.event_path.as_deref())?,
                    },
                    "base commit",
                    "Pass --base or run from a GitHub Actions push event",
                )?,
                repository: required(
                    overrides.repository,
                    "repository",
                    "Pass --repository owner/name or set GITHUB_REPOSITORY",
                )?
                .parse()?,
                head: required(overrides.head, "head commit", "Pass --head or set GITHUB_SHA")?,
                github_api_url: non_empty(overrides.github_api_url)
                    .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
                github_token: non_empty(overrides.github_token),
            }),
        };

        let settings = Self {
            mode,
            api_key,
            endpoint,
            prefix: overrides.prefix.or(file.prefix).unwrap_or_default(),
            workspace: overrides.workspace.unwrap_or_else(|| PathBuf::from(".")),
            content_dir: file
                .content_dir
                .map(|dir| dir.trim_matches('/').to_string())
                .unwrap_or_else(|| CONTENT_BLOCKS_DIR.to_string()),
            extensions: file.extensions.unwrap_or_else(|| {
                DEFAULT_FILE_EXTENSIONS.iter().map(|ext| (*ext).to_string()).collect()
            }),
            request_timeout: file
                .request_timeout_secs
                .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs),
            incremental,
        };
        debug!("Resolved settings: mode={}, prefix='{}'", settings.mode, settings.prefix);
        Ok(settings)
    }

    /// Absolute-or-relative path of the content blocks directory on disk.
    pub fn content_path(&self) -> PathBuf {
        self.workspace.join(&self.content_dir)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(value: Option<String>, name: &str, hint: &str) -> Result<String, DeployError> {
    non_empty(value).ok_or_else(|| DeployError::MissingSetting {
        name: name.to_string(),
        hint: hint.to_string(),
    })
}

fn event_base(event_path: Option<&Path>) -> Result<Option<String>> {
    match event_path {
        Some(path) if path.exists() => base_from_event_file(path),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn full_overrides() -> Overrides {
        Overrides {
            api_key: Some("key".to_string()),
            endpoint: Some("https://rest.example.com".to_string()),
            ..Overrides::default()
        }
    }

    fn incremental_overrides() -> Overrides {
        Overrides {
            mode: Some(DeployMode::Incremental),
            repository: Some("mockOwner/mockRepo".to_string()),
            base: Some("base".to_string()),
            head: Some("head".to_string()),
            ..full_overrides()
        }
    }

    #[test]
    fn test_defaults() {
        let settings = DeploySettings::resolve(full_overrides(), FileConfig::default()).unwrap();

        assert_eq!(settings.mode, DeployMode::Full);
        assert_eq!(settings.prefix, "");
        assert_eq!(settings.content_path(), PathBuf::from("./content_blocks"));
        assert_eq!(settings.extensions, vec!["liquid", "html"]);
        assert_eq!(settings.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert!(settings.incremental.is_none());
    }

    #[test]
    fn test_overrides_beat_file() {
        let file = FileConfig {
            endpoint: Some("https://file.example.com".to_string()),
            prefix: Some("file_".to_string()),
            mode: Some(DeployMode::Incremental),
            content_dir: Some("/blocks/".to_string()),
            extensions: Some(vec!["liquid".to_string()]),
            request_timeout_secs: Some(3),
            ..FileConfig::default()
        };
        let overrides = Overrides {
            prefix: Some("cli_".to_string()),
            mode: Some(DeployMode::Full),
            ..full_overrides()
        };

        let settings = DeploySettings::resolve(overrides, file).unwrap();

        assert_eq!(settings.endpoint, "https://rest.example.com");
        assert_eq!(settings.prefix, "cli_");
        assert_eq!(settings.mode, DeployMode::Full);
        assert_eq!(settings.content_dir, "blocks");
        assert_eq!(settings.extensions, vec!["liquid"]);
        assert_eq!(settings.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_file_fills_endpoint() {
        let file = FileConfig {
            endpoint: Some("https://file.example.com".to_string()),
            ..FileConfig::default()
        };
        let overrides = Overrides {
            endpoint: None,
            ..full_overrides()
        };

        let settings = DeploySettings::resolve(overrides, file).unwrap();

        assert_eq!(settings.endpoint, "https://file.example.com");
    }

    #[test]
    fn test_missing_api_key() {
        let overrides = Overrides {
            api_key: Some(String::new()),
            ..full_overrides()
        };

        let err = DeploySettings::resolve(overrides, FileConfig::default()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DeployError>(),
            Some(DeployError::MissingSetting { name, .. }) if name == "API key"
        ));
    }

    #[test]
    fn test_incremental_settings() {
        let settings =
            DeploySettings::resolve(incremental_overrides(), FileConfig::default()).unwrap();

        let incremental = settings.incremental.unwrap();
        assert_eq!(incremental.repository.to_string(), "mockOwner/mockRepo");
        assert_eq!(incremental.base, "base");
        assert_eq!(incremental.head, "head");
        assert_eq!(incremental.github_api_url, DEFAULT_GITHUB_API_URL);
        assert_eq!(incremental.github_token, None);
    }

    #[test]
    fn test_incremental_requires_repository() {
        let overrides = Overrides {
            repository: None,
            ..incremental_overrides()
        };

        let err = DeploySettings::resolve(overrides, FileConfig::default()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DeployError>(),
            Some(DeployError::MissingSetting { name, .. }) if name == "repository"
        ));
    }

    #[test]
    fn test_incremental_base_from_event_file() {
        let temp = tempdir().unwrap();
        let event = temp.path().join("event.json");
        std::fs::write(&event, r#"{"before":"from-event"}"#).unwrap();
        let overrides = Overrides {
            base: None,
            event_path: Some(event),
            ..incremental_overrides()
        };

        let settings = DeploySettings::resolve(overrides, FileConfig::default()).unwrap();

        assert_eq!(settings.incremental.unwrap().base, "from-event");
    }

    #[test]
    fn test_incremental_without_base() {
        let overrides = Overrides {
            base: None,
            ..incremental_overrides()
        };

        let err = DeploySettings::resolve(overrides, FileConfig::default()).unwrap_err();

        assert!(err.to_string().contains("base commit"));
    }

    #[test]
    fn test_malformed_repository() {
        let overrides = Overrides {
            repository: Some("just-a-name".to_string()),
            ..incremental_overrides()
        };

        assert!(DeploySettings::resolve(overrides, FileConfig::default()).is_err());
    }
}
