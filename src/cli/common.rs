//! Arguments and wiring shared by the `deploy` and `plan` commands

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::config::{DeploySettings, Overrides};
use crate::core::FileRecord;
use crate::deploy::{DeployMode, Deployer};
use crate::source::{CommitDiffSource, DirectorySource, FileSource, GitHubClient};
use crate::store::BrazeClient;

/// Flags accepted by every deployment command.
///
/// Each flag falls back to the environment variable GitHub Actions (or the
/// workflow author) sets, so a workflow step usually needs no flags at all.
#[derive(Args, Debug, Clone, Default)]
pub struct DeployArgs {
    /// Deploy every block (`full`, alias `init`) or only changed ones
    /// (`incremental`, alias `update`)
    #[arg(long, value_enum, ignore_case = true, env = "DEPLOYMENT_MODE")]
    pub mode: Option<DeployMode>,

    /// Content store REST API key
    #[arg(long, env = "BRAZE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Content store REST endpoint, e.g. `https://rest.iad-01.braze.com`
    #[arg(long, env = "BRAZE_REST_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Prefix prepended to every remote block name
    #[arg(long, env = "BRAZE_CONTENT_BLOCK_PREFIX")]
    pub prefix: Option<String>,

    /// Repository checkout containing the content blocks directory
    #[arg(long, env = "GITHUB_WORKSPACE", value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Token for the GitHub API (incremental mode)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Repository in `owner/name` form (incremental mode)
    #[arg(long, env = "GITHUB_REPOSITORY", value_name = "OWNER/NAME")]
    pub repository: Option<String>,

    /// Commit to compare from (incremental mode); defaults to the push
    /// event's `before`
    #[arg(long, value_name = "SHA")]
    pub base: Option<String>,

    /// Commit to compare to and read contents at (incremental mode)
    #[arg(long, env = "GITHUB_SHA", value_name = "SHA")]
    pub head: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", value_name = "URL")]
    pub github_api_url: Option<String>,

    /// GitHub Actions event payload
    #[arg(long, env = "GITHUB_EVENT_PATH", hide = true)]
    pub event_path: Option<PathBuf>,
}

impl DeployArgs {
    /// The workspace directory, `.` when not given.
    pub fn workspace(&self) -> PathBuf {
        self.workspace.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Flag values as the top configuration layer.
    pub fn to_overrides(&self) -> Overrides {
        Overrides {
            mode: self.mode,
            api_key: self.api_key.clone(),
            endpoint: self.endpoint.clone(),
            prefix: self.prefix.clone(),
            workspace: Some(self.workspace()),
            github_token: self.github_token.clone(),
            repository: self.repository.clone(),
            base: self.base.clone(),
            head: self.head.clone(),
            github_api_url: self.github_api_url.clone(),
            event_path: self.event_path.clone(),
        }
    }
}

/// Common trait for deployment command execution
pub trait CommandExecutor: Sized {
    /// Execute the command against a prepared context
    fn execute_with_context(
        self,
        context: CommandContext,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Everything a deployment command needs, built from the merged settings
pub struct CommandContext {
    /// Merged, validated settings
    pub settings: DeploySettings,
    /// Deployer bound to the configured content store and prefix
    pub deployer: Deployer<BrazeClient>,
}

impl CommandContext {
    /// Build the store client and deployer for `settings`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed
    pub fn from_settings(settings: DeploySettings) -> Result<Self> {
        let store = BrazeClient::with_timeout(
            settings.endpoint.clone(),
            settings.api_key.clone(),
            settings.request_timeout,
        )?;
        let deployer = Deployer::new(store).with_prefix(settings.prefix.clone());

        Ok(Self {
            settings,
            deployer,
        })
    }

    /// The file source for the configured mode.
    ///
    /// # Errors
    /// Returns an error if the GitHub client cannot be constructed
    pub fn source(&self) -> Result<SelectedSource> {
        let settings = &self.settings;
        match (&settings.mode, &settings.incremental) {
            (DeployMode::Incremental, Some(incremental)) => {
                let client = GitHubClient::with_timeout(
                    incremental.github_api_url.clone(),
                    incremental.github_token.clone(),
                    settings.request_timeout,
                )?;
                Ok(SelectedSource::CommitDiff(CommitDiffSource::new(
                    client,
                    incremental.repository.clone(),
                    incremental.base.clone(),
                    incremental.head.clone(),
                    settings.content_dir.clone(),
                    settings.extensions.clone(),
                )))
            }
            _ => Ok(SelectedSource::Directory(DirectorySource::new(
                settings.content_path(),
                settings.extensions.clone(),
            ))),
        }
    }
}

/// The source chosen by the deployment mode.
#[derive(Debug)]
pub enum SelectedSource {
    /// Full mode
    Directory(DirectorySource),
    /// Incremental mode
    CommitDiff(CommitDiffSource),
}

impl FileSource for SelectedSource {
    async fn collect(&self) -> Result<Vec<FileRecord>> {
        match self {
            Self::Directory(source) => source.collect().await,
            Self::CommitDiff(source) => source.collect().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Directory(source) => source.describe(),
            Self::CommitDiff(source) => source.describe(),
        }
    }
}
