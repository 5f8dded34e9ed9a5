//! Incremental-mode source: files changed between two commits on GitHub.
//!
//! Uses the REST API:
//! - `GET /repos/{owner}/{repo}/compare/{base}...{head}` for the changed files
//! - `GET /repos/{owner}/{repo}/contents/{path}?ref={head}` with the raw media
//!   type for each file's content
//!
//! Only files under the content blocks directory with an allowed extension
//! are fetched. Removed files are skipped since there is nothing to publish.

use anyhow::{Context, Result};
use futures::{StreamExt, TryStreamExt};
use reqwest::Url;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, trace};

use super::{FileSource, has_extension};
use crate::constants::{DEFAULT_REQUEST_TIMEOUT, MAX_PARALLEL_FETCHES, USER_AGENT};
use crate::core::{DeployError, FileRecord};

const GITHUB_JSON: &str = "application/vnd.github+json";
const GITHUB_RAW: &str = "application/vnd.github.raw";
const GITHUB_API_VERSION: &str = "2022-11-28";
/// `before` of a push that created the branch.
const NULL_SHA: &str = "0000000000000000000000000000000000000000";

/// An `owner/name` GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Account or organization
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl FromStr for Repository {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(DeployError::ConfigError {
                message: format!("repository must be in 'owner/name' form, got '{s}'"),
            }),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Deserialize)]
struct Comparison {
    #[serde(default)]
    files: Vec<ChangedFile>,
}

#[derive(Debug, Deserialize)]
struct ChangedFile {
    filename: String,
    #[serde(default)]
    status: String,
}

/// Minimal GitHub REST client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a client for `api_url` (normally `https://api.github.com`).
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        Self::with_timeout(api_url, token, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client whose requests time out after `timeout`.
    pub fn with_timeout(
        api_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.api_url)
            .with_context(|| format!("Invalid GitHub API URL: {}", self.api_url))?;
        url.path_segments_mut()
            .map_err(|()| DeployError::ConfigError {
                message: format!("GitHub API URL cannot be a base: {}", self.api_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, operation: &str, url: Url, accept: &str) -> Result<String> {
        let failure = |status: Option<u16>, reason: String| DeployError::GitHubRequestFailed {
            operation: operation.to_string(),
            status,
            reason,
        };

        let mut request = self
            .http
            .get(url)
            .header(ACCEPT, accept)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| failure(None, e.to_string()))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| failure(Some(status.as_u16()), e.to_string()))?;
        if !status.is_success() {
            return Err(failure(Some(status.as_u16()), body).into());
        }
        Ok(body)
    }

    /// Paths changed between `base` and `head`, with their change status.
    async fn compare(&self, repo: &Repository, base: &str, head: &str) -> Result<Vec<ChangedFile>> {
        let range = format!("{base}...{head}");
        let url = self.url(&["repos", &repo.owner, &repo.name, "compare", &range])?;
        let operation = format!("compare {repo} {range}");

        let body = self.get(&operation, url, GITHUB_JSON).await?;
        let comparison: Comparison =
            serde_json::from_str(&body).map_err(|e| DeployError::GitHubRequestFailed {
                operation,
                status: None,
                reason: format!("unexpected compare response: {e}"),
            })?;
        Ok(comparison.files)
    }

    /// Raw content of `path` at `reference`.
    pub async fn file_content(&self, repo: &Repository, path: &str, reference: &str) -> Result<String> {
        let mut segments = vec!["repos", repo.owner.as_str(), repo.name.as_str(), "contents"];
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
        let mut url = self.url(&segments)?;
        url.query_pairs_mut().append_pair("ref", reference);

        self.get(&format!("get content of {path}"), url, GITHUB_RAW).await
    }
}

/// Files under `blocks_dir` changed between `base` and `head`.
#[derive(Debug, Clone)]
pub struct CommitDiffSource {
    client: GitHubClient,
    repository: Repository,
    base: String,
    head: String,
    blocks_dir: String,
    extensions: Vec<String>,
}

impl CommitDiffSource {
    /// Create a source comparing `base...head` in `repository`.
    ///
    /// `blocks_dir` is relative to the repository root.
    pub fn new(
        client: GitHubClient,
        repository: Repository,
        base: impl Into<String>,
        head: impl Into<String>,
        blocks_dir: impl Into<String>,
        extensions: Vec<String>,
    ) -> Self {
        Self {
            client,
            repository,
            base: base.into(),
            head: head.into(),
            blocks_dir: blocks_dir.into().trim_matches('/').to_string(),
            extensions,
        }
    }

    fn is_candidate(&self, file: &ChangedFile) -> bool {
        if file.status == "removed" {
            trace!("Skipping removed file {}", file.filename);
            return false;
        }
        let under_blocks_dir = self.blocks_dir.is_empty()
            || file.filename.starts_with(&format!("{}/", self.blocks_dir));
        under_blocks_dir && has_extension(Path::new(&file.filename), &self.extensions)
    }
}

impl FileSource for CommitDiffSource {
    async fn collect(&self) -> Result<Vec<FileRecord>> {
        let changed = self.client.compare(&self.repository, &self.base, &self.head).await?;
        let total = changed.len();
        let paths: Vec<String> =
            changed.into_iter().filter(|f| self.is_candidate(f)).map(|f| f.filename).collect();
        debug!(
            "{} of {} changed files between {} and {} are content blocks",
            paths.len(),
            total,
            self.base,
            self.head
        );

        // buffered() keeps compare order while fetching concurrently
        let files: Vec<FileRecord> = futures::stream::iter(paths)
            .map(|path| async move {
                debug!("Getting content of file: {}", path);
                let content = self.client.file_content(&self.repository, &path, &self.head).await?;
                Ok::<_, anyhow::Error>(FileRecord::new(path, content))
            })
            .buffered(MAX_PARALLEL_FETCHES)
            .try_collect()
            .await?;

        Ok(files)
    }

    fn describe(&self) -> String {
        format!("{} changes {}...{}", self.repository, self.base, self.head)
    }
}

/// Read the base commit from a GitHub Actions event payload.
///
/// Uses `before` of a push event, falling back to `pull_request.base.sha`.
/// Returns `None` when neither is present or `before` is the all-zero SHA of a
/// newly created branch.
pub fn base_from_event_file(path: &Path) -> Result<Option<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read GitHub event payload {}", path.display()))?;
    let event: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse GitHub event payload {}", path.display()))?;

    let before = event.get("before").and_then(serde_json::Value::as_str);
    let pr_base = event.pointer("/pull_request/base/sha").and_then(serde_json::Value::as_str);

    Ok(before.filter(|sha| *sha != NULL_SHA && !sha.is_empty()).or(pr_base).map(str::to_string))
}
