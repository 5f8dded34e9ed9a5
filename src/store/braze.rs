//! HTTP client for the Braze content blocks REST API.
//!
//! Endpoints used:
//! - `GET  {endpoint}/content_blocks/list?limit=N&offset=M`
//! - `POST {endpoint}/content_blocks/create` with `{"name", "content"}`
//! - `POST {endpoint}/content_blocks/update` with `{"content_block_id", "content"}`
//!
//! Every request carries `Authorization: Bearer <api key>` and
//! `Content-Type: application/json`. Requests are never retried: a failure is
//! reported to the caller as [`DeployError::RemoteOperationFailure`].

use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{BlockReceipt, ContentStore, RemoteInventory};
use crate::constants::{DEFAULT_REQUEST_TIMEOUT, LIST_PAGE_LIMIT, USER_AGENT};
use crate::core::DeployError;

/// Braze REST API client implementing [`ContentStore`].
#[derive(Debug, Clone)]
pub struct BrazeClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    page_limit: usize,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    content_blocks: Vec<ListedBlock>,
}

#[derive(Debug, Deserialize)]
struct ListedBlock {
    name: String,
    content_block_id: String,
}

#[derive(Debug, Serialize)]
struct CreateRequest<'a> {
    name: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    content_block_id: &'a str,
    content: &'a str,
}

impl BrazeClient {
    /// Create a client for `endpoint` (e.g. `https://rest.iad-01.braze.com`).
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, api_key, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client whose requests time out after `timeout`.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            page_limit: LIST_PAGE_LIMIT,
        })
    }

    /// Override the page size used by [`ContentStore::list`].
    #[must_use]
    pub fn with_page_limit(mut self, page_limit: usize) -> Self {
        self.page_limit = page_limit.max(1);
        self
    }

    /// The REST endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    async fn list_page(&self, offset: usize) -> Result<Vec<ListedBlock>> {
        let failure = |status: Option<u16>, reason: String| DeployError::RemoteOperationFailure {
            operation: "list".to_string(),
            target: self.endpoint.clone(),
            status,
            reason,
        };

        let response = self
            .http
            .get(self.url("content_blocks/list"))
            .query(&[("limit", self.page_limit), ("offset", offset)])
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| failure(None, e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| failure(Some(status.as_u16()), e.to_string()))?;
        if !status.is_success() {
            return Err(failure(Some(status.as_u16()), body).into());
        }

        let page: ListResponse = serde_json::from_str(&body).map_err(|e| {
            failure(Some(status.as_u16()), format!("unexpected list response: {e}"))
        })?;
        Ok(page.content_blocks)
    }

    async fn post<T: Serialize + Sync>(
        &self,
        operation: &str,
        target: &str,
        path: &str,
        payload: &T,
    ) -> Result<BlockReceipt> {
        let failure = |status: Option<u16>, reason: String| DeployError::RemoteOperationFailure {
            operation: operation.to_string(),
            target: target.to_string(),
            status,
            reason,
        };

        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| failure(None, e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| failure(Some(status.as_u16()), e.to_string()))?;
        if !status.is_success() {
            return Err(failure(Some(status.as_u16()), body).into());
        }

        if body.trim().is_empty() {
            return Ok(BlockReceipt::default());
        }
        let receipt: BlockReceipt = serde_json::from_str(&body).map_err(|e| {
            failure(Some(status.as_u16()), format!("unexpected {operation} response: {e}"))
        })?;

        if let Some(message) = receipt.message.as_deref()
            && message != "success"
        {
            warn!("Content store answered {} of '{}' with: {}", operation, target, message);
        }
        Ok(receipt)
    }
}

impl ContentStore for BrazeClient {
    async fn list(&self) -> Result<RemoteInventory> {
        let mut inventory = RemoteInventory::new();
        let mut offset = 0;

        loop {
            let page = self.list_page(offset).await?;
            let fetched = page.len();
            debug!("Listed {} content blocks at offset {}", fetched, offset);

            for block in page {
                inventory.insert(block.name, block.content_block_id);
            }

            if fetched < self.page_limit {
                break;
            }
            offset += fetched;
        }

        Ok(inventory)
    }

    async fn create(&self, name: &str, content: &str) -> Result<BlockReceipt> {
        self.post(
            "create",
            name,
            "content_blocks/create",
            &CreateRequest {
                name,
                content,
            },
        )
        .await
    }

    async fn update(&self, id: &str, content: &str) -> Result<BlockReceipt> {
        self.post(
            "update",
            id,
            "content_blocks/update",
            &UpdateRequest {
                content_block_id: id,
                content,
            },
        )
        .await
    }
}
