//! Global constants used throughout the blockdeploy codebase.
//!
//! This module contains directory names, file filters, HTTP limits and other
//! values that are shared across modules. Defining them centrally keeps the
//! magic numbers discoverable.

use std::time::Duration;

/// Directory (relative to the workspace) that holds the content block templates.
pub const CONTENT_BLOCKS_DIR: &str = "content_blocks";

/// File extensions treated as content blocks when no override is configured.
pub const DEFAULT_FILE_EXTENSIONS: &[&str] = &["liquid", "html"];

/// Page size for `content_blocks/list` requests (the store's maximum).
pub const LIST_PAGE_LIMIT: usize = 1000;

/// Default timeout applied to every HTTP request (30 seconds).
///
/// Publishing itself has no deadline policy; this only bounds a single
/// request so a hung connection cannot stall a CI job forever.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of file contents fetched concurrently in incremental mode.
pub const MAX_PARALLEL_FETCHES: usize = 8;

/// Base URL of the public GitHub REST API.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Name of the optional project configuration file.
pub const CONFIG_FILE_NAME: &str = "blockdeploy.toml";

/// User agent sent with every outgoing request.
pub const USER_AGENT: &str = concat!("blockdeploy/", env!("CARGO_PKG_VERSION"));
