//! blockdeploy - dependency-ordered content block deployment
//!
//! Content blocks are reusable template fragments kept in a remote content
//! store. A block may embed another with the marker
//! `{{content_blocks.${name}}}`, and the store only accepts a block once every
//! block it embeds already exists. blockdeploy reads a batch of block files,
//! works out an order in which each block follows the blocks it references,
//! and creates or updates them one at a time in that order.
//!
//! A reference that cannot be satisfied, or a set of blocks that reference
//! each other in a cycle, fails the run before anything is published.
//!
//! # Architecture Overview
//!
//! Data flows one way:
//!
//! ```text
//! FileSource ──► build_graph ──► resolve ──► publish ──► ContentStore
//!  (files)        (graph +        (ordered    (create /
//!                  lookup)         files)      update)
//! ```
//!
//! # Core Modules
//!
//! ## Core Functionality
//! - [`core`] - File records, block naming, error types and rendering
//! - [`resolver`] - Reference extraction, dependency graph, publish ordering
//! - [`deploy`] - One deployment run and the sequential publisher
//!
//! ## Collaborators
//! - [`source`] - Directory walk (full mode) and GitHub commit diff
//!   (incremental mode)
//! - [`store`] - Content store trait and its REST client
//!
//! ## Supporting Modules
//! - [`cli`] - Command-line interface
//! - [`config`] - Project file and flag/environment merging
//! - [`logging`] - Log level selection and subscriber setup
//! - [`constants`] - Shared defaults
//!
//! # Quick Example
//!
//! ```rust
//! use blockdeploy::core::FileRecord;
//! use blockdeploy::resolver::{build_graph, resolve};
//! use std::collections::HashSet;
//!
//! let files = vec![
//!     FileRecord::new("content_blocks/header.liquid", "{{content_blocks.${logo}}} Welcome"),
//!     FileRecord::new("content_blocks/logo.liquid", "<img src=\"logo.png\">"),
//! ];
//!
//! let (graph, lookup) = build_graph(&files);
//! let ordered = resolve(&graph, &lookup, &HashSet::new())?;
//!
//! assert_eq!(ordered[0].block_name(), "logo");
//! assert_eq!(ordered[1].block_name(), "header");
//! # Ok::<(), blockdeploy::core::DeployError>(())
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod deploy;
pub mod logging;
pub mod resolver;
pub mod source;
pub mod store;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
