//! Integration test suite for blockdeploy
//!
//! End-to-end tests that drive the library and the binary against mocked
//! HTTP services (`mockito`) and temporary workspaces (`tempfile`).
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **deploy**: full-mode runs through the REST client and directory source
//! - **incremental**: incremental-mode runs through the GitHub commit diff
//! - **cli**: the `blockdeploy` binary, its exit status and output

mod cli;
mod deploy;
mod incremental;
