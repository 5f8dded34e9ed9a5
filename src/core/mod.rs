//! Core types and error handling for blockdeploy.
//!
//! - [`block`] - [`FileRecord`] and the block naming rules
//! - [`error`] - [`DeployError`], [`ErrorContext`] and [`user_friendly_error`]

pub mod block;
pub mod error;

pub use block::{BlockName, FileRecord, block_name_from_path, prefixed_name};
pub use error::{DeployError, ErrorContext, user_friendly_error};
