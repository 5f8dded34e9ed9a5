//! Error handling for blockdeploy
//!
//! This module provides the error taxonomy for a deployment run and the
//! user-friendly rendering used by the CLI. The system follows two rules:
//! 1. **Strongly-typed errors** so callers can match on the failure mode
//! 2. **User-friendly messages** with actionable suggestions for CI logs
//!
//! # Architecture
//!
//! - [`DeployError`] - Enumerated error types for every failure in a run
//! - [`ErrorContext`] - Wrapper that adds details and a suggestion
//!
//! # Propagation
//!
//! Resolution errors ([`DeployError::UnresolvedReference`],
//! [`DeployError::CircularReference`]) are raised before any network side
//! effect, so a structurally invalid batch never publishes anything. A
//! [`DeployError::RemoteOperationFailure`] aborts the remaining publishes but
//! leaves already-published blocks in place.
//!
//! Library code propagates `anyhow::Error` values that wrap a [`DeployError`];
//! [`user_friendly_error`] downcasts them back for display.
//!
//! # Examples
//!
//! ```rust,no_run
//! use blockdeploy::core::{DeployError, user_friendly_error};
//!
//! let error = DeployError::UnresolvedReference {
//!     name: "footer".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Colored error, details and suggestion on stderr
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for blockdeploy operations
///
/// # Error Categories
///
/// ## Resolution
/// - [`UnresolvedReference`] - A referenced block is neither in the batch nor satisfiable
/// - [`CircularReference`] - Blocks in the batch reference each other in a cycle
///
/// ## Remote operations
/// - [`RemoteOperationFailure`] - The content store rejected or failed a request
/// - [`GitHubRequestFailed`] - The commit comparison or content fetch failed
///
/// ## Local inputs
/// - [`SourceError`] - A content block file could not be read
/// - [`ConfigError`] - Invalid configuration value
/// - [`MissingSetting`] - A required setting was not supplied
/// - [`IoError`] / [`TomlError`] - Conversions from library errors
///
/// [`UnresolvedReference`]: DeployError::UnresolvedReference
/// [`CircularReference`]: DeployError::CircularReference
/// [`RemoteOperationFailure`]: DeployError::RemoteOperationFailure
/// [`GitHubRequestFailed`]: DeployError::GitHubRequestFailed
/// [`SourceError`]: DeployError::SourceError
/// [`ConfigError`]: DeployError::ConfigError
/// [`MissingSetting`]: DeployError::MissingSetting
/// [`IoError`]: DeployError::IoError
/// [`TomlError`]: DeployError::TomlError
#[derive(Error, Debug)]
pub enum DeployError {
    /// A block references a name that is not part of the batch
    ///
    /// Also raised when the name exists remotely but was not resolved earlier
    /// in the same run; see the resolver documentation for that limitation.
    #[error("Referenced content block '{name}' does not exist in the repository or the content store")]
    UnresolvedReference {
        /// The referenced block name
        name: String,
    },

    /// A reference cycle confined to the current batch
    #[error("Circular reference detected: {chain}")]
    CircularReference {
        /// The cycle rendered as `a → b → a`
        chain: String,
    },

    /// The content store request failed (transport, auth, validation)
    #[error("Content store request failed: {operation} '{target}'{}", status_suffix(.status))]
    RemoteOperationFailure {
        /// The store operation ("list", "create", "update")
        operation: String,
        /// Block name, block id, or endpoint the operation targeted
        target: String,
        /// HTTP status when a response was received
        status: Option<u16>,
        /// Response body or transport error message
        reason: String,
    },

    /// A GitHub API request failed while collecting changed files
    #[error("GitHub request failed: {operation}{}", status_suffix(.status))]
    GitHubRequestFailed {
        /// The GitHub operation that failed
        operation: String,
        /// HTTP status when a response was received
        status: Option<u16>,
        /// Response body or transport error message
        reason: String,
    },

    /// A content block file could not be collected
    #[error("Failed to {operation} '{path}': {reason}")]
    SourceError {
        /// The file operation that failed
        operation: String,
        /// Path of the offending file or directory
        path: String,
        /// Why it failed
        reason: String,
    },

    /// Invalid configuration value
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// A required setting was not supplied on the command line, env, or file
    #[error("Missing required setting: {name}")]
    MissingSetting {
        /// Human-readable setting name
        name: String,
        /// Flag or environment variable that provides it
        hint: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" (HTTP {code})")).unwrap_or_default()
}

impl Clone for DeployError {
    fn clone(&self) -> Self {
        match self {
            Self::UnresolvedReference {
                name,
            } => Self::UnresolvedReference {
                name: name.clone(),
            },
            Self::CircularReference {
                chain,
            } => Self::CircularReference {
                chain: chain.clone(),
            },
            Self::RemoteOperationFailure {
                operation,
                target,
                status,
                reason,
            } => Self::RemoteOperationFailure {
                operation: operation.clone(),
                target: target.clone(),
                status: *status,
                reason: reason.clone(),
            },
            Self::GitHubRequestFailed {
                operation,
                status,
                reason,
            } => Self::GitHubRequestFailed {
                operation: operation.clone(),
                status: *status,
                reason: reason.clone(),
            },
            Self::SourceError {
                operation,
                path,
                reason,
            } => Self::SourceError {
                operation: operation.clone(),
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::MissingSetting {
                name,
                hint,
            } => Self::MissingSetting {
                name: name.clone(),
                hint: hint.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context in yellow (optional)
/// 3. **Suggestion**: Actionable steps in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: DeployError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: DeployError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`DeployError`] values anywhere in the chain's head, plain
/// [`std::io::Error`]s, and falls back to the full `Caused by:` chain for
/// everything else.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(deploy_error) = error.downcast_ref::<DeployError>() {
        return create_error_context(deploy_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>()
        && io_error.kind() == std::io::ErrorKind::NotFound
    {
        return ErrorContext::new(DeployError::SourceError {
            operation: "read".to_string(),
            path: "unknown".to_string(),
            reason: io_error.to_string(),
        })
        .with_suggestion("Check that the workspace path and content blocks directory exist");
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(DeployError::Other {
        message,
    })
}

/// Map each [`DeployError`] variant to details and a suggestion.
fn create_error_context(error: DeployError) -> ErrorContext {
    match &error {
        DeployError::UnresolvedReference {
            name,
        } => ErrorContext::new(error.clone())
            .with_details(format!(
                "A block references {{{{content_blocks.${{{name}}}}}}} but no file named '{name}' is part of this deployment"
            ))
            .with_suggestion(format!(
                "Add '{name}' to the content blocks directory or remove the reference. \
                 Blocks that only exist remotely must be deployed in the same run to be referenced"
            )),
        DeployError::CircularReference {
            ..
        } => ErrorContext::new(error.clone())
            .with_details("Blocks that reference each other can never be published in a valid order")
            .with_suggestion("Break the cycle by extracting the shared content into a separate block"),
        DeployError::RemoteOperationFailure {
            status,
            reason,
            ..
        } => {
            let ctx = ErrorContext::new(error.clone()).with_details(reason.clone());
            match status {
                Some(401 | 403) => ctx.with_suggestion(
                    "Check that the API key is valid and has the content_blocks permissions",
                ),
                Some(404) => ctx.with_suggestion(
                    "Check the REST endpoint URL for your instance (e.g. https://rest.iad-01.braze.com)",
                ),
                None => ctx.with_suggestion("Check your network connection and the REST endpoint URL"),
                _ => ctx.with_suggestion(
                    "Blocks published before this failure remain in the content store; rerun after fixing the cause",
                ),
            }
        }
        DeployError::GitHubRequestFailed {
            reason,
            ..
        } => ErrorContext::new(error.clone())
            .with_details(reason.clone())
            .with_suggestion(
                "Check the GitHub token, the repository name and that both commits exist",
            ),
        DeployError::SourceError {
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion("Content block files must be readable UTF-8 text"),
        DeployError::ConfigError {
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion("Check the command line flags, environment and blockdeploy.toml"),
        DeployError::MissingSetting {
            hint,
            ..
        } => ErrorContext::new(error.clone()).with_suggestion(hint.clone()),
        DeployError::TomlError(_) => ErrorContext::new(error.clone())
            .with_suggestion("Check the TOML syntax in blockdeploy.toml"),
        _ => ErrorContext::new(error.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_reference_message() {
        let error = DeployError::UnresolvedReference {
            name: "file5".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Referenced content block 'file5' does not exist in the repository or the content store"
        );
    }

    #[test]
    fn test_remote_failure_message_includes_status() {
        let error = DeployError::RemoteOperationFailure {
            operation: "create".to_string(),
            target: "header".to_string(),
            status: Some(400),
            reason: "bad request".to_string(),
        };
        assert_eq!(error.to_string(), "Content store request failed: create 'header' (HTTP 400)");

        let error = DeployError::RemoteOperationFailure {
            operation: "list".to_string(),
            target: "https://rest.example.com".to_string(),
            status: None,
            reason: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Content store request failed: list 'https://rest.example.com'"
        );
    }

    #[test]
    fn test_user_friendly_error_unresolved_reference() {
        let error = DeployError::UnresolvedReference {
            name: "footer".to_string(),
        };
        let ctx = user_friendly_error(anyhow::Error::from(error));

        assert!(matches!(ctx.error, DeployError::UnresolvedReference { .. }));
        let details = ctx.details.unwrap();
        assert!(details.contains("{{content_blocks.${footer}}}"));
        assert!(ctx.suggestion.unwrap().contains("same run"));
    }

    #[test]
    fn test_user_friendly_error_auth_failure() {
        let error = DeployError::RemoteOperationFailure {
            operation: "list".to_string(),
            target: "https://rest.example.com".to_string(),
            status: Some(401),
            reason: "{\"message\":\"Invalid API key\"}".to_string(),
        };
        let ctx = user_friendly_error(anyhow::Error::from(error));

        assert!(ctx.suggestion.unwrap().contains("API key"));
        assert!(ctx.details.unwrap().contains("Invalid API key"));
    }

    #[test]
    fn test_user_friendly_error_through_context() {
        use anyhow::Context;

        let result: anyhow::Result<()> = Err(DeployError::CircularReference {
            chain: "a → b → a".to_string(),
        }
        .into());
        let error = result.context("Failed to resolve publish order").unwrap_err();

        // Context wrapping still downcasts to the inner error
        let ctx = user_friendly_error(error);
        assert!(matches!(ctx.error, DeployError::CircularReference { .. }));
    }

    #[test]
    fn test_user_friendly_error_generic_chain() {
        let error = anyhow::anyhow!("root cause").context("outer");
        let ctx = user_friendly_error(error);

        let message = ctx.error.to_string();
        assert!(message.starts_with("outer"));
        assert!(message.contains("Caused by:"));
        assert!(message.contains("1: root cause"));
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new(DeployError::MissingSetting {
            name: "API key".to_string(),
            hint: "--api-key or BRAZE_API_KEY".to_string(),
        })
        .with_details("needed to talk to the content store")
        .with_suggestion("Provide it with --api-key or BRAZE_API_KEY");

        let display = ctx.to_string();
        assert!(display.contains("Missing required setting: API key"));
        assert!(display.contains("Details: needed to talk to the content store"));
        assert!(display.contains("Suggestion: Provide it with --api-key"));
    }
}
