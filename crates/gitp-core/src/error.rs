// SPDX-License-Identifier: Apache-2.0

//! Error types for gitp.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Application code should use `anyhow::Result` for top-level error handling;
//! the batch layer downcasts to [`GitpError`] to classify per-repository failures.

use thiserror::Error;

/// Errors that can occur during gitp operations.
#[derive(Error, Debug)]
pub enum GitpError {
    /// GitHub rejected the request (missing or conflicting resource).
    #[error("{message}")]
    GitHub {
        /// Error message, usually prefixed with the repository name.
        message: String,
    },

    /// Repository identifier is not of the form `owner/name`.
    #[error("Invalid repository '{repo}', expected owner/name")]
    InvalidRepository {
        /// The identifier as given.
        repo: String,
    },

    /// No configuration (token and selected repositories) was found.
    #[error("No config found, please run `gitp config init`")]
    NotConfigured,

    /// Configuration file error.
    #[error("Configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// A required executable is missing from `PATH`.
    #[error("This command requires {program} executable installed and on system path.")]
    CommandNotInstalled {
        /// Name of the executable.
        program: String,
    },
}

impl GitpError {
    /// Short type name used when a failure message is built from an error.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            GitpError::GitHub { .. } => "GitHubError",
            GitpError::InvalidRepository { .. } => "InvalidRepositoryError",
            GitpError::NotConfigured => "NotConfiguredError",
            GitpError::Config { .. } => "ConfigError",
            GitpError::CommandNotInstalled { .. } => "CommandNotInstalledError",
        }
    }
}

impl From<config::ConfigError> for GitpError {
    fn from(err: config::ConfigError) -> Self {
        GitpError::Config {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_not_installed_message() {
        let err = GitpError::CommandNotInstalled {
            program: "poetry".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "This command requires poetry executable installed and on system path."
        );
        assert_eq!(err.name(), "CommandNotInstalledError");
    }

    #[test]
    fn test_github_error_is_verbatim() {
        let err = GitpError::GitHub {
            message: "org/a: Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "org/a: Not Found");
    }
}
