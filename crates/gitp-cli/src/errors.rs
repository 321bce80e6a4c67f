// SPDX-License-Identifier: Apache-2.0

//! CLI-specific error formatting with user-friendly hints.
//!
//! Downcasts `anyhow::Error` to `GitpError` and adds hints for the errors a
//! user can fix. Per-repository failures never reach this module: they are
//! rendered as part of the batch output.

use std::process::ExitCode;

use anyhow::Error;
use gitp_core::GitpError;
use gitp_core::config::config_file_path;

/// Exit code when any repository step failed or a command errored.
pub const EXIT_FAILURE: u8 = 4;

/// Exit code when gitp has not been configured yet.
pub const EXIT_NOT_CONFIGURED: u8 = 3;

/// Formats an error for CLI display with helpful hints.
///
/// If the error is not a `GitpError`, returns the error chain.
pub fn format_error(error: &Error) -> String {
    let Some(gitp_err) = error.downcast_ref::<GitpError>() else {
        return format!("{error:#}");
    };

    match gitp_err {
        GitpError::NotConfigured => "no config found, please run `gitp config init`.".to_string(),
        GitpError::Config { .. } => {
            format!(
                "{gitp_err}\n\nTip: Check your config file at {}",
                config_file_path().display()
            )
        }
        GitpError::GitHub { .. } => {
            format!(
                "{}\n\nTip: Check your token and hostname, or run `gitp config init` again.",
                gitp_err.to_string().trim_end()
            )
        }
        GitpError::InvalidRepository { .. } => {
            format!("{gitp_err}\n\nTip: Repositories are written as owner/name, e.g. octocat/hello-world.")
        }
        GitpError::CommandNotInstalled { .. } => gitp_err.to_string(),
    }
}

/// Process exit code for an error that aborted a command.
pub fn exit_code(error: &Error) -> ExitCode {
    match error.downcast_ref::<GitpError>() {
        Some(GitpError::NotConfigured) => ExitCode::from(EXIT_NOT_CONFIGURED),
        _ => ExitCode::from(EXIT_FAILURE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_not_configured() {
        let err = anyhow::Error::new(GitpError::NotConfigured);
        assert_eq!(
            format_error(&err),
            "no config found, please run `gitp config init`."
        );
        assert_eq!(exit_code(&err), ExitCode::from(3));
    }

    #[test]
    fn test_format_config_error_points_at_file() {
        let err = anyhow::Error::new(GitpError::Config {
            message: "invalid TOML".to_string(),
        });
        let formatted = format_error(&err);
        assert!(formatted.contains("invalid TOML"));
        assert!(formatted.contains("config.toml"));
        assert_eq!(exit_code(&err), ExitCode::from(4));
    }

    #[test]
    fn test_format_github_error_has_tip() {
        let err = anyhow::Error::new(GitpError::GitHub {
            message: "Wrong GitHub permissions. Please check your token.".to_string(),
        });
        let formatted = format_error(&err);
        assert!(formatted.starts_with("Wrong GitHub permissions."));
        assert!(formatted.contains("Tip:"));
    }

    #[test]
    fn test_format_non_gitp_error() {
        let error = anyhow::anyhow!("Some generic error").context("Failed to load");
        assert_eq!(format_error(&error), "Failed to load: Some generic error");
    }
}
