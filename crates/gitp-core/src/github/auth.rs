// SPDX-License-Identifier: Apache-2.0

//! GitHub token resolution and client creation.
//!
//! Token resolution priority chain:
//! 1. Token stored in the gitp configuration file
//! 2. `GH_TOKEN` environment variable
//! 3. `GITHUB_TOKEN` environment variable

use anyhow::{Context, Result};
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::ConnectionSettings;

/// Source of the GitHub authentication token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSource {
    /// Token from the configuration file.
    Config,
    /// Token from `GH_TOKEN` or `GITHUB_TOKEN` environment variable.
    Environment,
}

impl std::fmt::Display for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenSource::Config => write!(f, "configuration file"),
            TokenSource::Environment => write!(f, "environment variable"),
        }
    }
}

/// Resolves a GitHub token using the priority chain.
///
/// `configured` is the token read from the configuration file, if any.
/// Empty values are skipped at every step.
#[instrument(skip(configured))]
pub fn resolve_token(configured: Option<&str>) -> Option<(SecretString, TokenSource)> {
    if let Some(token) = configured
        && !token.is_empty()
    {
        debug!("Using token from configuration file");
        return Some((SecretString::from(token.to_string()), TokenSource::Config));
    }

    if let Ok(token) = std::env::var("GH_TOKEN")
        && !token.is_empty()
    {
        debug!("Using token from GH_TOKEN environment variable");
        return Some((SecretString::from(token), TokenSource::Environment));
    }

    if let Ok(token) = std::env::var("GITHUB_TOKEN")
        && !token.is_empty()
    {
        debug!("Using token from GITHUB_TOKEN environment variable");
        return Some((SecretString::from(token), TokenSource::Environment));
    }

    debug!("No token found in any source");
    None
}

/// API base URI for the given settings.
///
/// GitHub Enterprise servers expose the REST API under `/api/v3`.
#[must_use]
pub fn api_base_uri(settings: &ConnectionSettings) -> String {
    if settings.is_enterprise() {
        format!("https://{}/api/v3", settings.hostname)
    } else {
        "https://api.github.com".to_string()
    }
}

/// Creates an authenticated Octocrab client for github.com or an Enterprise
/// server.
///
/// # Errors
///
/// Returns an error if the base URI is invalid or the client cannot be built.
#[instrument(skip(settings), fields(host = %settings.host()))]
pub fn create_client(settings: &ConnectionSettings) -> Result<Octocrab> {
    info!("Creating GitHub client");

    let mut builder =
        Octocrab::builder().personal_token(settings.access_token.expose_secret().to_string());

    if settings.is_enterprise() {
        builder = builder
            .base_uri(api_base_uri(settings))
            .with_context(|| format!("Invalid GitHub Enterprise hostname: {}", settings.hostname))?;
    }

    let client = builder.build().context("Failed to build GitHub client")?;

    debug!("Created authenticated GitHub client");
    Ok(client)
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn settings(hostname: &str) -> ConnectionSettings {
        ConnectionSettings {
            access_token: SecretString::from("ghp_test".to_string()),
            hostname: hostname.to_string(),
        }
    }

    #[test]
    fn test_token_source_display() {
        assert_eq!(TokenSource::Config.to_string(), "configuration file");
        assert_eq!(TokenSource::Environment.to_string(), "environment variable");
    }

    #[test]
    fn test_api_base_uri() {
        assert_eq!(api_base_uri(&settings("")), "https://api.github.com");
        assert_eq!(
            api_base_uri(&settings("ghe.example.com")),
            "https://ghe.example.com/api/v3"
        );
    }

    #[test]
    #[serial]
    fn test_resolve_token_prefers_config() {
        // SAFETY: serialized test, no other thread reads the environment.
        unsafe { std::env::set_var("GH_TOKEN", "from-env") };

        let (token, source) = resolve_token(Some("from-config")).unwrap();
        assert_eq!(token.expose_secret(), "from-config");
        assert_eq!(source, TokenSource::Config);

        unsafe { std::env::remove_var("GH_TOKEN") };
    }

    #[test]
    #[serial]
    fn test_resolve_token_falls_back_to_env() {
        unsafe {
            std::env::remove_var("GH_TOKEN");
            std::env::set_var("GITHUB_TOKEN", "from-github-token");
        }

        let (token, source) = resolve_token(Some("")).unwrap();
        assert_eq!(token.expose_secret(), "from-github-token");
        assert_eq!(source, TokenSource::Environment);

        unsafe { std::env::remove_var("GITHUB_TOKEN") };
    }

    #[test]
    #[serial]
    fn test_resolve_token_none() {
        unsafe {
            std::env::remove_var("GH_TOKEN");
            std::env::remove_var("GITHUB_TOKEN");
        }
        assert!(resolve_token(None).is_none());
    }

    #[tokio::test]
    async fn test_create_client_for_enterprise() {
        assert!(create_client(&settings("ghe.example.com")).is_ok());
    }
}
