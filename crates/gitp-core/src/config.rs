// SPDX-License-Identifier: Apache-2.0

//! Configuration management for gitp.
//!
//! Provides layered configuration from files and environment variables.
//! Uses XDG-compliant paths with environment variable support.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `GITP_`)
//! 2. Config file: `~/.config/gitp/config.toml`
//! 3. Built-in defaults
//!
//! # Examples
//!
//! ```bash
//! # Point at a GitHub Enterprise server for one run
//! GITP_GITHUB__HOSTNAME=ghe.example.com gitp issues list
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::batch::classify_error;
use crate::domain::ConnectionSettings;
use crate::error::GitpError;
use crate::github::GithubService;
use crate::github::auth::resolve_token;
use crate::response::{Failure, Response};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// GitHub connection and repository selection.
    pub github: GitHubConfig,
    /// UI preferences.
    pub ui: UiConfig,
}

/// GitHub connection and repository selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub Enterprise hostname; empty for github.com.
    pub hostname: String,
    /// Personal access token. Falls back to `GH_TOKEN` / `GITHUB_TOKEN`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Repositories (`owner/name`) every batch command applies to.
    pub selected_repos: Vec<String>,
}

/// UI preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Enable colored output.
    pub color: bool,
    /// Ask for confirmation before changing remote state.
    pub confirm: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            color: true,
            confirm: true,
        }
    }
}

impl AppConfig {
    /// Connection settings, if a token is available from any source.
    #[must_use]
    pub fn connection_settings(&self) -> Option<ConnectionSettings> {
        let (access_token, source) = resolve_token(self.github.access_token.as_deref())?;
        debug!(source = %source, "Resolved GitHub token");
        Some(ConnectionSettings {
            access_token,
            hostname: self.github.hostname.clone(),
        })
    }

    /// Whether gitp still needs to be configured: no token or no selected
    /// repositories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.github.selected_repos.is_empty() || self.connection_settings().is_none()
    }
}

/// Returns the gitp configuration directory.
///
/// Respects the `XDG_CONFIG_HOME` environment variable if set,
/// otherwise defaults to `~/.config/gitp`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return PathBuf::from(xdg_config).join("gitp");
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("gitp")
}

/// Returns the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load application configuration.
///
/// Loads from config file (if exists) and environment variables.
/// Environment variables use the prefix `GITP_` and double underscore
/// for nested keys (e.g., `GITP_GITHUB__HOSTNAME`). Selected repositories
/// can be given as a comma separated list.
///
/// # Errors
///
/// Returns `GitpError::Config` if the config file exists but is invalid.
pub fn load_config() -> Result<AppConfig, GitpError> {
    load_config_from(&config_file_path())
}

/// Like [`load_config`], reading the file at `path`.
///
/// # Errors
///
/// Returns `GitpError::Config` if the file exists but is invalid.
#[instrument]
pub fn load_config_from(path: &Path) -> Result<AppConfig, GitpError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("GITP")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("github.selected_repos")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    debug!(
        repos = app_config.github.selected_repos.len(),
        "Loaded configuration"
    );
    Ok(app_config)
}

/// Writes the configuration file, creating its directory when needed.
///
/// # Errors
///
/// Returns `GitpError::Config` if the file cannot be serialized or written.
pub fn save_config(config: &AppConfig) -> Result<(), GitpError> {
    save_config_to(&config_file_path(), config)
}

/// Like [`save_config`], writing to `path`.
///
/// # Errors
///
/// Returns `GitpError::Config` if the file cannot be serialized or written.
#[instrument(skip(config))]
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), GitpError> {
    let contents = toml::to_string_pretty(config).map_err(|e| GitpError::Config {
        message: format!("Failed to serialize configuration: {e}"),
    })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| GitpError::Config {
            message: format!("Failed to create {}: {e}", parent.display()),
        })?;
    }
    fs::write(path, contents).map_err(|e| GitpError::Config {
        message: format!("Failed to write {}: {e}", path.display()),
    })?;

    // The file holds an access token.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| {
            GitpError::Config {
                message: format!("Failed to restrict {}: {e}", path.display()),
            }
        })?;
    }

    info!(path = %path.display(), "Configuration saved");
    Ok(())
}

/// Validates the connection, then stores the settings together with the
/// chosen repositories.
///
/// The service must have been built from `hostname` and `access_token`.
pub async fn init_config<S>(
    service: &S,
    config: &mut AppConfig,
    hostname: &str,
    access_token: Option<String>,
    selected_repos: Vec<String>,
    path: &Path,
) -> Response
where
    S: GithubService + ?Sized,
{
    let username = service.get_username().await.map_err(|e| classify_error(&e))?;
    debug!(username = %username, "Connection validated");

    config.github.hostname = hostname.to_string();
    config.github.access_token = access_token;
    config.github.selected_repos = selected_repos;
    save_config_to(path, config).map_err(|e| Failure::system(e.to_string()))?;

    Ok("gitp successfully configured.".to_string())
}

/// Replaces the selected repositories and stores the configuration.
pub fn update_repos(config: &mut AppConfig, selected_repos: Vec<String>, path: &Path) -> Response {
    config.github.selected_repos = selected_repos;
    save_config_to(path, config).map_err(|e| Failure::system(e.to_string()))?;
    Ok("gitp repositories successfully configured.".to_string())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn clear_env() {
        unsafe {
            std::env::remove_var("GITP_GITHUB__HOSTNAME");
            std::env::remove_var("GITP_GITHUB__SELECTED_REPOS");
            std::env::remove_var("GH_TOKEN");
            std::env::remove_var("GITHUB_TOKEN");
        }
    }

    #[test]
    #[serial]
    fn test_load_config_defaults() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, AppConfig::default());
        assert!(config.ui.color);
        assert!(config.ui.confirm);
        assert!(config.is_empty());
    }

    #[test]
    #[serial]
    fn test_load_config_from_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[github]
hostname = "ghe.example.com"
access_token = "ghp_file"
selected_repos = ["org/a", "org/b"]

[ui]
confirm = false
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.github.hostname, "ghe.example.com");
        assert_eq!(config.github.selected_repos, vec!["org/a", "org/b"]);
        assert!(config.ui.color);
        assert!(!config.ui.confirm);
        assert!(!config.is_empty());

        let settings = config.connection_settings().unwrap();
        assert!(settings.is_enterprise());
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[github]\nhostname = \"ghe.example.com\"\n").unwrap();

        unsafe {
            std::env::set_var("GITP_GITHUB__HOSTNAME", "other.example.com");
            std::env::set_var("GITP_GITHUB__SELECTED_REPOS", "org/a,org/b");
        }
        let config = load_config_from(&path).unwrap();
        clear_env();

        assert_eq!(config.github.hostname, "other.example.com");
        assert_eq!(config.github.selected_repos, vec!["org/a", "org/b"]);
    }

    #[test]
    #[serial]
    fn test_invalid_file_is_config_error() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[github\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, GitpError::Config { .. }));
    }

    #[test]
    #[serial]
    fn test_save_then_load() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.github.access_token = Some("ghp_saved".to_string());
        config.github.selected_repos = vec!["org/a".to_string()];
        save_config_to(&path, &config).unwrap();

        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    #[serial]
    fn test_update_repos_message() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = AppConfig::default();

        let response = update_repos(&mut config, vec!["org/b".to_string()], &path);
        assert_eq!(
            response,
            Ok("gitp repositories successfully configured.".to_string())
        );
        assert_eq!(load_config_from(&path).unwrap().github.selected_repos, vec!["org/b"]);
    }

    #[test]
    #[serial]
    fn test_config_dir_respects_xdg_config_home() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", "/custom/config");
        }

        assert_eq!(config_dir(), PathBuf::from("/custom/config/gitp"));
        assert!(config_file_path().ends_with("gitp/config.toml"));

        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_config_dir_ignores_empty_xdg_config_home() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", "");
        }

        assert!(config_dir().ends_with("gitp"));

        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }
    }
}
