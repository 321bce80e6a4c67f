// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # gitp Core
//!
//! Core library for gitp - batch Git and GitHub operations across many
//! repositories.
//!
//! This crate provides reusable components for:
//! - Per-repository responses with classified failures
//! - Issue-list request validation and issue filtering
//! - Sequential batch execution of GitHub operations
//! - GitHub API integration via Octocrab
//! - Local `git`/`poetry` batches
//! - Configuration management
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gitp_core::{Issue, Operation, OctocrabService, execute, load_config};
//! use anyhow::{Context, Result};
//!
//! # async fn example() -> Result<()> {
//! let config = load_config()?;
//! let settings = config.connection_settings().context("no token")?;
//! let service = OctocrabService::new(settings)?;
//!
//! let issue = Issue::builder().title("Bump dependencies".to_string()).build();
//! let result = execute(
//!     &service,
//!     &config.github.selected_repos,
//!     &Operation::CreateIssue(issue),
//!     |_current, _total, _message| {},
//! )
//! .await;
//!
//! for (repo, response) in &result.outcomes {
//!     println!("{repo}: {response:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`batch`] - Sequential per-repository execution
//! - [`config`] - Configuration loading, saving and paths
//! - [`domain`] - Issues, pull request drafts, merge criteria
//! - [`error`] - Error types
//! - [`filter`] - Issue filtering and linking
//! - [`github`] - GitHub service trait and Octocrab implementation
//! - [`local`] - Local command batches
//! - [`request`] - Issue-list request validation
//! - [`response`] - Per-repository responses

// ============================================================================
// Error Handling
// ============================================================================

pub use error::GitpError;

// ============================================================================
// Responses
// ============================================================================

pub use response::{ErrorKind, Failure, Response};

// ============================================================================
// Domain
// ============================================================================

pub use domain::{
    ConnectionSettings, Issue, PullRequest, PullRequestMerge, parse_labels, repo_folder,
};

// ============================================================================
// Requests and Filtering
// ============================================================================

pub use filter::{RemoteIssue, filter_issues, link_issues};
pub use request::{
    InvalidRequest, IssueListRequest, IssueState, ObjectKind, RequestError, ValidRequest,
    build_list_request,
};

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    AppConfig, GitHubConfig, UiConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from, save_config, save_config_to, update_repos,
};

// ============================================================================
// GitHub Integration
// ============================================================================

pub use github::auth::{TokenSource, create_client, resolve_token};
pub use github::{GithubService, OctocrabService, parse_owner_repo};

// ============================================================================
// Batch Execution
// ============================================================================

pub use batch::{
    BatchResult, ISSUES_URL, Operation, classify_error, execute, issues_response, list_issues,
    target_repos,
};

// ============================================================================
// Local Commands
// ============================================================================

pub use local::{
    CommandOutput, GIT_COMMANDS, LocalCommand, ProcessRunner, SystemRunner, clone_repos,
    is_git_command, run_in_repos,
};

// ============================================================================
// Modules
// ============================================================================

pub mod batch;
pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod github;
pub mod local;
pub mod request;
pub mod response;
