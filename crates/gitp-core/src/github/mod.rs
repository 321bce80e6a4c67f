// SPDX-License-Identifier: Apache-2.0

//! GitHub integration module.
//!
//! [`GithubService`] is the boundary the batch layer talks to. The
//! octocrab-backed implementation lives in [`service`]; tests provide their
//! own in-memory implementations.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{Issue, PullRequest, PullRequestMerge};
use crate::error::GitpError;
use crate::filter;
use crate::request::ValidRequest;

pub mod auth;
pub mod service;

pub use service::OctocrabService;

/// Remote operations available to batch use cases.
///
/// Every per-repository method takes the repository as `owner/name` and
/// returns a message on success. Errors that GitHub reports about the
/// request itself should be returned as [`GitpError::GitHub`]; anything else
/// is treated as unexpected by the caller.
#[async_trait]
pub trait GithubService: Send + Sync {
    /// Creates an issue.
    async fn create_issue_from_repo(&self, repo: &str, issue: &Issue) -> Result<String>;

    /// Lists issues matching a valid request.
    async fn list_issues_from_repo(&self, repo: &str, request: &ValidRequest)
    -> Result<Vec<Issue>>;

    /// Closes the given issues.
    async fn close_issues_from_repo(&self, repo: &str, issues: &[Issue]) -> Result<String>;

    /// Reopens the given issues.
    async fn reopen_issues_from_repo(&self, repo: &str, issues: &[Issue]) -> Result<String>;

    /// Opens a pull request.
    async fn create_pull_request_from_repo(&self, repo: &str, pr: &PullRequest)
    -> Result<String>;

    /// Merges the single open pull request matching `pr_merge`.
    async fn merge_pull_request_from_repo(
        &self,
        repo: &str,
        pr_merge: &PullRequestMerge,
    ) -> Result<String>;

    /// Deletes a branch.
    async fn delete_branch_from_repo(&self, repo: &str, branch: &str) -> Result<String>;

    /// Full names of the repositories visible to the authenticated user.
    async fn get_repo_names(&self) -> Result<Vec<String>>;

    /// SSH clone URL of a repository.
    fn get_repo_url(&self, repo: &str) -> String;

    /// Login of the authenticated user.
    async fn get_username(&self) -> Result<String>;

    /// Returns a copy of `pr` linked to `issues`.
    fn link_issues(&self, pr: &PullRequest, issues: &[Issue]) -> PullRequest {
        filter::link_issues(pr, issues)
    }
}

/// Splits an `owner/name` repository identifier.
///
/// Validates format: exactly one `/`, non-empty parts.
pub fn parse_owner_repo(s: &str) -> Result<(String, String), GitpError> {
    match s.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(GitpError::InvalidRepository {
            repo: s.to_string(),
        }),
    }
}
