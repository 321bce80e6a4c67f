// SPDX-License-Identifier: Apache-2.0

//! Value objects passed between the CLI, the batch layer and the GitHub service.
//!
//! All of them are created fresh for one command invocation.

use std::collections::BTreeSet;

use bon::Builder;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// A GitHub issue (or pull request seen through the issues API).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct Issue {
    /// Issue number, unique within a repository. Zero for issues not yet created.
    #[builder(default)]
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Issue body (markdown).
    #[builder(default)]
    pub body: String,
    /// Label names.
    #[builder(default)]
    pub labels: BTreeSet<String>,
}

/// Draft of a pull request to open in every selected repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct PullRequest {
    /// Pull request title.
    pub title: String,
    /// Pull request body (markdown).
    #[builder(default)]
    pub body: String,
    /// Label names to add once the pull request exists.
    #[builder(default)]
    pub labels: BTreeSet<String>,
    /// Link open issues whose title contains `issues_title_query`.
    #[builder(default)]
    pub link_issues: bool,
    /// Title substring used to find issues to link.
    #[builder(default)]
    pub issues_title_query: String,
    /// Copy the labels of linked issues onto the pull request.
    #[builder(default)]
    pub inherit_labels: bool,
    /// Source branch.
    pub head: String,
    /// Destination branch.
    pub base: String,
    /// Open as draft.
    #[builder(default)]
    pub draft: bool,
}

/// Pull request merge criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestMerge {
    /// Destination branch.
    pub base: String,
    /// Source branch.
    pub head: String,
    /// User or organization owning the head branch.
    pub prefix: String,
    /// Delete the head branch after a successful merge.
    pub delete_branch: bool,
}

impl PullRequestMerge {
    /// Head in the `owner:branch` form expected by the pull request list API.
    #[must_use]
    pub fn qualified_head(&self) -> String {
        format!("{}:{}", self.prefix, self.head)
    }
}

/// Settings needed to reach GitHub or a GitHub Enterprise server.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Personal access token.
    pub access_token: SecretString,
    /// Enterprise hostname; empty for github.com.
    pub hostname: String,
}

impl ConnectionSettings {
    /// Host used for API calls and clone URLs.
    #[must_use]
    pub fn host(&self) -> &str {
        if self.hostname.is_empty() {
            "github.com"
        } else {
            &self.hostname
        }
    }

    /// Whether these settings point at a GitHub Enterprise server.
    #[must_use]
    pub fn is_enterprise(&self) -> bool {
        !self.hostname.is_empty()
    }
}

/// Parses a comma separated label list, trimming blanks.
#[must_use]
pub fn parse_labels(input: &str) -> BTreeSet<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Folder name of a repository: the part after the last `/`.
#[must_use]
pub fn repo_folder(repo: &str) -> &str {
    repo.rsplit('/').next().unwrap_or(repo)
}
