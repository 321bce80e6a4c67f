// SPDX-License-Identifier: Apache-2.0

//! Octocrab implementation of [`GithubService`].
//!
//! Errors GitHub reports about a request (4xx/5xx with a JSON body) become
//! [`GitpError::GitHub`] with a repository-prefixed message. Transport
//! failures are passed through as `octocrab::Error` with context.

use anyhow::{Context, Result};
use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::models::IssueState as RemoteIssueState;
use octocrab::params;
use tracing::{debug, instrument};

use super::auth::create_client;
use super::{GithubService, parse_owner_repo};
use crate::domain::{ConnectionSettings, Issue, PullRequest, PullRequestMerge};
use crate::error::GitpError;
use crate::filter::{RemoteIssue, filter_issues};
use crate::request::{IssueState, ValidRequest};

/// GitHub service backed by an authenticated Octocrab client.
#[derive(Clone)]
pub struct OctocrabService {
    client: Octocrab,
    settings: ConnectionSettings,
}

impl OctocrabService {
    /// Connects to GitHub (or GitHub Enterprise) with the given settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn new(settings: ConnectionSettings) -> Result<Self> {
        let client = create_client(&settings)?;
        Ok(Self { client, settings })
    }

    /// Wraps an existing client.
    #[must_use]
    pub fn with_client(client: Octocrab, settings: ConnectionSettings) -> Self {
        Self { client, settings }
    }

    /// Connection settings used by this service.
    #[must_use]
    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    async fn set_issue_state(
        &self,
        repo: &str,
        issues: &[Issue],
        state: RemoteIssueState,
        hint: Hint,
    ) -> Result<()> {
        let (owner, name) = parse_owner_repo(repo)?;
        let handler = self.client.issues(&owner, &name);

        for issue in issues {
            debug!(number = issue.number, state = ?state, "Updating issue state");
            handler
                .update(issue.number)
                .state(state.clone())
                .send()
                .await
                .map_err(|e| remote_error(repo, e, hint))?;
        }
        Ok(())
    }
}

/// Optional explanation appended to a remote error message, chosen from the
/// HTTP status and GitHub's message.
type Hint = fn(u16, &str) -> Option<&'static str>;

fn no_hint(_status: u16, _message: &str) -> Option<&'static str> {
    None
}

fn fork_hint(_status: u16, message: &str) -> Option<&'static str> {
    (message == "Issues are disabled for this repo").then_some("It may be a fork.")
}

fn deleted_branch_hint(status: u16, _message: &str) -> Option<&'static str> {
    (status == 422).then_some("Probably the branch was deleted.")
}

/// Formats a remote error for one repository:
/// `"<repo>: <message>.<details> <hint>\n"`.
fn format_remote_message(repo: &str, message: &str, details: &str, hint: Option<&str>) -> String {
    let message = message.trim_end_matches('.');
    match hint {
        Some(hint) => format!("{repo}: {message}.{details} {hint}\n"),
        None => format!("{repo}: {message}.{details}\n"),
    }
}

/// Flattens GitHub's validation error list into `" <message>."` fragments.
fn error_details(errors: Option<&Vec<serde_json::Value>>) -> String {
    let mut details = String::new();
    for error in errors.into_iter().flatten() {
        if let Some(message) = error.get("message").and_then(serde_json::Value::as_str) {
            details.push_str(&format!(" {}.", message.trim_end_matches('.')));
        } else if let Some(field) = error.get("field").and_then(serde_json::Value::as_str) {
            details.push_str(&format!(" Invalid field {field}."));
        }
    }
    details
}

fn remote_error(repo: &str, err: octocrab::Error, hint: Hint) -> anyhow::Error {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            let status = source.status_code.as_u16();
            let message = format_remote_message(
                repo,
                &source.message,
                &error_details(source.errors.as_ref()),
                hint(status, &source.message),
            );
            GitpError::GitHub { message }.into()
        }
        other => anyhow::Error::new(other).context(format!("{repo}: GitHub request failed")),
    }
}

fn remote_state(state: IssueState) -> params::State {
    match state {
        IssueState::All => params::State::All,
        IssueState::Open => params::State::Open,
        IssueState::Closed => params::State::Closed,
    }
}

#[async_trait]
impl GithubService for OctocrabService {
    #[instrument(skip(self, issue), fields(repo = %repo))]
    async fn create_issue_from_repo(&self, repo: &str, issue: &Issue) -> Result<String> {
        let (owner, name) = parse_owner_repo(repo)?;

        self.client
            .issues(&owner, &name)
            .create(&issue.title)
            .body(&issue.body)
            .labels(Some(issue.labels.iter().cloned().collect::<Vec<_>>()))
            .send()
            .await
            .map_err(|e| remote_error(repo, e, fork_hint))?;

        debug!("Issue created");
        Ok(format!("{repo}: create issue successful.\n"))
    }

    #[instrument(skip(self, request), fields(repo = %repo))]
    async fn list_issues_from_repo(
        &self,
        repo: &str,
        request: &ValidRequest,
    ) -> Result<Vec<Issue>> {
        let (owner, name) = parse_owner_repo(repo)?;
        let handler = self.client.issues(&owner, &name);

        let mut builder = handler.list().per_page(100);
        if request.filters().is_some()
            && let Some(state) = request.state()
        {
            builder = builder.state(remote_state(state));
        }

        let first_page = builder
            .send()
            .await
            .map_err(|e| remote_error(repo, e, no_hint))?;
        let records = self
            .client
            .all_pages(first_page)
            .await
            .map_err(|e| remote_error(repo, e, no_hint))?;

        let total = records.len();
        let records = records
            .into_iter()
            .map(|issue| RemoteIssue {
                number: issue.number,
                title: issue.title,
                body: issue.body.unwrap_or_default(),
                labels: issue.labels.into_iter().map(|l| l.name).collect(),
                is_pull_request: issue.pull_request.is_some(),
            })
            .collect();
        let issues = filter_issues(records, request);

        debug!(total, matched = issues.len(), "Listed issues");
        Ok(issues)
    }

    #[instrument(skip(self, issues), fields(repo = %repo, count = issues.len()))]
    async fn close_issues_from_repo(&self, repo: &str, issues: &[Issue]) -> Result<String> {
        if issues.is_empty() {
            return Ok(format!("{repo}: no issues match.\n"));
        }
        self.set_issue_state(repo, issues, RemoteIssueState::Closed, no_hint)
            .await?;
        Ok(format!("{repo}: close issues successful.\n"))
    }

    #[instrument(skip(self, issues), fields(repo = %repo, count = issues.len()))]
    async fn reopen_issues_from_repo(&self, repo: &str, issues: &[Issue]) -> Result<String> {
        if issues.is_empty() {
            return Ok(format!("{repo}: no issues match.\n"));
        }
        self.set_issue_state(repo, issues, RemoteIssueState::Open, deleted_branch_hint)
            .await?;
        Ok(format!("{repo}: reopen issues successful.\n"))
    }

    #[instrument(skip(self, pr), fields(repo = %repo, head = %pr.head, base = %pr.base))]
    async fn create_pull_request_from_repo(
        &self,
        repo: &str,
        pr: &PullRequest,
    ) -> Result<String> {
        let (owner, name) = parse_owner_repo(repo)?;

        let created = self
            .client
            .pulls(&owner, &name)
            .create(&pr.title, &pr.head, &pr.base)
            .body(&pr.body)
            .draft(pr.draft)
            .send()
            .await
            .map_err(|e| remote_error(repo, e, no_hint))?;

        if !pr.labels.is_empty() {
            let labels: Vec<String> = pr.labels.iter().cloned().collect();
            self.client
                .issues(&owner, &name)
                .add_labels(created.number, &labels)
                .await
                .map_err(|e| remote_error(repo, e, no_hint))?;
        }

        debug!(number = created.number, "Pull request created");
        Ok(format!("{repo}: create PR successful.\n"))
    }

    #[instrument(skip(self, pr_merge), fields(repo = %repo, base = %pr_merge.base, head = %pr_merge.head))]
    async fn merge_pull_request_from_repo(
        &self,
        repo: &str,
        pr_merge: &PullRequestMerge,
    ) -> Result<String> {
        let (owner, name) = parse_owner_repo(repo)?;
        let handler = self.client.pulls(&owner, &name);

        let page = handler
            .list()
            .state(params::State::Open)
            .base(&pr_merge.base)
            .head(pr_merge.qualified_head())
            .per_page(100)
            .send()
            .await
            .map_err(|e| remote_error(repo, e, no_hint))?;

        let number = match page.items.as_slice() {
            [] => {
                return Err(GitpError::GitHub {
                    message: format!(
                        "{repo}: no open PR found for {}:{}.\n",
                        pr_merge.base, pr_merge.head
                    ),
                }
                .into());
            }
            [pull] => pull.number,
            _ => {
                return Err(GitpError::GitHub {
                    message: format!(
                        "{repo}: unexpected number of PRs for {}:{}.\n",
                        pr_merge.base, pr_merge.head
                    ),
                }
                .into());
            }
        };

        handler
            .merge(number)
            .send()
            .await
            .map_err(|e| remote_error(repo, e, no_hint))?;

        debug!(number, "Pull request merged");
        Ok(format!("{repo}: merge PR successful.\n"))
    }

    #[instrument(skip(self), fields(repo = %repo))]
    async fn delete_branch_from_repo(&self, repo: &str, branch: &str) -> Result<String> {
        let (owner, name) = parse_owner_repo(repo)?;

        self.client
            .repos(&owner, &name)
            .delete_ref(&params::repos::Reference::Branch(branch.to_string()))
            .await
            .map_err(|e| remote_error(repo, e, no_hint))?;

        Ok(format!("{repo}: delete branch successful.\n"))
    }

    #[instrument(skip(self))]
    async fn get_repo_names(&self) -> Result<Vec<String>> {
        let first_page = self
            .client
            .current()
            .list_repos_for_authenticated_user()
            .per_page(100)
            .send()
            .await
            .context("Failed to list repositories")?;
        let repos = self
            .client
            .all_pages(first_page)
            .await
            .context("Failed to list repositories")?;

        let names: Vec<String> = repos.into_iter().filter_map(|r| r.full_name).collect();
        debug!(count = names.len(), "Fetched repository names");
        Ok(names)
    }

    fn get_repo_url(&self, repo: &str) -> String {
        format!("git@{}:{repo}.git", self.settings.host())
    }

    #[instrument(skip(self))]
    async fn get_username(&self) -> Result<String> {
        match self.client.current().user().await {
            Ok(user) => Ok(user.login),
            Err(octocrab::Error::GitHub { source, .. })
                if source.status_code.as_u16() == 401 =>
            {
                Err(GitpError::GitHub {
                    message: "Wrong GitHub permissions. Please check your token.".to_string(),
                }
                .into())
            }
            Err(e) => Err(anyhow::Error::new(e).context(
                "Unable to reach server. Please check your network and credentials. \
                 This also happens when GitHub is offline, then try again later.",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_format_remote_message() {
        assert_eq!(
            format_remote_message("org/a", "Not Found", "", None),
            "org/a: Not Found.\n"
        );
        assert_eq!(
            format_remote_message(
                "org/a",
                "Issues are disabled for this repo",
                "",
                fork_hint(410, "Issues are disabled for this repo")
            ),
            "org/a: Issues are disabled for this repo. It may be a fork.\n"
        );
    }

    #[test]
    fn test_hints() {
        assert_eq!(
            deleted_branch_hint(422, "Validation Failed"),
            Some("Probably the branch was deleted.")
        );
        assert_eq!(deleted_branch_hint(404, "Not Found"), None);
        assert_eq!(fork_hint(404, "Not Found"), None);
        assert_eq!(no_hint(422, "Validation Failed"), None);
    }

    #[test]
    fn test_error_details() {
        let errors = vec![
            json!({"resource": "PullRequest", "code": "custom", "message": "A pull request already exists for org:fix."}),
            json!({"resource": "PullRequest", "code": "invalid", "field": "head"}),
        ];
        assert_eq!(
            error_details(Some(&errors)),
            " A pull request already exists for org:fix. Invalid field head."
        );
        assert_eq!(error_details(None), "");
    }

    #[test]
    fn test_remote_state() {
        assert!(matches!(remote_state(IssueState::Open), params::State::Open));
        assert!(matches!(remote_state(IssueState::Closed), params::State::Closed));
        assert!(matches!(remote_state(IssueState::All), params::State::All));
    }

    #[tokio::test]
    async fn test_get_repo_url() {
        let settings = ConnectionSettings {
            access_token: SecretString::from("ghp_test".to_string()),
            hostname: String::new(),
        };
        let service = OctocrabService::new(settings).unwrap();
        assert_eq!(
            service.get_repo_url("staticdev/omg"),
            "git@github.com:staticdev/omg.git"
        );

        let settings = ConnectionSettings {
            access_token: SecretString::from("ghp_test".to_string()),
            hostname: "ghe.example.com".to_string(),
        };
        let service = OctocrabService::new(settings).unwrap();
        assert_eq!(
            service.get_repo_url("staticdev/omg"),
            "git@ghe.example.com:staticdev/omg.git"
        );
    }
}
