// SPDX-License-Identifier: Apache-2.0

//! Batch execution of one GitHub operation across repositories.
//!
//! Repositories are processed one at a time, in list order. Every
//! repository step yields exactly one [`Response`]; a failure on one
//! repository never stops the others. Errors returned by the service are
//! classified into [`Failure`] kinds here, so callers only ever see
//! responses.

use anyhow::Result;
use tracing::{debug, info, instrument, warn};

use crate::domain::{Issue, PullRequest, PullRequestMerge};
use crate::error::GitpError;
use crate::github::GithubService;
use crate::request::{IssueListRequest, IssueState, ObjectKind};
use crate::response::{ErrorKind, Failure, Response};

/// One GitHub operation and its payload, applied to every target repository.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Create the same issue everywhere.
    CreateIssue(Issue),
    /// Close issues matching a request.
    CloseIssues(IssueListRequest),
    /// Reopen issues matching a request.
    ReopenIssues(IssueListRequest),
    /// Open a pull request, optionally linking matching open issues.
    CreatePullRequest(PullRequest),
    /// Merge the matching pull request, optionally deleting its head branch.
    MergePullRequest(PullRequestMerge),
    /// Delete a branch.
    DeleteBranch(String),
}

impl Operation {
    /// Progress label, e.g. `"Creating issue"`.
    #[must_use]
    pub fn action(&self) -> &'static str {
        match self {
            Operation::CreateIssue(_) => "Creating issue",
            Operation::CloseIssues(_) => "Closing issues",
            Operation::ReopenIssues(_) => "Reopening issues",
            Operation::CreatePullRequest(_) => "Creating pull request",
            Operation::MergePullRequest(_) => "Merging pull request",
            Operation::DeleteBranch(_) => "Deleting branch",
        }
    }
}

/// Result of a batch: every response tagged with its repository.
#[derive(Debug, Clone)]
pub struct BatchResult<T = String> {
    /// Number of successful responses.
    pub succeeded: usize,
    /// Number of failed responses.
    pub failed: usize,
    /// Responses in execution order (repository, response).
    pub outcomes: Vec<(String, Response<T>)>,
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        Self {
            succeeded: 0,
            failed: 0,
            outcomes: Vec::new(),
        }
    }
}

impl<T> BatchResult<T> {
    /// Appends one response, updating the counters.
    pub fn push(&mut self, repo: impl Into<String>, response: Response<T>) {
        if response.is_ok() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push((repo.into(), response));
    }

    /// Whether every response succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Number of responses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether no response was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Where unexpected errors should be reported.
pub const ISSUES_URL: &str = concat!(env!("CARGO_PKG_REPOSITORY"), "/issues/new");

/// Repositories an operation applies to: the explicit target, or every
/// selected repository when there is none.
#[must_use]
pub fn target_repos(selected: &[String], target: Option<&str>) -> Vec<String> {
    match target {
        Some(repo) => vec![repo.to_string()],
        None => selected.to_vec(),
    }
}

/// Classifies an error raised by a repository action.
///
/// Errors GitHub reported about the request become resource failures with
/// the service's message; malformed repository identifiers become parameter
/// failures; anything else is reported as unexpected with the full error
/// chain.
#[must_use]
pub fn classify_error(err: &anyhow::Error) -> Failure {
    match err.downcast_ref::<GitpError>() {
        Some(GitpError::GitHub { message }) => Failure::resource(message.clone()),
        Some(e @ GitpError::InvalidRepository { .. }) => Failure::parameters(e.to_string()),
        _ => Failure::system(format!(
            "An unexpected error occurred. Please report at {ISSUES_URL} with the following info:\n{err:?}"
        )),
    }
}

fn capture<T>(result: Result<T>) -> Response<T> {
    result.map_err(|e| classify_error(&e))
}

/// Lists issues of one repository.
///
/// An invalid request fails with the joined validation errors without
/// contacting GitHub; any error while listing is a system failure.
pub async fn issues_response<S>(
    service: &S,
    repo: &str,
    request: &IssueListRequest,
) -> Response<Vec<Issue>>
where
    S: GithubService + ?Sized,
{
    match request {
        IssueListRequest::Invalid(invalid) => Err(Failure::from_invalid_request(invalid)),
        IssueListRequest::Valid(valid) => service
            .list_issues_from_repo(repo, valid)
            .await
            .map_err(|e| Failure::from_error(ErrorKind::System, &e)),
    }
}

/// Runs `operation` on each repository in order.
///
/// `progress` is called before each repository with
/// `(current, total, message)`.
#[instrument(skip(service, operation, progress), fields(action = operation.action(), repos = repos.len()))]
pub async fn execute<S, P>(
    service: &S,
    repos: &[String],
    operation: &Operation,
    progress: P,
) -> BatchResult
where
    S: GithubService + ?Sized,
    P: Fn(usize, usize, &str),
{
    let total = repos.len();
    let mut result = BatchResult::default();

    for (idx, repo) in repos.iter().enumerate() {
        progress(idx + 1, total, &format!("{} in {repo}", operation.action()));
        execute_one(service, repo, operation, &mut result).await;
    }

    info!(
        succeeded = result.succeeded,
        failed = result.failed,
        "Batch finished"
    );
    result
}

async fn execute_one<S>(service: &S, repo: &str, operation: &Operation, result: &mut BatchResult)
where
    S: GithubService + ?Sized,
{
    match operation {
        Operation::CreateIssue(issue) => {
            result.push(repo, capture(service.create_issue_from_repo(repo, issue).await));
        }
        Operation::CloseIssues(request) => {
            let response = match issues_response(service, repo, request).await {
                Ok(issues) => capture(service.close_issues_from_repo(repo, &issues).await),
                Err(failure) => {
                    debug!(repo, error = %failure, "Issue listing failed");
                    Err(Failure::resource(format!("{repo}: no issues match search.\n")))
                }
            };
            result.push(repo, response);
        }
        Operation::ReopenIssues(request) => {
            let response = match issues_response(service, repo, request).await {
                Ok(issues) => capture(service.reopen_issues_from_repo(repo, &issues).await),
                Err(failure) => {
                    debug!(repo, error = %failure, "Issue listing failed");
                    Err(Failure::resource(format!("{repo}: no issues match search.\n")))
                }
            };
            result.push(repo, response);
        }
        Operation::CreatePullRequest(pr) => {
            let pr = linked_pull_request(service, repo, pr).await;
            result.push(repo, capture(service.create_pull_request_from_repo(repo, &pr).await));
        }
        Operation::MergePullRequest(pr_merge) => {
            let merged = capture(service.merge_pull_request_from_repo(repo, pr_merge).await);
            let merge_succeeded = merged.is_ok();
            result.push(repo, merged);

            if pr_merge.delete_branch && merge_succeeded {
                result.push(
                    repo,
                    capture(service.delete_branch_from_repo(repo, &pr_merge.head).await),
                );
            }
        }
        Operation::DeleteBranch(branch) => {
            result.push(repo, capture(service.delete_branch_from_repo(repo, branch).await));
        }
    }
}

/// Per-repository copy of the draft, linked to open issues whose title
/// contains the draft's query when linking is requested.
async fn linked_pull_request<S>(service: &S, repo: &str, pr: &PullRequest) -> PullRequest
where
    S: GithubService + ?Sized,
{
    if !pr.link_issues {
        return pr.clone();
    }

    let request =
        IssueListRequest::matching(ObjectKind::Issue, IssueState::Open, &pr.issues_title_query);
    match issues_response(service, repo, &request).await {
        Ok(issues) => {
            debug!(repo, linked = issues.len(), "Linking issues");
            service.link_issues(pr, &issues)
        }
        Err(failure) => {
            warn!(repo, error = %failure, "Could not list issues to link");
            pr.clone()
        }
    }
}

/// Lists issues matching `request` on each repository in order.
#[instrument(skip(service, request, progress), fields(repos = repos.len()))]
pub async fn list_issues<S, P>(
    service: &S,
    repos: &[String],
    request: &IssueListRequest,
    progress: P,
) -> BatchResult<Vec<Issue>>
where
    S: GithubService + ?Sized,
    P: Fn(usize, usize, &str),
{
    let total = repos.len();
    let mut result = BatchResult::default();

    for (idx, repo) in repos.iter().enumerate() {
        progress(idx + 1, total, &format!("Listing issues in {repo}"));
        result.push(repo.as_str(), issues_response(service, repo, request).await);
    }
    result
}
