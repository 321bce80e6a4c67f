// SPDX-License-Identifier: Apache-2.0

//! Result types returned by command handlers.
//!
//! Command handlers return these instead of printing directly; the output
//! module renders them as text, JSON or YAML.

use gitp_core::{BatchResult, ErrorKind, Issue, Response};
use serde::Serialize;

/// Outcome of one step on one repository.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RepoResult {
    /// Repository (`owner/name`) or local program the step ran for.
    pub repository: String,
    /// Whether the step succeeded.
    pub success: bool,
    /// Message reported by the step.
    pub message: String,
    /// Failure classification (failures only).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorKind>,
}

impl RepoResult {
    fn new(repository: String, response: Response) -> Self {
        match response {
            Ok(message) => Self {
                repository,
                success: true,
                message,
                error_type: None,
            },
            Err(failure) => Self {
                repository,
                success: false,
                message: failure.message,
                error_type: Some(failure.kind),
            },
        }
    }
}

/// Result of a batch command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BatchReport {
    /// Steps that succeeded.
    pub succeeded: usize,
    /// Steps that failed.
    pub failed: usize,
    /// One entry per step, in execution order.
    pub results: Vec<RepoResult>,
}

impl BatchReport {
    /// Whether every step succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

impl From<BatchResult> for BatchReport {
    fn from(result: BatchResult) -> Self {
        Self {
            succeeded: result.succeeded,
            failed: result.failed,
            results: result
                .outcomes
                .into_iter()
                .map(|(repo, response)| RepoResult::new(repo, response))
                .collect(),
        }
    }
}

/// Issues listed from one repository.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RepoIssues {
    /// Repository (`owner/name`).
    pub repository: String,
    /// Whether the listing succeeded.
    pub success: bool,
    /// Matching issues.
    pub issues: Vec<Issue>,
    /// Failure message (failures only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure classification (failures only).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorKind>,
}

/// Result of `gitp issues list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct IssuesReport {
    /// Issues grouped by repository, in selection order.
    pub repositories: Vec<RepoIssues>,
    /// Total issue count across all repositories.
    pub total_count: usize,
}

impl IssuesReport {
    /// Whether every repository was listed.
    pub fn all_succeeded(&self) -> bool {
        self.repositories.iter().all(|r| r.success)
    }
}

impl From<BatchResult<Vec<Issue>>> for IssuesReport {
    fn from(result: BatchResult<Vec<Issue>>) -> Self {
        let repositories: Vec<RepoIssues> = result
            .outcomes
            .into_iter()
            .map(|(repository, response)| match response {
                Ok(issues) => RepoIssues {
                    repository,
                    success: true,
                    issues,
                    message: None,
                    error_type: None,
                },
                Err(failure) => RepoIssues {
                    repository,
                    success: false,
                    issues: Vec::new(),
                    message: Some(failure.message),
                    error_type: Some(failure.kind),
                },
            })
            .collect();
        let total_count = repositories.iter().map(|r| r.issues.len()).sum();

        Self {
            repositories,
            total_count,
        }
    }
}

/// Result of a single, non-batch step such as `gitp config init`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StatusMessage {
    /// Whether the step succeeded.
    pub success: bool,
    /// Message reported by the step.
    pub message: String,
    /// Failure classification (failures only).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorKind>,
}

impl From<Response> for StatusMessage {
    fn from(response: Response) -> Self {
        match response {
            Ok(message) => Self {
                success: true,
                message,
                error_type: None,
            },
            Err(failure) => Self {
                success: false,
                message: failure.message,
                error_type: Some(failure.kind),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use gitp_core::Failure;

    use super::*;

    #[test]
    fn test_batch_report_from_result() {
        let mut result = BatchResult::default();
        result.push("org/a", Ok("org/a: create issue successful.\n".to_string()));
        result.push("org/b", Err(Failure::resource("Not Found")));

        let report = BatchReport::from(result);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        assert!(!report.all_succeeded());
        assert_eq!(report.results[1].repository, "org/b");
        assert_eq!(report.results[1].error_type, Some(ErrorKind::Resource));
    }

    #[test]
    fn test_batch_report_json_shape() {
        let mut result = BatchResult::default();
        result.push("org/a", Ok("done".to_string()));
        result.push("org/b", Err(Failure::system("boom")));

        let json = serde_json::to_value(BatchReport::from(result)).unwrap();
        assert!(json["results"][0].get("type").is_none());
        assert_eq!(json["results"][1]["type"], "SystemError");
        assert_eq!(json["results"][1]["message"], "boom");
    }

    #[test]
    fn test_issues_report_counts_issues() {
        let issue = Issue::builder().number(7).title("Bump".to_string()).build();
        let mut result = BatchResult::default();
        result.push("org/a", Ok(vec![issue.clone(), issue]));
        result.push("org/b", Err(Failure::system("Error: timeout")));

        let report = IssuesReport::from(result);
        assert_eq!(report.total_count, 2);
        assert!(!report.all_succeeded());
        assert_eq!(report.repositories[1].message.as_deref(), Some("Error: timeout"));
    }

    #[test]
    fn test_status_message_from_failure() {
        let status = StatusMessage::from(Err(Failure::parameters("bad")));
        assert!(!status.success);
        assert_eq!(status.error_type, Some(ErrorKind::Parameters));
    }
}
