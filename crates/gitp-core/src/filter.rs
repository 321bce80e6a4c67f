// SPDX-License-Identifier: Apache-2.0

//! Issue filtering and issue-to-pull-request linking.
//!
//! Both are pure functions over in-memory values so the GitHub transport only
//! has to fetch raw records.

use std::collections::BTreeSet;

use crate::domain::{Issue, PullRequest};
use crate::request::{ObjectKind, ValidRequest};

/// An issue record as returned by the issues endpoint, before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIssue {
    /// Issue number.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Issue body.
    pub body: String,
    /// Label names, in remote order.
    pub labels: Vec<String>,
    /// Whether the record is a pull request.
    pub is_pull_request: bool,
}

impl From<RemoteIssue> for Issue {
    fn from(remote: RemoteIssue) -> Self {
        Issue {
            number: remote.number,
            title: remote.title,
            body: remote.body,
            labels: remote.labels.into_iter().collect(),
        }
    }
}

/// Applies a valid request to fetched records, preserving remote order.
///
/// A request without filters returns every record. The state filter is not
/// applied here: it is passed to the remote when fetching.
#[must_use]
pub fn filter_issues(records: Vec<RemoteIssue>, request: &ValidRequest) -> Vec<Issue> {
    if request.filters().is_none() {
        return records.into_iter().map(Issue::from).collect();
    }

    let kind = request.object_kind();
    let title_query = request.title_contains();

    records
        .into_iter()
        .filter(|record| match kind {
            Some(ObjectKind::Issue) => !record.is_pull_request,
            Some(ObjectKind::PullRequest) => record.is_pull_request,
            Some(ObjectKind::All) | None => true,
        })
        .filter(|record| title_query.is_none_or(|q| record.title.contains(q)))
        .map(Issue::from)
        .collect()
}

/// Returns a copy of `pr` that closes every matched issue.
///
/// Appends one `Closes #N` line per issue to the body and, when the draft
/// inherits labels, adds the issues' labels. The input draft is left intact
/// so it can be reused for the next repository.
#[must_use]
pub fn link_issues(pr: &PullRequest, issues: &[Issue]) -> PullRequest {
    let mut linked = pr.clone();
    let mut closes = String::new();
    let mut labels: BTreeSet<String> = linked.labels.clone();

    for issue in issues {
        closes.push_str(&format!("Closes #{}\n", issue.number));
        if linked.inherit_labels {
            labels.extend(issue.labels.iter().cloned());
        }
    }

    if !closes.is_empty() {
        linked.body = format!("{}\n\n{closes}", linked.body);
    }
    linked.labels = labels;
    linked
}
