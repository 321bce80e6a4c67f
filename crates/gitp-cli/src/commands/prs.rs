// SPDX-License-Identifier: Apache-2.0

//! `gitp prs` command handlers.

use anyhow::Result;
use gitp_core::{
    AppConfig, GithubService, IssueListRequest, IssueState, ObjectKind, Operation, PullRequest,
    PullRequestMerge, parse_labels,
};
use tracing::debug;

use super::github_service;
use super::issues::run_batch;
use crate::cli::{OutputContext, PrsCommand};

/// Dispatch `gitp prs` subcommands.
pub async fn run(command: PrsCommand, ctx: &OutputContext, config: &AppConfig) -> Result<bool> {
    match command {
        PrsCommand::Create {
            title,
            body,
            labels,
            head,
            base,
            draft,
            link_issues,
            inherit_labels,
            target,
        } => {
            let pr = PullRequest::builder()
                .title(title)
                .body(body)
                .labels(parse_labels(&labels))
                .link_issues(link_issues.is_some())
                .issues_title_query(link_issues.unwrap_or_default())
                .inherit_labels(inherit_labels)
                .head(head)
                .base(base)
                .draft(draft)
                .build();
            run_batch(Operation::CreatePullRequest(pr), &target, ctx, config).await
        }
        PrsCommand::Close { title, target } => {
            let request =
                IssueListRequest::matching(ObjectKind::PullRequest, IssueState::Open, &title);
            run_batch(Operation::CloseIssues(request), &target, ctx, config).await
        }
        PrsCommand::Reopen { title, target } => {
            let request =
                IssueListRequest::matching(ObjectKind::PullRequest, IssueState::Closed, &title);
            run_batch(Operation::ReopenIssues(request), &target, ctx, config).await
        }
        PrsCommand::Merge {
            head,
            base,
            prefix,
            delete_branch,
            target,
        } => {
            let prefix = match prefix {
                Some(prefix) => prefix,
                None => github_service(config)?.get_username().await?,
            };
            debug!(prefix = %prefix, "Resolved head owner");

            let merge = PullRequestMerge {
                base,
                head,
                prefix,
                delete_branch,
            };
            run_batch(Operation::MergePullRequest(merge), &target, ctx, config).await
        }
    }
}
