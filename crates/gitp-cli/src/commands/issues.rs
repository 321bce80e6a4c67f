// SPDX-License-Identifier: Apache-2.0

//! `gitp issues` command handlers.

use anyhow::Result;
use gitp_core::{
    AppConfig, Issue, IssueListRequest, IssueState, ObjectKind, Operation, execute, list_issues,
    parse_labels, target_repos,
};
use tracing::info;

use super::types::{BatchReport, IssuesReport};
use super::{
    confirm, finish_spinner, github_service, maybe_spinner, progress_reporter, repos_for,
};
use crate::cli::{IssuesCommand, OutputContext, TargetArgs};
use crate::output;

/// Runs `operation` on the targeted repositories after confirmation and
/// renders the per-repository results.
pub(super) async fn run_batch(
    operation: Operation,
    target: &TargetArgs,
    ctx: &OutputContext,
    config: &AppConfig,
) -> Result<bool> {
    let repos = repos_for(config, target);
    let prompt = format!("{} in {} repositories?", operation.action(), repos.len());
    if !confirm(ctx, config, target.yes, &prompt)? {
        info!("Operation cancelled");
        return Ok(true);
    }

    let service = github_service(config)?;
    let spinner = maybe_spinner(ctx, operation.action());
    let result = execute(&service, &repos, &operation, progress_reporter(spinner.as_ref())).await;
    finish_spinner(spinner);

    let report = BatchReport::from(result);
    output::render(&report, ctx)?;
    Ok(report.all_succeeded())
}

/// Dispatch `gitp issues` subcommands.
pub async fn run(command: IssuesCommand, ctx: &OutputContext, config: &AppConfig) -> Result<bool> {
    match command {
        IssuesCommand::Create {
            title,
            body,
            labels,
            target,
        } => {
            let issue = Issue::builder()
                .title(title)
                .body(body)
                .labels(parse_labels(&labels))
                .build();
            run_batch(Operation::CreateIssue(issue), &target, ctx, config).await
        }
        IssuesCommand::List {
            title,
            state,
            kind,
            repo,
        } => {
            let request = IssueListRequest::matching(
                kind.into(),
                state.into(),
                title.as_deref().unwrap_or_default(),
            );
            let repos = target_repos(&config.github.selected_repos, repo.as_deref());

            let service = github_service(config)?;
            let spinner = maybe_spinner(ctx, "Listing issues");
            let result =
                list_issues(&service, &repos, &request, progress_reporter(spinner.as_ref())).await;
            finish_spinner(spinner);

            let report = IssuesReport::from(result);
            output::render(&report, ctx)?;
            Ok(report.all_succeeded())
        }
        IssuesCommand::Close { title, target } => {
            let request = IssueListRequest::matching(ObjectKind::Issue, IssueState::Open, &title);
            run_batch(Operation::CloseIssues(request), &target, ctx, config).await
        }
        IssuesCommand::Reopen { title, target } => {
            let request =
                IssueListRequest::matching(ObjectKind::Issue, IssueState::Closed, &title);
            run_batch(Operation::ReopenIssues(request), &target, ctx, config).await
        }
    }
}
