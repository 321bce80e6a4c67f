// SPDX-License-Identifier: Apache-2.0

//! Local command handlers: `git` passthrough, `poetry` and `clone`.
//!
//! These run in the current directory, where each selected repository is
//! expected to live in a folder named after the repository.

use anyhow::{Context, Result, bail};
use gitp_core::{
    AppConfig, GithubService, LocalCommand, SystemRunner, clone_repos, is_git_command,
    run_in_repos,
};
use tracing::info;

use super::github_service;
use super::types::BatchReport;
use crate::cli::OutputContext;
use crate::output;

fn render_report(report: &BatchReport, ctx: &OutputContext) -> Result<bool> {
    output::render(report, ctx)?;
    Ok(report.all_succeeded())
}

/// Runs `git <args>` in every selected repository folder.
pub fn run_git(args: &[String], ctx: &OutputContext, config: &AppConfig) -> Result<bool> {
    let Some((command, rest)) = args.split_first() else {
        bail!("Missing git command");
    };
    if !is_git_command(command) {
        bail!("Unknown command '{command}'. Run `gitp --help` for the supported git commands.");
    }

    let root = std::env::current_dir().context("Failed to read the current directory")?;
    info!(command = %command, root = %root.display(), "Running git in repositories");
    let local = LocalCommand::git(command, rest);
    let result = run_in_repos(&SystemRunner, &root, &config.github.selected_repos, &local);
    render_report(&BatchReport::from(result), ctx)
}

/// Runs `poetry <args>` in every selected repository folder.
pub fn run_poetry(args: &[String], ctx: &OutputContext, config: &AppConfig) -> Result<bool> {
    let root = std::env::current_dir().context("Failed to read the current directory")?;
    info!(root = %root.display(), "Running poetry in repositories");
    let local = LocalCommand::poetry(args);
    let result = run_in_repos(&SystemRunner, &root, &config.github.selected_repos, &local);
    render_report(&BatchReport::from(result), ctx)
}

/// Clones every selected repository into the current directory over SSH.
pub fn run_clone(ctx: &OutputContext, config: &AppConfig) -> Result<bool> {
    let root = std::env::current_dir().context("Failed to read the current directory")?;
    let service = github_service(config)?;
    info!(root = %root.display(), "Cloning repositories");
    let result = clone_repos(&SystemRunner, &root, &config.github.selected_repos, |repo| {
        service.get_repo_url(repo)
    });
    render_report(&BatchReport::from(result), ctx)
}
