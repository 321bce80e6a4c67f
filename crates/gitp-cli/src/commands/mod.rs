// SPDX-License-Identifier: Apache-2.0

//! Command handlers for the gitp CLI.
//!
//! Every handler returns `Ok(true)` when all repository steps succeeded and
//! `Ok(false)` when at least one failed. Errors are reserved for problems
//! that stop the whole command.

pub mod branches;
pub mod config;
pub mod git;
pub mod issues;
pub mod prs;
pub mod types;

use std::time::Duration;

use anyhow::{Context, Result, bail};
use dialoguer::Confirm;
use gitp_core::{AppConfig, GitpError, OctocrabService, load_config, target_repos};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::cli::{Commands, OutputContext, TargetArgs};

/// Creates a styled spinner (only if interactive).
fn maybe_spinner(ctx: &OutputContext, message: &str) -> Option<ProgressBar> {
    if !ctx.is_interactive() {
        return None;
    }

    let s = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        s.set_style(spinner_style);
    }
    s.set_message(message.to_string());
    s.enable_steady_tick(Duration::from_millis(100));
    Some(s)
}

/// Progress callback showing `[current/total] message` on the spinner.
fn progress_reporter(spinner: Option<&ProgressBar>) -> impl Fn(usize, usize, &str) + '_ {
    move |current: usize, total: usize, message: &str| {
        debug!(current, total, "{message}");
        if let Some(s) = spinner {
            s.set_message(format!("[{current}/{total}] {message}"));
        }
    }
}

fn finish_spinner(spinner: Option<ProgressBar>) {
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
}

/// Asks before running an operation that changes repositories.
///
/// Skipped with `--yes` or when `ui.confirm` is off. Without a terminal the
/// prompt cannot be shown, so `--yes` is required.
fn confirm(ctx: &OutputContext, config: &AppConfig, yes: bool, prompt: &str) -> Result<bool> {
    if yes || !config.ui.confirm {
        return Ok(true);
    }
    if !ctx.is_interactive() {
        bail!("Confirmation required, rerun with --yes to proceed without a prompt");
    }

    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Failed to get user confirmation")
}

/// Loads the configuration, failing when gitp has not been configured.
fn configured() -> Result<AppConfig> {
    let config = load_config()?;
    if config.is_empty() {
        return Err(GitpError::NotConfigured.into());
    }
    if !config.ui.color {
        console::set_colors_enabled(false);
    }
    debug!(repos = config.github.selected_repos.len(), "Configuration loaded");
    Ok(config)
}

/// Builds the GitHub service from the stored connection settings.
fn github_service(config: &AppConfig) -> Result<OctocrabService> {
    let settings = config
        .connection_settings()
        .ok_or(GitpError::NotConfigured)?;
    OctocrabService::new(settings)
}

/// Repositories targeted by a GitHub batch command.
fn repos_for(config: &AppConfig, target: &TargetArgs) -> Vec<String> {
    target_repos(&config.github.selected_repos, target.repo.as_deref())
}

/// Dispatch to the appropriate command handler.
pub async fn run(command: Commands, ctx: OutputContext) -> Result<bool> {
    match command {
        Commands::Config(config_cmd) => config::run(config_cmd, &ctx).await,
        Commands::Issues(issues_cmd) => issues::run(issues_cmd, &ctx, &configured()?).await,
        Commands::Prs(prs_cmd) => prs::run(prs_cmd, &ctx, &configured()?).await,
        Commands::Branches(branches_cmd) => {
            branches::run(branches_cmd, &ctx, &configured()?).await
        }
        Commands::Clone => git::run_clone(&ctx, &configured()?),
        Commands::Poetry { args } => git::run_poetry(&args, &ctx, &configured()?),
        Commands::Git(args) => git::run_git(&args, &ctx, &configured()?),
    }
}
