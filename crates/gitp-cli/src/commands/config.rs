// SPDX-License-Identifier: Apache-2.0

//! `gitp config` command handlers.

use anyhow::{Context, Result, bail};
use dialoguer::{MultiSelect, Password};
use gitp_core::{
    AppConfig, ConnectionSettings, GithubService, GitpError, OctocrabService, config_file_path,
    init_config, load_config, resolve_token, update_repos,
};
use secrecy::SecretString;
use tracing::{debug, info};

use super::types::StatusMessage;
use super::{finish_spinner, maybe_spinner};
use crate::cli::{ConfigCommand, OutputContext};
use crate::output;

/// Dispatch `gitp config` subcommands.
pub async fn run(command: ConfigCommand, ctx: &OutputContext) -> Result<bool> {
    match command {
        ConfigCommand::Init {
            hostname,
            token,
            repos,
        } => run_init(hostname, token, repos, ctx).await,
        ConfigCommand::Repos { repos } => run_repos(repos, ctx).await,
    }
}

/// Token to connect with, plus the value to store in the config file.
///
/// Tokens found in the environment are used but never written to disk.
fn resolve_init_token(
    token: Option<String>,
    ctx: &OutputContext,
) -> Result<(SecretString, Option<String>)> {
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        return Ok((SecretString::from(token.clone()), Some(token)));
    }
    if let Some((secret, source)) = resolve_token(None) {
        info!(source = %source, "Using GitHub token");
        return Ok((secret, None));
    }
    if !ctx.is_interactive() {
        bail!("No GitHub token found, pass --token or set GH_TOKEN");
    }

    let token = Password::new()
        .with_prompt("GitHub personal access token")
        .interact()
        .context("Failed to read the access token")?;
    Ok((SecretString::from(token.clone()), Some(token)))
}

/// Repositories given on the command line, or chosen interactively among
/// the ones the token can access.
async fn choose_repos(
    service: &OctocrabService,
    repos: Vec<String>,
    current: &[String],
    ctx: &OutputContext,
) -> Result<Vec<String>> {
    if !repos.is_empty() {
        return Ok(repos);
    }
    if !ctx.is_interactive() {
        bail!("No repositories given, pass --repos owner/name,...");
    }

    let spinner = maybe_spinner(ctx, "Fetching repositories...");
    let available = service.get_repo_names().await;
    finish_spinner(spinner);
    let available = available?;
    debug!(count = available.len(), "Fetched repositories");

    let defaults: Vec<bool> = available.iter().map(|r| current.contains(r)).collect();
    let picked = MultiSelect::new()
        .with_prompt("Select repositories (space to toggle, enter to confirm)")
        .items(&available)
        .defaults(&defaults)
        .interact()
        .context("Failed to read the repository selection")?;

    Ok(picked.into_iter().map(|idx| available[idx].clone()).collect())
}

fn render_status(response: gitp_core::Response, ctx: &OutputContext) -> Result<bool> {
    let status = StatusMessage::from(response);
    output::render(&status, ctx)?;
    Ok(status.success)
}

async fn run_init(
    hostname: String,
    token: Option<String>,
    repos: Vec<String>,
    ctx: &OutputContext,
) -> Result<bool> {
    let mut config = load_config()?;
    let (access_token, stored_token) = resolve_init_token(token, ctx)?;
    let service = OctocrabService::new(ConnectionSettings {
        access_token,
        hostname: hostname.clone(),
    })?;

    let repos = choose_repos(&service, repos, &config.github.selected_repos, ctx).await?;
    let response = init_config(
        &service,
        &mut config,
        &hostname,
        stored_token,
        repos,
        &config_file_path(),
    )
    .await;
    render_status(response, ctx)
}

async fn run_repos(repos: Vec<String>, ctx: &OutputContext) -> Result<bool> {
    let mut config: AppConfig = load_config()?;
    let settings = config
        .connection_settings()
        .ok_or(GitpError::NotConfigured)?;
    let service = OctocrabService::new(settings)?;

    let current = config.github.selected_repos.clone();
    let repos = choose_repos(&service, repos, &current, ctx).await?;
    render_status(update_repos(&mut config, repos, &config_file_path()), ctx)
}
