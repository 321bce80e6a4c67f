// SPDX-License-Identifier: Apache-2.0

//! `gitp branches` command handlers.

use anyhow::Result;
use gitp_core::{AppConfig, Operation};

use super::issues::run_batch;
use crate::cli::{BranchesCommand, OutputContext};

/// Dispatch `gitp branches` subcommands.
pub async fn run(
    command: BranchesCommand,
    ctx: &OutputContext,
    config: &AppConfig,
) -> Result<bool> {
    match command {
        BranchesCommand::Delete { branch, target } => {
            run_batch(Operation::DeleteBranch(branch), &target, ctx, config).await
        }
    }
}
