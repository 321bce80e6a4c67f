// SPDX-License-Identifier: Apache-2.0

//! gitp - batch git and GitHub operations across many repositories.
//!
//! Runs the same issue, pull request, branch or local `git` operation in
//! every selected repository and reports one result per repository.

mod cli;
mod commands;
mod errors;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;
use console::style;
use tracing::debug;

use crate::cli::{Cli, OutputContext};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let output_ctx = OutputContext::from_cli(cli.output, cli.quiet, cli.verbose);

    match commands::run(cli.command, output_ctx).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            debug!("At least one repository step failed");
            ExitCode::from(errors::EXIT_FAILURE)
        }
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), errors::format_error(&e));
            errors::exit_code(&e)
        }
    }
}
