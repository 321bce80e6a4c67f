// SPDX-License-Identifier: Apache-2.0

//! Local command batches: `git` and `poetry` run in each repository folder,
//! and `git clone` for every repository.
//!
//! A repository's folder is the name part of its identifier, relative to
//! the working directory. Subprocesses run one after another and block.

use std::io;
use std::path::Path;
use std::process::Command;

use tracing::{debug, instrument};

use crate::batch::BatchResult;
use crate::domain::repo_folder;
use crate::error::GitpError;
use crate::response::{Failure, Response};

/// Git subcommands that can be run across repositories.
pub const GIT_COMMANDS: &[&str] = &[
    "add", "branch", "checkout", "commit", "diff", "fetch", "init", "merge", "mv", "pull", "push",
    "rebase", "reset", "rm", "show", "status", "switch", "tag",
];

/// Whether `command` is a supported git passthrough subcommand.
#[must_use]
pub fn is_git_command(command: &str) -> bool {
    GIT_COMMANDS.contains(&command)
}

/// Captured output of one subprocess run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
    /// Exit code; `-1` when terminated by a signal.
    pub exit_code: i32,
}

/// Runs external programs.
pub trait ProcessRunner {
    /// Runs `program` with `args` in `cwd` and waits for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started, e.g. when `cwd`
    /// does not exist.
    fn run(&self, cwd: &Path, program: &str, args: &[String]) -> io::Result<CommandOutput>;

    /// Whether `program` can be started from `PATH`.
    fn is_installed(&self, program: &str) -> bool;
}

/// [`ProcessRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, cwd: &Path, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        let output = Command::new(program).args(args).current_dir(cwd).output()?;
        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    fn is_installed(&self, program: &str) -> bool {
        match Command::new(program).arg("--version").output() {
            Ok(_) => true,
            Err(e) => {
                debug!(program, error = %e, "Executable not available");
                false
            }
        }
    }
}

/// A program invocation repeated in every repository folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCommand {
    program: String,
    args: Vec<String>,
    label: String,
}

impl LocalCommand {
    /// `git <command> <args...>`.
    #[must_use]
    pub fn git(command: &str, args: &[String]) -> Self {
        let mut all_args = Vec::with_capacity(args.len() + 1);
        all_args.push(command.to_string());
        all_args.extend_from_slice(args);
        Self {
            program: "git".to_string(),
            args: all_args,
            label: command.to_string(),
        }
    }

    /// `poetry <args...>`.
    #[must_use]
    pub fn poetry(args: &[String]) -> Self {
        Self {
            program: "poetry".to_string(),
            args: args.to_vec(),
            label: "poetry".to_string(),
        }
    }

    /// Program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Program arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

fn not_installed(program: &str) -> BatchResult {
    let mut result = BatchResult::default();
    let err = GitpError::CommandNotInstalled {
        program: program.to_string(),
    };
    result.push(program, Err(Failure::system(err.to_string())));
    result
}

/// Maps one run to a response. Trailing whitespace is stripped from the
/// captured output so every repository renders as one entry; the rest of the
/// output is kept as is.
fn folder_response(folder: &str, label: &str, output: io::Result<CommandOutput>) -> Response {
    match output {
        Ok(out) if out.exit_code == 0 => {
            let stdout = out.stdout.trim_end();
            if stdout.is_empty() {
                Ok(format!("{folder}: {label} successful."))
            } else {
                Ok(format!("{folder}: {stdout}"))
            }
        }
        Ok(out) => {
            let stderr = out.stderr.trim_end();
            let detail = if stderr.is_empty() {
                out.stdout.trim_end()
            } else {
                stderr
            };
            Err(Failure::parameters(format!("{folder}: {detail}")))
        }
        Err(e) => Err(Failure::parameters(format!("{folder}: {e}"))),
    }
}

/// Runs `command` in `root/<folder>` for each repository, in order.
///
/// When the program is not installed a single system failure is returned
/// and nothing runs.
#[instrument(skip(runner, repos), fields(program = command.program(), repos = repos.len()))]
pub fn run_in_repos<R>(runner: &R, root: &Path, repos: &[String], command: &LocalCommand) -> BatchResult
where
    R: ProcessRunner + ?Sized,
{
    if !runner.is_installed(&command.program) {
        return not_installed(&command.program);
    }

    let mut result = BatchResult::default();
    for repo in repos {
        let folder = repo_folder(repo);
        let output = runner.run(&root.join(folder), &command.program, &command.args);
        result.push(repo.as_str(), folder_response(folder, &command.label, output));
    }
    result
}

/// Clones every repository into `root`, using `url_for` to get each clone URL.
#[instrument(skip(runner, repos, url_for), fields(repos = repos.len()))]
pub fn clone_repos<R, U>(runner: &R, root: &Path, repos: &[String], url_for: U) -> BatchResult
where
    R: ProcessRunner + ?Sized,
    U: Fn(&str) -> String,
{
    if !runner.is_installed("git") {
        return not_installed("git");
    }

    let mut result = BatchResult::default();
    for repo in repos {
        let folder = repo_folder(repo);
        let args = vec!["clone".to_string(), url_for(repo)];
        let response = match runner.run(root, "git", &args) {
            Ok(out) if out.exit_code == 0 => Ok(format!("{folder}: clone successful.")),
            Ok(out) => Err(Failure::parameters(format!(
                "{folder}: {}",
                out.stderr.trim_end()
            ))),
            Err(e) => Err(Failure::parameters(format!("{folder}: {e}"))),
        };
        result.push(repo.as_str(), response);
    }
    result
}
