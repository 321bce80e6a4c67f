// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definition for gitp.
//!
//! Uses clap's derive API with noun-verb subcommands for GitHub operations
//! and top-level passthrough commands for `git`.

use std::io::IsTerminal;

use clap::{Args, Parser, Subcommand, ValueEnum};
use gitp_core::{IssueState, ObjectKind};

/// Extra help listing the git commands that run in every repository.
const GIT_COMMANDS_HELP: &str = "GIT COMMANDS
  Any of these runs `git <command> [ARGS]...` in each selected repository folder:
    add, branch, checkout, commit, diff, fetch, init, merge, mv, pull, push,
    rebase, reset, rm, show, status, switch, tag

EXAMPLES
  gitp checkout -b release
  gitp status --short";

/// Output format for CLI results.
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with colors (default)
    #[default]
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// YAML output for programmatic consumption
    Yaml,
}

/// Global output configuration passed to commands.
#[derive(Clone)]
pub struct OutputContext {
    /// Output format (text, json, yaml)
    pub format: OutputFormat,
    /// Suppress non-essential output (spinners, progress)
    pub quiet: bool,
    /// Enable verbose output
    pub verbose: bool,
    /// Whether stdout is a terminal (TTY)
    pub is_tty: bool,
}

impl OutputContext {
    /// Creates an `OutputContext` from CLI arguments.
    pub fn from_cli(format: OutputFormat, quiet: bool, verbose: bool) -> Self {
        Self {
            format,
            quiet,
            verbose,
            is_tty: std::io::stdout().is_terminal(),
        }
    }

    /// Returns true if interactive elements (spinners, prompts) should be shown.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && !self.quiet && matches!(self.format, OutputFormat::Text)
    }
}

/// gitp - run the same git or GitHub operation across many repositories.
#[derive(Parser)]
#[command(name = "gitp")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
#[command(after_help = GIT_COMMANDS_HELP)]
pub struct Cli {
    /// Output format (text, json, yaml)
    #[arg(long, short = 'o', global = true, default_value = "text", value_enum)]
    pub output: OutputFormat,

    /// Suppress non-essential output (spinners, progress)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (info-level logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Configure the GitHub connection and selected repositories
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Batch operations on GitHub issues
    #[command(subcommand)]
    Issues(IssuesCommand),

    /// Batch operations on GitHub pull requests
    #[command(subcommand)]
    Prs(PrsCommand),

    /// Batch operations on GitHub branches
    #[command(subcommand)]
    Branches(BranchesCommand),

    /// Clone every selected repository into the current directory
    Clone,

    /// Run `poetry` in every selected repository folder
    Poetry {
        /// Arguments passed to poetry
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run a git command in every selected repository folder
    #[command(external_subcommand)]
    Git(Vec<String>),
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Connect to GitHub and choose repositories
    Init {
        /// GitHub Enterprise hostname (empty for github.com)
        #[arg(long, default_value = "")]
        hostname: String,

        /// Personal access token (prompted when omitted; `GH_TOKEN` and
        /// `GITHUB_TOKEN` are used when not stored)
        #[arg(long)]
        token: Option<String>,

        /// Repositories to select, comma separated (interactive selection when omitted)
        #[arg(long, value_delimiter = ',')]
        repos: Vec<String>,
    },

    /// Choose the selected repositories again
    Repos {
        /// Repositories to select, comma separated (interactive selection when omitted)
        #[arg(long, value_delimiter = ',')]
        repos: Vec<String>,
    },
}

/// Options shared by every GitHub batch command.
#[derive(Args, Clone, Default)]
pub struct TargetArgs {
    /// Apply to this repository only (owner/name) instead of every selected one
    #[arg(long, short = 'r')]
    pub repo: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Issue state filter.
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum StateArg {
    /// Open and closed
    All,
    /// Open only (default)
    #[default]
    Open,
    /// Closed only
    Closed,
}

impl From<StateArg> for IssueState {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::All => IssueState::All,
            StateArg::Open => IssueState::Open,
            StateArg::Closed => IssueState::Closed,
        }
    }
}

/// Kind of object listed through the issues API.
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum KindArg {
    /// Issues only (default)
    #[default]
    Issue,
    /// Pull requests only
    PullRequest,
    /// Issues and pull requests
    All,
}

impl From<KindArg> for ObjectKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Issue => ObjectKind::Issue,
            KindArg::PullRequest => ObjectKind::PullRequest,
            KindArg::All => ObjectKind::All,
        }
    }
}

/// Issue subcommands
#[derive(Subcommand)]
pub enum IssuesCommand {
    /// Create the same issue in every repository
    Create {
        /// Issue title
        #[arg(long)]
        title: String,

        /// Issue body (markdown)
        #[arg(long, default_value = "")]
        body: String,

        /// Labels, comma separated
        #[arg(long, default_value = "")]
        labels: String,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// List issues whose title contains a query
    List {
        /// Title substring (case-sensitive); lists everything when omitted
        #[arg(long)]
        title: Option<String>,

        /// Issue state
        #[arg(long, value_enum, default_value = "open")]
        state: StateArg,

        /// Kind of object to list
        #[arg(long, value_enum, default_value = "issue")]
        kind: KindArg,

        /// List from this repository only (owner/name)
        #[arg(long, short = 'r')]
        repo: Option<String>,
    },

    /// Close open issues whose title contains a query
    Close {
        /// Title substring (case-sensitive)
        #[arg(long)]
        title: String,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Reopen closed issues whose title contains a query
    Reopen {
        /// Title substring (case-sensitive)
        #[arg(long)]
        title: String,

        #[command(flatten)]
        target: TargetArgs,
    },
}

/// Pull request subcommands
#[derive(Subcommand)]
pub enum PrsCommand {
    /// Open the same pull request in every repository
    Create {
        /// Pull request title
        #[arg(long)]
        title: String,

        /// Pull request body (markdown)
        #[arg(long, default_value = "")]
        body: String,

        /// Labels, comma separated
        #[arg(long, default_value = "")]
        labels: String,

        /// Source branch
        #[arg(long)]
        head: String,

        /// Destination branch
        #[arg(long, default_value = "main")]
        base: String,

        /// Open as draft
        #[arg(long)]
        draft: bool,

        /// Link open issues whose title contains this query (adds `Closes #N`)
        #[arg(long, value_name = "QUERY")]
        link_issues: Option<String>,

        /// Copy the labels of linked issues onto the pull request
        #[arg(long, requires = "link_issues")]
        inherit_labels: bool,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Close open pull requests whose title contains a query
    Close {
        /// Title substring (case-sensitive)
        #[arg(long)]
        title: String,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Reopen closed pull requests whose title contains a query
    Reopen {
        /// Title substring (case-sensitive)
        #[arg(long)]
        title: String,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Merge the open pull request from head into base
    Merge {
        /// Source branch
        #[arg(long)]
        head: String,

        /// Destination branch
        #[arg(long, default_value = "main")]
        base: String,

        /// Owner of the head branch (defaults to the authenticated user)
        #[arg(long)]
        prefix: Option<String>,

        /// Delete the head branch after merging
        #[arg(long)]
        delete_branch: bool,

        #[command(flatten)]
        target: TargetArgs,
    },
}

/// Branch subcommands
#[derive(Subcommand)]
pub enum BranchesCommand {
    /// Delete a branch in every repository
    Delete {
        /// Branch name
        branch: String,

        #[command(flatten)]
        target: TargetArgs,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_git_passthrough() {
        let cli = Cli::try_parse_from(["gitp", "checkout", "-b", "release"]).unwrap();
        match cli.command {
            Commands::Git(args) => assert_eq!(args, vec!["checkout", "-b", "release"]),
            _ => panic!("expected git passthrough"),
        }
    }

    #[test]
    fn test_parse_poetry_with_flags() {
        let cli = Cli::try_parse_from(["gitp", "poetry", "version", "--short"]).unwrap();
        match cli.command {
            Commands::Poetry { args } => assert_eq!(args, vec!["version", "--short"]),
            _ => panic!("expected poetry"),
        }
    }

    #[test]
    fn test_parse_merge_defaults() {
        let cli = Cli::try_parse_from(["gitp", "prs", "merge", "--head", "fix", "-y"]).unwrap();
        match cli.command {
            Commands::Prs(PrsCommand::Merge {
                head,
                base,
                prefix,
                delete_branch,
                target,
            }) => {
                assert_eq!(head, "fix");
                assert_eq!(base, "main");
                assert!(prefix.is_none());
                assert!(!delete_branch);
                assert!(target.yes);
                assert!(target.repo.is_none());
            }
            _ => panic!("expected prs merge"),
        }
    }

    #[test]
    fn test_inherit_labels_requires_link_issues() {
        let result = Cli::try_parse_from([
            "gitp",
            "prs",
            "create",
            "--title",
            "t",
            "--head",
            "fix",
            "--inherit-labels",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_repos_comma_separated() {
        let cli = Cli::try_parse_from(["gitp", "config", "repos", "--repos", "org/a,org/b"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommand::Repos { repos }) => {
                assert_eq!(repos, vec!["org/a", "org/b"]);
            }
            _ => panic!("expected config repos"),
        }
    }
}
