use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG: &str = r#"[github]
hostname = ""
access_token = "ghp_test_token"
selected_repos = ["org/alpha", "org/beta"]

[ui]
color = false
confirm = true
"#;

/// Config home with a gitp configuration pointing at two repositories.
fn configured_home() -> TempDir {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("gitp");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), CONFIG).unwrap();
    home
}

fn gitp(config_home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("gitp");
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env_remove("GH_TOKEN")
        .env_remove("GITHUB_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_version() {
    let mut cmd = cargo_bin_cmd!("gitp");
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gitp"));
}

#[test]
fn test_help_contains_all_commands() {
    let mut cmd = cargo_bin_cmd!("gitp");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("issues"))
        .stdout(predicate::str::contains("prs"))
        .stdout(predicate::str::contains("branches"))
        .stdout(predicate::str::contains("clone"))
        .stdout(predicate::str::contains("poetry"))
        .stdout(predicate::str::contains("GIT COMMANDS"));
}

#[test]
fn test_prs_merge_help() {
    let mut cmd = cargo_bin_cmd!("gitp");
    cmd.args(["prs", "merge", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--delete-branch"))
        .stdout(predicate::str::contains("--prefix"));
}

#[test]
fn test_not_configured_exits_with_3() {
    let home = TempDir::new().unwrap();
    gitp(home.path())
        .args(["issues", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("gitp config init"));
}

#[test]
fn test_config_without_token_is_not_configured() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("gitp");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("config.toml"),
        "[github]\nselected_repos = [\"org/alpha\"]\n",
    )
    .unwrap();

    gitp(home.path()).arg("status").assert().code(3);
}

#[test]
fn test_unknown_git_command_fails() {
    let home = configured_home();
    gitp(home.path())
        .arg("frobnicate")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown command 'frobnicate'"));
}

#[test]
fn test_mutation_without_terminal_requires_yes() {
    let home = configured_home();
    gitp(home.path())
        .args(["issues", "close", "--title", "Bump"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn test_git_in_missing_folders_reports_per_repo_errors() {
    let home = configured_home();
    let workdir = TempDir::new().unwrap();

    gitp(home.path())
        .current_dir(workdir.path())
        .arg("status")
        .assert()
        .code(4)
        .stdout(predicate::str::contains("Error:"));
}

#[test]
fn test_git_json_output() {
    let home = configured_home();
    let workdir = TempDir::new().unwrap();

    let output = gitp(home.path())
        .current_dir(workdir.path())
        .args(["--output", "json", "status"])
        .output()
        .unwrap();

    let stdout = String::from_utf8(output.stdout).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("git batch --output json should produce valid JSON");
    assert_eq!(json["succeeded"], 0);
    assert!(json["failed"].as_u64().unwrap() >= 1);
    assert_eq!(json["results"][0]["success"], false);
}

#[test]
fn test_invalid_output_format_rejected() {
    let mut cmd = cargo_bin_cmd!("gitp");
    cmd.args(["--output", "xml", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
