//! End-to-end tests of the `cmdtree` binary

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const NO_SETTINGS: &str = "/nonexistent/cmdtree-test.toml";

fn cmdtree() -> Command {
    let mut cmd = Command::cargo_bin("cmdtree").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("CMDTREE_CONFIG")
        .env_remove("CMDTREE_VERSION")
        .env_remove("CMDTREE_ALIASES")
        .env("NO_COLOR", "1");
    cmd
}

fn document(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_demo_command_runs() {
    cmdtree()
        .args(["--config", NO_SETTINGS, "--demo", "calculate", "calc", "6 * 7"])
        .assert()
        .success()
        .stdout("42\n");
}

#[test]
fn test_tree_help_and_version_are_tokens() {
    cmdtree()
        .args(["--config", NO_SETTINGS, "--demo", "basic", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("List of all commands"))
        .stdout(predicate::str::contains("\trepeat").not())
        .stdout(predicate::str::contains("\thi"));

    cmdtree()
        .args(["--config", NO_SETTINGS, "--demo", "logger", "--version"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("cmdtree: logger ["));
}

#[test]
fn test_named_arguments_after_command() {
    cmdtree()
        .args(["--config", NO_SETTINGS, "--demo", "basic", "add", "-b", "40", "2"])
        .assert()
        .success()
        .stdout("42\n");
}

#[test]
fn test_usage_error_is_a_result() {
    cmdtree()
        .args(["--config", NO_SETTINGS, "--demo", "basic", "nope"])
        .assert()
        .success()
        .stdout("Command 'nope' doesn't exist !\n");
}

#[test]
fn test_strict_mode_fails_on_usage_error() {
    cmdtree()
        .args(["--config", NO_SETTINGS, "--strict", "--demo", "basic", "add"])
        .assert()
        .code(1)
        .stdout("Missing argument: 'a' !\n");
}

#[test]
fn test_json_output() {
    cmdtree()
        .args(["--config", NO_SETTINGS, "--json", "--demo", "basic", "hello", "Ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"success\""))
        .stdout(predicate::str::contains("\"result\": \"Hello Ada !\""));
}

#[test]
fn test_document_from_file() {
    let file = document(r#"{"echo": {"args": ["text"], "return": "<text>"}}"#);
    cmdtree()
        .args(["--config", NO_SETTINGS, "-c"])
        .arg(file.path())
        .args(["echo", "-t", "hi there"])
        .assert()
        .success()
        .stdout("hi there\n");
}

#[test]
fn test_broken_document_exits_with_config_error() {
    let file = document(r#"{"ghost": {"description": "neither commands nor return"}}"#);
    cmdtree()
        .args(["--config", NO_SETTINGS, "--commands"])
        .arg(file.path())
        .arg("ghost")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("'ghost'"));
}

#[test]
fn test_no_document_given() {
    cmdtree()
        .args(["--config", NO_SETTINGS, "hello"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No command document given"));
}

#[test]
fn test_settings_file_is_applied() {
    let mut settings = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    settings
        .write_all(b"version = \"custom 9\"\naliases = false\n")
        .unwrap();

    cmdtree()
        .arg("--config")
        .arg(settings.path())
        .args(["--demo", "basic", "--version"])
        .assert()
        .success()
        .stdout("custom 9\n");

    cmdtree()
        .arg("--config")
        .arg(settings.path())
        .args(["--demo", "basic", "h", "Ada"])
        .assert()
        .success()
        .stdout("Command 'h' doesn't exist !\n");
}
