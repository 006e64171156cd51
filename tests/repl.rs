//! End-to-end tests driving the binary over stdin/stdout

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn spendlog(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("spendlog").unwrap();
    cmd.env("SPENDLOG_DATA_DIR", data_dir.path());
    cmd
}

#[test]
fn help_then_quit_exits_cleanly() {
    let dir = TempDir::new().unwrap();

    spendlog(&dir)
        .write_stdin("help\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands: add list edit"))
        .stdout(predicate::str::contains("Goodbye"));
}

#[test]
fn end_of_input_exits_cleanly() {
    let dir = TempDir::new().unwrap();

    spendlog(&dir)
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("spendlog expense tracker"));
}

#[test]
fn add_persists_across_invocations() {
    let dir = TempDir::new().unwrap();

    spendlog(&dir)
        .write_stdin("add\n12.50\nFood\nlunch\n2024-03-01\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved "));

    spendlog(&dir)
        .write_stdin("list\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Food"))
        .stdout(predicate::str::contains("12.50"));
}

#[test]
fn budget_alert_fires_on_overspend() {
    let dir = TempDir::new().unwrap();

    spendlog(&dir)
        .write_stdin(
            "setbudget\n2024-03\n15.00\n\
             add\n12.50\nFood\n\n2024-03-01\n\
             add\n7.00\nFood\n\n2024-03-15\n\
             quit\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Warning: 2024-03 budget exceeded. Spent 19.50 budget 15.00",
        ));
}

#[test]
fn bad_input_reports_error_and_keeps_running() {
    let dir = TempDir::new().unwrap();

    spendlog(&dir)
        .write_stdin("setbudget\nnot-a-month\n10\nhelp\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: Invalid date"))
        .stdout(predicate::str::contains("Goodbye"));
}

#[test]
fn data_dir_flag_overrides_environment() {
    let env_dir = TempDir::new().unwrap();
    let flag_dir = TempDir::new().unwrap();

    spendlog(&env_dir)
        .arg("--data-dir")
        .arg(flag_dir.path())
        .write_stdin("add\n5\nFood\n\n2024-03-01\nquit\n")
        .assert()
        .success();

    assert!(flag_dir.path().join("expenses.json").exists());
    assert!(!env_dir.path().join("expenses.json").exists());
}
