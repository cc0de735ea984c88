use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn notezy(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("notezy").unwrap();
    cmd.env("NOTEZY_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("NOTEZY_PASSWORD");
    cmd
}

fn register(home: &Path) {
    notezy(home)
        .args(["register", "--email", "Ada@Example.com", "--password", "secret1"])
        .args(["--name", "Ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered with ada@example.com"));
}

#[test]
fn test_note_lifecycle() {
    let temp_dir = tempfile::tempdir().unwrap();
    let home = temp_dir.path();
    register(home);

    notezy(home)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome Ada!"));

    notezy(home)
        .args(["add", "Buy", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Note added: Buy milk"));
    notezy(home)
        .args(["add", "Call mom"])
        .assert()
        .success();

    notezy(home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Buy milk"))
        .stdout(predicate::str::contains("2. Call mom"));

    // filtering keeps the canonical numbering
    notezy(home)
        .args(["search", "MOM"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2. Call mom"))
        .stdout(predicate::str::contains("Buy milk").not());

    notezy(home)
        .args(["edit", "2", "Call dad"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Note updated (2): Call dad"));

    notezy(home)
        .args(["view", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Call dad"));

    notezy(home)
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));
    notezy(home)
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk"));

    notezy(home)
        .args(["delete", "1", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Note deleted (1): Buy milk"));
    notezy(home)
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk").not())
        .stdout(predicate::str::contains("1. Call dad"));
}

#[test]
fn test_logout_and_login() {
    let temp_dir = tempfile::tempdir().unwrap();
    let home = temp_dir.path();
    register(home);

    notezy(home)
        .args(["add", "secret plans"])
        .assert()
        .success();

    notezy(home)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out"));

    notezy(home)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: User not logged in"));

    notezy(home)
        .args(["login", "--email", "ada@example.com"])
        .env("NOTEZY_PASSWORD", "wrong-password")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid email or password"));

    notezy(home)
        .args(["login", "--email", "ada@example.com"])
        .env("NOTEZY_PASSWORD", "secret1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Login successful"));

    notezy(home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("secret plans"));
}

#[test]
fn test_validation_errors() {
    let temp_dir = tempfile::tempdir().unwrap();
    let home = temp_dir.path();

    notezy(home)
        .args(["register", "--email", "not-an-email", "--password", "secret1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid email address"));

    notezy(home)
        .args(["register", "--email", "bob@example.com", "--password", "123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 6 characters"));

    notezy(home)
        .args(["add", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("User not logged in"));

    register(home);
    notezy(home)
        .args(["add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Note cannot be empty"));
    notezy(home)
        .args(["view", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Note 7 not found"));
}

#[test]
fn test_config_and_unconfirmed_delete() {
    let temp_dir = tempfile::tempdir().unwrap();
    let home = temp_dir.path();

    notezy(home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("confirm-delete = true"));

    notezy(home)
        .args(["config", "confirm-delete", "false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("confirm-delete set to false"));

    register(home);
    notezy(home).args(["add", "scratch"]).assert().success();

    notezy(home)
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Note deleted (1): scratch"));

    notezy(home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes found."));
}

#[test]
fn test_logs_are_written_under_home() {
    let temp_dir = tempfile::tempdir().unwrap();
    let home = temp_dir.path();

    notezy(home).arg("config").assert().success();
    assert!(home.join("logs").is_dir());
}
