use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cashflow_cli").expect("binary exists");
    cmd.env("CASHFLOW_HOME", home.path())
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn init_rule_and_calendar_flow() {
    let home = TempDir::new().unwrap();

    cli(&home)
        .args(["--owner", "alice@example.com", "init", "--today", "2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized owner"));

    cli(&home)
        .args([
            "--owner",
            "alice@example.com",
            "settings",
            "set",
            "--balance",
            "100",
            "--start",
            "2024-01-01",
        ])
        .assert()
        .success();

    cli(&home)
        .args([
            "--owner",
            "alice@example.com",
            "rule",
            "add",
            "--amount",
            "-50",
            "--frequency",
            "monthly",
            "--start",
            "2024-01-01",
            "--description",
            "Rent",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added rule"));

    cli(&home)
        .args([
            "--owner",
            "alice@example.com",
            "calendar",
            "--from",
            "2024-03-01",
            "--to",
            "2024-03-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("-50.00").and(predicate::str::contains("estimated")));

    cli(&home)
        .args(["--owner", "alice@example.com", "txn", "day", "2024-02-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rent"));
}

#[test]
fn rejects_unknown_frequency() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args([
            "--owner",
            "bob",
            "rule",
            "add",
            "--amount",
            "10",
            "--frequency",
            "yearly",
            "--start",
            "2024-01-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown frequency"));
}

#[test]
fn calendar_without_settings_prints_notice() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args([
            "--owner",
            "carol",
            "calendar",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-31",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("settings have not been initialized"));
}
