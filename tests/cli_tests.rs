//! Binary-level tests of the `ordergate` command line.

mod support;

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use ordergate::testkit;
use predicates::prelude::*;
use tempfile::TempDir;

use support::fixtures::{order_json, VALID_ORDER_JSON};

fn ordergate() -> Command {
    let mut cmd = cargo_bin_cmd!("ordergate");
    cmd.env_remove("ORDERGATE_DATABASE_URL");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Temp directory holding a config that points at a private database.
struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let database = dir.path().join("orders.db");
        let config = dir.path().join("config.toml");
        std::fs::write(
            &config,
            format!(
                "database = {:?}\n\n[publisher]\nretry_delay_ms = 0\n",
                database.to_string_lossy()
            ),
        )
        .unwrap();
        Self { dir, config }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = ordergate();
        cmd.arg("--config").arg(&self.config);
        cmd
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn help_lists_commands() {
    ordergate()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ordergate"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("submit"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("health"));
}

#[test]
fn version_prints_name() {
    ordergate()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ordergate"));
}

#[test]
fn submit_then_status_round_trip() {
    let ws = Workspace::new();
    let order = ws.write("order.json", VALID_ORDER_JSON);

    ws.cmd()
        .args(["submit", arg(&order)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Order placed: 1234567"));

    ws.cmd()
        .args(["status", "1234567"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ONLINE"))
        .stdout(predicate::str::contains("PROCESSING"));
}

#[test]
fn submit_reads_stdin() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["submit", "-"])
        .write_stdin(order_json(42, "OFFLINE"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Order placed: 42"));
}

#[test]
fn duplicate_submit_fails() {
    let ws = Workspace::new();
    let order = ws.write("order.json", VALID_ORDER_JSON);

    ws.cmd().args(["submit", arg(&order)]).assert().success();
    ws.cmd()
        .args(["submit", arg(&order)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn invalid_order_type_is_reported() {
    let ws = Workspace::new();
    let order = ws.write("order.json", &order_json(3, "INVALID"));

    ws.cmd()
        .args(["submit", arg(&order)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid order type: INVALID"));
}

#[test]
fn json_submit_reports_status_code() {
    let ws = Workspace::new();
    let order = ws.write("order.json", VALID_ORDER_JSON);

    ws.cmd()
        .args(["--json", "submit", arg(&order)])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":200"));
}

#[test]
fn unknown_order_status_fails() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["status", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Order not found with id: 9"));
}

#[test]
fn health_reports_every_dependency() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("health")
        .assert()
        .success()
        .stdout(predicate::str::contains("topic-broker: OK"))
        .stdout(predicate::str::contains("exchange-broker: OK"))
        .stdout(predicate::str::contains("database: OK"));
}

#[test]
fn unopenable_database_is_reported_down() {
    let ws = Workspace::new();
    let blocker = ws.write("not-a-dir", "");
    let database = blocker.join("orders.db");
    let config = ws.write(
        "down.toml",
        &format!(
            "database = {:?}\n\n[storage]\nconnection_timeout_ms = 200\n",
            database.to_string_lossy()
        ),
    );

    ordergate()
        .arg("--config")
        .arg(&config)
        .arg("health")
        .assert()
        .failure()
        .stdout(predicate::str::contains("topic-broker: OK"))
        .stdout(predicate::str::contains("exchange-broker: OK"))
        .stdout(predicate::str::contains("database: DOWN"))
        .stderr(predicate::str::contains("Health check failed"));
}

#[test]
fn invalid_config_fails_health() {
    let ws = Workspace::new();
    let config = ws.write("bad.toml", "[topic_broker]\nconcurrency = 0\n");

    ordergate()
        .arg("--config")
        .arg(&config)
        .arg("health")
        .assert()
        .failure()
        .stderr(predicate::str::contains("concurrency"));
}

#[test]
fn run_drains_fed_orders_and_reports_dead_letters() {
    let ws = Workspace::new();
    let valid = testkit::domain::payload(&testkit::domain::valid_request());
    let feed = ws.write("feed.jsonl", &format!("{valid}\nnot json\n"));

    ws.cmd()
        .args(["--json", "run", "--feed", arg(&feed), "--drain", "--log-level", "off"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"deadLetters\""))
        .stdout(predicate::str::contains("not json"));

    ws.cmd()
        .args(["status", "1234567"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PROCESSING"));
}
