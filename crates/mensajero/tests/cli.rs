// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests running the `mensajero` binary against a temp store.
//!
//! Each test writes its own config file pointing at a fresh database, so
//! tests are independent and order-insensitive.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("mensajero.toml");
        let db = dir.path().join("store.db");
        std::fs::write(
            &config,
            format!(
                "[service]\nlog_level = \"warn\"\n\n[storage]\ndatabase_path = {:?}\n",
                db.to_string_lossy()
            ),
        )
        .unwrap();
        Self { dir, config }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_mensajero"))
            .arg("--plain")
            .arg("--config")
            .arg(&self.config)
            .args(args)
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }

    fn ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "{args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }

    fn seed(&self, tracking_numbers: &[&str]) {
        let sheet = self.path("shipments.csv");
        write_sheet(&sheet, tracking_numbers);
        self.ok(&["zone", "add", "Norte", "5000"]);
        self.ok(&["courier", "add", "Ana", "--zone", "Norte"]);
        self.ok(&["import", sheet.to_str().unwrap()]);
    }
}

fn write_sheet(path: &Path, tracking_numbers: &[&str]) {
    std::fs::write(path, mensajero_test_utils::shipment_csv(tracking_numbers)).unwrap();
}

#[test]
fn lifecycle_through_the_cli() {
    let ws = Workspace::new();
    ws.seed(&["A100", "A101"]);

    let status = ws.ok(&["status", "A100", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&status).unwrap();
    assert_eq!(value["state"], "IN_VERIFICATION");

    let out = ws.ok(&["dispatch", "--courier", "Ana", "A100,A101", "A999"]);
    assert!(out.contains("[OK] A100 -> Ana (Norte)"));
    assert!(out.contains("[FAIL] A999"));
    assert!(out.contains("2 dispatched, 1 failed"));

    ws.ok(&["receive", "A100", "--outcome", "delivered"]);
    let status = ws.ok(&["status", "A100"]);
    assert!(status.contains("DELIVERED"));

    let settle = ws.ok(&["settle", "--courier", "Ana", "--from", "2000-01-01", "--to", "2999-12-31", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&settle).unwrap();
    assert_eq!(value["count"], 2);
    assert_eq!(value["total"], 10000.0);
}

#[test]
fn reimport_skips_known_shipments() {
    let ws = Workspace::new();
    ws.seed(&["A100"]);

    let sheet = ws.path("second.csv");
    write_sheet(&sheet, &["A100", "A200"]);
    let out = ws.ok(&["import", sheet.to_str().unwrap()]);
    assert!(out.contains("imported 1 of 2 shipments (1 already present, 0 blank rows)"));
}

#[test]
fn user_errors_exit_nonzero_with_message() {
    let ws = Workspace::new();
    ws.seed(&["A100"]);

    let output = ws.run(&["receive", "A100", "--outcome", "returned", "--reason", "closed"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("has not been dispatched yet"), "{stderr}");

    let output = ws.run(&["dispatch", "--courier", "Pedro", "A100"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("courier not found: Pedro"));
}

#[test]
fn invalid_config_exits_with_diagnostic() {
    let ws = Workspace::new();
    std::fs::write(&ws.config, "[gateway]\nprot = 9000\n").unwrap();

    let output = ws.run(&["zone", "list"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown configuration key"), "{stderr}");
    assert!(stderr.contains("port"), "{stderr}");
}

#[test]
fn export_writes_requested_report() {
    let ws = Workspace::new();
    ws.seed(&["A100"]);
    ws.ok(&["dispatch", "--courier", "Ana", "A100"]);
    ws.ok(&["pickup", "P1", "--date", "2024-03-01", "--notes", "front desk"]);

    let csv = ws.path("dispatches.csv");
    ws.ok(&["export", "dispatches", "--out", csv.to_str().unwrap(), "--courier", "Ana"]);
    let text = std::fs::read_to_string(&csv).unwrap();
    assert!(text.starts_with("tracking_number,courier,zone,dispatch_date"));
    assert!(text.contains("A100,Ana,Norte,"));

    let xlsx = ws.path("pickups.xlsx");
    ws.ok(&["export", "pickups", "--out", xlsx.to_str().unwrap()]);
    assert!(std::fs::read(&xlsx).unwrap().starts_with(b"PK"));

    let output = ws.run(&["export", "payroll", "--out", csv.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}
