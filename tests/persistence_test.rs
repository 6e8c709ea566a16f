#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::process::Command;
use tempfile::tempdir;

mod common;
use common::{register_vehicle, write_commands};

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: register and report
    let csv1 = write_commands(&[
        &register_vehicle("user1", "electric"),
        &["report_mileage", "user1", "", "", "", "", "", "", "100"],
        &["register_business", "owner", "", "", "", "", "user2", "Green Store"],
        &["pause", "owner"],
    ]);

    let output1 = Command::new(cargo_bin!("eco-ledger"))
        .arg(csv1.path())
        .arg("--admin")
        .arg("owner")
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains("user1,800"));

    // 2. Second run on the same DB: still paused, so the first report is
    // rejected; after unpausing the vehicle and business are still known.
    let csv2 = write_commands(&[
        &["report_mileage", "user1", "", "", "", "", "", "", "100"],
        &["unpause", "owner"],
        &["report_mileage", "user1", "", "", "", "", "", "", "100"],
        &["redeem_points", "user1", "", "", "", "", "user2", "", "600"],
    ]);

    let output2 = Command::new(cargo_bin!("eco-ledger"))
        .arg(csv2.path())
        .arg("--admin")
        .arg("owner")
        .arg("--db-path")
        .arg(&db_path)
        .arg("--audit")
        .output()
        .expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);
    let stderr2 = String::from_utf8_lossy(&output2.stderr);

    assert!(stderr2.contains("Reward system is paused"));
    assert!(stderr2.contains("Audit passed"));
    // 800 + 800 - 600
    assert!(stdout2.contains("user1,1000"));
}

#[test]
fn test_rocksdb_rejects_other_administrator() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");
    let csv = write_commands(&[&register_vehicle("user1", "electric")]);

    let first = Command::new(cargo_bin!("eco-ledger"))
        .arg(csv.path())
        .args(["--admin", "owner", "--db-path"])
        .arg(&db_path)
        .output()
        .unwrap();
    assert!(first.status.success());

    let second = Command::new(cargo_bin!("eco-ledger"))
        .arg(csv.path())
        .args(["--admin", "mallory", "--db-path"])
        .arg(&db_path)
        .output()
        .unwrap();
    assert!(!second.status.success());
}
