//! Integration tests for the `open-mainframe-convert` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use open_mainframe_encoding::CP1047;

/// Helper to get fixture path.
fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

/// Run the CLI with given arguments and return (stdout, stderr, success).
fn run_cli(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_open-mainframe-convert"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Writes a small ORDER/LINE segment file and returns its path.
fn write_orders(dir: &Path) -> PathBuf {
    let mut data = Vec::new();
    for (name, body) in [("ORDER", "A00101"), ("LINE", "ABC")] {
        let mut bytes = CP1047.encode(&format!("{:6}{:8}{}", "", name, body)).unwrap();
        if name == "LINE" {
            bytes.extend_from_slice(&[0x00, 0x05]);
        }
        data.extend_from_slice(&((bytes.len() + 4) as u16).to_be_bytes());
        data.extend_from_slice(&[0, 0]);
        data.extend(bytes);
    }
    let path = dir.join("orders.dat");
    fs::write(&path, data).unwrap();
    path
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_help_command() {
    let (stdout, _, success) = run_cli(&["--help"]);
    assert!(success);
    assert!(stdout.contains("--layout"));
    assert!(stdout.contains("--without-array-grouping"));
    assert!(stdout.contains("--large-buffer"));
}

#[test]
fn test_json_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_orders(dir.path());
    let layout = fixture("orders.pli");

    let (stdout, stderr, success) = run_cli(&[
        "--layout",
        path_str(&layout),
        "--format",
        "json-compact",
        path_str(&input),
    ]);
    assert!(success, "Command failed with stderr: {}", stderr);
    assert_eq!(
        stdout,
        concat!(
            "[{\"ORDERS\":{\"ORDER\":{\"SEGNAME\":\"ORDER   \",\"ORDER_NO\":\"A001\",\"LINE_COUNT\":\"01\"},",
            "\"LINE\":{\"SEGNAME\":\"LINE    \",\"SKU\":\"ABC\",\"QTY\":\"5\"}}}]\n"
        )
    );
}

#[test]
fn test_csv_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_orders(dir.path());
    let output = dir.path().join("orders.csv");
    let layout = fixture("orders.pli");

    let (stdout, stderr, success) = run_cli(&[
        "-l",
        path_str(&layout),
        "-f",
        "csv",
        "--large-buffer",
        "-o",
        path_str(&output),
        path_str(&input),
    ]);
    assert!(success, "Command failed with stderr: {}", stderr);
    assert!(stdout.is_empty());

    let csv = fs::read_to_string(&output).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("\"ORDERS.ORDER.SEGNAME\"|\"ORDERS.ORDER.ORDER_NO\""));
    assert!(lines[1].ends_with("|\"ABC\"|\"5\""));
}

#[test]
fn test_missing_layout_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_orders(dir.path());
    let missing = dir.path().join("missing.pli");

    let (_, stderr, success) = run_cli(&["--layout", path_str(&missing), path_str(&input)]);
    assert!(!success);
    assert!(stderr.contains("missing.pli"), "stderr: {}", stderr);
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.dat");
    let layout = fixture("orders.pli");

    let (_, stderr, success) = run_cli(&["--layout", path_str(&layout), path_str(&missing)]);
    assert!(!success);
    assert!(stderr.contains("Failed to open"), "stderr: {}", stderr);
}
