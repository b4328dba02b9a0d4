#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::Command;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "cosmiq-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn cosmiq() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cosmiq"));
    cmd.env_remove("COSMIQ_DATA_DIR")
        .arg("--log-level")
        .arg("error");
    cmd
}

const CAPTURE: &str = "42AAAACAFEBABE\n44BBBBFFFFFFFFFFFF\n\n4300000102030405\n44CCCCC20012340000FFFFFFFFFFFF\n";

#[test]
fn dump_reports_and_writes_blocks() {
    let dir = unique_temp_dir("dump");
    let capture = dir.join("capture.txt");
    let out_dir = dir.join("data");
    std::fs::write(&capture, CAPTURE).expect("capture should be writable");

    let output = cosmiq()
        .arg("--format")
        .arg("json")
        .arg("dump")
        .arg(&capture)
        .arg("--out-dir")
        .arg(&out_dir)
        .output()
        .expect("dump should run");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("report should be json");

    assert_eq!(report["schema_id"], "cosmiq.cli.v1.dump-report");
    assert_eq!(report["lines"], 5);
    assert_eq!(report["frames"], 4);
    assert_eq!(report["short_lines"], 1);
    assert_eq!(report["ignored_frames"], 1);
    assert_eq!(report["header"]["hex"], "CAFEBABE");
    assert_eq!(report["header"]["bytes"], 4);
    assert_eq!(report["body"]["frames"], 2);
    assert_eq!(report["body"]["bytes"], 18);

    let blocks = report["blocks"].as_array().expect("blocks should be an array");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0]["index"], 1);
    assert_eq!(blocks[0]["offset"], 6);
    assert_eq!(blocks[0]["size"], 6);
    assert_eq!(blocks[0]["hex"][0], "C20012340000");

    let written = std::fs::read(out_dir.join("dive_log_block_1.bin")).expect("block file");
    assert_eq!(written, vec![0xC2, 0x00, 0x12, 0x34, 0x00, 0x00]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn dump_no_write_leaves_directory_alone() {
    let dir = unique_temp_dir("no-write");
    let capture = dir.join("capture.txt");
    let out_dir = dir.join("data");
    std::fs::write(&capture, CAPTURE).expect("capture should be writable");

    let output = cosmiq()
        .arg("--format")
        .arg("pretty")
        .arg("dump")
        .arg(&capture)
        .arg("--out-dir")
        .arg(&out_dir)
        .arg("--no-write")
        .output()
        .expect("dump should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--- HEADER (4 bytes) ---"));
    assert!(stdout.contains("CAFEBABE"));
    assert!(stdout.contains("--- BODY (18 bytes) ---"));
    assert!(stdout.contains("Found 1 distinct data blocks in the body."));
    assert!(stdout.contains("Block 1 Size: 6 bytes"));
    assert!(!stdout.contains("Saved to"));
    assert!(!out_dir.exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn dump_odd_body_fails_with_data_invalid() {
    let dir = unique_temp_dir("odd");
    let capture = dir.join("capture.txt");
    std::fs::write(&capture, "42AAAACAFEBABE\n440000C20012340\n").expect("capture");

    let output = cosmiq()
        .arg("--format")
        .arg("json")
        .arg("dump")
        .arg(&capture)
        .arg("--no-write")
        .output()
        .expect("dump should run");

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("body channel decode failed"));

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("partial report should be json");
    assert_eq!(report["header"]["hex"], "CAFEBABE");
    assert!(report["body"]["error"]
        .as_str()
        .map(|s| s.contains("odd number"))
        .unwrap_or(false));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn dump_all_filler_is_not_an_error() {
    let dir = unique_temp_dir("filler");
    let capture = dir.join("capture.txt");
    std::fs::write(&capture, "440000FFFFFFFFFFFF\n440000FFFFFFFFFFFF\n").expect("capture");

    let output = cosmiq()
        .arg("--format")
        .arg("json")
        .arg("dump")
        .arg(&capture)
        .arg("--no-write")
        .output()
        .expect("dump should run");

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["body"]["bytes"], 12);
    assert_eq!(report["blocks"].as_array().map(Vec::len), Some(0));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn dump_missing_capture_fails() {
    let dir = unique_temp_dir("missing");

    let output = cosmiq()
        .arg("dump")
        .arg(dir.join("absent.txt"))
        .arg("--no-write")
        .output()
        .expect("dump should run");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot open capture"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn dump_zero_window_is_usage_error() {
    let dir = unique_temp_dir("window");
    let capture = dir.join("capture.txt");
    std::fs::write(&capture, CAPTURE).expect("capture");

    let output = cosmiq()
        .arg("dump")
        .arg(&capture)
        .arg("--window-size")
        .arg("0")
        .output()
        .expect("dump should run");

    assert_eq!(output.status.code(), Some(64));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn dump_raw_writes_block_bytes() {
    let dir = unique_temp_dir("raw");
    let capture = dir.join("capture.txt");
    std::fs::write(&capture, CAPTURE).expect("capture");

    let output = cosmiq()
        .arg("--format")
        .arg("raw")
        .arg("dump")
        .arg(&capture)
        .arg("--no-write")
        .output()
        .expect("dump should run");

    assert!(output.status.success());
    assert_eq!(output.stdout, vec![0xC2, 0x00, 0x12, 0x34, 0x00, 0x00]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn dump_rerun_removes_stale_blocks() {
    let dir = unique_temp_dir("rerun");
    let capture = dir.join("capture.txt");
    let out_dir = dir.join("data");
    std::fs::create_dir_all(&out_dir).expect("out dir");
    std::fs::write(out_dir.join("dive_log_block_2.bin"), [0xAA]).expect("stale block");
    std::fs::write(out_dir.join("notes.txt"), "keep").expect("notes");
    std::fs::write(&capture, CAPTURE).expect("capture");

    let output = cosmiq()
        .arg("--format")
        .arg("json")
        .arg("dump")
        .arg(&capture)
        .arg("--out-dir")
        .arg(&out_dir)
        .output()
        .expect("dump should run");

    assert!(output.status.success());
    assert!(out_dir.join("dive_log_block_1.bin").exists());
    assert!(!out_dir.join("dive_log_block_2.bin").exists());
    assert!(out_dir.join("notes.txt").exists());

    let _ = std::fs::remove_dir_all(&dir);
}
