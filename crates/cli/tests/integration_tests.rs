//! Integration tests for vslctl
//!
//! Only the offline commands are exercised; `set` and `enumerate` need a
//! HID stack and are covered by the mock-backed tests in vsl-control.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Custom predicate to check if output is valid JSON
fn is_json() -> impl predicates::Predicate<[u8]> {
    predicates::function::function(|s: &[u8]| {
        if let Ok(text) = std::str::from_utf8(s) {
            serde_json::from_str::<Value>(text).is_ok()
        } else {
            false
        }
    })
}

/// Test helper to create a vslctl command
fn vslctl() -> Command {
    let mut cmd = Command::cargo_bin("vslctl").unwrap();
    cmd.env_remove("VSLCTL_CONFIG").env_remove("RUST_LOG");
    cmd
}

const HEADERED_CONFIG: &str = r#"
device:
  vendor_id: 0x194f
  product_id: 0x0101
  report_id: 0x06
wire:
  layout: { type: headered, header: 0 }
  scale: { type: multiplier, factor: 65.535 }
parameters:
  - name: hpf_ch1
    kind: frequency
    id: 0x2B05
    freq_min_hz: 20.0
    freq_max_hz: 20000.0
"#;

fn write_config(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_cli_help() {
    vslctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("AudioBox VSL"));
}

#[test]
fn test_cli_version() {
    vslctl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vslctl"));
}

#[test]
fn test_encode_gain_reference_point() {
    vslctl()
        .args(["encode", "gain_ch1", "0.75"])
        .assert()
        .success()
        .stdout(predicate::str::contains("06 01 1A 59 9F"))
        .stdout(predicate::str::contains("40793"));
}

#[test]
fn test_encode_json() {
    let output = vslctl()
        .args(["--json", "encode", "hpf_ch1", "0.5"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = stdout_json(&output);
    assert_eq!(value["success"], true);
    assert_eq!(value["parameter"], "hpf_ch1");
    assert_eq!(value["unit"], "Hz");
    assert_eq!(value["encoded_value"], 41448);
    assert_eq!(value["report"], "06 05 2B E8 A1");
}

#[test]
fn test_encode_clamps_out_of_range_position() {
    let output = vslctl()
        .args(["--json", "encode", "gain_ch1", "-2.5"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["position"], 0.0);
    assert_eq!(value["encoded_value"], 655);
}

#[test]
fn test_unknown_parameter_exit_code() {
    vslctl()
        .args(["encode", "gain_ch9", "0.5"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("gain_ch9"));
}

#[test]
fn test_unknown_parameter_json_error() {
    vslctl()
        .args(["--json", "encode", "gain_ch9", "0.5"])
        .assert()
        .failure()
        .code(3)
        .stdout(is_json())
        .stdout(predicate::str::contains("UnknownParameter"));
}

#[test]
fn test_sweep_table() {
    vslctl()
        .args(["sweep", "gain_ch1", "--steps", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("655"))
        .stdout(predicate::str::contains("12452"))
        .stdout(predicate::str::contains("65535"));
}

#[test]
fn test_sweep_json_rows() {
    let output = vslctl()
        .args(["--json", "sweep", "gain_ch1", "-s", "5"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = stdout_json(&output);
    let encoded: Vec<u64> = value["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["encoded_value"].as_u64().unwrap())
        .collect();
    assert_eq!(encoded, vec![655, 3489, 12452, 40793, 65535]);
}

#[test]
fn test_sweep_rejects_single_step() {
    vslctl()
        .args(["sweep", "gain_ch1", "--steps", "1"])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_sweep_rejects_oversized_step_count() {
    vslctl()
        .args(["sweep", "gain_ch1", "--steps", "100000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("100000"));
}

#[test]
fn test_decode_compact_report() {
    vslctl()
        .args(["decode", "06 01 1A 59 9F"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gain_ch1"))
        .stdout(predicate::str::contains("0x1A01"))
        .stdout(predicate::str::contains("0.75"));
}

#[test]
fn test_decode_json_with_padding() {
    let output = vslctl()
        .args(["--json", "decode", "06011a599f000000"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = stdout_json(&output);
    assert_eq!(value["report_id"], 6);
    assert_eq!(value["header"], Value::Null);
    assert_eq!(value["param_id"], 0x1A01);
    assert_eq!(value["parameter"]["name"], "gain_ch1");
    let position = value["parameter"]["position"].as_f64().unwrap();
    assert!((position - 0.75).abs() < 1e-3);
}

#[test]
fn test_decode_unknown_id_still_succeeds() {
    let output = vslctl()
        .args(["--json", "decode", "06 FF 00 10 00"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["parameter"], Value::Null);
}

#[test]
fn test_decode_bad_hex_exit_code() {
    vslctl()
        .args(["decode", "06 0Z"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("Invalid report"));
}

#[test]
fn test_decode_short_report_exit_code() {
    vslctl()
        .args(["decode", "06 01 1A"])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_check_config_builtin() {
    vslctl()
        .arg("check-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("built-in"))
        .stdout(predicate::str::contains("gain_ch1"))
        .stdout(predicate::str::contains("hpf_ch1"));
}

#[test]
fn test_check_config_file_json() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "headered.yaml", HEADERED_CONFIG);

    let output = vslctl()
        .args(["--json", "check-config", "--config"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = stdout_json(&output);
    assert_eq!(value["wire"]["layout"]["type"], "headered");
    assert_eq!(value["wire"]["scale"]["type"], "multiplier");
    assert_eq!(value["parameters"].as_array().unwrap().len(), 1);
}

#[test]
fn test_config_from_env() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "headered.yaml", HEADERED_CONFIG);

    vslctl()
        .env("VSLCTL_CONFIG", &path)
        .args(["encode", "hpf_ch1", "1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("06 00 00 05 2B FF FF"));
}

#[test]
fn test_headered_decode_shows_header() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "headered.yaml", HEADERED_CONFIG);

    vslctl()
        .arg("--config")
        .arg(&path)
        .args(["decode", "06 00 00 05 2B FF FF"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Header:"))
        .stdout(predicate::str::contains("hpf_ch1"));
}

#[test]
fn test_missing_config_exit_code() {
    let dir = TempDir::new().unwrap();
    vslctl()
        .arg("--config")
        .arg(dir.path().join("absent.yaml"))
        .arg("check-config")
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_invalid_config_exit_code() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "dup.yaml",
        &format!(
            "{HEADERED_CONFIG}  - name: hpf_ch1\n    kind: frequency\n    id: 0x2B06\n    freq_min_hz: 20.0\n    freq_max_hz: 20000.0\n"
        ),
    );

    vslctl()
        .arg("--config")
        .arg(&path)
        .arg("check-config")
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("duplicate parameter name"));
}

#[test]
fn test_invalid_subcommand() {
    vslctl().arg("invalid-command").assert().failure();
}
