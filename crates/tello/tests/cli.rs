#![cfg(all(unix, feature = "cli"))]

mod common;

use std::net::{SocketAddr, UdpSocket};
use std::process::{Command, Output};

use common::FakeDrone;

fn tello(drone: SocketAddr, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tello"))
        .arg("--log-level")
        .arg("error")
        .arg("--drone")
        .arg(drone.to_string())
        .arg("--local")
        .arg("127.0.0.1:0")
        .args(args)
        .output()
        .expect("tello should run")
}

#[test]
fn version_prints_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_tello"))
        .arg("version")
        .output()
        .expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn status_reports_battery_and_tof_as_json() {
    let fake = FakeDrone::spawn(vec!["ok", "87", "150mm"]);
    let output = tello(fake.addr(), &["--format", "json", "status"]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("status.schema.json"));
    assert!(stdout.contains("\"battery_percent\":87"));
    assert!(stdout.contains("\"tof_mm\":150"));
    assert_eq!(fake.finish(), vec!["command", "battery?", "tof?"]);
}

#[test]
fn mission_pad_enables_detection_first() {
    let fake = FakeDrone::spawn(vec!["ok", "ok", "4"]);
    let output = tello(fake.addr(), &["--format", "raw", "mission-pad"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "4");
    assert_eq!(fake.finish(), vec!["command", "mon", "mid?"]);
}

#[test]
fn rejected_handshake_exits_with_failure() {
    let fake = FakeDrone::spawn(vec!["error"]);
    let output = tello(fake.addr(), &["status"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("handshake failed"));
    fake.finish();
}

#[test]
fn silent_drone_exits_with_timeout() {
    let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
    let output = tello(silent.local_addr().unwrap(), &["--timeout", "200ms", "hop"]);

    assert_eq!(output.status.code(), Some(124));
}

#[test]
fn invalid_timeout_is_a_usage_error() {
    let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
    let output = tello(silent.local_addr().unwrap(), &["--timeout", "0s", "status"]);

    assert_eq!(output.status.code(), Some(64));
}
