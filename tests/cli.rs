use std::process::{Command, Stdio};

// The binary refuses to start without an interactive terminal; that is the
// one CLI behavior testable without a PTY.

#[test]
fn stdin_must_be_a_tty() {
    let bin = assert_cmd::cargo::cargo_bin("tapr");
    let output = Command::new(bin)
        .stdin(Stdio::null())
        .output()
        .expect("binary should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stdin must be a tty"), "stderr: {stderr}");
}

#[test]
fn version_flag_works_without_a_tty() {
    let bin = assert_cmd::cargo::cargo_bin("tapr");
    let output = Command::new(bin)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .expect("binary should run");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("tapr"));
}
