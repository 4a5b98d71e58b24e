#![expect(clippy::expect_used, reason = "tests require contextual panics")]
//! End-to-end tests driving the `diskmerge` binary.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use diskmerge_test_support::fixtures::{ABSORBED_SATELLITE, SPACED_LINE, to_text};
use rstest::rstest;

fn diskmerge(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_diskmerge"))
        .args(args)
        .env("RUST_LOG", "error")
        .env_remove("DISKMERGE_LOG_FORMAT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary must start");
    child
        .stdin
        .take()
        .expect("stdin must be piped")
        .write_all(stdin.as_bytes())
        .expect("stdin must accept input");
    child.wait_with_output().expect("binary must exit")
}

#[rstest]
fn merges_stdin_and_prints_report() {
    let output = diskmerge(&["run", "--verify"], &to_text(&ABSORBED_SATELLITE));
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Disks: 3\nMerges:\n  1 -> 0\nResulting disks:\n  0.0 0.0  2.5\n  10.0 0.0  1.0\n"
    );
}

#[rstest]
fn spaced_disks_need_no_merges() {
    let output = diskmerge(&["run", "-"], &to_text(&SPACED_LINE));
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Disks: 3\nMerges:\nResulting disks:\n  0.0 0.0  1.0\n  3.0 0.0  1.0\n  6.0 0.0  1.0\n"
    );
}

#[rstest]
#[case::bad_number(&["run"], "0 zero 1\n")]
#[case::bad_big_m(&["run", "--big-m", "0"], "")]
fn failures_exit_with_code_one(#[case] args: &[&str], #[case] stdin: &str) {
    let output = diskmerge(args, stdin);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("command execution failed"));
}

#[rstest]
#[case::no_input("")]
#[case::only_ignored_lines("# comment\n\n1 2\n")]
fn empty_input_prints_headers_only(#[case] stdin: &str) {
    let output = diskmerge(&["run"], stdin);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Disks: 0\nMerges:\nResulting disks:\n"
    );
}

#[rstest]
fn invalid_big_m_logs_stable_code() {
    let output = diskmerge(&["run", "--big-m", "0"], "");
    assert!(String::from_utf8_lossy(&output.stderr).contains("DISKMERGE_INVALID_RELAXATION"));
}
