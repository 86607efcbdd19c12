//! Fatal paths end the process, so each one runs in a re-executed copy of
//! this test binary and the parent checks what it left behind.

use kpwn_log::{die, kassert};
use std::path::PathBuf;
use std::process::{Command, Output};
use std::{env, fs};

const SENTINEL_ENV: &str = "KPWN_FATAL_SENTINEL";

fn sentinel_path(name: &str) -> PathBuf {
    env::temp_dir().join(format!("kpwn-{name}-{}", std::process::id()))
}

fn run_child(name: &str) -> (Output, PathBuf) {
    let sentinel = sentinel_path(name);
    let _ = fs::remove_file(&sentinel);
    let output = Command::new(env::current_exe().unwrap())
        .args([name, "--exact", "--ignored", "--test-threads=1", "--nocapture"])
        .env(SENTINEL_ENV, &sentinel)
        .output()
        .unwrap();
    (output, sentinel)
}

fn child_sentinel() -> Option<PathBuf> {
    env::var_os(SENTINEL_ENV).map(PathBuf::from)
}

#[test]
#[ignore = "spawned by die_exits_with_status_1"]
fn die_child() {
    let Some(sentinel) = child_sentinel() else {
        return;
    };
    let attempts = 3;
    if attempts >= 3 {
        die!("cannot continue after {attempts} attempts");
    }
    fs::write(sentinel, b"reached").unwrap();
}

#[test]
#[ignore = "spawned by failed_assertion_dies_with_location"]
fn assert_child() {
    let Some(sentinel) = child_sentinel() else {
        return;
    };
    let slots = 2;
    kassert!(slots == 2);
    kassert!(slots + 1 == 4);
    fs::write(sentinel, b"reached").unwrap();
}

#[test]
fn die_exits_with_status_1() {
    let (output, sentinel) = run_child("die_child");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(!sentinel.exists());
    assert!(stderr.contains("[!!] cannot continue after 3 attempts"));
    assert_eq!(stderr.matches("[!!]").count(), 1);
}

#[test]
fn failed_assertion_dies_with_location() {
    let (output, sentinel) = run_child("assert_child");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(!sentinel.exists());
    assert!(stderr.contains("Assertion failed: slots + 1 == 4  ("));
    assert!(stderr.contains("fatal.rs:"));
    assert!(!stderr.contains("slots == 2"));
}
