//! Without a debugger attached `int3` raises `SIGTRAP`, which kills the
//! re-executed child before it reaches the line after the breakpoint.

use kpwn_utils::breakpoint;
use std::env;
use std::os::unix::process::ExitStatusExt;
use std::process::Command;

const CHILD_ENV: &str = "KPWN_BREAKPOINT_CHILD";

#[test]
#[ignore = "spawned by breakpoint_traps"]
fn breakpoint_child() {
    if env::var_os(CHILD_ENV).is_none() {
        return;
    }
    breakpoint();
    println!("continued past int3");
}

#[test]
fn breakpoint_traps() {
    let output = Command::new(env::current_exe().unwrap())
        .args([
            "breakpoint_child",
            "--exact",
            "--ignored",
            "--test-threads=1",
            "--nocapture",
        ])
        .env(CHILD_ENV, "1")
        .output()
        .unwrap();

    assert_eq!(output.status.signal(), Some(libc::SIGTRAP));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("continued past int3"));
}
