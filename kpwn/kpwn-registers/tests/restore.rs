//! Restore round-trips run in a child process: the landing function ends the
//! process, so the parent only sees the exit status.

use kpwn_registers::{UserState, restore_state};
use std::env;
use std::process::Command;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

const CHILD_ENV: &str = "KPWN_RESTORE_CHILD";
const RESUMED: i32 = 42;

static BEFORE_CAPTURE: AtomicU32 = AtomicU32::new(0);
static LANDED: AtomicU32 = AtomicU32::new(0);
static PIVOT_LO: AtomicU64 = AtomicU64::new(0);
static PIVOT_HI: AtomicU64 = AtomicU64::new(0);

extern "C" fn landing() -> ! {
    let landed = LANDED.fetch_add(1, Ordering::SeqCst) + 1;
    let before = BEFORE_CAPTURE.load(Ordering::SeqCst);
    let code = if landed == 1 && before == 1 {
        RESUMED
    } else {
        100 + i32::try_from(landed).unwrap_or(99)
    };
    std::process::exit(code)
}

extern "C" fn landing_on_pivot() -> ! {
    let rsp: u64;
    unsafe {
        core::arch::asm!("mov {}, rsp", out(reg) rsp, options(nomem, nostack, preserves_flags));
    }
    let lo = PIVOT_LO.load(Ordering::SeqCst);
    let hi = PIVOT_HI.load(Ordering::SeqCst);
    std::process::exit(if (lo..hi).contains(&rsp) { RESUMED } else { 1 })
}

fn run_child(name: &str) -> Option<i32> {
    let status = Command::new(env::current_exe().unwrap())
        .args([name, "--exact", "--ignored", "--test-threads=1", "--nocapture"])
        .env(CHILD_ENV, "1")
        .status()
        .unwrap();
    status.code()
}

#[test]
#[ignore = "spawned by restore_resumes_exactly_once"]
fn restore_child() {
    if env::var_os(CHILD_ENV).is_none() {
        return;
    }

    BEFORE_CAPTURE.fetch_add(1, Ordering::SeqCst);
    let state = UserState::capture();
    unsafe { restore_state(state, landing) }
}

#[test]
#[ignore = "spawned by restore_onto_pivoted_stack"]
fn pivot_child() {
    if env::var_os(CHILD_ENV).is_none() {
        return;
    }

    // A heap-backed stack; leaked because nothing ever returns from it.
    let stack: &'static mut [u64] = vec![0u64; 16 * 1024].leak();
    let range = stack.as_mut_ptr_range();
    let top = range.end as u64;
    PIVOT_LO.store(range.start as u64, Ordering::SeqCst);
    PIVOT_HI.store(top, Ordering::SeqCst);
    let state = UserState::capture().with_stack(top - 64);
    unsafe { restore_state(state, landing_on_pivot) }
}

#[test]
fn restore_resumes_exactly_once() {
    assert_eq!(run_child("restore_child"), Some(RESUMED));
}

#[test]
fn restore_onto_pivoted_stack() {
    assert_eq!(run_child("pivot_child"), Some(RESUMED));
}
