//! Dry run of an exploit's user-space side against harmless targets.
//!
//! Usage: `kpwn-selftest [debug] [--shell]`
//!
//! Pins to CPU 0, snapshots the `iretq` state, pokes `/dev/null`, dumps the
//! snapshot and finally `iretq`s back into it. With `--shell` the landing
//! point is the shell handoff instead of a clean exit.

use kpwn_utils::{
    Diagnostics, NO_KASLR_BASE, ResumeEntry, StderrLogger, UserState, debug, err, hexdump,
    kassert, leak, ok, open_dev, pin_cpu0, restore_state, save_state, shell_entry,
    user_space_probe, warn,
};
use log::LevelFilter;
use std::env;
use std::io::Write;

/// `TIOCGWINSZ` on a non-tty: a request every driver rejects.
const PROBE_IOCTL: u64 = 0x5413;

fn main() {
    let diag = Diagnostics::from_env();
    let level = if diag.debug_enabled() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = StderrLogger::new(level).init() {
        warn!("logger already installed: {e}");
    }

    // Not fatal: single-CPU guests and restricted cpusets still work.
    let _ = pin_cpu0();

    let state = save_state();
    kassert!(state.privilege().is_user());
    debug!(diag, "captured {state}");

    let payload: Vec<u8> = state
        .to_words()
        .iter()
        .flat_map(|word| word.to_le_bytes())
        .collect();
    hexdump(&payload);

    let rsp = state.rsp;
    leak!(rsp);
    leak!(NO_KASLR_BASE);

    let mut dev = open_dev("/dev/null", libc::O_RDWR);
    if let Err(e) = dev.write_all(&payload) {
        err!("write to {} failed: {e}", dev.path().display());
    }
    match unsafe { dev.ioctl(PROBE_IOCTL, 0) } {
        Ok(ret) => warn!("probe ioctl unexpectedly returned {ret}"),
        Err(e) => ok!("probe ioctl rejected: {e}"),
    }
    debug!(diag, "device round trip done on fd {}", dev.fd());
    drop(dev);

    user_space_probe();

    let entry: ResumeEntry = if env::args().any(|arg| arg == "--shell") {
        shell_entry
    } else {
        landing
    };
    unsafe { restore_state(state, entry) }
}

extern "C" fn landing() -> ! {
    let now = UserState::capture();
    ok!("resumed through iretq, rsp={:#x}", now.rsp);
    std::process::exit(0)
}
