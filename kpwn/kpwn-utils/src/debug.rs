//! Interactive debugging helpers.

use kpwn_log::{info, ok};
use kpwn_registers::UserState;

/// Snapshot the calling thread's `iretq` state and log it.
///
/// Always inlined so the captured stack pointer is the caller's.
#[allow(clippy::inline_always)]
#[inline(always)]
#[must_use]
pub fn save_state() -> UserState {
    let state = UserState::capture();
    info!("Saved state");
    log::debug!("{state}");
    state
}

/// Trap into an attached debugger (`SIGTRAP` without one).
#[inline]
pub fn breakpoint() {
    unsafe {
        core::arch::asm!("int3", options(nomem, nostack));
    }
}

/// Marker to jump to when testing whether a hijacked kernel path reaches
/// user code at all.
pub extern "C" fn user_space_probe() {
    ok!("user space probe executed");
}
