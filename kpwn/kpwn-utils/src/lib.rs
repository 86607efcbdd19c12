//! # Kernel exploitation toolkit
//!
//! User-space helpers for driving a kernel bug to a root shell:
//!
//! * [`open_dev`] / [`Device`]: open a device node (or die) and `ioctl` it.
//! * [`hexdump`]: two-words-per-row view of leaked memory.
//! * [`pin_cpu`]: keep the exploit on one CPU.
//! * [`save_state`] / [`restore_state`]: snapshot the user `iretq` state
//!   and later return to it from hijacked kernel control flow.
//! * [`get_shell`] / [`shell_entry`]: hand over to `/bin/sh`.
//!
//! Diagnostics macros are re-exported from `kpwn-log`.
//!
//! ```rust,no_run
//! use kpwn_utils::{Diagnostics, debug, open_dev, pin_cpu0, save_state, shell_entry};
//!
//! let diag = Diagnostics::from_env();
//! let _ = pin_cpu0();
//! let state = save_state();
//! let dev = open_dev("/dev/vuln", libc::O_RDWR);
//! debug!(diag, "device ready on fd {}", dev.fd());
//! // ... corrupt kernel state so that it ends in:
//! unsafe { kpwn_utils::restore_state(state, shell_entry) }
//! ```

#![allow(unsafe_code)]

mod affinity;
mod debug;
mod device;
mod memory;
mod shell;

pub use affinity::{AffinityError, allowed_cpus, current_cpu, pin_cpu, pin_cpu0};
pub use debug::{breakpoint, save_state, user_space_probe};
pub use device::{Device, DeviceError, open_dev};
pub use memory::{
    NO_KASLR_BASE, PAGE_SIZE_4K, align_down, align_up, format_hexdump, hexdump, hexdump_raw,
    is_aligned,
};
pub use shell::{SHELL, ShellError, current_uid, get_shell, report_privilege, shell_entry};

pub use kpwn_log::{
    DebugConfig, Diagnostics, StderrLogger, debug, die, err, info, kassert, leak, ok, warn,
};
pub use kpwn_registers::{ResumeEntry, Ring, Rflags, UserState, restore_state};
