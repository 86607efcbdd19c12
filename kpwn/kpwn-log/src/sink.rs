//! Line formatting and the stderr sink behind the logging macros.

use crate::severity::{RESET, Severity};
use core::fmt::{self, Write as _};
use std::io::{self, Write};

/// Opens an ANSI color span when the `color` feature is on.
pub(crate) fn open_color(out: &mut String, color: &str) {
    if cfg!(feature = "color") {
        out.push_str(color);
    }
}

pub(crate) fn close_color(out: &mut String) {
    if cfg!(feature = "color") {
        out.push_str(RESET);
    }
}

/// Render one diagnostic line: `COLOR TAG message RESET \n`.
#[must_use]
pub fn format_line(severity: Severity, args: fmt::Arguments<'_>) -> String {
    let mut line = String::with_capacity(64);
    open_color(&mut line, severity.color());
    // Writing into a String cannot fail.
    let _ = write!(line, "{} {args}", severity.tag());
    close_color(&mut line);
    line.push('\n');
    line
}

/// Write pre-rendered text to stderr in one call.
///
/// Best-effort: a closed stderr is not worth aborting an exploit run for.
pub fn write_stderr(text: &str) {
    let _ = io::stderr().lock().write_all(text.as_bytes());
}

#[doc(hidden)]
pub fn emit(severity: Severity, args: fmt::Arguments<'_>) {
    write_stderr(&format_line(severity, args));
}

/// Write a fatal line and exit with status 1.
#[doc(hidden)]
pub fn fatal(args: fmt::Arguments<'_>) -> ! {
    emit(Severity::Fatal, args);
    std::process::exit(1)
}

#[doc(hidden)]
pub fn leak(name: &str, address: u64) {
    emit(Severity::Leak, format_args!("{name:<24} {address:#x}"));
}

/// Values [`leak!`](crate::leak) can print as an address.
pub trait AsAddress {
    fn as_address(&self) -> u64;
}

impl AsAddress for u64 {
    fn as_address(&self) -> u64 {
        *self
    }
}

impl AsAddress for usize {
    fn as_address(&self) -> u64 {
        *self as u64
    }
}

impl AsAddress for u32 {
    fn as_address(&self) -> u64 {
        u64::from(*self)
    }
}

impl<T: ?Sized> AsAddress for *const T {
    fn as_address(&self) -> u64 {
        self.cast::<()>() as usize as u64
    }
}

impl<T: ?Sized> AsAddress for *mut T {
    fn as_address(&self) -> u64 {
        self.cast::<()>() as usize as u64
    }
}

impl<T: ?Sized> AsAddress for &T {
    fn as_address(&self) -> u64 {
        core::ptr::from_ref::<T>(*self).as_address()
    }
}
