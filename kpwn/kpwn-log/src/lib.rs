//! # Operator diagnostics
//!
//! Color-coded, severity-tagged lines on stderr for interactive exploit runs.
//!
//! | Macro | Tag | Color | Notes |
//! |-------|-----|-------|-------|
//! | [`info!`] | `[*]` | blue | |
//! | [`ok!`] | `[+]` | green | |
//! | [`err!`] | `[-]` | red | non-fatal |
//! | [`warn!`] | `[!]` | yellow | |
//! | [`die!`] | `[!!]` | red | exits with status 1 |
//! | [`leak!`] | `[Addr]` | blue | `name  0xaddress` |
//! | [`kassert!`] | `[!!]` | red | dies with expression and location |
//! | [`debug!`] | `###` | yellow | pauses when [`Diagnostics`] says so |
//!
//! Every line is rendered first and written with one `write` call, so lines
//! from concurrent writers do not interleave mid-line.
//!
//! The macros always write. Records sent through the `log` facade reach
//! stderr in the same format once a [`StderrLogger`] is installed:
//!
//! ```rust,no_run
//! use kpwn_log::{StderrLogger, info, ok};
//! use log::LevelFilter;
//!
//! StderrLogger::new(LevelFilter::Debug).init().expect("logger initialization");
//!
//! info!("spraying {} objects", 512);
//! log::debug!("visible with a [*] tag and its target");
//! ok!("overlap found");
//! ```
//!
//! ## Features
//!
//! * `color` (default): wrap lines in ANSI color escapes. Disable for logs
//!   that end up in files.

mod diagnostics;
mod logger;
mod severity;

#[doc(hidden)]
pub mod sink;

pub use diagnostics::{DEBUG_TOKENS, DebugConfig, Diagnostics, debug_banner, pause};
pub use logger::StderrLogger;
pub use severity::Severity;
pub use sink::{AsAddress, format_line};

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        $crate::sink::emit($crate::Severity::Info, ::core::format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! ok {
    ($($arg:tt)*) => {{
        $crate::sink::emit($crate::Severity::Ok, ::core::format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {{
        $crate::sink::emit($crate::Severity::Err, ::core::format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        $crate::sink::emit($crate::Severity::Warn, ::core::format_args!($($arg)*));
    }};
}

/// Print a fatal line and exit with status 1. Evaluates to `!`.
#[macro_export]
macro_rules! die {
    ($($arg:tt)*) => {
        $crate::sink::fatal(::core::format_args!($($arg)*))
    };
}

/// Print the expression text and its value as an address.
#[macro_export]
macro_rules! leak {
    ($sym:expr) => {{
        $crate::sink::leak(
            ::core::stringify!($sym),
            $crate::AsAddress::as_address(&$sym),
        );
    }};
}

/// Die with `Assertion failed: <cond>  (<file>:<line>)` when `cond` is false.
#[macro_export]
macro_rules! kassert {
    ($cond:expr $(,)?) => {{
        if !$cond {
            $crate::die!(
                "Assertion failed: {}  ({}:{})",
                ::core::stringify!($cond),
                ::core::file!(),
                ::core::line!()
            );
        }
    }};
}

/// `debug!(diag, "fmt", args..)`: pausing debug line through a [`Diagnostics`].
#[macro_export]
macro_rules! debug {
    ($diag:expr, $($arg:tt)*) => {{
        $diag.debug(::core::file!(), ::core::line!(), ::core::format_args!($($arg)*));
    }};
}
