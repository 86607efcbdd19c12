//! Debug configuration and the pausing `debug!` path.

use crate::severity::{Severity, YELLOW};
use crate::sink::{close_color, emit, open_color, write_stderr};
use core::fmt::{self, Write as _};
use std::io::{self, BufRead};

/// Arguments that switch debug pausing on.
pub const DEBUG_TOKENS: [&str; 2] = ["DEBUG", "debug"];

fn is_debug_token(arg: &str) -> bool {
    DEBUG_TOKENS.iter().any(|token| *token == arg)
}

/// Debug behavior of a [`Diagnostics`] context.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct DebugConfig {
    /// Print `debug!` messages with their source location and wait for Enter.
    pub pause_on_debug_log: bool,
}

impl DebugConfig {
    /// Enabled iff any argument is one of [`DEBUG_TOKENS`].
    ///
    /// The iterator is scanned as given; strip the program name first if it
    /// could collide with a token.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            pause_on_debug_log: args.into_iter().any(|arg| is_debug_token(arg.as_ref())),
        }
    }
}

/// Logging context for the operator-facing `debug!` path.
///
/// Carries the debug configuration explicitly instead of a process global.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    config: DebugConfig,
}

impl Diagnostics {
    #[must_use]
    pub const fn new(config: DebugConfig) -> Self {
        Self { config }
    }

    /// Scan the process arguments, program name excluded.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_args(
            std::env::args_os()
                .skip(1)
                .map(|arg| arg.to_string_lossy().into_owned()),
        )
    }

    /// Scan `args`; enabling announces itself like [`Self::set_debug`].
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut diag = Self::default();
        if DebugConfig::from_args(args).pause_on_debug_log {
            diag.set_debug(true);
        }
        diag
    }

    #[must_use]
    pub const fn config(&self) -> DebugConfig {
        self.config
    }

    #[must_use]
    pub const fn debug_enabled(&self) -> bool {
        self.config.pause_on_debug_log
    }

    pub fn set_debug(&mut self, enabled: bool) {
        self.config.pause_on_debug_log = enabled;
        if enabled {
            emit(
                Severity::Warn,
                format_args!("Debug mode ON — debug!() will pause after each message"),
            );
        }
    }

    /// Log a debug message; pauses on stdin when debugging is enabled,
    /// otherwise identical to `info!`.
    pub fn debug(&self, file: &str, line: u32, args: fmt::Arguments<'_>) {
        self.debug_with(file, line, args, &mut io::stdin().lock());
    }

    /// [`Self::debug`] reading the continue-line from `input`.
    pub fn debug_with<R: BufRead>(
        &self,
        file: &str,
        line: u32,
        args: fmt::Arguments<'_>,
        input: &mut R,
    ) {
        if self.debug_enabled() {
            write_stderr(&debug_banner(file, line, args));
            pause(input);
        } else {
            emit(Severity::Info, args);
        }
    }
}

/// `\n### file:line message\n` in yellow.
#[must_use]
pub fn debug_banner(file: &str, line: u32, args: fmt::Arguments<'_>) -> String {
    let mut out = String::from("\n");
    open_color(&mut out, YELLOW);
    let _ = write!(out, "### {file}:{line} {args}");
    close_color(&mut out);
    out.push('\n');
    out
}

/// Prompt and block until a line (or EOF) arrives on `input`.
pub fn pause<R: BufRead>(input: &mut R) {
    let mut prompt = String::new();
    open_color(&mut prompt, YELLOW);
    prompt.push_str("    [press Enter to continue]");
    close_color(&mut prompt);
    write_stderr(&prompt);

    let mut discard = String::new();
    let _ = input.read_line(&mut discard);
}
