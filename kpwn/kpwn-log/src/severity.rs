/// Severity of a diagnostic line, each with a fixed tag and color.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Severity {
    /// `[*]`, blue.
    Info,
    /// `[+]`, green.
    Ok,
    /// `[-]`, red. Not fatal.
    Err,
    /// `[!]`, yellow.
    Warn,
    /// `[!!]`, red. The process exits right after the line is written.
    Fatal,
    /// `[Addr]`, blue. Named address leaks.
    Leak,
}

pub(crate) const RESET: &str = "\x1b[0m";
pub(crate) const BLUE: &str = "\x1b[34m";
pub(crate) const GREEN: &str = "\x1b[32m";
pub(crate) const RED: &str = "\x1b[31m";
pub(crate) const YELLOW: &str = "\x1b[33m";

impl Severity {
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Info => "[*]",
            Self::Ok => "[+]",
            Self::Err => "[-]",
            Self::Warn => "[!]",
            Self::Fatal => "[!!]",
            Self::Leak => "[Addr]",
        }
    }

    /// ANSI escape that opens the line.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Info | Self::Leak => BLUE,
            Self::Ok => GREEN,
            Self::Err | Self::Fatal => RED,
            Self::Warn => YELLOW,
        }
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Err,
            log::Level::Warn => Self::Warn,
            log::Level::Info | log::Level::Debug | log::Level::Trace => Self::Info,
        }
    }
}
