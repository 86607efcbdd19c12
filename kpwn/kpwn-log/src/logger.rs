use crate::severity::Severity;
use crate::sink::{format_line, write_stderr};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// `log` backend writing records in the toolkit's `[tag] message` format.
pub struct StderrLogger {
    max_level: LevelFilter,
}

impl StderrLogger {
    #[must_use]
    pub const fn new(max_level: LevelFilter) -> Self {
        Self { max_level }
    }

    /// Call this once during early init.
    ///
    /// # Errors
    /// Another logger was installed first.
    pub fn init(self) -> Result<(), SetLoggerError> {
        let max_level = self.max_level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }

    /// The line a record is rendered to.
    ///
    /// `Debug`/`Trace` records are prefixed with their target, since they
    /// usually come from deep inside a helper.
    #[must_use]
    pub fn render(record: &Record) -> String {
        let severity = Severity::from(record.level());
        if record.level() <= Level::Info {
            format_line(severity, *record.args())
        } else {
            format_line(
                severity,
                format_args!("{}: {}", record.target(), record.args()),
            )
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        write_stderr(&Self::render(record));
    }

    fn flush(&self) {
        // stderr is unbuffered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_level() {
        let logger = StderrLogger::new(LevelFilter::Info);
        let meta = |level| Metadata::builder().level(level).build();
        assert!(logger.enabled(&meta(Level::Error)));
        assert!(logger.enabled(&meta(Level::Info)));
        assert!(!logger.enabled(&meta(Level::Debug)));
    }

    #[test]
    fn debug_records_carry_target() {
        let line = StderrLogger::render(
            &Record::builder()
                .level(Level::Debug)
                .target("kpwn_utils::affinity")
                .args(format_args!("mask built"))
                .build(),
        );
        assert!(line.contains("[*] kpwn_utils::affinity: mask built"));
    }

    #[test]
    fn error_records_use_error_tag() {
        let line = StderrLogger::render(
            &Record::builder()
                .level(Level::Error)
                .target("x")
                .args(format_args!("boom"))
                .build(),
        );
        assert!(line.contains("[-] boom"));
        assert!(!line.contains("x: "));
    }
}
