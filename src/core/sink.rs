//! Sinks: a destination plus its own minimum level and formatter

use super::{
    destination::Destination,
    error::Result,
    level::Level,
    record::Record,
    template::Formatter,
};
use crate::sinks::{
    ConsoleDestination, FileDestination, FileMode, RotatingFileDestination, SyslogDestination,
};
use parking_lot::Mutex;
use std::fmt;
use std::path::PathBuf;

/// Which configured level a sink without an explicit one falls back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefaultLevel {
    /// Level of the group whose factory attaches the sink
    Group,
    /// Logger level, whichever factory attaches the sink
    Logger,
}

/// A configured output destination with its own severity filter.
///
/// Constructors only pick the destination. The formatter is applied, and a
/// missing level resolved to the configured default, when a global factory
/// attaches the sink to a channel. Only [`Sink::stdout`] follows the
/// attaching group's level; every other sink defaults to the logger level.
pub struct Sink {
    destination: Mutex<Box<dyn Destination>>,
    level: Option<Level>,
    default_level: DefaultLevel,
    formatter: Option<Formatter>,
}

impl Sink {
    /// Wrap any destination
    pub fn new(destination: impl Destination + 'static) -> Self {
        Self {
            destination: Mutex::new(Box::new(destination)),
            level: None,
            default_level: DefaultLevel::Logger,
            formatter: None,
        }
    }

    /// Standard output, filtered at the level of the group it joins
    pub fn stdout() -> Self {
        Self {
            default_level: DefaultLevel::Group,
            ..Self::new(ConsoleDestination::stdout())
        }
    }

    /// Standard error, filtered at `ERROR`
    pub fn stderr() -> Self {
        Self::new(ConsoleDestination::stderr()).with_level(Level::ERROR)
    }

    /// UDP syslog endpoint
    pub fn syslog(host: impl Into<String>, port: u16) -> Self {
        Self::new(SyslogDestination::new(host, port))
    }

    /// Plain text file, opened on first write
    pub fn file(path: impl Into<PathBuf>, mode: FileMode, encoding: Option<&str>) -> Self {
        Self::new(FileDestination::new(path, mode, encoding))
    }

    /// Size-bounded file set `path`, `path.1` … `path.<max_files>`
    pub fn rotating_file(
        path: impl Into<PathBuf>,
        mode: FileMode,
        max_files: usize,
        max_bytes: u64,
        encoding: Option<&str>,
    ) -> Self {
        Self::new(RotatingFileDestination::new(
            path, mode, max_files, max_bytes, encoding,
        ))
    }

    /// Set an explicit minimum level
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Set the formatter directly, bypassing the configured one
    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Minimum level; `NOTSET` until resolved
    #[must_use]
    pub fn level(&self) -> Level {
        self.level.unwrap_or(Level::NOTSET)
    }

    #[must_use]
    pub fn formatter(&self) -> Option<&Formatter> {
        self.formatter.as_ref()
    }

    /// Apply the factory's formatter and fill in a missing level from
    /// `group_level` or `logger_level`
    pub(crate) fn configure(
        mut self,
        formatter: &Formatter,
        group_level: Level,
        logger_level: Level,
    ) -> Self {
        self.formatter = Some(formatter.clone());
        let fallback = match self.default_level {
            DefaultLevel::Group => group_level,
            DefaultLevel::Logger => logger_level,
        };
        self.level.get_or_insert(fallback);
        self
    }

    /// Write `record` if it passes this sink's own level.
    ///
    /// Returns `Ok(false)` when filtered out.
    pub fn handle(&self, record: &Record) -> Result<bool> {
        if record.level < self.level() {
            return Ok(false);
        }
        let line = match self.formatter {
            Some(ref formatter) => formatter.format(record),
            None => record.message.clone(),
        };
        self.destination.lock().write(record, &line)?;
        Ok(true)
    }

    pub fn flush(&self) -> Result<()> {
        self.destination.lock().flush()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("destination", &self.destination.lock().name())
            .field("level", &self.level)
            .field("default_level", &self.default_level)
            .field("formatter", &self.formatter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::template::Style;
    use std::sync::Arc;

    struct Captured(Arc<Mutex<Vec<String>>>);

    impl Destination for Captured {
        fn write(&mut self, _record: &Record, line: &str) -> Result<()> {
            self.0.lock().push(line.to_string());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "captured"
        }
    }

    #[test]
    fn test_constructor_default_levels() {
        assert_eq!(Sink::stdout().level(), Level::NOTSET);
        assert_eq!(Sink::stderr().level(), Level::ERROR);
        assert_eq!(Sink::syslog("localhost", 514).level(), Level::NOTSET);
        assert!(Sink::stdout().formatter().is_none());
    }

    #[test]
    fn test_configure_keeps_explicit_level() {
        let formatter = Formatter::new("{message}", Style::Brace, None);
        let sink = Sink::stderr().configure(&formatter, Level::DEBUG, Level::DEBUG);
        assert_eq!(sink.level(), Level::ERROR);
        let sink = Sink::stdout().configure(&formatter, Level::DEBUG, Level::INFO);
        assert_eq!(sink.level(), Level::DEBUG);
        assert!(sink.formatter().is_some());
    }

    #[test]
    fn test_only_stdout_follows_group_level() {
        let formatter = Formatter::default();
        let (group, logger) = (Level::TRACE, Level::DEBUG);

        assert_eq!(Sink::stdout().configure(&formatter, group, logger).level(), group);
        assert_eq!(Sink::syslog("localhost", 514).configure(&formatter, group, logger).level(), logger);
        assert_eq!(
            Sink::file("app.log", FileMode::Append, None)
                .configure(&formatter, group, logger)
                .level(),
            logger
        );
        assert_eq!(
            Sink::rotating_file("app.log", FileMode::Append, 2, 100, None)
                .configure(&formatter, group, logger)
                .level(),
            logger
        );
    }

    #[test]
    fn test_handle_filters_by_own_level() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let formatter = Formatter::new("{levelname} {message}", Style::Brace, None);
        let sink = Sink::new(Captured(Arc::clone(&lines)))
            .with_level(Level::WARN)
            .configure(&formatter, Level::DEBUG, Level::DEBUG);

        assert!(!sink.handle(&Record::new(Level::INFO, "global", "quiet")).unwrap());
        assert!(sink.handle(&Record::new(Level::ERROR, "global", "loud")).unwrap());
        assert_eq!(*lines.lock(), vec!["ERROR loud".to_string()]);
    }
}
