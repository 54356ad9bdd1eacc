//! Log and Trace handles bound to a channel

use super::{
    channel::{Channel, Hierarchy},
    error::{ObserveError, Result},
    level::Level,
    record::Record,
};
use std::fmt;
use std::sync::Arc;

/// Common emission surface of [`Log`] and [`Trace`]
pub trait Emit {
    /// Full dotted channel name
    fn name(&self) -> &str;

    /// Level this emitter was created with
    fn level(&self) -> Level;

    /// Route one record through the channel tree.
    ///
    /// Every eligible sink is attempted; the failures are returned in the
    /// order they happened.
    fn emit(&self, level: Level, message: &str) -> Vec<ObserveError>;

    /// Emit and return the first destination failure unchanged
    fn try_log(&self, level: Level, message: &str) -> Result<()> {
        match self.emit(level, message).into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Emit, reporting destination failures on stderr
    fn log(&self, level: Level, message: &str) {
        for e in self.emit(level, message) {
            eprintln!("[OBSERVE ERROR] {} failed to emit: {}", self.name(), e);
        }
    }

    fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    fn warning(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }

    /// Same as [`error`](Emit::error)
    fn exception(&self, message: &str) {
        self.log(Level::ERROR, message);
    }

    fn critical(&self, message: &str) {
        self.log(Level::CRITICAL, message);
    }

    /// Same as [`critical`](Emit::critical)
    fn fatal(&self, message: &str) {
        self.log(Level::CRITICAL, message);
    }
}

/// Operational log handle.
///
/// Creating a `Log` sets its channel's threshold to `level`; the threshold
/// is still read again on every emission.
#[derive(Clone)]
pub struct Log {
    name: String,
    level: Level,
    channel: Arc<Channel>,
    hierarchy: Arc<Hierarchy>,
}

impl Log {
    pub(crate) fn bind(hierarchy: &Arc<Hierarchy>, name: &str, level: Level) -> Self {
        let channel = hierarchy.configure(name, |state| state.threshold = level);
        Self::attach(hierarchy, channel, level)
    }

    /// Wrap a channel the caller has already configured
    pub(crate) fn attach(hierarchy: &Arc<Hierarchy>, channel: Arc<Channel>, level: Level) -> Self {
        Self {
            name: channel.name().to_string(),
            level,
            channel,
            hierarchy: Arc::clone(hierarchy),
        }
    }

    #[must_use]
    pub fn channel(&self) -> &Arc<Channel> {
        &self.channel
    }

    /// Whether a record at `level` would pass the channel threshold now
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.hierarchy.effective_threshold(&self.channel)
    }

    /// Flush the sinks attached directly to this channel
    pub fn flush(&self) -> Result<()> {
        self.channel.flush()
    }
}

impl Emit for Log {
    fn name(&self) -> &str {
        &self.name
    }

    fn level(&self) -> Level {
        self.level
    }

    fn emit(&self, level: Level, message: &str) -> Vec<ObserveError> {
        if !self.enabled(level) {
            return Vec::new();
        }
        let record = Record::new(level, self.name.as_str(), message);
        self.hierarchy.dispatch(&self.channel, &record)
    }
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Log(name={}, level={})", self.name, self.level)
    }
}

impl fmt::Debug for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Execution trace handle; a [`Log`] with `trace` and nested spans
#[derive(Clone)]
pub struct Trace {
    log: Log,
}

impl Trace {
    pub(crate) fn bind(hierarchy: &Arc<Hierarchy>, name: &str, level: Level) -> Self {
        Self {
            log: Log::bind(hierarchy, name, level),
        }
    }

    pub(crate) fn from_log(log: Log) -> Self {
        Self { log }
    }

    /// Emit at [`Level::TRACE`]
    pub fn trace(&self, message: &str) {
        self.log.log(Level::TRACE, message);
    }

    /// Child trace `<name>.<leaf>` carrying this trace's level
    #[must_use]
    pub fn span(&self, leaf: &str) -> Trace {
        let name = format!("{}.{}", self.log.name, leaf);
        Trace::bind(&self.log.hierarchy, &name, self.log.level)
    }

    #[must_use]
    pub fn as_log(&self) -> &Log {
        &self.log
    }

    pub fn flush(&self) -> Result<()> {
        self.log.flush()
    }
}

impl Emit for Trace {
    fn name(&self) -> &str {
        self.log.name()
    }

    fn level(&self) -> Level {
        self.log.level
    }

    fn emit(&self, level: Level, message: &str) -> Vec<ObserveError> {
        self.log.emit(level, message)
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trace(name={}, level={})", self.log.name, self.log.level)
    }
}

impl fmt::Debug for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
