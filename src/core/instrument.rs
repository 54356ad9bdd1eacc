//! Before/after instrumentation around an operation
//!
//! [`Logged`] and [`Traced`] hold an emitter, a message, a [`When`] and a
//! level. [`call`](Logged::call) runs an operation once with exactly one
//! emission on the chosen side of it; [`wrap`](Logged::wrap) turns an
//! operation into a new closure with the same signature that does so on
//! every invocation. [`wrap0`](Logged::wrap0) does the same for operations
//! that take no argument.
//!
//! ```
//! use observe::{Logged, Observer, When};
//!
//! let observer = Observer::new();
//! let log = observer.create_log("math", None);
//! let double = Logged::new(&log, "doubling").when(When::After).wrap(|x: i32| x * 2);
//! assert_eq!(double(5), 10);
//! ```

use super::{
    emitter::{Emit, Log, Trace},
    error::{ObserveError, Result},
    level::Level,
};

/// Which side of the operation the emission happens on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum When {
    #[default]
    Before,
    After,
}

impl When {
    /// Decode the integer form, `0` before and `1` after.
    ///
    /// Any other value is an [`ObserveError::InvalidWhen`] naming `channel`
    /// and `message`.
    pub fn from_raw(value: i64, channel: &str, message: &str) -> Result<Self> {
        match value {
            0 => Ok(When::Before),
            1 => Ok(When::After),
            other => Err(ObserveError::invalid_when(other, channel, message)),
        }
    }

    #[must_use]
    pub fn as_raw(self) -> i64 {
        match self {
            When::Before => 0,
            When::After => 1,
        }
    }
}

/// Instrumentation on a [`Log`].
///
/// After the operation the message is emitted at the log's own level, not
/// at [`level`](Logged::level); only the before side uses that.
#[derive(Debug, Clone)]
pub struct Logged<'a> {
    emitter: &'a Log,
    message: String,
    when: When,
    level: Level,
}

impl<'a> Logged<'a> {
    /// Emit before, at `INFO`
    pub fn new(emitter: &'a Log, message: impl Into<String>) -> Self {
        Self {
            emitter,
            message: message.into(),
            when: When::Before,
            level: Level::INFO,
        }
    }

    #[must_use]
    pub fn when(mut self, when: When) -> Self {
        self.when = when;
        self
    }

    /// Set the side from its integer form
    pub fn when_raw(self, value: i64) -> Result<Self> {
        let when = When::from_raw(value, self.emitter.name(), &self.message)?;
        Ok(self.when(when))
    }

    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    fn emit(&self, phase: When) {
        match phase {
            When::Before => self.emitter.log(self.level, &self.message),
            When::After => self.emitter.log(self.emitter.level(), &self.message),
        }
    }

    /// Run `op` once with the configured emission
    pub fn call<T>(&self, op: impl FnOnce() -> T) -> T {
        run(self.when, op, |phase| self.emit(phase))
    }

    /// New callable with `op`'s contract that emits on every call
    pub fn wrap<A, T>(self, op: impl Fn(A) -> T + 'a) -> impl Fn(A) -> T + 'a {
        move |arg| self.call(|| op(arg))
    }

    /// [`wrap`](Logged::wrap) for operations without an argument
    pub fn wrap0<T>(self, op: impl Fn() -> T + 'a) -> impl Fn() -> T + 'a {
        move || self.call(&op)
    }
}

/// Instrumentation on a [`Trace`]; both sides emit at
/// [`level`](Traced::level), `TRACE` by default.
#[derive(Debug, Clone)]
pub struct Traced<'a> {
    emitter: &'a Trace,
    message: String,
    when: When,
    level: Level,
}

impl<'a> Traced<'a> {
    pub fn new(emitter: &'a Trace, message: impl Into<String>) -> Self {
        Self {
            emitter,
            message: message.into(),
            when: When::Before,
            level: Level::TRACE,
        }
    }

    #[must_use]
    pub fn when(mut self, when: When) -> Self {
        self.when = when;
        self
    }

    pub fn when_raw(self, value: i64) -> Result<Self> {
        let when = When::from_raw(value, self.emitter.name(), &self.message)?;
        Ok(self.when(when))
    }

    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn call<T>(&self, op: impl FnOnce() -> T) -> T {
        run(self.when, op, |_| self.emitter.log(self.level, &self.message))
    }

    pub fn wrap<A, T>(self, op: impl Fn(A) -> T + 'a) -> impl Fn(A) -> T + 'a {
        move |arg| self.call(|| op(arg))
    }

    pub fn wrap0<T>(self, op: impl Fn() -> T + 'a) -> impl Fn() -> T + 'a {
        move || self.call(&op)
    }
}

fn run<T>(when: When, op: impl FnOnce() -> T, emit: impl FnOnce(When)) -> T {
    match when {
        When::Before => {
            emit(When::Before);
            op()
        }
        When::After => {
            let value = op();
            emit(When::After);
            value
        }
    }
}

/// [`Logged`] with every field given; `when` in integer form
pub fn logged<'a>(
    emitter: &'a Log,
    message: impl Into<String>,
    when: i64,
    level: Level,
) -> Result<Logged<'a>> {
    Ok(Logged::new(emitter, message).when_raw(when)?.level(level))
}

/// [`Traced`] with every field given; `when` in integer form
pub fn traced<'a>(
    emitter: &'a Trace,
    message: impl Into<String>,
    when: i64,
    level: Level,
) -> Result<Traced<'a>> {
    Ok(Traced::new(emitter, message).when_raw(when)?.level(level))
}
