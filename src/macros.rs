//! Formatting macros for emitters.
//!
//! Each macro formats its arguments like `format!` and hands the result to
//! the matching [`Emit`](crate::Emit) method, so they work with both
//! [`Log`](crate::Log) and [`Trace`](crate::Trace).
//!
//! # Examples
//!
//! ```
//! use observe::{info, Observer};
//!
//! let observer = Observer::new();
//! let log = observer.create_log("server", None);
//!
//! info!(log, "Server started");
//! let port = 8080;
//! info!(log, "Server listening on port {}", port);
//! ```

/// Emit a formatted message at an explicit level.
///
/// ```
/// # use observe::{Level, Observer};
/// # let log = Observer::new().create_log("demo", None);
/// use observe::log;
/// log!(log, Level::INFO, "Simple message");
/// log!(log, Level::ERROR, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($emitter:expr, $level:expr, $($arg:tt)+) => {
        $crate::Emit::log(&$emitter, $level, &format!($($arg)+))
    };
}

/// Emit at `TRACE` on a [`Trace`](crate::Trace).
///
/// ```
/// # use observe::Observer;
/// # let trace = Observer::new().create_trace("job", None);
/// use observe::trace;
/// trace!(trace, "Entering step {}", 2);
/// ```
#[macro_export]
macro_rules! trace {
    ($emitter:expr, $($arg:tt)+) => {
        $crate::Trace::trace(&$emitter, &format!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug {
    ($emitter:expr, $($arg:tt)+) => {
        $crate::log!($emitter, $crate::Level::DEBUG, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($emitter:expr, $($arg:tt)+) => {
        $crate::log!($emitter, $crate::Level::INFO, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($emitter:expr, $($arg:tt)+) => {
        $crate::log!($emitter, $crate::Level::WARN, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($emitter:expr, $($arg:tt)+) => {
        $crate::log!($emitter, $crate::Level::ERROR, $($arg)+)
    };
}

/// Emit at `CRITICAL`.
///
/// ```
/// # use observe::Observer;
/// # let log = Observer::new().create_log("demo", None);
/// use observe::critical;
/// critical!(log, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! critical {
    ($emitter:expr, $($arg:tt)+) => {
        $crate::log!($emitter, $crate::Level::CRITICAL, $($arg)+)
    };
}
