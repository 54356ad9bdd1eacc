//! Destination implementations

pub mod console;
pub mod file;
pub mod rotating_file;
pub mod syslog;

pub use console::{ConsoleDestination, Stream};
pub use file::{FileDestination, FileMode};
pub use rotating_file::{RotatingFileDestination, DEFAULT_MAX_BYTES, DEFAULT_MAX_FILES};
pub use syslog::{SyslogDestination, DEFAULT_SYSLOG_HOST, DEFAULT_SYSLOG_PORT};

pub use crate::core::{Destination, Sink};
