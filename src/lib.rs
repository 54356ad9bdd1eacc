//! # observe
//!
//! Hierarchical log and trace emitters on top of process-wide defaults and
//! pluggable output sinks.
//!
//! ## Features
//!
//! - **Two hierarchies**: operational logs under `<logger>` and execution
//!   traces under `<logger>.<tracer>`, kept apart by default
//! - **Dotted channels**: namespaced emitters reach their ancestors' sinks
//!   through propagation
//! - **Sinks**: console, file, rotating file, syslog, or any [`Destination`]
//! - **Instrumentation**: [`Logged`] and [`Traced`] emit once before or
//!   after an operation
//! - **Thread safe**: a channel's configuration becomes visible atomically
//!
//! ## Quick start
//!
//! ```
//! use observe::prelude::*;
//!
//! let (log, trace) = create_global(None, None, None);
//! log.info("ready");
//!
//! let job = create_trace("job", None);
//! job.span("load").trace("reading input");
//! # let _ = trace;
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        create_global, create_global_log, create_global_trace, create_log, create_trace,
        update_global_config, DateFormat, Emit, Format, GlobalConfig, Level, Log, Logged,
        ObserveError, Observer, Result, Sink, Style, Trace, Traced, When,
    };
    pub use crate::sinks::FileMode;
}

pub use crate::core::{
    capturing, create_global, create_global_log, create_global_trace, create_log, create_trace,
    export_global_config_to_file, global_config, keys, logged, register_trace_level, traced,
    update_global_config, update_global_config_with_file, AttributeSource, Channel,
    ConfigSource, DateFormat, Destination, Emit, EnvironmentSource, Format, Formatter,
    GlobalConfig, Hierarchy, Level, Log, Logged, ObserveError, Observer, Record, Result, Sink,
    Style, Trace, Traced, When, TRACE_LEVEL,
};
pub use sinks::{FileMode, Stream};
