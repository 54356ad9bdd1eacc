//! Core types: levels, records, channels, emitters and configuration

pub mod capture;
pub mod channel;
pub mod config;
pub mod destination;
pub mod emitter;
pub mod error;
pub mod instrument;
pub mod level;
pub mod observer;
pub mod record;
pub mod sink;
pub mod template;

pub use capture::{capturing, WARNINGS_CHANNEL};
pub use channel::{Channel, Hierarchy, ROOT_NAME};
pub use config::{keys, AttributeSource, ConfigSource, EnvironmentSource, GlobalConfig};
pub use destination::Destination;
pub use emitter::{Emit, Log, Trace};
pub use error::{ObserveError, Result};
pub use instrument::{logged, traced, Logged, Traced, When};
pub use level::{register_level_name, register_trace_level, Level, TRACE_LEVEL, TRACE_NAME};
pub use observer::{
    create_global, create_global_log, create_global_trace, create_log, create_trace,
    export_global_config_to_file, global_config, update_global_config,
    update_global_config_with_file, Observer,
};
pub use record::Record;
pub use sink::Sink;
pub use template::{DateFormat, Format, Formatter, Style, Template, DEFAULT_DATE_FORMAT};
