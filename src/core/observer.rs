//! Configuration plus channel tree, and the factories built on them
//!
//! An [`Observer`] is the explicit form of the process-wide state: a
//! [`GlobalConfig`] and the [`Hierarchy`] its factories populate. Most
//! programs use the lazily created [`Observer::global`] through the free
//! functions at the bottom of this module. Separate instances never share
//! channels, which keeps tests and embedded uses apart.
//!
//! # Example
//!
//! ```
//! use observe::{Emit, Observer, Sink};
//!
//! let observer = Observer::new();
//! let (log, trace) = observer.create_global(
//!     Some(vec![Sink::stdout()]),
//!     Some(vec![Sink::stdout()]),
//!     None,
//! );
//! log.info("service started");
//!
//! let job = observer.create_trace("job", None).span("load");
//! job.trace("reading input");
//! # let _ = trace;
//! ```

use super::{
    capture,
    channel::{Hierarchy, ROOT_NAME},
    config::{ConfigSource, GlobalConfig},
    emitter::{Log, Trace},
    error::Result,
    level::{register_trace_level, Level},
    sink::Sink,
    template::Formatter,
};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::{Arc, OnceLock};

pub struct Observer {
    config: RwLock<GlobalConfig>,
    hierarchy: Arc<Hierarchy>,
}

impl Observer {
    /// Fresh observer with default configuration and an empty channel tree
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GlobalConfig::default())
    }

    #[must_use]
    pub fn with_config(config: GlobalConfig) -> Self {
        Self {
            config: RwLock::new(config),
            hierarchy: Arc::new(Hierarchy::new()),
        }
    }

    /// The process-wide observer behind the free functions
    pub fn global() -> &'static Observer {
        static GLOBAL: OnceLock<Observer> = OnceLock::new();
        GLOBAL.get_or_init(Observer::new)
    }

    /// Snapshot of the current configuration
    #[must_use]
    pub fn config(&self) -> GlobalConfig {
        self.config.read().clone()
    }

    #[must_use]
    pub fn hierarchy(&self) -> &Arc<Hierarchy> {
        &self.hierarchy
    }

    /// Merge every field `source` provides into the configuration
    pub fn update_global_config<S: ConfigSource + ?Sized>(&self, source: &S) {
        self.config.write().merge(source);
    }

    /// Merge the JSON object stored at `path`
    pub fn update_global_config_with_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let attributes = GlobalConfig::load_attributes(path)?;
        self.update_global_config(&attributes);
        Ok(())
    }

    /// Write the current configuration to `path` as JSON
    pub fn export_global_config_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.config().export(path)
    }

    /// Attach `sinks` to the logger channel and return its [`Log`].
    ///
    /// Also sets the root threshold to the logger level, applies the
    /// warning-capture flag and, with force-as-root, makes `sinks` the
    /// root's only sinks.
    pub fn create_global_log(&self, sinks: Vec<Sink>) -> Log {
        let config = self.config();
        let level = config.logger_level;

        self.hierarchy.root().set_threshold(level);
        capture::set_capture(config.logger_capture_warnings, &self.hierarchy);

        let formatter = Formatter::new(
            &config.logger_format,
            config.logger_style,
            Some(&config.logger_datefmt),
        );
        let sinks: Vec<Arc<Sink>> = sinks
            .into_iter()
            .map(|sink| Arc::new(sink.configure(&formatter, level, level)))
            .collect();

        if config.logger_force_as_root {
            let replacement = sinks.clone();
            self.hierarchy.configure(ROOT_NAME, move |state| {
                state.sinks = replacement;
            });
        }

        let propagate = config.logger_propagate;
        let channel = self.hierarchy.configure(&config.logger_name, move |state| {
            state.sinks.extend(sinks);
            state.threshold = level;
            state.propagate = propagate;
        });
        Log::attach(&self.hierarchy, channel, level)
    }

    /// Attach `sinks` to the `<logger>.<tracer>` channel and return its [`Trace`].
    ///
    /// Level-less `stdout` sinks take the tracer level; any other sink
    /// without a level takes the logger level.
    pub fn create_global_trace(&self, sinks: Vec<Sink>) -> Trace {
        register_trace_level();

        let config = self.config();
        let level = config.tracer_level;
        let name = format!("{}.{}", config.logger_name, config.tracer_name);

        let formatter = Formatter::new(
            &config.tracer_format,
            config.tracer_style,
            Some(&config.tracer_datefmt),
        );
        let sinks: Vec<Arc<Sink>> = sinks
            .into_iter()
            .map(|sink| Arc::new(sink.configure(&formatter, level, config.logger_level)))
            .collect();

        let propagate = config.tracer_propagate;
        let channel = self.hierarchy.configure(&name, move |state| {
            state.sinks.extend(sinks);
            state.threshold = level;
            state.propagate = propagate;
        });
        Trace::from_log(Log::attach(&self.hierarchy, channel, level))
    }

    /// Set up both hierarchies at once.
    ///
    /// `config` is merged first. Missing log sinks default to stdout at the
    /// logger level plus stderr at `ERROR`; missing trace sinks default to
    /// stdout at the tracer level.
    pub fn create_global(
        &self,
        log_sinks: Option<Vec<Sink>>,
        trace_sinks: Option<Vec<Sink>>,
        config: Option<&dyn ConfigSource>,
    ) -> (Log, Trace) {
        if let Some(source) = config {
            self.update_global_config(source);
        }
        let log_sinks = log_sinks.unwrap_or_else(|| vec![Sink::stdout(), Sink::stderr()]);
        let trace_sinks = trace_sinks.unwrap_or_else(|| vec![Sink::stdout()]);
        (
            self.create_global_log(log_sinks),
            self.create_global_trace(trace_sinks),
        )
    }

    /// Log on `<logger>.<namespace>`, at the logger level unless given
    pub fn create_log(&self, namespace: &str, level: Option<Level>) -> Log {
        let config = self.config.read();
        let name = format!("{}.{}", config.logger_name, namespace);
        let level = level.unwrap_or(config.logger_level);
        drop(config);
        Log::bind(&self.hierarchy, &name, level)
    }

    /// Trace on `<logger>.<tracer>.<namespace>`, at the tracer level unless given
    pub fn create_trace(&self, namespace: &str, level: Option<Level>) -> Trace {
        let config = self.config.read();
        let name = format!(
            "{}.{}.{}",
            config.logger_name, config.tracer_name, namespace
        );
        let level = level.unwrap_or(config.tracer_level);
        drop(config);
        Trace::bind(&self.hierarchy, &name, level)
    }

    /// Flush every sink in the tree
    pub fn flush(&self) -> Result<()> {
        self.hierarchy.root().flush()?;
        for name in self.hierarchy.names() {
            if let Some(channel) = self.hierarchy.get(&name) {
                channel.flush()?;
            }
        }
        Ok(())
    }
}

impl Default for Observer {
    fn default() -> Self {
        Self::new()
    }
}

/// [`Observer::update_global_config`] on the global observer
pub fn update_global_config<S: ConfigSource + ?Sized>(source: &S) {
    Observer::global().update_global_config(source);
}

/// [`Observer::update_global_config_with_file`] on the global observer
pub fn update_global_config_with_file(path: impl AsRef<Path>) -> Result<()> {
    Observer::global().update_global_config_with_file(path)
}

/// [`Observer::export_global_config_to_file`] on the global observer
pub fn export_global_config_to_file(path: impl AsRef<Path>) -> Result<()> {
    Observer::global().export_global_config_to_file(path)
}

/// Snapshot of the global observer's configuration
pub fn global_config() -> GlobalConfig {
    Observer::global().config()
}

pub fn create_global_log(sinks: Vec<Sink>) -> Log {
    Observer::global().create_global_log(sinks)
}

pub fn create_global_trace(sinks: Vec<Sink>) -> Trace {
    Observer::global().create_global_trace(sinks)
}

pub fn create_global(
    log_sinks: Option<Vec<Sink>>,
    trace_sinks: Option<Vec<Sink>>,
    config: Option<&dyn ConfigSource>,
) -> (Log, Trace) {
    Observer::global().create_global(log_sinks, trace_sinks, config)
}

pub fn create_log(namespace: &str, level: Option<Level>) -> Log {
    Observer::global().create_log(namespace, level)
}

pub fn create_trace(namespace: &str, level: Option<Level>) -> Trace {
    Observer::global().create_trace(namespace, level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{destination::Destination, emitter::Emit, record::Record};
    use parking_lot::Mutex;
    use serde_json::json;

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

    fn quiet_observer() -> Observer {
        let mut config = GlobalConfig::default();
        config.logger_capture_warnings = false;
        config.logger_format = "{levelname} {name} {message}".to_string();
        config.tracer_format = "{levelname} {name} {message}".to_string();
        Observer::with_config(config)
    }

    fn captured() -> (Sink, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        (Sink::new(Captured(Arc::clone(&lines))), lines)
    }

    #[test]
    fn test_global_log_configures_channel() {
        let observer = quiet_observer();
        let (sink, lines) = captured();
        let log = observer.create_global_log(vec![sink]);

        assert_eq!(log.name(), "global");
        assert_eq!(log.level(), Level::DEBUG);
        assert!(!log.channel().propagate());
        assert_eq!(observer.hierarchy().root().threshold(), Level::DEBUG);

        log.debug("ready");
        assert_eq!(*lines.lock(), vec!["DEBUG global ready".to_string()]);
    }

    #[test]
    fn test_sink_defaults_to_group_level() {
        let observer = quiet_observer();
        observer.update_global_config(&json!({ "GLOBAL_LOGGER_LEVEL": "INFO" }));
        let (sink, lines) = captured();
        let log = observer.create_global_log(vec![sink]);

        log.channel().set_threshold(Level::DEBUG);
        log.debug("filtered by the sink");
        log.info("kept");
        assert_eq!(*lines.lock(), vec!["INFO global kept".to_string()]);
    }

    #[test]
    fn test_namespaced_log_reaches_global_sinks() {
        let observer = quiet_observer();
        let (sink, lines) = captured();
        observer.create_global_log(vec![sink]);

        let db = observer.create_log("db", None);
        assert_eq!(db.name(), "global.db");
        db.info("connected");
        assert_eq!(*lines.lock(), vec!["INFO global.db connected".to_string()]);
    }

    #[test]
    fn test_trace_hierarchy_is_separate() {
        let observer = quiet_observer();
        let (log_sink, log_lines) = captured();
        let (trace_sink, trace_lines) = captured();
        let (_, trace) = observer.create_global(Some(vec![log_sink]), Some(vec![trace_sink]), None);

        assert_eq!(trace.name(), "global.events");
        let job = observer.create_trace("job", None);
        job.trace("step");
        observer.create_log("app", None).info("hello");

        assert_eq!(*trace_lines.lock(), vec!["TRACE global.events.job step".to_string()]);
        assert_eq!(*log_lines.lock(), vec!["INFO global.app hello".to_string()]);
    }

    #[test]
    fn test_force_as_root_replaces_root_sinks() {
        let observer = quiet_observer();
        let (old, old_lines) = captured();
        let old = Arc::new(old);
        observer
            .hierarchy()
            .configure(ROOT_NAME, |state| state.sinks.push(old));

        observer.update_global_config(&json!({ "GLOBAL_LOGGER_FORCE_AS_ROOT": true }));
        let (sink, lines) = captured();
        observer.create_global_log(vec![sink]);

        assert_eq!(observer.hierarchy().root().sink_count(), 1);
        let other = observer.hierarchy().channel("thirdparty");
        let record = Record::new(Level::WARN, "thirdparty", "hi");
        observer.hierarchy().dispatch(&other, &record);
        assert!(old_lines.lock().is_empty());
        assert_eq!(lines.lock().len(), 1);
    }

    #[test]
    fn test_create_global_merges_config_first() {
        let observer = quiet_observer();
        let source = json!({ "GLOBAL_LOGGER_NAME": "svc", "GLOBAL_TRACER_NAME": "spans" });
        let (log, trace) = observer.create_global(Some(vec![]), Some(vec![]), Some(&source));
        assert_eq!(log.name(), "svc");
        assert_eq!(trace.name(), "svc.spans");
        assert_eq!(observer.create_trace("x", None).name(), "svc.spans.x");
    }

    #[test]
    fn test_create_log_explicit_level() {
        let observer = quiet_observer();
        let log = observer.create_log("quiet", Some(Level::ERROR));
        assert_eq!(log.level(), Level::ERROR);
        assert_eq!(log.channel().threshold(), Level::ERROR);
        assert_eq!(observer.create_trace("t", None).level(), Level::TRACE);
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let observer = quiet_observer();
        observer.update_global_config(&json!({ "GLOBAL_TRACER_LEVEL": 10 }));
        observer.export_global_config_to_file(&path).unwrap();

        let other = Observer::new();
        other.update_global_config_with_file(&path).unwrap();
        assert_eq!(other.config().tracer_level, Level::DEBUG);
        assert!(!other.config().logger_capture_warnings);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let observer = Observer::new();
        assert!(observer
            .update_global_config_with_file("/definitely/not/here.json")
            .is_err());
    }
}
