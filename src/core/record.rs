//! Emitted record structure

use super::level::Level;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cell::RefCell;
use std::sync::OnceLock;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Numeric part of the current `ThreadId`, cached per thread
fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| {
                let id = format!("{:?}", std::thread::current().id());
                id.trim_start_matches("ThreadId(")
                    .trim_end_matches(')')
                    .to_string()
            })
            .clone()
    })
}

/// Thread name, falling back to `Thread-<id>` for unnamed threads
fn get_thread_name() -> String {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| match std::thread::current().name() {
                Some(name) => name.to_string(),
                None => format!("Thread-{}", get_thread_id()),
            })
            .clone()
    })
}

/// Executable name of the current process
fn get_process_name() -> &'static str {
    static PROCESS_NAME: OnceLock<String> = OnceLock::new();
    PROCESS_NAME.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "MainProcess".to_string())
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub level: Level,
    pub message: String,
    /// Dotted name of the channel the record was emitted on
    pub channel: String,
    pub timestamp: DateTime<Utc>,
    pub process_id: u32,
    pub process_name: String,
    pub thread_id: String,
    pub thread_name: String,
}

impl Record {
    /// Sanitize message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so one record always occupies one line.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: Level, channel: impl Into<String>, message: &str) -> Self {
        Self {
            level,
            message: Self::sanitize_message(message),
            channel: channel.into(),
            timestamp: Utc::now(),
            process_id: std::process::id(),
            process_name: get_process_name().to_string(),
            thread_id: get_thread_id(),
            thread_name: get_thread_name(),
        }
    }
}
