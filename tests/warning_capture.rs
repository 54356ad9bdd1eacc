//! Facade capture owns process-wide state, so it gets its own test binary.

use observe::prelude::*;
use observe::{Destination, Record};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

struct Captured(Arc<Mutex<Vec<String>>>);

impl Destination for Captured {
    fn write(&mut self, record: &Record, _line: &str) -> observe::Result<()> {
        self.0
            .lock()
            .push(format!("{} {} {}", record.channel, record.level, record.message));
        Ok(())
    }

    fn flush(&mut self) -> observe::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "captured"
    }
}

#[test]
fn test_facade_warnings_follow_capture_flag() {
    let observer = Observer::new();
    observer.update_global_config(&json!({ "GLOBAL_LOGGER_FORCE_AS_ROOT": true }));
    let lines = Arc::new(Mutex::new(Vec::new()));
    observer.create_global_log(vec![Sink::new(Captured(Arc::clone(&lines)))]);
    assert!(observe::capturing());

    log::warn!(target: "dependency", "deprecated call");
    log::error!(target: "dependency", "it broke");
    log::info!(target: "dependency", "not captured");

    observer.update_global_config(&json!({ "GLOBAL_LOGGER_CAPTURE_WARNINGS": false }));
    observer.create_global_log(vec![]);
    assert!(!observe::capturing());
    log::warn!(target: "dependency", "after capture stopped");

    assert_eq!(
        *lines.lock(),
        vec![
            "warnings WARNING dependency: deprecated call".to_string(),
            "warnings ERROR dependency: it broke".to_string(),
        ]
    );
}
