//! Bridge from the `log` facade into a channel tree
//!
//! Libraries report problems through the `log` crate. While capture is on,
//! their `warn!`/`error!` records are re-emitted on the [`WARNINGS_CHANNEL`]
//! channel as `<target>: <message>`. The facade logger can only be set once
//! per process, so the bridge is installed on first use and then only
//! retargeted or muted.

use super::{channel::Hierarchy, level::Level, record::Record};
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

/// Channel receiving captured facade records
pub const WARNINGS_CHANNEL: &str = "warnings";

static TARGET: RwLock<Option<Arc<Hierarchy>>> = parking_lot::const_rwlock(None);

static BRIDGE: WarningBridge = WarningBridge;

struct WarningBridge;

fn level_for(level: log::Level) -> Option<Level> {
    match level {
        log::Level::Error => Some(Level::ERROR),
        log::Level::Warn => Some(Level::WARN),
        _ => None,
    }
}

impl log::Log for WarningBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        level_for(metadata.level()).is_some() && TARGET.read().is_some()
    }

    fn log(&self, record: &log::Record<'_>) {
        let Some(level) = level_for(record.level()) else {
            return;
        };
        let Some(hierarchy) = TARGET.read().clone() else {
            return;
        };

        let channel = hierarchy.channel(WARNINGS_CHANNEL);
        if level < hierarchy.effective_threshold(&channel) {
            return;
        }
        let message = format!("{}: {}", record.target(), record.args());
        let record = Record::new(level, WARNINGS_CHANNEL, &message);
        for e in hierarchy.dispatch(&channel, &record) {
            eprintln!("[OBSERVE ERROR] {} failed to emit: {}", WARNINGS_CHANNEL, e);
        }
    }

    fn flush(&self) {}
}

/// Install the facade logger once; `false` if another one got there first
fn install() -> bool {
    static INSTALLED: OnceLock<bool> = OnceLock::new();
    *INSTALLED.get_or_init(|| match log::set_logger(&BRIDGE) {
        Ok(()) => {
            log::set_max_level(log::LevelFilter::Warn);
            true
        }
        Err(_) => {
            eprintln!("[OBSERVE WARNING] a log facade logger is already installed; warnings are not captured");
            false
        }
    })
}

/// Route facade warnings into `hierarchy`, or stop routing them.
///
/// Turning capture off only detaches `hierarchy` if it is the current
/// target, so one observer cannot mute another.
pub(crate) fn set_capture(enabled: bool, hierarchy: &Arc<Hierarchy>) {
    let mut target = TARGET.write();
    if enabled {
        if install() {
            *target = Some(Arc::clone(hierarchy));
        }
    } else if target
        .as_ref()
        .is_some_and(|current| Arc::ptr_eq(current, hierarchy))
    {
        *target = None;
    }
}

/// Whether facade warnings are currently being captured
#[must_use]
pub fn capturing() -> bool {
    TARGET.read().is_some()
}
