//! Severity levels and the process-wide level name table

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Numeric level of the custom tracing tier.
pub const TRACE_LEVEL: u32 = 25;

/// Name registered for [`TRACE_LEVEL`].
pub const TRACE_NAME: &str = "TRACE";

/// Severity of a record or threshold of a channel/sink.
///
/// Levels are plain integers ordered numerically, so custom tiers can sit
/// between the standard ones. `TRACE` (25) lies strictly between `INFO`
/// and `WARN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(try_from = "LevelRepr", into = "u32")]
pub struct Level(u32);

impl Level {
    pub const NOTSET: Level = Level(0);
    pub const DEBUG: Level = Level(10);
    pub const INFO: Level = Level(20);
    pub const TRACE: Level = Level(TRACE_LEVEL);
    pub const WARN: Level = Level(30);
    pub const ERROR: Level = Level(40);
    pub const CRITICAL: Level = Level(50);

    #[must_use]
    pub const fn new(value: u32) -> Self {
        Level(value)
    }

    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Name from the level table, or `Level <n>` when none is registered.
    pub fn name(&self) -> String {
        names()
            .read()
            .get(&self.0)
            .cloned()
            .unwrap_or_else(|| format!("Level {}", self.0))
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self.0 {
            0..=10 => Blue,
            11..=20 => Green,
            21..=29 => BrightBlack,
            30..=39 => Yellow,
            40..=49 => Red,
            _ => BrightRed,
        }
    }
}

impl From<u32> for Level {
    fn from(value: u32) -> Self {
        Level(value)
    }
}

impl From<Level> for u32 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<u32>() {
            return Ok(Level(value));
        }
        match s.to_uppercase().as_str() {
            "NOTSET" => Ok(Level::NOTSET),
            "DEBUG" => Ok(Level::DEBUG),
            "INFO" => Ok(Level::INFO),
            "TRACE" => Ok(Level::TRACE),
            "WARN" | "WARNING" => Ok(Level::WARN),
            "ERROR" => Ok(Level::ERROR),
            "CRITICAL" | "FATAL" => Ok(Level::CRITICAL),
            other => names()
                .read()
                .iter()
                .find(|(_, name)| name.as_str() == other)
                .map(|(value, _)| Level(*value))
                .ok_or_else(|| format!("Invalid level: '{}'", s)),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Value(u32),
    Name(String),
}

impl TryFrom<LevelRepr> for Level {
    type Error = String;

    fn try_from(repr: LevelRepr) -> Result<Self, Self::Error> {
        match repr {
            LevelRepr::Value(value) => Ok(Level(value)),
            LevelRepr::Name(name) => name.parse(),
        }
    }
}

fn names() -> &'static RwLock<BTreeMap<u32, String>> {
    static NAMES: OnceLock<RwLock<BTreeMap<u32, String>>> = OnceLock::new();
    NAMES.get_or_init(|| {
        let table = [
            (Level::NOTSET, "NOTSET"),
            (Level::DEBUG, "DEBUG"),
            (Level::INFO, "INFO"),
            (Level::WARN, "WARNING"),
            (Level::ERROR, "ERROR"),
            (Level::CRITICAL, "CRITICAL"),
        ]
        .into_iter()
        .map(|(level, name)| (level.0, name.to_string()))
        .collect();
        RwLock::new(table)
    })
}

/// Register a display name for `level`.
///
/// Returns `false` without touching the table when `level` already carries
/// exactly this name.
pub fn register_level_name(level: Level, name: &str) -> bool {
    if names().read().get(&level.0).map(String::as_str) == Some(name) {
        return false;
    }
    names().write().insert(level.0, name.to_string());
    true
}

/// Register the `TRACE` name once per process.
pub fn register_trace_level() {
    static REGISTERED: OnceLock<()> = OnceLock::new();
    REGISTERED.get_or_init(|| {
        register_level_name(Level::TRACE, TRACE_NAME);
    });
}
