//! Process-wide default configuration and its whitelist merge
//!
//! [`GlobalConfig`] has two disjoint groups of fields, one for the logger
//! hierarchy and one for the tracer hierarchy. It only changes through
//! [`GlobalConfig::merge`], which copies exactly the fields a
//! [`ConfigSource`] provides. The set of mergeable fields is the set of
//! getters on that trait, so nothing else can be injected.
//!
//! Dynamic sources (JSON objects, the environment) implement
//! [`AttributeSource`] and are looked up by the field keys in [`keys`].

use super::error::Result;
use super::level::Level;
use super::template::{DateFormat, Format, Style};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Attribute names of every mergeable field
pub mod keys {
    pub const GLOBAL_LOGGER_NAME: &str = "GLOBAL_LOGGER_NAME";
    pub const GLOBAL_LOGGER_LEVEL: &str = "GLOBAL_LOGGER_LEVEL";
    pub const GLOBAL_LOGGER_STYLE: &str = "GLOBAL_LOGGER_STYLE";
    pub const GLOBAL_LOGGER_FORMAT: &str = "GLOBAL_LOGGER_FORMAT";
    pub const GLOBAL_LOGGER_DATEFMT: &str = "GLOBAL_LOGGER_DATEFMT";
    pub const GLOBAL_LOGGER_PROPAGATE: &str = "GLOBAL_LOGGER_PROPAGATE";
    pub const GLOBAL_LOGGER_FORCE_AS_ROOT: &str = "GLOBAL_LOGGER_FORCE_AS_ROOT";
    pub const GLOBAL_LOGGER_CAPTURE_WARNINGS: &str = "GLOBAL_LOGGER_CAPTURE_WARNINGS";
    pub const GLOBAL_TRACER_NAME: &str = "GLOBAL_TRACER_NAME";
    pub const GLOBAL_TRACER_LEVEL: &str = "GLOBAL_TRACER_LEVEL";
    pub const GLOBAL_TRACER_STYLE: &str = "GLOBAL_TRACER_STYLE";
    pub const GLOBAL_TRACER_FORMAT: &str = "GLOBAL_TRACER_FORMAT";
    pub const GLOBAL_TRACER_DATEFMT: &str = "GLOBAL_TRACER_DATEFMT";
    pub const GLOBAL_TRACER_PROPAGATE: &str = "GLOBAL_TRACER_PROPAGATE";

    /// Historical spellings still accepted by attribute sources
    pub const GLOBAL_LOGGER_PROPOGATE: &str = "GLOBAL_LOGGER_PROPOGATE";
    pub const GLOBAL_TRACER_PROPOGATE: &str = "GLOBAL_TRACER_PROPOGATE";

    /// All canonical keys, logger group first
    pub const ALL: [&str; 14] = [
        GLOBAL_LOGGER_NAME,
        GLOBAL_LOGGER_LEVEL,
        GLOBAL_LOGGER_STYLE,
        GLOBAL_LOGGER_FORMAT,
        GLOBAL_LOGGER_DATEFMT,
        GLOBAL_LOGGER_PROPAGATE,
        GLOBAL_LOGGER_FORCE_AS_ROOT,
        GLOBAL_LOGGER_CAPTURE_WARNINGS,
        GLOBAL_TRACER_NAME,
        GLOBAL_TRACER_LEVEL,
        GLOBAL_TRACER_STYLE,
        GLOBAL_TRACER_FORMAT,
        GLOBAL_TRACER_DATEFMT,
        GLOBAL_TRACER_PROPAGATE,
    ];
}

/// Default settings every factory reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    #[serde(rename = "GLOBAL_LOGGER_NAME")]
    pub logger_name: String,
    #[serde(rename = "GLOBAL_LOGGER_LEVEL")]
    pub logger_level: Level,
    #[serde(rename = "GLOBAL_LOGGER_STYLE")]
    pub logger_style: Style,
    #[serde(rename = "GLOBAL_LOGGER_FORMAT")]
    pub logger_format: String,
    #[serde(rename = "GLOBAL_LOGGER_DATEFMT")]
    pub logger_datefmt: String,
    #[serde(rename = "GLOBAL_LOGGER_PROPAGATE", alias = "GLOBAL_LOGGER_PROPOGATE")]
    pub logger_propagate: bool,
    #[serde(rename = "GLOBAL_LOGGER_FORCE_AS_ROOT")]
    pub logger_force_as_root: bool,
    #[serde(rename = "GLOBAL_LOGGER_CAPTURE_WARNINGS")]
    pub logger_capture_warnings: bool,

    #[serde(rename = "GLOBAL_TRACER_NAME")]
    pub tracer_name: String,
    #[serde(rename = "GLOBAL_TRACER_LEVEL")]
    pub tracer_level: Level,
    #[serde(rename = "GLOBAL_TRACER_STYLE")]
    pub tracer_style: Style,
    #[serde(rename = "GLOBAL_TRACER_FORMAT")]
    pub tracer_format: String,
    #[serde(rename = "GLOBAL_TRACER_DATEFMT")]
    pub tracer_datefmt: String,
    #[serde(rename = "GLOBAL_TRACER_PROPAGATE", alias = "GLOBAL_TRACER_PROPOGATE")]
    pub tracer_propagate: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            logger_name: "global".to_string(),
            logger_level: Level::DEBUG,
            logger_style: Style::Brace,
            logger_format: Format::CUSTOM.to_string(),
            logger_datefmt: DateFormat::RFC_2822.to_string(),
            logger_propagate: false,
            logger_force_as_root: false,
            logger_capture_warnings: true,
            tracer_name: "events".to_string(),
            tracer_level: Level::TRACE,
            tracer_style: Style::Brace,
            tracer_format: Format::CUSTOM_TRACING.to_string(),
            tracer_datefmt: DateFormat::RFC_2822.to_string(),
            tracer_propagate: false,
        }
    }
}

impl GlobalConfig {
    /// Copy every field `source` provides; leave the rest untouched
    pub fn merge<S: ConfigSource + ?Sized>(&mut self, source: &S) {
        macro_rules! take {
            ($($field:ident),+ $(,)?) => {
                $(if let Some(value) = source.$field() {
                    self.$field = value;
                })+
            };
        }
        take!(
            logger_name,
            logger_level,
            logger_style,
            logger_format,
            logger_datefmt,
            logger_propagate,
            logger_force_as_root,
            logger_capture_warnings,
            tracer_name,
            tracer_level,
            tracer_style,
            tracer_format,
            tracer_datefmt,
            tracer_propagate,
        );
    }

    /// Read a JSON object from `path`
    pub fn load_attributes(path: impl AsRef<Path>) -> Result<serde_json::Map<String, serde_json::Value>> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            super::error::ObserveError::io_operation(
                "reading configuration",
                format!("cannot read '{}'", path.as_ref().display()),
                e,
            )
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write this configuration to `path` as a JSON object keyed by field name
    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content).map_err(|e| {
            super::error::ObserveError::io_operation(
                "exporting configuration",
                format!("cannot write '{}'", path.as_ref().display()),
                e,
            )
        })
    }
}

/// The getters a configuration merge reads; `None` leaves a field alone
pub trait ConfigSource {
    fn logger_name(&self) -> Option<String> {
        None
    }
    fn logger_level(&self) -> Option<Level> {
        None
    }
    fn logger_style(&self) -> Option<Style> {
        None
    }
    fn logger_format(&self) -> Option<String> {
        None
    }
    fn logger_datefmt(&self) -> Option<String> {
        None
    }
    fn logger_propagate(&self) -> Option<bool> {
        None
    }
    fn logger_force_as_root(&self) -> Option<bool> {
        None
    }
    fn logger_capture_warnings(&self) -> Option<bool> {
        None
    }
    fn tracer_name(&self) -> Option<String> {
        None
    }
    fn tracer_level(&self) -> Option<Level> {
        None
    }
    fn tracer_style(&self) -> Option<Style> {
        None
    }
    fn tracer_format(&self) -> Option<String> {
        None
    }
    fn tracer_datefmt(&self) -> Option<String> {
        None
    }
    fn tracer_propagate(&self) -> Option<bool> {
        None
    }
}

impl ConfigSource for GlobalConfig {
    fn logger_name(&self) -> Option<String> {
        Some(self.logger_name.clone())
    }
    fn logger_level(&self) -> Option<Level> {
        Some(self.logger_level)
    }
    fn logger_style(&self) -> Option<Style> {
        Some(self.logger_style)
    }
    fn logger_format(&self) -> Option<String> {
        Some(self.logger_format.clone())
    }
    fn logger_datefmt(&self) -> Option<String> {
        Some(self.logger_datefmt.clone())
    }
    fn logger_propagate(&self) -> Option<bool> {
        Some(self.logger_propagate)
    }
    fn logger_force_as_root(&self) -> Option<bool> {
        Some(self.logger_force_as_root)
    }
    fn logger_capture_warnings(&self) -> Option<bool> {
        Some(self.logger_capture_warnings)
    }
    fn tracer_name(&self) -> Option<String> {
        Some(self.tracer_name.clone())
    }
    fn tracer_level(&self) -> Option<Level> {
        Some(self.tracer_level)
    }
    fn tracer_style(&self) -> Option<Style> {
        Some(self.tracer_style)
    }
    fn tracer_format(&self) -> Option<String> {
        Some(self.tracer_format.clone())
    }
    fn tracer_datefmt(&self) -> Option<String> {
        Some(self.tracer_datefmt.clone())
    }
    fn tracer_propagate(&self) -> Option<bool> {
        Some(self.tracer_propagate)
    }
}

/// A bag of named attributes, such as a JSON object.
///
/// Every key in [`keys`] is looked up; any other attribute is ignored, and
/// so is a known attribute whose value does not fit the field's type.
pub trait AttributeSource {
    fn attribute(&self, key: &str) -> Option<serde_json::Value>;

    fn typed<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attribute(key)
            .and_then(|value| serde_json::from_value(value).ok())
    }
}

impl<A: AttributeSource + ?Sized> ConfigSource for A {
    fn logger_name(&self) -> Option<String> {
        self.typed(keys::GLOBAL_LOGGER_NAME)
    }
    fn logger_level(&self) -> Option<Level> {
        self.typed(keys::GLOBAL_LOGGER_LEVEL)
    }
    fn logger_style(&self) -> Option<Style> {
        self.typed(keys::GLOBAL_LOGGER_STYLE)
    }
    fn logger_format(&self) -> Option<String> {
        self.typed(keys::GLOBAL_LOGGER_FORMAT)
    }
    fn logger_datefmt(&self) -> Option<String> {
        self.typed(keys::GLOBAL_LOGGER_DATEFMT)
    }
    fn logger_propagate(&self) -> Option<bool> {
        self.typed(keys::GLOBAL_LOGGER_PROPAGATE)
            .or_else(|| self.typed(keys::GLOBAL_LOGGER_PROPOGATE))
    }
    fn logger_force_as_root(&self) -> Option<bool> {
        self.typed(keys::GLOBAL_LOGGER_FORCE_AS_ROOT)
    }
    fn logger_capture_warnings(&self) -> Option<bool> {
        self.typed(keys::GLOBAL_LOGGER_CAPTURE_WARNINGS)
    }
    fn tracer_name(&self) -> Option<String> {
        self.typed(keys::GLOBAL_TRACER_NAME)
    }
    fn tracer_level(&self) -> Option<Level> {
        self.typed(keys::GLOBAL_TRACER_LEVEL)
    }
    fn tracer_style(&self) -> Option<Style> {
        self.typed(keys::GLOBAL_TRACER_STYLE)
    }
    fn tracer_format(&self) -> Option<String> {
        self.typed(keys::GLOBAL_TRACER_FORMAT)
    }
    fn tracer_datefmt(&self) -> Option<String> {
        self.typed(keys::GLOBAL_TRACER_DATEFMT)
    }
    fn tracer_propagate(&self) -> Option<bool> {
        self.typed(keys::GLOBAL_TRACER_PROPAGATE)
            .or_else(|| self.typed(keys::GLOBAL_TRACER_PROPOGATE))
    }
}

impl AttributeSource for serde_json::Map<String, serde_json::Value> {
    fn attribute(&self, key: &str) -> Option<serde_json::Value> {
        self.get(key).cloned()
    }
}

impl AttributeSource for serde_json::Value {
    fn attribute(&self, key: &str) -> Option<serde_json::Value> {
        self.as_object().and_then(|object| object.get(key).cloned())
    }
}

impl AttributeSource for HashMap<String, serde_json::Value> {
    fn attribute(&self, key: &str) -> Option<serde_json::Value> {
        self.get(key).cloned()
    }
}

/// Reads the field keys from environment variables, optionally prefixed.
///
/// A value is taken as a JSON literal when it parses as one (`true`, `10`),
/// otherwise as a plain string (`DEBUG`, `{`).
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSource {
    prefix: String,
}

impl EnvironmentSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `<prefix><KEY>` instead of `<KEY>`
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl AttributeSource for EnvironmentSource {
    fn attribute(&self, key: &str) -> Option<serde_json::Value> {
        let raw = std::env::var(format!("{}{}", self.prefix, key)).ok()?;
        Some(serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw)))
    }
}
