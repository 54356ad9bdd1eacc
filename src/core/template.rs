//! Textual record templates
//!
//! A template is written in one of three placeholder styles, chosen by a
//! single delimiter token:
//! - `{`: `{levelname}`, `{levelname:<8}`, literal braces as `{{`/`}}`
//! - `%`: `%(levelname)s`, `%(levelname)-8s`, literal percent as `%%`
//! - `$`: `$levelname`, `${levelname}`, literal dollar as `$$`
//!
//! Supported placeholders: `name`, `levelname`, `levelno`, `message`,
//! `asctime`, `created`, `msecs`, `process`, `processName`, `thread`,
//! `threadName`. Unknown placeholders are kept verbatim in the output.

use super::record::Record;
use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Date template used when a formatter has none
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Preset record templates (brace style)
pub struct Format;

impl Format {
    pub const STANDARD: &'static str = "{levelname}:{asctime}:{name}:{message}";
    pub const SENSIBLE: &'static str = "{levelname} : {asctime} : {name} : {message}";
    pub const CUSTOM: &'static str = "{asctime} :: {levelname} :: {name} :: {message}";
    pub const CUSTOM_TRACING: &'static str =
        "{asctime} :: {levelname} :: {name} {processName} {threadName} :: {message}";
}

/// Preset strftime date templates
pub struct DateFormat;

impl DateFormat {
    pub const CUSTOM: &'static str = "%a, %d %b %Y at %I:%M%p %Ss %z";
    pub const RFC_2822: &'static str = "%a, %d %b %Y %T %z";
    pub const ISO_8601: &'static str = "%Y-%m-%dT%H:%M:%S";
    pub const ISO_8601_TZ: &'static str = "%Y-%m-%dT%H:%M:%S%z";
}

/// Placeholder delimiter style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Style {
    #[default]
    #[serde(rename = "{")]
    Brace,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "$")]
    Dollar,
}

impl Style {
    #[must_use]
    pub fn token(&self) -> char {
        match self {
            Style::Brace => '{',
            Style::Percent => '%',
            Style::Dollar => '$',
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "{" => Ok(Style::Brace),
            "%" => Ok(Style::Percent),
            "$" => Ok(Style::Dollar),
            _ => Err(format!("Invalid style token: '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    LevelName,
    LevelNo,
    Message,
    AscTime,
    Created,
    Msecs,
    Process,
    ProcessName,
    Thread,
    ThreadName,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "name" => Field::Name,
            "levelname" => Field::LevelName,
            "levelno" => Field::LevelNo,
            "message" => Field::Message,
            "asctime" => Field::AscTime,
            "created" => Field::Created,
            "msecs" => Field::Msecs,
            "process" => Field::Process,
            "processName" => Field::ProcessName,
            "thread" => Field::Thread,
            "threadName" => Field::ThreadName,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pad {
    align: Align,
    width: usize,
}

impl Pad {
    fn apply(&self, value: &str) -> String {
        let width = self.width;
        match self.align {
            Align::Left => format!("{:<width$}", value),
            Align::Right => format!("{:>width$}", value),
            Align::Center => format!("{:^width$}", value),
        }
    }

    /// Brace format spec: `[<>^]?width[s]?`
    fn from_brace_spec(spec: &str) -> Option<Option<Pad>> {
        let spec = spec.strip_suffix('s').unwrap_or(spec);
        if spec.is_empty() {
            return Some(None);
        }
        let (align, digits) = match spec.chars().next() {
            Some('<') => (Align::Left, &spec[1..]),
            Some('>') => (Align::Right, &spec[1..]),
            Some('^') => (Align::Center, &spec[1..]),
            _ => (Align::Left, spec),
        };
        let width = digits.parse().ok()?;
        Some(Some(Pad { align, width }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field { field: Field, pad: Option<Pad> },
}

/// Parsed record template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    style: Style,
    segments: Vec<Segment>,
}

impl Template {
    #[must_use]
    pub fn parse(source: &str, style: Style) -> Self {
        let mut builder = SegmentBuilder::default();
        match style {
            Style::Brace => parse_brace(source, &mut builder),
            Style::Percent => parse_percent(source, &mut builder),
            Style::Dollar => parse_dollar(source, &mut builder),
        }
        Self {
            style,
            segments: builder.finish(),
        }
    }

    #[must_use]
    pub fn style(&self) -> Style {
        self.style
    }

    /// Whether rendering needs a formatted timestamp
    #[must_use]
    pub fn uses_time(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Field { field: Field::AscTime, .. }))
    }

    fn render(&self, record: &Record, asctime: &str) -> String {
        let mut out = String::with_capacity(64 + record.message.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { field, pad } => {
                    let value = field_value(*field, record, asctime);
                    match pad {
                        Some(pad) => out.push_str(&pad.apply(&value)),
                        None => out.push_str(&value),
                    }
                }
            }
        }
        out
    }
}

fn field_value(field: Field, record: &Record, asctime: &str) -> String {
    match field {
        Field::Name => record.channel.clone(),
        Field::LevelName => record.level.name(),
        Field::LevelNo => record.level.value().to_string(),
        Field::Message => record.message.clone(),
        Field::AscTime => asctime.to_string(),
        Field::Created => format!("{:.6}", record.timestamp.timestamp_micros() as f64 / 1e6),
        Field::Msecs => record.timestamp.timestamp_subsec_millis().to_string(),
        Field::Process => record.process_id.to_string(),
        Field::ProcessName => record.process_name.clone(),
        Field::Thread => record.thread_id.clone(),
        Field::ThreadName => record.thread_name.clone(),
    }
}

#[derive(Default)]
struct SegmentBuilder {
    segments: Vec<Segment>,
    literal: String,
}

impl SegmentBuilder {
    fn push_char(&mut self, c: char) {
        self.literal.push(c);
    }

    fn push_str(&mut self, s: &str) {
        self.literal.push_str(s);
    }

    /// Known names become fields; unknown placeholders stay as raw text
    fn push_field(&mut self, name: &str, pad: Option<Pad>, raw: &str) {
        match Field::from_name(name) {
            Some(field) => {
                if !self.literal.is_empty() {
                    self.segments
                        .push(Segment::Literal(std::mem::take(&mut self.literal)));
                }
                self.segments.push(Segment::Field { field, pad });
            }
            None => self.literal.push_str(raw),
        }
    }

    fn finish(mut self) -> Vec<Segment> {
        if !self.literal.is_empty() {
            self.segments.push(Segment::Literal(self.literal));
        }
        self.segments
    }
}

fn parse_brace(source: &str, builder: &mut SegmentBuilder) {
    let mut rest = source;
    while let Some(c) = rest.chars().next() {
        if rest.starts_with("{{") || rest.starts_with("}}") {
            builder.push_char(c);
            rest = &rest[2..];
        } else if c == '{' {
            match rest.find('}') {
                Some(end) => {
                    let raw = &rest[..=end];
                    let body = &rest[1..end];
                    let (name, spec) = body.split_once(':').unwrap_or((body, ""));
                    match Pad::from_brace_spec(spec) {
                        Some(pad) => builder.push_field(name, pad, raw),
                        None => builder.push_str(raw),
                    }
                    rest = &rest[end + 1..];
                }
                None => {
                    builder.push_str(rest);
                    rest = "";
                }
            }
        } else {
            builder.push_char(c);
            rest = &rest[c.len_utf8()..];
        }
    }
}

fn parse_percent(source: &str, builder: &mut SegmentBuilder) {
    let mut rest = source;
    while let Some(c) = rest.chars().next() {
        if rest.starts_with("%%") {
            builder.push_char('%');
            rest = &rest[2..];
        } else if rest.starts_with("%(") {
            let Some(close) = rest.find(')') else {
                builder.push_str(rest);
                break;
            };
            let name = &rest[2..close];
            let after = &rest[close + 1..];
            let left = after.starts_with('-');
            let digits_start = usize::from(left);
            let digits_len = after[digits_start..]
                .chars()
                .take_while(char::is_ascii_digit)
                .count();
            let conversion_at = digits_start + digits_len;
            match after[conversion_at..].chars().next() {
                Some(conversion) if conversion.is_ascii_alphabetic() => {
                    let end = close + 1 + conversion_at + 1;
                    let pad = after[digits_start..conversion_at]
                        .parse()
                        .ok()
                        .map(|width| Pad {
                            align: if left { Align::Left } else { Align::Right },
                            width,
                        });
                    builder.push_field(name, pad, &rest[..end]);
                    rest = &rest[end..];
                }
                _ => {
                    builder.push_str(&rest[..close + 1]);
                    rest = &rest[close + 1..];
                }
            }
        } else {
            builder.push_char(c);
            rest = &rest[c.len_utf8()..];
        }
    }
}

fn parse_dollar(source: &str, builder: &mut SegmentBuilder) {
    let mut rest = source;
    while let Some(c) = rest.chars().next() {
        if rest.starts_with("$$") {
            builder.push_char('$');
            rest = &rest[2..];
        } else if rest.starts_with("${") {
            match rest.find('}') {
                Some(end) => {
                    builder.push_field(&rest[2..end], None, &rest[..=end]);
                    rest = &rest[end + 1..];
                }
                None => {
                    builder.push_str(rest);
                    rest = "";
                }
            }
        } else if c == '$' {
            let ident_len = rest[1..]
                .char_indices()
                .take_while(|(i, ch)| {
                    ch.is_ascii_alphabetic() || *ch == '_' || (*i > 0 && ch.is_ascii_digit())
                })
                .count();
            if ident_len == 0 {
                builder.push_char('$');
                rest = &rest[1..];
            } else {
                let end = 1 + ident_len;
                builder.push_field(&rest[1..end], None, &rest[..end]);
                rest = &rest[end..];
            }
        } else {
            builder.push_char(c);
            rest = &rest[c.len_utf8()..];
        }
    }
}

/// Template plus date template, applied to every record a sink writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    template: Template,
    datefmt: String,
}

impl Formatter {
    /// Build a formatter; a date template chrono cannot parse falls back
    /// to [`DEFAULT_DATE_FORMAT`].
    #[must_use]
    pub fn new(format: &str, style: Style, datefmt: Option<&str>) -> Self {
        let datefmt = match datefmt {
            Some(f) if !StrftimeItems::new(f).any(|item| matches!(item, Item::Error)) => f,
            _ => DEFAULT_DATE_FORMAT,
        };
        Self {
            template: Template::parse(format, style),
            datefmt: datefmt.to_string(),
        }
    }

    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    #[must_use]
    pub fn datefmt(&self) -> &str {
        &self.datefmt
    }

    #[must_use]
    pub fn format(&self, record: &Record) -> String {
        let asctime = if self.template.uses_time() {
            record
                .timestamp
                .with_timezone(&Local)
                .format(&self.datefmt)
                .to_string()
        } else {
            String::new()
        };
        self.template.render(record, &asctime)
    }
}

impl Default for Formatter {
    /// Message text only
    fn default() -> Self {
        Self::new("{message}", Style::Brace, None)
    }
}
