//! Hierarchical channel tree
//!
//! Channels are addressed by dotted names. The parent of `a.b.c` is the
//! nearest existing channel among `a.b`, `a`, falling back to the process
//! root. Parents are resolved at emission time, so a channel created after
//! its descendants is still found by them.

use super::{error::ObserveError, level::Level, record::Record, sink::Sink};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name of the process root channel
pub const ROOT_NAME: &str = "root";

/// Mutable part of a channel, always changed under one write lock
#[derive(Debug)]
pub(crate) struct ChannelState {
    pub(crate) threshold: Level,
    pub(crate) propagate: bool,
    pub(crate) sinks: Vec<Arc<Sink>>,
}

pub struct Channel {
    name: String,
    state: RwLock<ChannelState>,
}

impl Channel {
    fn new(name: &str, threshold: Level) -> Self {
        Self {
            name: name.to_string(),
            state: RwLock::new(ChannelState {
                threshold,
                propagate: true,
                sinks: Vec::new(),
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Own threshold; `NOTSET` defers to the parent
    #[must_use]
    pub fn threshold(&self) -> Level {
        self.state.read().threshold
    }

    #[must_use]
    pub fn propagate(&self) -> bool {
        self.state.read().propagate
    }

    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.state.read().sinks.len()
    }

    /// Apply several changes so other threads see all or none of them
    pub(crate) fn configure<R>(&self, f: impl FnOnce(&mut ChannelState) -> R) -> R {
        let mut state = self.state.write();
        f(&mut state)
    }

    pub(crate) fn set_threshold(&self, level: Level) {
        self.state.write().threshold = level;
    }

    /// Flush every attached sink, stopping at the first failure
    pub fn flush(&self) -> super::Result<()> {
        for sink in self.state.read().sinks.iter() {
            sink.flush()?;
        }
        Ok(())
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("threshold", &state.threshold)
            .field("propagate", &state.propagate)
            .field("sinks", &state.sinks.len())
            .finish()
    }
}

/// The channel tree owned by an [`Observer`](super::Observer)
pub struct Hierarchy {
    root: Arc<Channel>,
    channels: RwLock<HashMap<String, Arc<Channel>>>,
}

impl Hierarchy {
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Arc::new(Channel::new(ROOT_NAME, Level::WARN)),
            channels: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Arc<Channel> {
        &self.root
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Channel>> {
        if name.is_empty() || name == ROOT_NAME {
            return Some(Arc::clone(&self.root));
        }
        self.channels.read().get(name).cloned()
    }

    /// Get or create the channel called `name`
    pub fn channel(&self, name: &str) -> Arc<Channel> {
        self.configure(name, |_| ())
    }

    /// Get or create `name` and apply `f` before any other thread can
    /// observe a freshly created channel.
    pub(crate) fn configure(&self, name: &str, f: impl FnOnce(&mut ChannelState)) -> Arc<Channel> {
        if let Some(channel) = self.get(name) {
            channel.configure(f);
            return channel;
        }
        let mut channels = self.channels.write();
        let channel = Arc::clone(
            channels
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Channel::new(name, Level::NOTSET))),
        );
        // lock order is always map, then channel
        channel.configure(f);
        channel
    }

    /// Nearest existing ancestor; `None` only for the root
    #[must_use]
    pub fn parent(&self, channel: &Channel) -> Option<Arc<Channel>> {
        if channel.name == ROOT_NAME {
            return None;
        }
        let channels = self.channels.read();
        let mut name = channel.name.as_str();
        while let Some((prefix, _)) = name.rsplit_once('.') {
            if let Some(parent) = channels.get(prefix) {
                return Some(Arc::clone(parent));
            }
            name = prefix;
        }
        Some(Arc::clone(&self.root))
    }

    /// First non-`NOTSET` threshold walking up from `channel`
    #[must_use]
    pub fn effective_threshold(&self, channel: &Arc<Channel>) -> Level {
        let mut current = Some(Arc::clone(channel));
        while let Some(node) = current {
            let threshold = node.threshold();
            if threshold != Level::NOTSET {
                return threshold;
            }
            current = self.parent(&node);
        }
        Level::NOTSET
    }

    /// Hand `record` to the sinks of `channel` and, while propagation is
    /// on, of its ancestors. Every sink is attempted; failures are collected.
    ///
    /// A record at `WARN` or above that finds no sink at all is written to
    /// stderr.
    pub(crate) fn dispatch(&self, channel: &Arc<Channel>, record: &Record) -> Vec<ObserveError> {
        let mut errors = Vec::new();
        let mut found = 0usize;
        let mut current = Some(Arc::clone(channel));

        while let Some(node) = current {
            // never hold a channel lock while taking the map lock in parent()
            let propagate = {
                let state = node.state.read();
                for sink in &state.sinks {
                    found += 1;
                    if let Err(e) = sink.handle(record) {
                        errors.push(e);
                    }
                }
                state.propagate
            };
            current = if propagate { self.parent(&node) } else { None };
        }

        if found == 0 && record.level >= Level::WARN {
            eprintln!("{}", record.message);
        }
        errors
    }

    /// Names of all non-root channels, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}
