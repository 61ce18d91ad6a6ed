// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Engine
//!
//! An [`Engine`] that keeps rendered entries in memory instead of delivering them anywhere.
//! It is meant for tests and for inspecting what a program logs:
//!
//! - the threshold can be moved at runtime, which loggers observe on their next call
//! - every written entry is kept as `"LEVEL name - message"`
//! - the number of channels opened is counted, so callers can check that the registry opened
//!   exactly one channel per logger it built
//!
//! Clones share the same buffer, so keep one clone for inspection and hand another to a
//! [`crate::Registry`].

use crate::engine::{Channel, Engine};
use crate::entry::Entry;
use crate::level::{DEFAULT_LEVEL, Level};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use wasm_safe_mutex::Mutex;

/// An engine that records entries in memory.
///
/// # Example
///
/// ```rust
/// use logbind::{InMemoryEngine, Level, Registry};
/// use std::sync::Arc;
///
/// let engine = InMemoryEngine::new(Level::Info);
/// let registry: &'static Registry = Box::leak(Box::new(Registry::new(Arc::new(engine.clone()))));
/// let logger = registry.logger("svc");
///
/// logger.log("ready");
/// logger.at_debug().log("not recorded");
/// assert_eq!(engine.drain_logs(), "INFO svc - ready");
///
/// engine.set_threshold(Level::Debug);
/// logger.at_debug().log("recorded now");
/// assert_eq!(engine.drain_logs(), "DEBUG svc - recorded now");
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryEngine {
    shared: Arc<Shared>,
}

struct Shared {
    threshold: AtomicU8,
    logs: Mutex<Vec<String>>,
    channels_opened: AtomicUsize,
}

impl Debug for Shared {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shared")
            .field("threshold", &Level::from_u8(self.threshold.load(Ordering::Relaxed)))
            .field("channels_opened", &self.channels_opened.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: Derived, shows threshold and channel count but not the buffer
// - Clone: Derived, clones share state so tests can keep a handle for inspection
// - Default: Implemented with the default logger level as threshold
// - PartialEq/Eq/Hash: NOT implemented, equality of shared buffers is ambiguous
// - Send/Sync: Automatic, all state is atomic or behind a mutex

impl Default for InMemoryEngine {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL)
    }
}

impl InMemoryEngine {
    /// Creates an engine that records entries at `threshold` and above.
    pub fn new(threshold: Level) -> Self {
        Self {
            shared: Arc::new(Shared {
                threshold: AtomicU8::new(threshold.as_u8()),
                logs: Mutex::new(Vec::new()),
                channels_opened: AtomicUsize::new(0),
            }),
        }
    }

    /// Changes the threshold.  [`Level::Off`] disables everything.
    pub fn set_threshold(&self, threshold: Level) {
        self.shared
            .threshold
            .store(threshold.as_u8(), Ordering::Release);
    }

    pub fn threshold(&self) -> Level {
        Level::from_u8(self.shared.threshold.load(Ordering::Acquire))
    }

    /// How many times [`Engine::channel`] was called.
    pub fn channels_opened(&self) -> usize {
        self.shared.channels_opened.load(Ordering::Acquire)
    }

    /// Joins all recorded lines with newlines and clears the buffer.
    pub fn drain_logs(&self) -> String {
        let mut logs = self.shared.logs.lock_sync();
        let result = logs.join("\n");
        logs.clear();
        result
    }

    /// Number of recorded lines not yet drained.
    pub fn len(&self) -> usize {
        self.shared.logs.lock_sync().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Engine for InMemoryEngine {
    fn channel(&self, name: &str) -> Arc<dyn Channel> {
        self.shared.channels_opened.fetch_add(1, Ordering::AcqRel);
        Arc::new(InMemoryChannel {
            name: name.to_owned(),
            shared: self.shared.clone(),
        })
    }
}

#[derive(Debug)]
struct InMemoryChannel {
    name: String,
    shared: Arc<Shared>,
}

impl Channel for InMemoryChannel {
    fn is_enabled(&self, level: Level) -> bool {
        //Off sorts above every severity, so an Off threshold admits nothing
        !level.is_off() && level >= Level::from_u8(self.shared.threshold.load(Ordering::Acquire))
    }

    fn write(&self, entry: &Entry<'_>) {
        let line = format!("{} {} - {}", entry.level(), self.name, entry);
        self.shared.logs.lock_sync().push(line);
    }
}
