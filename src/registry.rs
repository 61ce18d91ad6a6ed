// SPDX-License-Identifier: MIT OR Apache-2.0

//! The logger instance cache.
//!
//! A [`Registry`] hands out at most one [`Logger`] per `(name, level)` pair.  It keeps one map
//! per severity, each behind its own lock, and holds that lock while the engine opens the
//! channel, so concurrent first requests for the same pair construct exactly one logger and
//! open exactly one channel.  Entries are never evicted.
//!
//! # The global registry
//!
//! [`Logger::instance`] and friends use a process-wide registry.  It is created on first use
//! with a [`LogEngine`], which forwards to the `log` crate.  To bind to a different engine, call
//! [`install_engine`] before the first logger is acquired.
//!
//! ```
//! use logbind::{Level, Registry, InMemoryEngine};
//! use std::sync::Arc;
//!
//! let engine = InMemoryEngine::new(Level::Info);
//! let registry: &'static Registry = Box::leak(Box::new(Registry::new(Arc::new(engine.clone()))));
//!
//! let a = registry.get_or_create("svc.X", Level::Info);
//! let b = registry.get_or_create("svc.X", Level::Info);
//! assert!(a.ptr_eq(&b));
//! assert_eq!(engine.channels_opened(), 1);
//! ```

use crate::engine::Engine;
use crate::error::Error;
use crate::level::{DEFAULT_LEVEL, Level};
use crate::log_engine::LogEngine;
use crate::logger::Logger;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, OnceLock};
use wasm_safe_mutex::Mutex;

const SEVERITY_COUNT: usize = Level::SEVERITIES.len();

static GLOBAL_REGISTRY: OnceLock<Registry> = OnceLock::new();

/// A cache of loggers bound to one engine.
pub struct Registry {
    engine: Arc<dyn Engine>,
    loggers: [Mutex<HashMap<String, Logger>>; SEVERITY_COUNT],
}

impl Registry {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self {
            engine,
            loggers: std::array::from_fn(|_| Mutex::new(HashMap::new())),
        }
    }

    /**
    Returns the logger for `(name, level)`, creating it on first request.

    `name` is used verbatim; empty and whitespace-only names are valid and distinct.
    [`Level::Off`] is never cached and yields [`Logger::noop`].

    The level's cache stays locked while [`Engine::channel`] runs, so the engine must not
    acquire loggers from this registry.
    */
    pub fn get_or_create(&'static self, name: &str, level: Level) -> Logger {
        let Some(index) = level.severity_index() else {
            return Logger::noop();
        };
        let mut loggers = self.loggers[index].lock_sync();
        if let Some(logger) = loggers.get(name) {
            return logger.clone();
        }
        let channel = self.engine.channel(name);
        let logger = Logger::bound(name.to_owned(), level, channel, self);
        loggers.insert(name.to_owned(), logger.clone());
        drop(loggers);
        log::trace!(target: "logbind", "opened channel {:?} at {}", name, level);
        logger
    }

    /// The logger for `name` at [`DEFAULT_LEVEL`].
    pub fn logger(&'static self, name: &str) -> Logger {
        self.get_or_create(name, DEFAULT_LEVEL)
    }

    /// Number of cached loggers at `level`.
    pub fn cached(&self, level: Level) -> usize {
        match level.severity_index() {
            Some(index) => self.loggers[index].lock_sync().len(),
            None => 0,
        }
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut cached = f.debug_map();
        for level in Level::SEVERITIES {
            cached.entry(&level, &self.cached(level));
        }
        cached.finish()?;
        write!(f, " via {:?}", self.engine)
    }
}

/**
The process-wide registry.

Created with a [`LogEngine`] on first use unless [`install_engine`] ran earlier.
*/
pub fn global() -> &'static Registry {
    GLOBAL_REGISTRY.get_or_init(|| Registry::new(Arc::new(LogEngine::new())))
}

/**
Binds the global registry to `engine`.

Must happen before the first logger is acquired through the global registry; afterwards the
existing loggers are already bound to a channel, so this fails with
[`Error::EngineAlreadyInstalled`].
*/
pub fn install_engine(engine: Arc<dyn Engine>) -> Result<(), Error> {
    let description = format!("{:?}", engine);
    GLOBAL_REGISTRY
        .set(Registry::new(engine))
        .map_err(|_| Error::EngineAlreadyInstalled)?;
    log::debug!(target: "logbind", "installed engine {}", description);
    Ok(())
}
