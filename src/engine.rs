//SPDX-License-Identifier: MIT OR Apache-2.0
use crate::entry::Entry;
use crate::level::Level;
use std::fmt::Debug;
use std::sync::Arc;

/**
An underlying logging engine.

logbind does not format or deliver anything itself.  Every [crate::Logger] is bound to a named
[Channel] that the engine hands out, and every enabled log call ends up in [Channel::write].
*/
pub trait Engine: Debug + Send + Sync {
    /**
    Obtains the channel for `name`, creating it if necessary.

    The registry calls this exactly once per `(name, level)` pair it constructs, so engines
    are free to return a fresh channel each time or to share one per name.

    This runs while the registry holds the lock for that level, so it must not acquire
    loggers (named, unnamed or via level switching) from the same registry.  Doing so
    deadlocks.
    */
    fn channel(&self, name: &str) -> Arc<dyn Channel>;
}

/**
A named destination inside an [Engine].
*/
pub trait Channel: Debug + Send + Sync {
    /**
    Whether `level` would currently be delivered.

    Loggers ask on every call rather than caching the answer, so an engine whose configuration
    changes at runtime is observed immediately.  [Level::Off] must report `false`.
    */
    fn is_enabled(&self, level: Level) -> bool;

    /**
    Delivers an entry.

    Only called after [Self::is_enabled] returned `true` for `entry.level()`.  All deferred
    arguments have already been resolved.
    */
    fn write(&self, entry: &Entry<'_>);
}

/*
Boilerplate notes.

# Engine / Channel

These are trait objects shared across threads, so Send + Sync are required and Debug is required
so a logger can print what it is bound to.
Clone makes no sense for trait objects; callers share them through Arc.
PartialEq would be ambiguous between configuration equality and identity, so it's not provided.
*/
