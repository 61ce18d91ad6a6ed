// SPDX-License-Identifier: MIT OR Apache-2.0
use std::fmt::Display;

/// Severity of a log statement.
///
/// Severities are ordered from least to most important.  [`Level::Off`] sorts after every
/// severity and is never enabled; asking a logger for it yields the shared no-op logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Fine-grained diagnostics, usually disabled
    Trace,
    /// Diagnostics for developers
    Debug,
    /// Normal operation
    Info,
    /// Suspicious condition
    Warn,
    /// Runtime error
    Error,
    /// Logging disabled entirely
    Off,
}

/// The level of a logger acquired without asking for one.
pub const DEFAULT_LEVEL: Level = Level::Info;

impl Level {
    /// Every level a logger can be bound to, in ascending order.  Excludes [`Level::Off`].
    pub const SEVERITIES: [Level; 5] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
    ];

    pub const fn is_off(self) -> bool {
        matches!(self, Level::Off)
    }

    /// Position in [`Level::SEVERITIES`], or `None` for [`Level::Off`].
    pub(crate) const fn severity_index(self) -> Option<usize> {
        match self {
            Level::Trace => Some(0),
            Level::Debug => Some(1),
            Level::Info => Some(2),
            Level::Warn => Some(3),
            Level::Error => Some(4),
            Level::Off => None,
        }
    }

    pub(crate) const fn as_u8(self) -> u8 {
        self as u8
    }

    pub(crate) const fn from_u8(value: u8) -> Level {
        match value {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            _ => Level::Off,
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Off => "OFF",
        };
        f.write_str(name)
    }
}

/*
Boilerplate notes.

Copy/Clone/Eq/Ord/Hash are all cheap and meaningful for a fieldless enum.
Default is deliberately absent; use DEFAULT_LEVEL so the choice is visible at the call site.
Display prints the conventional upper-case name used by most log formats.
*/
