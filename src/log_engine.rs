// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::engine::{Channel, Engine};
use crate::entry::Entry;
use crate::level::Level;
use std::sync::Arc;

/**
The default engine: forwards to the [`log`] crate.

Each channel is a `log` target named after the logger.  Enabled checks consult both
[`log::max_level`] and the installed [`log::Log`], so whatever configures the `log` backend
(an env var, a config file) configures logbind too.

Records carry the logger type as `module_path` and the call site as `file`/`line`.
*/
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEngine {}

impl LogEngine {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Engine for LogEngine {
    fn channel(&self, name: &str) -> Arc<dyn Channel> {
        Arc::new(LogChannel {
            target: name.to_owned(),
        })
    }
}

#[derive(Debug)]
struct LogChannel {
    target: String,
}

fn log_level(level: Level) -> Option<log::Level> {
    match level {
        Level::Trace => Some(log::Level::Trace),
        Level::Debug => Some(log::Level::Debug),
        Level::Info => Some(log::Level::Info),
        Level::Warn => Some(log::Level::Warn),
        Level::Error => Some(log::Level::Error),
        Level::Off => None,
    }
}

impl Channel for LogChannel {
    fn is_enabled(&self, level: Level) -> bool {
        let Some(level) = log_level(level) else {
            return false;
        };
        level <= log::max_level()
            && log::logger().enabled(
                &log::Metadata::builder()
                    .level(level)
                    .target(&self.target)
                    .build(),
            )
    }

    fn write(&self, entry: &Entry<'_>) {
        let Some(level) = log_level(entry.level()) else {
            return;
        };
        let location = entry.location();
        log::logger().log(
            &log::Record::builder()
                .args(format_args!("{}", entry))
                .level(level)
                .target(&self.target)
                .module_path_static(Some(entry.reporter()))
                .file_static(Some(location.file()))
                .line(Some(location.line()))
                .build(),
        );
    }
}
