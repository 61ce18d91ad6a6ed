//SPDX-License-Identifier: MIT OR Apache-2.0
use crate::arg::{self, Arg};
use crate::caller;
use crate::engine::Channel;
use crate::entry::Entry;
use crate::error::Error;
use crate::level::Level;
use crate::registry::{self, Registry};
use std::error::Error as StdError;
use std::fmt::{Debug, Display, Formatter};
use std::panic::Location;
use std::sync::{Arc, LazyLock};

/// Type whose `instance*` functions are the entry points the caller resolver looks for.
const ENTRY_TYPE: &str = concat!(module_path!(), "::Logger");

static NOOP: LazyLock<Logger> = LazyLock::new(|| Logger {
    handle: Arc::new(Handle {
        name: String::new(),
        level: Level::Off,
        binding: None,
    }),
});

/**
A logger bound to a name and a level.

Loggers are immutable.  [`Logger::at_level`] and the `at_*` shortcuts return a different logger
for the same name, taken from the same [`Registry`], so asking twice for the same name and level
gives the same logger (see [`Logger::ptr_eq`]).  Clones are cheap and share identity.

# Acquiring

```
use logbind::{Level, Logger};

let named = Logger::named("svc.X");
assert_eq!(named.name(), "svc.X");
assert_eq!(named.level(), Level::Info);

//name derived from the call site, no stack walk
let here = logbind::logger!();
assert_eq!(here.name(), module_path!());
```

# Logging

Every log call first asks the engine whether this logger's level is enabled.  When it is not,
the call returns before evaluating anything, including deferred messages and [`Arg::lazy`]
arguments.

```
use logbind::{Arg, Logger};

let logger = Logger::named("svc.X").at_debug();
logger.log("plain message");
logger.log_with(|| format!("computed only when DEBUG is enabled: {}", 6 * 7));
logger.log_args("request {} took {}ms", [Arg::from(&17), Arg::lazy(|| 3 + 4)]);

let error = std::io::Error::other("disk full");
logger.at_error().log_error_message(&error, "could not persist");
```
*/
#[derive(Clone)]
pub struct Logger {
    handle: Arc<Handle>,
}

struct Handle {
    name: String,
    level: Level,
    binding: Option<Binding>,
}

struct Binding {
    channel: Arc<dyn Channel>,
    registry: &'static Registry,
}

/// A type's name, for [`Logger::instance_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeName(&'static str);

impl TypeName {
    pub fn of<T: ?Sized>() -> Self {
        Self(std::any::type_name::<T>())
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Logger {
    pub(crate) fn bound(
        name: String,
        level: Level,
        channel: Arc<dyn Channel>,
        registry: &'static Registry,
    ) -> Self {
        Self {
            handle: Arc::new(Handle {
                name,
                level,
                binding: Some(Binding { channel, registry }),
            }),
        }
    }

    /**
    The logger for the calling module, at the default level.

    The name is found by walking the stack, see [`Error::CallerNotFound`] for when that fails.
    Prefer [`crate::logger!`] when the call site is known at compile time.
    */
    #[inline(never)]
    pub fn instance() -> Result<Logger, Error> {
        Ok(registry::global().logger(&caller::resolve(ENTRY_TYPE)?))
    }

    /// The logger for `name`, or for the calling module when `name` is `None`.
    #[inline(never)]
    pub fn instance_named(name: Option<&str>) -> Result<Logger, Error> {
        match name {
            Some(name) => Ok(registry::global().logger(name)),
            None => Ok(registry::global().logger(&caller::resolve(ENTRY_TYPE)?)),
        }
    }

    /// The logger named after `type_name`, or after the calling module when it is `None`.
    #[inline(never)]
    pub fn instance_for(type_name: Option<TypeName>) -> Result<Logger, Error> {
        match type_name {
            Some(type_name) => Ok(registry::global().logger(type_name.as_str())),
            None => Ok(registry::global().logger(&caller::resolve(ENTRY_TYPE)?)),
        }
    }

    /// The logger for `name`, used verbatim.
    pub fn named(name: &str) -> Logger {
        registry::global().logger(name)
    }

    /// The logger named after `T`.
    pub fn of<T: ?Sized>() -> Logger {
        Self::named(TypeName::of::<T>().as_str())
    }

    /// The shared logger that never logs.
    pub fn noop() -> Logger {
        NOOP.clone()
    }

    pub fn name(&self) -> &str {
        &self.handle.name
    }

    pub fn level(&self) -> Level {
        self.handle.level
    }

    /**
    Whether calls on this logger currently reach the engine.

    Asked fresh on every call, never cached.
    */
    pub fn is_enabled(&self) -> bool {
        self.enabled_channel().is_some()
    }

    /// Whether both refer to the same logger instance.
    pub fn ptr_eq(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.handle, &other.handle)
    }

    /**
    This logger's name at `level`.

    Returns `self` when the level is unchanged, [`Logger::noop`] for [`Level::Off`], and
    otherwise the cached logger for the new pair.  The no-op logger stays itself.
    */
    pub fn at_level(&self, level: Level) -> Logger {
        if self.handle.level == level {
            return self.clone();
        }
        if level.is_off() {
            return Self::noop();
        }
        match &self.handle.binding {
            Some(binding) => binding.registry.get_or_create(&self.handle.name, level),
            None => self.clone(),
        }
    }

    pub fn at_trace(&self) -> Logger {
        self.at_level(Level::Trace)
    }

    pub fn at_debug(&self) -> Logger {
        self.at_level(Level::Debug)
    }

    pub fn at_info(&self) -> Logger {
        self.at_level(Level::Info)
    }

    pub fn at_warn(&self) -> Logger {
        self.at_level(Level::Warn)
    }

    pub fn at_error(&self) -> Logger {
        self.at_level(Level::Error)
    }

    /// Logs `message`.
    #[track_caller]
    pub fn log(&self, message: impl Display) {
        let Some(channel) = self.enabled_channel() else {
            return;
        };
        self.write(channel, Location::caller(), &message.to_string(), None, None);
    }

    /// Logs the message `message` produces, calling it only when enabled.
    #[track_caller]
    pub fn log_with<M: Display>(&self, message: impl FnOnce() -> M) {
        let Some(channel) = self.enabled_channel() else {
            return;
        };
        self.write(channel, Location::caller(), &message().to_string(), None, None);
    }

    /// Logs `template` with each `{}` replaced by the next argument.
    #[track_caller]
    pub fn log_args<'a>(&self, template: &str, args: impl IntoIterator<Item = Arg<'a>>) {
        let Some(channel) = self.enabled_channel() else {
            return;
        };
        let resolved = arg::resolve_all(args);
        let args: Vec<&dyn Display> = resolved.iter().map(|a| a as &dyn Display).collect();
        self.write(channel, Location::caller(), template, Some(&args), None);
    }

    /// Logs `error` on its own.
    #[track_caller]
    pub fn log_error(&self, error: &(dyn StdError + 'static)) {
        let Some(channel) = self.enabled_channel() else {
            return;
        };
        self.write(channel, Location::caller(), "", None, Some(error));
    }

    #[track_caller]
    pub fn log_error_message(&self, error: &(dyn StdError + 'static), message: impl Display) {
        let Some(channel) = self.enabled_channel() else {
            return;
        };
        self.write(
            channel,
            Location::caller(),
            &message.to_string(),
            None,
            Some(error),
        );
    }

    #[track_caller]
    pub fn log_error_with<M: Display>(
        &self,
        error: &(dyn StdError + 'static),
        message: impl FnOnce() -> M,
    ) {
        let Some(channel) = self.enabled_channel() else {
            return;
        };
        self.write(
            channel,
            Location::caller(),
            &message().to_string(),
            None,
            Some(error),
        );
    }

    #[track_caller]
    pub fn log_error_args<'a>(
        &self,
        error: &(dyn StdError + 'static),
        template: &str,
        args: impl IntoIterator<Item = Arg<'a>>,
    ) {
        let Some(channel) = self.enabled_channel() else {
            return;
        };
        let resolved = arg::resolve_all(args);
        let args: Vec<&dyn Display> = resolved.iter().map(|a| a as &dyn Display).collect();
        self.write(channel, Location::caller(), template, Some(&args), Some(error));
    }

    fn enabled_channel(&self) -> Option<&dyn Channel> {
        let binding = self.handle.binding.as_ref()?;
        if binding.channel.is_enabled(self.handle.level) {
            Some(&*binding.channel)
        } else {
            None
        }
    }

    fn write(
        &self,
        channel: &dyn Channel,
        location: &'static Location<'static>,
        template: &str,
        args: Option<&[&dyn Display]>,
        error: Option<&(dyn StdError + 'static)>,
    ) {
        let level = self.handle.level;
        let reporter = std::any::type_name::<Logger>();
        let entry = match args {
            Some(args) => Entry::new(level, reporter, location, template, args, error),
            //finished messages are never substituted
            None => Entry::verbatim(level, reporter, location, template, error),
        };
        channel.write(&entry);
    }
}

impl Debug for Logger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.handle.name)
            .field("level", &self.handle.level)
            .finish()
    }
}

/*
Boilerplate notes.

# Logger

Clone is an Arc clone and preserves identity, which is what callers expect from a cached logger.
PartialEq is left out: name/level equality and instance identity are both plausible, and mixing
them up would hide cache bugs.  ptr_eq says what it means.
Default would have to pick a name, and there isn't a good one.
Hash, Ord: no.
Send/Sync: automatic, handles are immutable after construction.
*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inmemory_engine::InMemoryEngine;
    use std::cell::Cell;

    fn registry(engine: &InMemoryEngine) -> &'static Registry {
        Box::leak(Box::new(Registry::new(Arc::new(engine.clone()))))
    }

    #[derive(Debug)]
    struct Failure;
    impl Display for Failure {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str("ex message")
        }
    }
    impl StdError for Failure {}

    #[test]
    fn default_level_is_info_and_enabled() {
        let engine = InMemoryEngine::new(Level::Info);
        let logger = registry(&engine).logger("svc.X");
        assert_eq!(logger.level(), Level::Info);
        assert!(logger.is_enabled());
        assert!(logger.at_info().is_enabled());
        assert!(!logger.at_debug().is_enabled());
    }

    #[test]
    fn end_to_end_level_switching() {
        let engine = InMemoryEngine::new(Level::Info);
        let info = registry(&engine).logger("svc.X");
        assert!(info.is_enabled());

        let debug = info.at_debug();
        assert!(!debug.ptr_eq(&info));
        assert_eq!(debug.name(), "svc.X");
        assert_eq!(debug.level(), Level::Debug);
        assert!(debug.at_info().ptr_eq(&info));

        let off = debug.at_level(Level::Off);
        assert!(off.ptr_eq(&Logger::noop()));
    }

    #[test]
    fn same_level_returns_same_logger() {
        let engine = InMemoryEngine::new(Level::Info);
        let error = registry(&engine).logger("svc").at_error();
        assert!(error.at_error().ptr_eq(&error));
        assert_eq!(engine.channels_opened(), 2);
    }

    #[test]
    fn noop_never_logs_or_evaluates() {
        let noop = Logger::noop();
        let calls = Cell::new(0);
        let count = || {
            calls.set(calls.get() + 1);
            "expensive"
        };
        assert!(!noop.is_enabled());
        assert_eq!(noop.level(), Level::Off);
        noop.log("message");
        noop.log_with(count);
        noop.log_args("{}", [Arg::lazy(count)]);
        noop.log_error(&Failure);
        noop.log_error_message(&Failure, "message");
        noop.log_error_with(&Failure, count);
        noop.log_error_args(&Failure, "{}", [Arg::lazy(count)]);
        assert_eq!(calls.get(), 0);
        for level in Level::SEVERITIES {
            assert!(noop.at_level(level).ptr_eq(&noop));
        }
    }

    #[test]
    fn disabled_level_never_runs_producers() {
        let engine = InMemoryEngine::new(Level::Info);
        let trace = registry(&engine).logger("svc").at_trace();
        let calls = Cell::new(0);
        let count = || {
            calls.set(calls.get() + 1);
            "expensive"
        };
        trace.log_with(count);
        trace.log_args("a {} b {}", [Arg::from(&1), Arg::lazy(count)]);
        trace.log_error_with(&Failure, count);
        trace.log_error_args(&Failure, "{}", [Arg::lazy(count)]);
        assert_eq!(calls.get(), 0);
        assert!(engine.is_empty());
    }

    #[test]
    fn enabled_level_resolves_and_writes() {
        let engine = InMemoryEngine::new(Level::Debug);
        let logger = registry(&engine).logger("svc");
        let calls = Cell::new(0);
        logger.at_warn().log_args(
            "arg1 {}, arg2 {}, arg3 {}",
            [
                Arg::from(&"a11111"),
                Arg::from(&"a22222"),
                Arg::lazy(|| {
                    calls.set(calls.get() + 1);
                    format!("{:?}", ["a33333"])
                }),
            ],
        );
        assert_eq!(calls.get(), 1);
        assert_eq!(
            engine.drain_logs(),
            r#"WARN svc - arg1 a11111, arg2 a22222, arg3 ["a33333"]"#
        );
    }

    #[test]
    fn every_variant_reaches_engine() {
        let engine = InMemoryEngine::new(Level::Trace);
        let logger = registry(&engine).logger("svc").at_error();
        logger.log("log message");
        logger.log_with(|| "supplier message");
        logger.log_args("with arg {}", [Arg::from(&"a1")]);
        logger.log_error(&Failure);
        logger.log_error_message(&Failure, "log message");
        logger.log_error_with(&Failure, || "supplier log message");
        logger.log_error_args(&Failure, "log message with arg {}", [Arg::lazy(|| "a1")]);
        assert_eq!(
            engine.drain_logs(),
            [
                "ERROR svc - log message",
                "ERROR svc - supplier message",
                "ERROR svc - with arg a1",
                "ERROR svc - ex message",
                "ERROR svc - log message\nex message",
                "ERROR svc - supplier log message\nex message",
                "ERROR svc - log message with arg a1\nex message",
            ]
            .join("\n")
        );
    }

    #[test]
    fn finished_messages_are_not_substituted() {
        let engine = InMemoryEngine::new(Level::Info);
        let logger = registry(&engine).logger("svc");
        logger.log(r"path C:\{} kept");
        logger.log_with(|| r"user \\{} text");
        logger.log_error_message(&Failure, "bare {}");
        logger.log_error_with(&Failure, || r"\{}");
        logger.log_args(r"escaped \{} and {}", [Arg::from(&1)]);
        assert_eq!(
            engine.drain_logs(),
            [
                r"INFO svc - path C:\{} kept",
                r"INFO svc - user \\{} text",
                "INFO svc - bare {}\nex message",
                "INFO svc - \\{}\nex message",
                "INFO svc - escaped {} and 1",
            ]
            .join("\n")
        );
    }

    #[test]
    fn enabled_state_is_checked_per_call() {
        let engine = InMemoryEngine::new(Level::Info);
        let debug = registry(&engine).logger("svc").at_debug();
        assert!(!debug.is_enabled());
        engine.set_threshold(Level::Debug);
        assert!(debug.is_enabled());
        debug.log("now visible");
        engine.set_threshold(Level::Off);
        debug.log("hidden again");
        assert_eq!(engine.drain_logs(), "DEBUG svc - now visible");
    }

    #[derive(Debug)]
    struct Capture {
        location: std::sync::Mutex<Option<(&'static str, &'static str, u32)>>,
    }
    impl Channel for Capture {
        fn is_enabled(&self, _level: Level) -> bool {
            true
        }
        fn write(&self, entry: &Entry<'_>) {
            let location = entry.location();
            *self.location.lock().unwrap() =
                Some((entry.reporter(), location.file(), location.line()));
        }
    }
    #[derive(Debug)]
    struct CaptureEngine(Arc<Capture>);
    impl crate::engine::Engine for CaptureEngine {
        fn channel(&self, _name: &str) -> Arc<dyn Channel> {
            self.0.clone()
        }
    }

    #[test]
    fn entries_report_logger_type_and_call_site() {
        let capture = Arc::new(Capture {
            location: std::sync::Mutex::new(None),
        });
        let registry: &'static Registry =
            Box::leak(Box::new(Registry::new(Arc::new(CaptureEngine(capture.clone())))));
        let logger = registry.logger("svc");
        let line = line!() + 1;
        logger.log("here");
        let captured = *capture.location.lock().unwrap();
        let (reporter, file, reported_line) = captured.expect("entry was written");
        assert_eq!(reporter, "logbind::logger::Logger");
        assert_eq!(file, file!());
        assert_eq!(reported_line, line);
    }

    #[test]
    fn debug_shows_name_and_level() {
        let engine = InMemoryEngine::new(Level::Info);
        let logger = registry(&engine).logger("svc");
        assert_eq!(
            format!("{:?}", logger),
            r#"Logger { name: "svc", level: Info }"#
        );
    }

    #[test]
    fn caller_resolution_matches_module_path() {
        let expected = module_path!();
        assert_eq!(unnamed().name(), expected);
        assert_eq!(no_name().name(), expected);
        assert_eq!(no_type().name(), expected);
        assert_eq!(crate::logger!().name(), expected);
    }

    #[inline(never)]
    fn unnamed() -> Logger {
        std::hint::black_box(Logger::instance()).expect("caller")
    }

    #[inline(never)]
    fn no_name() -> Logger {
        std::hint::black_box(Logger::instance_named(None)).expect("caller")
    }

    #[inline(never)]
    fn no_type() -> Logger {
        std::hint::black_box(Logger::instance_for(None)).expect("caller")
    }

    #[test]
    fn explicit_names_bypass_resolution() {
        assert_eq!(Logger::instance_named(Some("   ")).expect("named").name(), "   ");
        assert_eq!(Logger::instance_named(Some("")).expect("named").name(), "");
        assert_eq!(
            Logger::instance_for(Some(TypeName::of::<Failure>()))
                .expect("typed")
                .name(),
            "logbind::logger::tests::Failure"
        );
        assert_eq!(Logger::of::<Failure>().name(), "logbind::logger::tests::Failure");
        assert!(Logger::named("svc").ptr_eq(&Logger::named("svc")));
    }
}
