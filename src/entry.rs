// SPDX-License-Identifier: MIT OR Apache-2.0

//! The unit of work handed from a logger to its engine.
//!
//! An [`Entry`] is built only after the level check passed and every deferred argument was
//! resolved.  It borrows everything it carries, so building one allocates nothing beyond the
//! argument slice the logger prepared.
//!
//! # Rendering
//!
//! Entries built with [`Entry::new`] implement [`Display`] using positional `{}` placeholders:
//!
//! * each `{}` is replaced by the next argument
//! * `\{}` prints a literal `{}` and consumes nothing
//! * `\\{}` prints a literal backslash, then substitutes
//! * a `{}` with no argument left is printed as-is, surplus arguments are ignored
//!
//! Entries built with [`Entry::verbatim`] carry a finished message that is printed unchanged.
//!
//! An attached error follows on a new line (or alone, for an empty template), with its
//! `source()` chain.
//!
//! ```
//! use logbind::{Entry, Level};
//! let who: &dyn std::fmt::Display = &"world";
//! let args = [who];
//! let entry = Entry::new(Level::Info, "example", std::panic::Location::caller(), "hello {}", &args, None);
//! assert_eq!(entry.to_string(), "hello world");
//!
//! let plain = Entry::verbatim(Level::Info, "example", std::panic::Location::caller(), r"C:\{}", None);
//! assert_eq!(plain.to_string(), r"C:\{}");
//! ```

use crate::level::Level;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::panic::Location;

const PLACEHOLDER: &str = "{}";
const ESCAPE: char = '\\';

/**
A log call that passed its level check.
*/
pub struct Entry<'a> {
    level: Level,
    reporter: &'static str,
    location: &'static Location<'static>,
    template: &'a str,
    //None: the template is a finished message
    args: Option<&'a [&'a dyn Display]>,
    error: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Entry<'a> {
    /// An entry whose `template` is substituted with `args` when rendered.
    pub fn new(
        level: Level,
        reporter: &'static str,
        location: &'static Location<'static>,
        template: &'a str,
        args: &'a [&'a dyn Display],
        error: Option<&'a (dyn Error + 'static)>,
    ) -> Self {
        Self {
            level,
            reporter,
            location,
            template,
            args: Some(args),
            error,
        }
    }

    /// An entry whose `message` is rendered exactly as given, placeholders and escapes included.
    pub fn verbatim(
        level: Level,
        reporter: &'static str,
        location: &'static Location<'static>,
        message: &'a str,
        error: Option<&'a (dyn Error + 'static)>,
    ) -> Self {
        Self {
            level,
            reporter,
            location,
            template: message,
            args: None,
            error,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /**
    Type path of the component that reported the entry.

    This is always the logger type itself, never the caller.  Engines that derive locations from
    the reporting component should use [Self::location] instead.
    */
    pub fn reporter(&self) -> &'static str {
        self.reporter
    }

    /// Source location of the log call.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    pub fn template(&self) -> &str {
        self.template
    }

    /// The positional arguments, or `None` for a [verbatim](Self::verbatim) entry.
    pub fn args(&self) -> Option<&[&'a dyn Display]> {
        self.args
    }

    pub fn error(&self) -> Option<&'a (dyn Error + 'static)> {
        self.error
    }

    /// The rendered message, without the error.
    pub fn message(&self) -> Message<'_> {
        Message {
            template: self.template,
            args: self.args,
        }
    }
}

/// The substituted template of an [`Entry`].
#[derive(Clone, Copy)]
pub struct Message<'a> {
    template: &'a str,
    args: Option<&'a [&'a dyn Display]>,
}

impl Display for Message<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Some(args) = self.args else {
            return f.write_str(self.template);
        };
        let mut rest = self.template;
        let mut args = args.iter();
        while let Some(pos) = rest.find(PLACEHOLDER) {
            let (head, tail) = rest.split_at(pos);
            let after = &tail[PLACEHOLDER.len()..];
            let escaped = head.ends_with(ESCAPE);
            let double_escaped = escaped && head[..head.len() - 1].ends_with(ESCAPE);
            if escaped && !double_escaped {
                f.write_str(&head[..head.len() - 1])?;
                f.write_str(PLACEHOLDER)?;
            } else {
                //a double escape prints one backslash, then substitutes
                let head = if double_escaped {
                    &head[..head.len() - 1]
                } else {
                    head
                };
                f.write_str(head)?;
                match args.next() {
                    Some(arg) => write!(f, "{}", arg)?,
                    None => f.write_str(PLACEHOLDER)?,
                }
            }
            rest = after;
        }
        f.write_str(rest)
    }
}

impl Display for Entry<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())?;
        if let Some(error) = self.error {
            if !self.template.is_empty() {
                f.write_str("\n")?;
            }
            write!(f, "{}", error)?;
            let mut source = error.source();
            while let Some(cause) = source {
                write!(f, "\nCaused by: {}", cause)?;
                source = cause.source();
            }
        }
        Ok(())
    }
}

impl Debug for Entry<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("level", &self.level)
            .field("reporter", &self.reporter)
            .field("location", &self.location)
            .field("template", &self.template)
            .field("args", &self.args.map(<[_]>::len))
            .field("error", &self.error.map(|e| e.to_string()))
            .finish()
    }
}

/*
Boilerplate notes for Entry:

IMPLEMENTED:
- Display: renders the substituted message and the error chain
- Debug: manual, since dyn Display arguments have no Debug

NOT IMPLEMENTED:
- Clone/Copy: entries are handed to an engine by reference and never stored
- PartialEq/Hash: comparing dyn Display arguments is not meaningful
- Default: an entry without a location makes no sense
- Send/Sync: dyn Display and dyn Error borrows are neither, and entries never cross threads
*/
