// SPDX-License-Identifier: MIT OR Apache-2.0

//! Positional arguments that may be computed lazily.
//!
//! An [`Arg`] is either a borrowed value or a producer that is only called once the logger knows
//! the entry will be written.  Mixing the two in one call is the normal case:
//!
//! ```
//! use logbind::Arg;
//! let id = 7;
//! let args = [Arg::from(&id), Arg::lazy(|| format!("{:?}", vec![1, 2, 3]))];
//! # let _ = args;
//! ```

use std::fmt::{Debug, Display, Formatter};

/// A log argument: a value, or a deferred computation of one.
pub enum Arg<'a> {
    Value(&'a dyn Display),
    Deferred(Box<dyn FnOnce() -> Box<dyn Display + 'a> + 'a>),
}

impl<'a> Arg<'a> {
    pub fn value(value: &'a dyn Display) -> Self {
        Arg::Value(value)
    }

    /// Defers `produce` until the log call is known to be enabled.
    pub fn lazy<F, T>(produce: F) -> Self
    where
        F: FnOnce() -> T + 'a,
        T: Display + 'a,
    {
        Arg::Deferred(Box::new(move || Box::new(produce()) as Box<dyn Display + 'a>))
    }

    /// Runs the producer, if any.
    pub(crate) fn resolve(self) -> Resolved<'a> {
        match self {
            Arg::Value(value) => Resolved::Borrowed(value),
            Arg::Deferred(produce) => Resolved::Owned(produce()),
        }
    }
}

impl<'a, T: Display> From<&'a T> for Arg<'a> {
    fn from(value: &'a T) -> Self {
        Arg::Value(value)
    }
}

impl Debug for Arg<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Arg::Value(value) => write!(f, "Value({})", value),
            Arg::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

/// An argument after its producer ran.
pub(crate) enum Resolved<'a> {
    Borrowed(&'a dyn Display),
    Owned(Box<dyn Display + 'a>),
}

impl Display for Resolved<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolved::Borrowed(value) => Display::fmt(value, f),
            Resolved::Owned(value) => Display::fmt(value, f),
        }
    }
}

pub(crate) fn resolve_all<'a>(args: impl IntoIterator<Item = Arg<'a>>) -> Vec<Resolved<'a>> {
    args.into_iter().map(Arg::resolve).collect()
}
