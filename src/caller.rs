// SPDX-License-Identifier: MIT OR Apache-2.0

//! Finds the module that called a logger entry point.
//!
//! [`crate::Logger::instance`] and friends take no name, so the name has to come from the call
//! stack.  We capture a backtrace, find the most recent frame of an entry point, and report the
//! module path of the first frame after it that is not part of the entry-point type.
//!
//! # What counts as the caller's name
//!
//! The module path of the calling function, which is exactly what `module_path!()` would return
//! at the call site.  `app::jobs::Worker::run`, `<app::jobs::Worker as app::Job>::run` and a
//! closure inside `app::jobs::spawn` all resolve to `app::jobs`.
//!
//! # Limitations
//!
//! This depends on symbol names being available at runtime.  Stripped binaries resolve to
//! [`Error::CallerNotFound`].  So do optimized builds where the caller was inlined away and the
//! frame after the entry point belongs to the standard library (`core::ops::function::FnOnce`
//! shims and the like); that frame says nothing about who asked for the logger.
//! [`crate::logger!`] never walks the stack and works everywhere.

use crate::error::Error;
use std::backtrace::Backtrace;

/// Method-name prefix shared by every entry point.
const ENTRY_POINT_PREFIX: &str = "instance";
/// Crates whose frames can never be the caller.
const RUNTIME_CRATES: [&str; 5] = ["core", "std", "alloc", "test", "proc_macro"];
const HASH_LEN: usize = 16;

/**
Resolves the module that called an entry point of `entry_type`.

Entry points must be `#[inline(never)]`, otherwise their frame can disappear.
*/
pub(crate) fn resolve(entry_type: &'static str) -> Result<String, Error> {
    let backtrace = Backtrace::force_capture().to_string();
    let found = caller_module(frame_symbols(&backtrace), entry_type);
    match found {
        Some(module) => Ok(module),
        None => Err(Error::CallerNotFound {
            entry_point: entry_type,
            backtrace,
        }),
    }
}

/// Symbol names from the `Display` form of a backtrace, innermost first.
fn frame_symbols(backtrace: &str) -> impl Iterator<Item = &str> {
    backtrace.lines().filter_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with("at ") {
            return None;
        }
        //inlined symbols share a frame and are printed without an index
        Some(match line.split_once(": ") {
            Some((index, symbol)) if index.chars().all(|c| c.is_ascii_digit()) => symbol,
            _ => line,
        })
    })
}

fn caller_module<'a>(symbols: impl IntoIterator<Item = &'a str>, entry_type: &str) -> Option<String> {
    let mut symbols = symbols.into_iter().map(normalize);
    symbols.by_ref().find(|symbol| is_entry_point(symbol, entry_type))?;
    let caller = symbols
        .filter(|symbol| !belongs_to(symbol, entry_type))
        .find(|symbol| !is_unresolved(symbol))?;
    if is_runtime(&caller) {
        return None;
    }
    module_of(&caller)
}

fn is_unresolved(symbol: &str) -> bool {
    symbol.is_empty() || symbol == "unknown"
}

fn is_runtime(symbol: &str) -> bool {
    symbol.starts_with("__rust")
        || symbol
            .split("::")
            .next()
            .is_some_and(|krate| RUNTIME_CRATES.contains(&krate))
}

fn belongs_to(symbol: &str, entry_type: &str) -> bool {
    symbol
        .strip_prefix(entry_type)
        .is_some_and(|rest| rest.starts_with("::"))
}

fn is_entry_point(symbol: &str, entry_type: &str) -> bool {
    symbol
        .strip_prefix(entry_type)
        .and_then(|rest| rest.strip_prefix("::"))
        .is_some_and(|method| method.starts_with(ENTRY_POINT_PREFIX) && !method.contains("::"))
}

/// Drops the function segment, then any type segments, leaving the module.
fn module_of(symbol: &str) -> Option<String> {
    let mut segments: Vec<&str> = symbol.split("::").collect();
    segments.pop()?;
    while segments
        .last()
        .is_some_and(|segment| segment.starts_with(char::is_uppercase))
    {
        segments.pop();
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("::"))
    }
}

/**
Canonical `a::b::c` form of a demangled symbol.

Handles both legacy and v0 demangling: hash suffixes, `<T as Trait>::f` and `<T>::f` wrappers,
generic arguments and closure/shim segments are removed.
*/
fn normalize(symbol: &str) -> String {
    let symbol = unwrap_impl(strip_hash(symbol));
    strip_generics(&symbol)
        .split("::")
        .filter(|segment| !segment.is_empty() && !segment.starts_with('{'))
        .collect::<Vec<_>>()
        .join("::")
}

fn strip_hash(symbol: &str) -> &str {
    match symbol.rsplit_once("::h") {
        Some((head, hash))
            if hash.len() == HASH_LEN && hash.chars().all(|c| c.is_ascii_hexdigit()) =>
        {
            head
        }
        _ => symbol,
    }
}

fn unwrap_impl(symbol: &str) -> String {
    if !symbol.starts_with('<') {
        return symbol.to_owned();
    }
    let Some(close) = matching_close(symbol) else {
        return symbol.to_owned();
    };
    let self_ty = top_level_self_type(&symbol[1..close]).trim_start_matches('&');
    format!("{}{}", self_ty, &symbol[close + 1..])
}

/// Index of the `>` closing the `<` at index 0.
fn matching_close(symbol: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut prev = ' ';
    for (i, c) in symbol.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if prev != '-' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        prev = c;
    }
    None
}

/// `T` out of `T as Trait`, ignoring an `as` nested in generics.
fn top_level_self_type(inner: &str) -> &str {
    let mut depth = 0usize;
    let mut prev = ' ';
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if prev != '-' => depth = depth.saturating_sub(1),
            ' ' if depth == 0 && inner[i..].starts_with(" as ") => return &inner[..i],
            _ => {}
        }
        prev = c;
    }
    inner
}

fn strip_generics(symbol: &str) -> String {
    let mut out = String::with_capacity(symbol.len());
    let mut depth = 0usize;
    let mut prev = ' ';
    for c in symbol.chars() {
        match c {
            '<' => depth += 1,
            '>' if depth > 0 && prev != '-' => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
        prev = c;
    }
    out
}
