// SPDX-License-Identifier: MIT OR Apache-2.0
use thiserror::Error;

/// Errors raised while acquiring loggers or configuring the engine.
///
/// Log calls themselves never fail: a disabled level is a silent no-op and delivery problems
/// belong to the engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A logger was requested without a name, and the calling code could not be found on the
    /// stack.  Usually this means symbols were stripped; use [`crate::logger!`] instead.
    #[error("unable to locate the caller of {entry_point} in calling stack:\n{backtrace}")]
    CallerNotFound {
        entry_point: &'static str,
        backtrace: String,
    },
    /// [`crate::install_engine`] was called after the global registry was already in use.
    #[error("a logging engine is already installed")]
    EngineAlreadyInstalled,
}
