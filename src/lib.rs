//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# logbind

logbind is a small, leveled logger facade that does no logging of its own.  Every logger is bound to
a named channel of an existing logging engine, and every call is translated into that engine's
enabled checks and writes.

# The problem

Most logging APIs are either macros (fast, but the level and the target are fixed at the call site)
or full logging frameworks (flexible, but you have to buy into their configuration).  Sometimes you
want neither: you want a plain value you can pass around, switch between levels on the fly, and hand
to whatever engine the application already configured.

# The facade

A [Logger] is an immutable pair of a name and a [Level].

| Operation                          | Result                                              |
|------------------------------------|-----------------------------------------------------|
| [Logger::named], [logger!]         | the logger for a name at the default level (`INFO`) |
| [Logger::instance]                 | the logger for the calling module, found on the stack |
| [Logger::at_level], `at_debug` ... | another logger for the same name                    |
| `at_level(Level::Off)`             | the shared [Logger::noop]                           |
| [Logger::is_enabled]               | asks the engine, every time                         |
| `log`, `log_with`, `log_args` ...  | level-gated writes                                  |

Loggers are cached per `(name, level)` in a [Registry], so asking twice gives the same instance,
even from different threads at the same time.

```rust
use logbind::{Arg, Level, Logger};

let logger = Logger::named("svc.X");
let debug = logger.at_debug();
assert_eq!(debug.name(), "svc.X");
assert_eq!(debug.level(), Level::Debug);
assert!(debug.ptr_eq(&logger.at_debug()));

//the producer only runs when DEBUG is enabled for "svc.X"
debug.log_args("cache holds {} entries", [Arg::lazy(|| 40 + 2)]);
```

# Engines

The engine is whatever implements [Engine].  By default the global registry binds to the
[log](https://crates.io/crates/log) crate through [LogEngine], so the usual `log` backends and their
configuration apply.  [InMemoryEngine] records entries for tests.  Call [install_engine] before the
first logger is acquired to use something else.

# Caller names

[Logger::instance] has no name to go on, so it walks the stack and uses the module path of its
caller.  That needs symbols at runtime; when they are missing it fails with
[Error::CallerNotFound] rather than guessing.  [logger!] gets the same name from `module_path!()`
at compile time and always works.
*/

mod arg;
mod caller;
mod engine;
mod entry;
mod error;
mod inmemory_engine;
mod level;
mod log_engine;
mod logger;
mod macros;
pub mod registry;

pub use arg::Arg;
pub use engine::{Channel, Engine};
pub use entry::{Entry, Message};
pub use error::Error;
pub use inmemory_engine::InMemoryEngine;
pub use level::{DEFAULT_LEVEL, Level};
pub use log_engine::LogEngine;
pub use logger::{Logger, TypeName};
pub use registry::{Registry, install_engine};
