// SPDX-License-Identifier: MIT OR Apache-2.0

//! Macros that name loggers from the call site at compile time.

/**
Acquires a logger from the global registry without walking the stack.

With no arguments the logger is named after the calling module, the same name
[`Logger::instance`](crate::Logger::instance) would resolve at runtime.  With an argument, the
argument is the name.

```
let logger = logbind::logger!();
assert_eq!(logger.name(), module_path!());

let named = logbind::logger!("svc.X");
assert_eq!(named.name(), "svc.X");
```
*/
#[macro_export]
macro_rules! logger {
    () => {
        $crate::Logger::named(::core::module_path!())
    };
    ($name:expr) => {
        $crate::Logger::named($name)
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn logger_macro_uses_module_path() {
        assert_eq!(crate::logger!().name(), "logbind::macros::tests");
        assert!(crate::logger!().ptr_eq(&crate::Logger::named(module_path!())));
        let name = String::from("dynamic");
        assert_eq!(crate::logger!(&name).name(), "dynamic");
    }
}
