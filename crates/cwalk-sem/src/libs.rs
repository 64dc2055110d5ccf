//! The built-in library surface.
//!
//! `#include <name.h>` binds native callables by name; the lookup key
//! is the header's stem. This table is the single authority on which
//! names each library exports: the analyzer uses it to validate
//! includes and calls, and the evaluator maps the same names to native
//! implementations.

/// Names exported by the library `name`, or `None` for an unknown
/// library.
pub fn library_exports(name: &str) -> Option<&'static [&'static str]> {
    match name {
        "stdio" => Some(&["printf", "scanf"]),
        "math" => Some(&["sqrt", "pow", "fabs", "floor", "ceil"]),
        _ => None,
    }
}
