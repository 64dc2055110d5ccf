//! Built-in libraries.
//!
//! `#include <name.h>` binds native callables into the global frame.
//! The analyzer's library surface (`cwalk_sem::library_exports`) is the
//! authority on which names each library exports; this module maps
//! those names to implementations. The lookup key is the header stem:
//! `stdio` provides `printf`/`scanf`, `math` the usual double-valued
//! functions.

mod math;
mod stdio;

use std::io::{BufRead, Write};

use cwalk_util::Result;

use crate::memory::Memory;
use crate::number::Number;

/// A native callable.
pub type NativeFn = fn(&mut BuiltinCtx<'_>) -> Result<Number>;

/// An evaluated call argument, as natives see it.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    /// A numeric value.
    Num(Number),

    /// A string literal, e.g. a format string.
    Str(String),

    /// A `&x` argument, degraded to the variable's name. Only `scanf`
    /// consumes these.
    Ref(String),
}

/// Everything a native callable may touch during one invocation.
pub struct BuiltinCtx<'a> {
    /// Evaluated arguments, in call order.
    pub args: &'a [Arg],

    /// Interpreter memory; `scanf` stores into caller variables by name.
    pub memory: &'a mut Memory,

    /// Standard output handle.
    pub stdout: &'a mut dyn Write,

    /// Standard input handle.
    pub stdin: &'a mut dyn BufRead,

    /// Source line of the call, for diagnostics.
    pub line: u32,
}

/// The implementations a library binds, keyed by the names the
/// analyzer's surface table exports for it.
pub fn library(name: &str) -> Option<Vec<(&'static str, NativeFn)>> {
    let exports = cwalk_sem::library_exports(name)?;
    Some(exports.iter().map(|&export| (export, resolve(export))).collect())
}

fn resolve(name: &str) -> NativeFn {
    match name {
        "printf" => stdio::printf,
        "scanf" => stdio::scanf,
        "sqrt" => math::sqrt,
        "pow" => math::pow,
        "fabs" => math::fabs,
        "floor" => math::floor,
        "ceil" => math::ceil,
        other => unreachable!("library surface exports unknown native '{}'", other),
    }
}
