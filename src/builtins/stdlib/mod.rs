//! Standard library builtins

pub mod io;
pub mod numeric;
pub mod pairs;
pub mod strings;

use crate::builtins::BuiltinRegistry;
use crate::error::{Error, Result};
use crate::runtime::Value;

/// Register all standard library builtins
pub fn register_all(registry: &mut BuiltinRegistry) {
    numeric::register(registry);
    pairs::register(registry);
    strings::register(registry);
    io::register(registry);
}

// ============================================================================
// Argument helpers shared by the handlers
// ============================================================================

/// Fails unless exactly `count` arguments were passed
pub(crate) fn expect_arity(name: &str, args: &[Value], count: usize) -> Result<()> {
    if args.len() == count {
        Ok(())
    } else {
        Err(Error::bad_arguments(name, args))
    }
}

/// Every argument as a number, or `BadArguments`
pub(crate) fn numbers(name: &str, args: &[Value]) -> Result<Vec<f64>> {
    args.iter()
        .map(|v| v.as_number().ok_or_else(|| Error::bad_arguments(name, args)))
        .collect()
}

/// Every argument as a string slice, or `BadArguments`
pub(crate) fn strings<'a>(name: &str, args: &'a [Value]) -> Result<Vec<&'a str>> {
    args.iter()
        .map(|v| v.as_str().ok_or_else(|| Error::bad_arguments(name, args)))
        .collect()
}

/// Argument `index` as a whole number usable for slicing
pub(crate) fn integer_arg(name: &str, args: &[Value], index: usize) -> Result<i64> {
    match args.get(index).and_then(Value::as_number) {
        Some(n) if n.fract() == 0.0 && n.abs() <= i64::MAX as f64 => Ok(n as i64),
        _ => Err(Error::bad_arguments(name, args)),
    }
}
