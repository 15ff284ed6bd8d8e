//! Output builtins

use crate::builtins::{Builtin, BuiltinRegistry};
use crate::error::Result;
use crate::runtime::Value;
use std::cell::RefCell;
use std::io::{self, Write};
use tracing::warn;

/// Register all I/O builtins
pub fn register(registry: &mut BuiltinRegistry) {
    registry.register(DisplayBuiltin::stdout());
}

/// display - Print arguments separated by spaces, then a newline
///
/// Strings print without quotes. Write failures are logged and otherwise
/// ignored; `display` always returns `nil`.
pub struct DisplayBuiltin {
    out: RefCell<Box<dyn Write>>,
}

impl DisplayBuiltin {
    /// Writes to the process's standard output
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    /// Writes to any sink, e.g. a buffer under test
    pub fn with_writer(out: Box<dyn Write>) -> Self {
        DisplayBuiltin {
            out: RefCell::new(out),
        }
    }
}

impl Builtin for DisplayBuiltin {
    fn name(&self) -> &str {
        "display"
    }

    fn description(&self) -> &str {
        "Print values to standard output"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        let line = args
            .iter()
            .map(Value::to_display_string)
            .collect::<Vec<_>>()
            .join(" ");

        let mut out = self.out.borrow_mut();
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            warn!("display: write failed: {}", e);
        }
        Ok(Value::Nil)
    }
}
