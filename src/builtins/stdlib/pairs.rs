//! Pair and list builtins

use super::expect_arity;
use crate::builtins::{Builtin, BuiltinRegistry};
use crate::error::{Error, Result};
use crate::runtime::Value;

/// Register all pair builtins
pub fn register(registry: &mut BuiltinRegistry) {
    registry.register(ConsBuiltin);
    registry.register(CarBuiltin);
    registry.register(CdrBuiltin);
    registry.register(ListBuiltin);
    registry.register(PairpBuiltin);
    registry.register(NullpBuiltin);
}

/// cons - Build a pair from two values
pub struct ConsBuiltin;

impl Builtin for ConsBuiltin {
    fn name(&self) -> &str {
        "cons"
    }

    fn description(&self) -> &str {
        "Build a pair from two values"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        expect_arity(self.name(), args, 2)?;
        Ok(Value::cons(args[0].clone(), args[1].clone()))
    }
}

/// car - First slot of a pair
pub struct CarBuiltin;

impl Builtin for CarBuiltin {
    fn name(&self) -> &str {
        "car"
    }

    fn description(&self) -> &str {
        "First slot of a pair"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        match args {
            [Value::Pair(car, _)] => Ok((**car).clone()),
            _ => Err(Error::bad_arguments(self.name(), args)),
        }
    }
}

/// cdr - Second slot of a pair
pub struct CdrBuiltin;

impl Builtin for CdrBuiltin {
    fn name(&self) -> &str {
        "cdr"
    }

    fn description(&self) -> &str {
        "Second slot of a pair"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        match args {
            [Value::Pair(_, cdr)] => Ok((**cdr).clone()),
            _ => Err(Error::bad_arguments(self.name(), args)),
        }
    }
}

/// list - Nil-terminated chain of pairs holding the arguments
pub struct ListBuiltin;

impl Builtin for ListBuiltin {
    fn name(&self) -> &str {
        "list"
    }

    fn description(&self) -> &str {
        "Build a list from the arguments"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        Ok(Value::list(args.iter().cloned()))
    }
}

/// pair? - Check if value is a pair
pub struct PairpBuiltin;

impl Builtin for PairpBuiltin {
    fn name(&self) -> &str {
        "pair?"
    }

    fn description(&self) -> &str {
        "Check if value is a pair"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        expect_arity(self.name(), args, 1)?;
        Ok(Value::Boolean(matches!(args[0], Value::Pair(..))))
    }
}

/// null? - Check if value is nil
pub struct NullpBuiltin;

impl Builtin for NullpBuiltin {
    fn name(&self) -> &str {
        "null?"
    }

    fn description(&self) -> &str {
        "Check if value is nil"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        expect_arity(self.name(), args, 1)?;
        Ok(Value::Boolean(matches!(args[0], Value::Nil)))
    }
}
