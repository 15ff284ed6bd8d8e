//! Arithmetic and numeric comparison builtins
//!
//! All arithmetic happens in `f64`. Comparisons are variadic and chain
//! pairwise: `(< a b c)` holds iff `a < b` and `b < c`.

use super::{expect_arity, numbers};
use crate::builtins::{Builtin, BuiltinRegistry};
use crate::error::{Error, Result};
use crate::runtime::Value;

/// Register all numeric builtins
pub fn register(registry: &mut BuiltinRegistry) {
    // Arithmetic
    registry.register(AddBuiltin);
    registry.register(MulBuiltin);
    registry.register(SubBuiltin);
    registry.register(DivBuiltin);

    // Comparison
    registry.register(Comparison::new("=", "Numeric equality", |a, b| a == b));
    registry.register(Comparison::new("<", "Strictly increasing", |a, b| a < b));
    registry.register(Comparison::new(">", "Strictly decreasing", |a, b| a > b));
    registry.register(Comparison::new("<=", "Non-decreasing", |a, b| a <= b));
    registry.register(Comparison::new(">=", "Non-increasing", |a, b| a >= b));

    // Predicates
    registry.register(NumberpBuiltin);
}

// ============================================================================
// Arithmetic
// ============================================================================

/// + - Sum of all arguments (0 with none)
pub struct AddBuiltin;

impl Builtin for AddBuiltin {
    fn name(&self) -> &str {
        "+"
    }

    fn description(&self) -> &str {
        "Sum of all arguments"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        let nums = numbers(self.name(), args)?;
        Ok(Value::Number(nums.iter().sum()))
    }
}

/// * - Product of all arguments (1 with none)
pub struct MulBuiltin;

impl Builtin for MulBuiltin {
    fn name(&self) -> &str {
        "*"
    }

    fn description(&self) -> &str {
        "Product of all arguments"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        let nums = numbers(self.name(), args)?;
        Ok(Value::Number(nums.iter().product()))
    }
}

/// - - Negate one argument, or subtract the rest from the first
pub struct SubBuiltin;

impl Builtin for SubBuiltin {
    fn name(&self) -> &str {
        "-"
    }

    fn description(&self) -> &str {
        "Negation or left-to-right subtraction"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        let nums = numbers(self.name(), args)?;
        match nums.split_first() {
            None => Err(Error::bad_arguments(self.name(), args)),
            Some((first, [])) => Ok(Value::Number(-first)),
            Some((first, rest)) => Ok(Value::Number(rest.iter().fold(*first, |acc, n| acc - n))),
        }
    }
}

/// / - Reciprocal of one argument, or divide the first by the rest
///
/// Division by zero follows IEEE 754 (`inf`, `nan`).
pub struct DivBuiltin;

impl Builtin for DivBuiltin {
    fn name(&self) -> &str {
        "/"
    }

    fn description(&self) -> &str {
        "Reciprocal or left-to-right division"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        let nums = numbers(self.name(), args)?;
        match nums.split_first() {
            None => Err(Error::bad_arguments(self.name(), args)),
            Some((first, [])) => Ok(Value::Number(1.0 / first)),
            Some((first, rest)) => Ok(Value::Number(rest.iter().fold(*first, |acc, n| acc / n))),
        }
    }
}

// ============================================================================
// Comparison
// ============================================================================

/// Variadic pairwise numeric comparison
///
/// Fewer than two arguments is vacuously true, but every argument must still
/// be a number.
pub struct Comparison {
    name: &'static str,
    description: &'static str,
    holds: fn(f64, f64) -> bool,
}

impl Comparison {
    /// Creates a comparison builtin from a pairwise predicate
    pub fn new(name: &'static str, description: &'static str, holds: fn(f64, f64) -> bool) -> Self {
        Comparison {
            name,
            description,
            holds,
        }
    }
}

impl Builtin for Comparison {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        let nums = numbers(self.name, args)?;
        let chained = nums.windows(2).all(|w| (self.holds)(w[0], w[1]));
        Ok(Value::Boolean(chained))
    }
}

// ============================================================================
// Predicates
// ============================================================================

/// number? - Check if value is a number
pub struct NumberpBuiltin;

impl Builtin for NumberpBuiltin {
    fn name(&self) -> &str {
        "number?"
    }

    fn description(&self) -> &str {
        "Check if value is a number"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        expect_arity(self.name(), args, 1)?;
        Ok(Value::Boolean(matches!(args[0], Value::Number(_))))
    }
}
