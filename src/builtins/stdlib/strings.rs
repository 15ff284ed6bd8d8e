//! String builtins and conversions
//!
//! Lengths and indices count `char`s, not bytes. Slicing builtins take an
//! integral count where a negative value counts from the other end.

use super::{expect_arity, integer_arg, strings};
use crate::builtins::{Builtin, BuiltinRegistry};
use crate::error::{Error, Result};
use crate::parser::parse_number;
use crate::runtime::Value;

/// Register all string builtins
pub fn register(registry: &mut BuiltinRegistry) {
    // Predicates
    registry.register(StringpBuiltin);
    registry.register(StringEqBuiltin);
    registry.register(TextTest::new("string-start=?", "Prefix test", |s, p| s.starts_with(p)));
    registry.register(TextTest::new("string-end=?", "Suffix test", |s, p| s.ends_with(p)));
    registry.register(TextTest::new("string-match?", "Substring test", |s, p| s.contains(p)));

    // Access
    registry.register(StringLengthBuiltin);
    registry.register(StringAppendBuiltin);
    registry.register(StringIndexBuiltin);
    registry.register(StringFirstBuiltin);
    registry.register(StringLastBuiltin);

    // Conversion
    registry.register(StringValBuiltin);
    registry.register(NumberValBuiltin);
}

// ============================================================================
// Predicates
// ============================================================================

/// string? - Check if value is a string
pub struct StringpBuiltin;

impl Builtin for StringpBuiltin {
    fn name(&self) -> &str {
        "string?"
    }

    fn description(&self) -> &str {
        "Check if value is a string"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        expect_arity(self.name(), args, 1)?;
        Ok(Value::Boolean(matches!(args[0], Value::String(_))))
    }
}

/// string=? - Pairwise string equality
pub struct StringEqBuiltin;

impl Builtin for StringEqBuiltin {
    fn name(&self) -> &str {
        "string=?"
    }

    fn description(&self) -> &str {
        "True when all strings are equal"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        let texts = strings(self.name(), args)?;
        Ok(Value::Boolean(texts.windows(2).all(|w| w[0] == w[1])))
    }
}

/// Two-string test: `(name text pattern)`
pub struct TextTest {
    name: &'static str,
    description: &'static str,
    test: fn(&str, &str) -> bool,
}

impl TextTest {
    pub fn new(name: &'static str, description: &'static str, test: fn(&str, &str) -> bool) -> Self {
        TextTest {
            name,
            description,
            test,
        }
    }
}

impl Builtin for TextTest {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        match strings(self.name, args)?.as_slice() {
            [text, pattern] => Ok(Value::Boolean((self.test)(text, pattern))),
            _ => Err(Error::bad_arguments(self.name, args)),
        }
    }
}

// ============================================================================
// Access
// ============================================================================

/// string-length - Number of characters
pub struct StringLengthBuiltin;

impl Builtin for StringLengthBuiltin {
    fn name(&self) -> &str {
        "string-length"
    }

    fn description(&self) -> &str {
        "Number of characters in a string"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        match args {
            [Value::String(s)] => Ok(Value::Number(s.chars().count() as f64)),
            _ => Err(Error::bad_arguments(self.name(), args)),
        }
    }
}

/// string-append - Concatenate any number of strings
pub struct StringAppendBuiltin;

impl Builtin for StringAppendBuiltin {
    fn name(&self) -> &str {
        "string-append"
    }

    fn description(&self) -> &str {
        "Concatenate strings"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        Ok(Value::String(strings(self.name(), args)?.concat()))
    }
}

/// Splits `(name string integer)` arguments
fn text_and_count<'a>(name: &str, args: &'a [Value]) -> Result<(&'a str, i64)> {
    match args {
        [Value::String(s), Value::Number(_)] => Ok((s, integer_arg(name, args, 1)?)),
        _ => Err(Error::bad_arguments(name, args)),
    }
}

/// string-index - Character at a position, negative counts from the end
pub struct StringIndexBuiltin;

impl Builtin for StringIndexBuiltin {
    fn name(&self) -> &str {
        "string-index"
    }

    fn description(&self) -> &str {
        "Character at an index"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        let (text, index) = text_and_count(self.name(), args)?;
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len() as i64;
        let position = if index < 0 { len + index } else { index };

        if (0..len).contains(&position) {
            Ok(Value::String(chars[position as usize].to_string()))
        } else {
            Err(Error::bad_arguments(self.name(), args))
        }
    }
}

/// Characters kept by `string-first`/`string-last` for a signed count
fn kept_chars(len: usize, count: i64) -> usize {
    let magnitude = usize::try_from(count.unsigned_abs()).unwrap_or(usize::MAX).min(len);
    if count < 0 {
        len - magnitude
    } else {
        magnitude
    }
}

/// string-first - Leading characters
///
/// `(string-first s n)` keeps the first `n` characters; a negative `n` drops
/// `|n|` characters from the end instead.
pub struct StringFirstBuiltin;

impl Builtin for StringFirstBuiltin {
    fn name(&self) -> &str {
        "string-first"
    }

    fn description(&self) -> &str {
        "Leading characters of a string"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        let (text, count) = text_and_count(self.name(), args)?;
        let keep = kept_chars(text.chars().count(), count);
        Ok(Value::String(text.chars().take(keep).collect()))
    }
}

/// string-last - Trailing characters
///
/// Mirror of `string-first`: a negative `n` drops `|n|` characters from the
/// start.
pub struct StringLastBuiltin;

impl Builtin for StringLastBuiltin {
    fn name(&self) -> &str {
        "string-last"
    }

    fn description(&self) -> &str {
        "Trailing characters of a string"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        let (text, count) = text_and_count(self.name(), args)?;
        let len = text.chars().count();
        let keep = kept_chars(len, count);
        Ok(Value::String(text.chars().skip(len - keep).collect()))
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// string-val - Display text of any value
pub struct StringValBuiltin;

impl Builtin for StringValBuiltin {
    fn name(&self) -> &str {
        "string-val"
    }

    fn description(&self) -> &str {
        "Convert a value to its display text"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        expect_arity(self.name(), args, 1)?;
        Ok(Value::String(args[0].to_display_string()))
    }
}

/// number-val - Parse a number out of a string
pub struct NumberValBuiltin;

impl Builtin for NumberValBuiltin {
    fn name(&self) -> &str {
        "number-val"
    }

    fn description(&self) -> &str {
        "Convert a string to a number"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        match args {
            [Value::Number(n)] => Ok(Value::Number(*n)),
            [Value::String(s)] => parse_number(s.trim())
                .map(Value::Number)
                .ok_or_else(|| Error::bad_arguments(self.name(), args)),
            _ => Err(Error::bad_arguments(self.name(), args)),
        }
    }
}
