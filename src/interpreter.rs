//! Line-oriented entry point
//!
//! [`Interpreter`] owns one root scope and one builtin registry and runs the
//! whole pipeline for each line of input:
//!
//! ```text
//! text → SExprScanner → Expander → SExprParser → LispEvaluator → Value
//! ```
//!
//! Independent interpreters share nothing.

use crate::config::InterpreterConfig;
use crate::error::Result;
use crate::lexer::{Expander, SExprScanner};
use crate::parser::{Program, SExprParser};
use crate::runtime::{Environment, LispEvaluator, Value};
use tracing::trace;

/// Name bound in the root scope to the last successful result
pub const LAST_RESULT: &str = "_";

/// Persistent interpreter session
pub struct Interpreter {
    evaluator: LispEvaluator,
}

impl Interpreter {
    /// Creates an interpreter with the standard builtins and no configured
    /// execution limit
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    /// Creates an interpreter with the standard builtins and `config` applied
    pub fn with_config(config: InterpreterConfig) -> Self {
        Interpreter {
            evaluator: LispEvaluator::with_config(&config),
        }
    }

    /// Tokenize, expand and parse `text` without evaluating it
    pub fn parse(text: &str) -> Result<Program> {
        let tokens = SExprScanner::new(text).scan_tokens()?;
        trace!(tokens = tokens.len(), "scanned");
        let tokens = Expander::new(tokens).expand()?;
        trace!(tokens = tokens.len(), "expanded");
        let program = SExprParser::new(tokens).parse()?;
        trace!(forms = program.forms.len(), "parsed");
        Ok(program)
    }

    /// Evaluate every form in `text` against the root scope
    ///
    /// On success the result is also bound to `_` in the root scope. On
    /// failure the first error is returned and `_` keeps its previous value.
    pub fn eval_string(&mut self, text: &str) -> Result<Value> {
        let program = Self::parse(text)?;
        let result = self.evaluator.execute(&program)?;
        self.evaluator.env().define(LAST_RESULT, result.clone());
        Ok(result)
    }

    /// [`Interpreter::eval_string`], printed the way the REPL shows results
    pub fn eval_to_string(&mut self, text: &str) -> Result<String> {
        self.eval_string(text).map(|value| value.to_string())
    }

    /// Sets the recursion guard for subsequent evaluations
    ///
    /// 0 and values above [`crate::MAX_EVAL_DEPTH`] leave that cap in force.
    pub fn set_execution_limit(&mut self, limit: usize) {
        self.evaluator.set_execution_limit(limit);
    }

    /// The limit as last set, before clamping
    pub fn execution_limit(&self) -> usize {
        self.evaluator.execution_limit()
    }

    /// Registers or replaces the builtin called `name`
    ///
    /// # Example
    ///
    /// ```
    /// use tinylisp::{Interpreter, Value};
    ///
    /// let mut interp = Interpreter::new();
    /// interp.set_handler("double", |args| match args {
    ///     [Value::Number(n)] => Ok(Value::Number(n * 2.0)),
    ///     _ => Err(tinylisp::Error::bad_arguments("double", args)),
    /// });
    /// assert_eq!(interp.eval_string("(double 21)").unwrap(), Value::Number(42.0));
    /// ```
    pub fn set_handler<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&[Value]) -> Result<Value> + 'static,
    {
        self.evaluator.registry_mut().register_fn(name, handler);
    }

    /// The persistent root scope
    pub fn env(&self) -> &Environment {
        self.evaluator.env()
    }

    /// The underlying evaluator, for registry or limit access
    pub fn evaluator_mut(&mut self) -> &mut LispEvaluator {
        &mut self.evaluator
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
