//! # tinylisp - A small embeddable Lisp
//!
//! An interpreter for a minimal Lisp dialect, meant to be embedded as an
//! expression evaluator for scripting or configuration logic.
//!
//! ## Quick Start
//!
//! ```rust
//! use tinylisp::{Interpreter, Value};
//!
//! # fn main() -> tinylisp::Result<()> {
//! let mut interp = Interpreter::new();
//!
//! interp.eval_string("(define square (lambda (x) (* x x)))")?;
//! let result = interp.eval_string("(square 12)")?;
//! assert_eq!(result, Value::Number(144.0));
//!
//! // The last successful result is bound to `_`
//! assert_eq!(interp.eval_string("(+ _ 1)")?, Value::Number(145.0));
//! # Ok(())
//! # }
//! ```
//!
//! ### Driving the stages by hand
//!
//! ```rust
//! use tinylisp::{Evaluator, Expander, Parser, Scanner, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tokens = Scanner::new("(car '(a b c))").scan_tokens()?;
//! let tokens = Expander::new(tokens).expand()?;
//! let program = Parser::new(tokens).parse()?;
//!
//! let mut evaluator = Evaluator::new();
//! let result = evaluator.execute(&program)?;
//! assert_eq!(result, Value::Symbol("a".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! ## Language Overview
//!
//! ### Data Types
//!
//! - **Primitives**: numbers (always `f64`), strings, `true`/`false`, `nil`
//! - **Pairs**: `(cons 1 2)`; lists are pairs chained to `nil`
//! - **Procedures**: closures made by `lambda`
//! - **Symbols**: only as data, via `quote` or `'`
//!
//! ### Special Forms
//!
//! - `(quote x)` / `'x` - `x` as data
//! - `(define name value)` - Bind in the current scope
//! - `(set! name value)` - Overwrite an existing binding
//! - `(if cond then else)` - Only `false` and `nil` are false
//! - `(begin a b ...)` - Sequence
//! - `(lambda (params...) body...)` - Closure
//!
//! ### Built-in Procedures
//!
//! - **Arithmetic**: `+ - * /`
//! - **Comparison**: `= < > <= >=` (variadic, chained)
//! - **Pairs**: `cons car cdr list pair? null?`
//! - **Strings**: `string? string=? string-length string-append string-start=?
//!   string-end=? string-match? string-index string-first string-last`
//! - **Conversion**: `string-val number-val number?`
//! - **Output**: `display`
//!
//! New builtins are added with [`Interpreter::set_handler`].
//!
//! ## Error Handling
//!
//! Every stage returns [`Result`]. An error aborts the current line only:
//!
//! ```rust
//! # use tinylisp::{Error, Interpreter, Value};
//! let mut interp = Interpreter::new();
//! assert!(matches!(
//!     interp.eval_string("(+ 1 \"a\")"),
//!     Err(Error::BadArguments { .. })
//! ));
//! assert_eq!(interp.eval_string("(+ 1 2)").unwrap(), Value::Number(3.0));
//! ```
//!
//! Runaway recursion is caught by the execution limit rather than the host
//! stack. The limit never rises above [`MAX_EVAL_DEPTH`], so a limit of 0 or
//! one larger than that cap still fails cleanly:
//!
//! ```rust
//! # use tinylisp::{Error, Interpreter};
//! let mut interp = Interpreter::new();
//! interp.set_execution_limit(100);
//! interp.eval_string("(define forever (lambda () (forever)))").unwrap();
//! assert!(matches!(
//!     interp.eval_string("(forever)"),
//!     Err(Error::ExecutionLimitExceeded { limit: 100 })
//! ));
//!
//! interp.set_execution_limit(0);
//! assert!(matches!(
//!     interp.eval_string("(forever)"),
//!     Err(Error::ExecutionLimitExceeded { .. })
//! ));
//! ```
//!
//! Source nested deeper than [`MAX_PARSE_DEPTH`] is rejected by the reader.
//!
//! ## Logging
//!
//! The crate logs through `tracing` and installs no subscriber.

// Module declarations
/// Version of the tinylisp interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum nesting of groups and quotes the reader accepts
pub const MAX_PARSE_DEPTH: usize = 128;

/// Hard ceiling on nested form evaluations, whatever the configured limit.
/// Keeps evaluation within a 2 MiB thread stack; set above the parse depth so
/// any readable form can still be evaluated.
pub const MAX_EVAL_DEPTH: usize = 256;

pub mod builtins;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod runtime;

// Re-export main types
pub use builtins::{Builtin, BuiltinRegistry};
pub use config::InterpreterConfig;
pub use error::{Error, Result};
pub use interpreter::Interpreter;
pub use lexer::{Expander, SExprScanner, Token, TokenKind};
pub use parser::{Node, Program, SExprParser};
pub use runtime::{Environment, LispEvaluator, Procedure, Value};

// Convenient type aliases for the pipeline stages
/// Type alias for the S-expression scanner (lexer).
/// Converts raw source text into tokens.
pub type Scanner = SExprScanner;

/// Type alias for the S-expression parser.
/// Converts expanded tokens into a [`Program`].
pub type Parser = SExprParser;

/// Type alias for the LISP evaluator.
/// Executes a [`Program`] and produces runtime values.
pub type Evaluator = LispEvaluator;
