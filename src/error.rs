//! Error types for the tinylisp interpreter

use thiserror::Error;

/// Interpreter errors
///
/// Every error aborts the evaluation that raised it. None of them poison the
/// interpreter: the environment and builtin registry stay usable for the next
/// line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Reader / parser errors
    /// Malformed or unbalanced source text
    ///
    /// **Triggered by:** missing or stray parentheses, unterminated strings
    /// **Example:** `(+ 1 2` (missing closing parenthesis)
    #[error("Syntax error at line {line}, column {col}: {message}")]
    SyntaxError {
        /// Line number where error occurred
        line: usize,
        /// Column number where error occurred
        col: usize,
        /// Error description
        message: String,
    },

    /// Shorthand syntax not followed by a datum
    ///
    /// **Triggered by:** a quote mark with nothing quotable after it
    /// **Example:** `(list 1 ')`
    #[error("Malformed syntax at line {line}, column {col}: {message}")]
    MalformedSyntax {
        /// Line number where error occurred
        line: usize,
        /// Column number where error occurred
        col: usize,
        /// Error description
        message: String,
    },

    // Runtime errors
    /// Wrong arity or shape for a special form
    ///
    /// **Example:** `(quote a b)`, `(define 1 2)`, `(lambda (x))`
    #[error("Ill-formed special form: {form}")]
    IllFormedSpecialForm {
        /// The offending form, printed back as source
        form: String,
    },

    /// Symbol lookup or `set!` target not found on the scope chain
    ///
    /// **Prevention:** define variables with `(define x value)` before use
    #[error("Unbound variable: {name}")]
    UnboundVariable {
        /// Variable name
        name: String,
    },

    /// Attempt to invoke something that is neither a procedure nor a builtin
    #[error("The object {value} is not applicable")]
    NotApplicable {
        /// Printed form of the value in operator position
        value: String,
    },

    /// Procedure called with the wrong number of arguments
    #[error("Arity mismatch: expected {expected} arguments, got {got}")]
    ArityMismatch {
        /// Number of formal parameters
        expected: usize,
        /// Number of arguments supplied
        got: usize,
    },

    /// Builtin received arguments of the wrong kind or count
    ///
    /// **Example:** `(+ 1 "a")`, `(car 5)`
    #[error("Badly formatted arguments for {builtin}: {received}")]
    BadArguments {
        /// Builtin name
        builtin: String,
        /// Printed form of the arguments received
        received: String,
    },

    // Resource errors
    /// Evaluation depth guard tripped
    #[error("Execution limit exceeded (max depth: {limit})")]
    ExecutionLimitExceeded {
        /// Configured maximum depth
        limit: usize,
    },
}

impl Error {
    /// Builds a [`Error::BadArguments`] from the received argument list
    pub fn bad_arguments(builtin: &str, received: &[crate::runtime::Value]) -> Self {
        let rendered: Vec<String> = received.iter().map(|v| v.to_string()).collect();
        Error::BadArguments {
            builtin: builtin.to_string(),
            received: format!("[{}]", rendered.join(" ")),
        }
    }

    /// True for errors raised before evaluation started (reading, expanding, parsing)
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Error::SyntaxError { .. } | Error::MalformedSyntax { .. }
        )
    }
}

/// Result type for tinylisp operations
pub type Result<T> = std::result::Result<T, Error>;
