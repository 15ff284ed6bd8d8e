//! Lexical analysis
//!
//! Converts source text into a stream of tokens, then rewrites reader
//! shorthand (`'x`) into canonical forms.

mod expander;
mod sexpr_scanner;
mod token;

pub use expander::Expander;
pub use sexpr_scanner::SExprScanner;
pub use token::{Token, TokenKind};
