//! Parser Module
//!
//! Builds S-expression trees from the expanded token stream.

mod ast;
mod sexpr_parser;

pub use ast::{Node, Program};
pub use sexpr_parser::{parse_number, SExprParser};
