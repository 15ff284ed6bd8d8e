use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed line: the top-level forms in source order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    /// Forms evaluated one after another against the root scope
    pub forms: Vec<Node>,
}

/// S-expression node
///
/// This is syntax, not runtime data. `quote` turns a node into a
/// [`Value`](crate::runtime::Value) via `Value::from_syntax`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Number literal
    Number(f64),
    /// String literal
    String(String),
    /// `true` / `false`
    Boolean(bool),
    /// Bare name, resolved through the environment when evaluated
    Symbol(String),
    /// Parenthesized group
    List(Vec<Node>),
}

impl Node {
    /// Returns the symbol name if this node is a bare symbol
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Node::Symbol(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Number(n) => write!(f, "{}", n),
            Node::String(s) => write!(f, "{:?}", s),
            Node::Boolean(b) => write!(f, "{}", b),
            Node::Symbol(name) => write!(f, "{}", name),
            Node::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}
