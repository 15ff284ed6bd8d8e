use std::fmt;
use std::rc::Rc;

use crate::parser::Node;
use crate::runtime::Environment;

/// Runtime value representation
///
/// Values never change kind once built. Only environment bindings mutate.
#[derive(Debug, Clone)]
pub enum Value {
    // Primitives
    /// Canonical empty value, also the list terminator
    Nil,
    /// Boolean value
    Boolean(bool),
    /// The only numeric kind
    Number(f64),
    /// String value
    String(String),
    /// Quoted symbol name (only produced by `quote`)
    Symbol(String),

    // Aggregates
    /// Two-slot cell; lists are chains of pairs ending in `Nil`
    Pair(Rc<Value>, Rc<Value>),

    /// Closure created by `lambda`
    Procedure(Rc<Procedure>),
}

/// A closure: formal parameters, body forms and the scope it was created in
pub struct Procedure {
    /// Parameter names in call order
    pub params: Vec<String>,
    /// Body forms, evaluated like `begin`
    pub body: Vec<Node>,
    /// Scope active where the `lambda` was evaluated
    pub env: Environment,
}

impl fmt::Debug for Procedure {
    // The captured scope can reach this procedure again; never print it
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Procedure")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl Value {
    /// Creates a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Creates a pair value
    pub fn cons(car: Value, cdr: Value) -> Self {
        Value::Pair(Rc::new(car), Rc::new(cdr))
    }

    /// Builds a `Nil`-terminated list from the given items
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        let items: Vec<Value> = items.into_iter().collect();
        items
            .into_iter()
            .rev()
            .fold(Value::Nil, |tail, head| Value::cons(head, tail))
    }

    /// Converts syntax into data, as `quote` hands it back
    pub fn from_syntax(node: &Node) -> Self {
        match node {
            Node::Number(n) => Value::Number(*n),
            Node::String(s) => Value::String(s.clone()),
            Node::Boolean(b) => Value::Boolean(*b),
            Node::Symbol(name) => Value::Symbol(name.clone()),
            Node::List(items) => Value::list(items.iter().map(Value::from_syntax)),
        }
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Pair(..) => "pair",
            Value::Procedure(_) => "procedure",
        }
    }

    /// Everything except `false` and `nil` is true
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Boolean(false))
    }

    /// Returns the number if this is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns car and cdr if this is a pair
    pub fn as_pair(&self) -> Option<(&Value, &Value)> {
        match self {
            Value::Pair(car, cdr) => Some((&**car, &**cdr)),
            _ => None,
        }
    }

    /// Text as `display` prints it: strings without quotes
    pub fn to_display_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

fn format_number(f: &mut fmt::Formatter, n: f64) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => format_number(f, *n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Symbol(name) => write!(f, "{}", name),
            Value::Pair(car, cdr) => {
                write!(f, "({}", car)?;
                let mut rest: &Value = &**cdr;
                loop {
                    match rest {
                        Value::Nil => break,
                        Value::Pair(car, cdr) => {
                            write!(f, " {}", car)?;
                            rest = &**cdr;
                        }
                        tail => {
                            write!(f, " . {}", tail)?;
                            break;
                        }
                    }
                }
                write!(f, ")")
            }
            Value::Procedure(proc) => write!(f, "<procedure({} params)>", proc.params.len()),
        }
    }
}

// Procedures compare by identity. The cdr chain is walked in a loop.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let (mut left, mut right) = (self, other);
        loop {
            match (left, right) {
                (Value::Pair(a1, d1), Value::Pair(a2, d2)) => {
                    if Rc::ptr_eq(d1, d2) {
                        return a1 == a2;
                    }
                    if a1 != a2 {
                        return false;
                    }
                    left = &**d1;
                    right = &**d2;
                }
                (Value::Nil, Value::Nil) => return true,
                (Value::Boolean(a), Value::Boolean(b)) => return a == b,
                (Value::Number(a), Value::Number(b)) => return a == b,
                (Value::String(a), Value::String(b)) => return a == b,
                (Value::Symbol(a), Value::Symbol(b)) => return a == b,
                (Value::Procedure(a), Value::Procedure(b)) => return Rc::ptr_eq(a, b),
                _ => return false,
            }
        }
    }
}

/// Unlinks pair cells through a worklist so dropping a long or deeply
/// nested list never recurses once per cell
impl Drop for Value {
    fn drop(&mut self) {
        let Value::Pair(car, cdr) = self else {
            return;
        };
        let mut pending = Vec::new();
        detach_pair(car, &mut pending);
        detach_pair(cdr, &mut pending);

        while let Some(cell) = pending.pop() {
            // Shared cells only lose a reference here
            if let Ok(mut value) = Rc::try_unwrap(cell) {
                if let Value::Pair(car, cdr) = &mut value {
                    detach_pair(car, &mut pending);
                    detach_pair(cdr, &mut pending);
                }
            }
        }
    }
}

/// Moves an unshared pair out of `slot`, leaving `nil` behind
fn detach_pair(slot: &mut Rc<Value>, pending: &mut Vec<Rc<Value>>) {
    if Rc::strong_count(slot) == 1 && matches!(**slot, Value::Pair(..)) {
        pending.push(std::mem::replace(slot, Rc::new(Value::Nil)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Nil.type_name(), "nil");
        assert_eq!(Value::Boolean(true).type_name(), "boolean");
        assert_eq!(Value::Number(2.71).type_name(), "number");
        assert_eq!(Value::string("test").type_name(), "string");
        assert_eq!(
            Value::cons(Value::Nil, Value::Nil).type_name(),
            "pair"
        );
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::string("").is_truthy());
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Value::Number(6.0).to_string(), "6");
        assert_eq!(Value::Number(-2.5).to_string(), "-2.5");
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "inf");
    }

    #[test]
    fn test_list_display() {
        let list = Value::list(vec![
            Value::Number(1.0),
            Value::string("a"),
            Value::list(vec![Value::Symbol("b".to_string())]),
        ]);
        assert_eq!(list.to_string(), "(1 \"a\" (b))");
    }

    #[test]
    fn test_improper_pair_display() {
        let pair = Value::cons(
            Value::Number(1.0),
            Value::cons(Value::Number(2.0), Value::Number(3.0)),
        );
        assert_eq!(pair.to_string(), "(1 2 . 3)");
    }

    #[test]
    fn test_display_string_is_raw() {
        assert_eq!(Value::string("hi").to_string(), "\"hi\"");
        assert_eq!(Value::string("hi").to_display_string(), "hi");
    }

    #[test]
    fn test_from_syntax() {
        let node = Node::List(vec![
            Node::Symbol("a".to_string()),
            Node::List(vec![]),
            Node::Number(3.0),
        ]);
        let value = Value::from_syntax(&node);
        assert_eq!(
            value,
            Value::list(vec![
                Value::Symbol("a".to_string()),
                Value::Nil,
                Value::Number(3.0)
            ])
        );
    }

    #[test]
    fn test_procedures_compare_by_identity() {
        let proc = Rc::new(Procedure {
            params: vec!["x".to_string()],
            body: vec![Node::Symbol("x".to_string())],
            env: Environment::new(),
        });
        let same = Value::Procedure(proc.clone());
        let twin = Value::Procedure(Rc::new(Procedure {
            params: vec!["x".to_string()],
            body: vec![Node::Symbol("x".to_string())],
            env: Environment::new(),
        }));
        assert_eq!(Value::Procedure(proc), same);
        assert_ne!(same, twin);
    }

    #[test]
    fn test_long_list_drops_and_compares() {
        let long = Value::list((0..100_000).map(|i| Value::Number(i as f64)));
        let twin = Value::list((0..100_000).map(|i| Value::Number(i as f64)));
        assert_eq!(long, twin);

        let shorter = Value::list((0..99_999).map(|i| Value::Number(i as f64)));
        assert_ne!(long, shorter);

        drop(long);
        drop(twin);
    }

    #[test]
    fn test_deeply_nested_list_drops() {
        let mut nested = Value::Nil;
        for _ in 0..100_000 {
            nested = Value::list(vec![nested]);
        }
        drop(nested);
    }

    #[test]
    fn test_drop_keeps_shared_tail() {
        let tail = Value::list((0..10_000).map(|i| Value::Number(i as f64)));
        let front = Value::cons(Value::Number(-1.0), tail.clone());
        drop(front);
        assert_eq!(tail.as_pair().map(|(car, _)| car.clone()), Some(Value::Number(0.0)));
        assert_eq!(tail.to_string().matches(' ').count(), 9_999);
    }
}
