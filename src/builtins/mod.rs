//! Builtin procedures
//!
//! Provides the registry the evaluator dispatches native operators through.

pub mod stdlib;

use crate::error::Result;
use crate::runtime::Value;
use std::collections::HashMap;
use std::rc::Rc;

/// Builtin trait - every native procedure implements this
///
/// Handlers receive already-evaluated arguments and validate count and kinds
/// themselves, reporting any mismatch as `Error::BadArguments`.
pub trait Builtin {
    /// Operator name as written in source (`+`, `string-append`, ...)
    fn name(&self) -> &str;

    /// Builtin description
    fn description(&self) -> &str;

    /// Execute the builtin
    fn execute(&self, args: &[Value]) -> Result<Value>;
}

/// Boxed handler closure accepted by [`BuiltinRegistry::register_fn`]
pub type Handler = dyn Fn(&[Value]) -> Result<Value>;

/// Adapts a plain closure to the [`Builtin`] trait
pub struct FnBuiltin {
    name: String,
    handler: Box<Handler>,
}

impl FnBuiltin {
    /// Wraps `handler` under `name`
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + 'static,
    {
        FnBuiltin {
            name: name.into(),
            handler: Box::new(handler),
        }
    }
}

impl Builtin for FnBuiltin {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "User-registered handler"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        (self.handler)(args)
    }
}

/// Builtin registry
#[derive(Clone)]
pub struct BuiltinRegistry {
    builtins: HashMap<String, Rc<dyn Builtin>>,
}

impl BuiltinRegistry {
    /// Create new registry with standard library
    pub fn new() -> Self {
        let mut registry = BuiltinRegistry {
            builtins: HashMap::new(),
        };

        stdlib::register_all(&mut registry);

        registry
    }

    /// Create empty registry (for testing)
    pub fn empty() -> Self {
        BuiltinRegistry {
            builtins: HashMap::new(),
        }
    }

    /// Register a builtin, replacing any previous one with the same name
    pub fn register<T: Builtin + 'static>(&mut self, builtin: T) {
        let name = builtin.name().to_string();
        self.builtins.insert(name, Rc::new(builtin));
    }

    /// Register a closure as a builtin
    pub fn register_fn<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&[Value]) -> Result<Value> + 'static,
    {
        self.register(FnBuiltin::new(name, handler));
    }

    /// Get builtin by exact name
    pub fn get(&self, name: &str) -> Option<Rc<dyn Builtin>> {
        self.builtins.get(name).cloned()
    }

    /// Check if builtin exists
    pub fn has(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    /// List all builtin names
    pub fn list_builtins(&self) -> Vec<String> {
        let mut names: Vec<_> = self.builtins.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get builtin count
    pub fn count(&self) -> usize {
        self.builtins.len()
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct TestBuiltin;

    impl Builtin for TestBuiltin {
        fn name(&self) -> &str {
            "test"
        }

        fn description(&self) -> &str {
            "A test builtin"
        }

        fn execute(&self, args: &[Value]) -> Result<Value> {
            if args.is_empty() {
                Ok(Value::Number(42.0))
            } else {
                Ok(args[0].clone())
            }
        }
    }

    #[test]
    fn test_builtin_registration() {
        let mut registry = BuiltinRegistry::empty();
        registry.register(TestBuiltin);

        assert!(registry.has("test"));
        assert!(!registry.has("TEST"));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_builtin_execution() {
        let builtin = TestBuiltin;
        assert_eq!(builtin.execute(&[]).unwrap(), Value::Number(42.0));
        assert_eq!(
            builtin.execute(&[Value::string("hello")]).unwrap(),
            Value::string("hello")
        );
    }

    #[test]
    fn test_register_fn_overrides() {
        let mut registry = BuiltinRegistry::new();
        registry.register_fn("+", |args| Err(Error::bad_arguments("+", args)));

        let plus = registry.get("+").unwrap();
        assert!(plus.execute(&[Value::Number(1.0)]).is_err());
        assert_eq!(plus.description(), "User-registered handler");
    }

    #[test]
    fn test_standard_library_is_registered() {
        let registry = BuiltinRegistry::new();
        for name in [
            "+",
            "-",
            "*",
            ">",
            "<",
            ">=",
            "<=",
            "display",
            "cons",
            "car",
            "cdr",
            "string-val",
            "number-val",
            "string?",
            "string=?",
            "string-length",
            "string-append",
            "string-start=?",
            "string-end=?",
            "string-match?",
            "string-index",
            "string-first",
            "string-last",
        ] {
            assert!(registry.has(name), "missing builtin {}", name);
        }
    }
}
