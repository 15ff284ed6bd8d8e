use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::runtime::Value;

/// Environment for variable scoping
///
/// A handle to one scope in a chain of scopes. Cloning the handle shares the
/// scope; closures keep the scope they were created in alive this way.
///
/// A closure stored in the scope it captured forms an `Rc` cycle that is
/// never reclaimed. Scopes are small and an interpreter lives for the
/// process, so this leak is accepted.
#[derive(Clone)]
pub struct Environment {
    scope: Rc<Scope>,
}

/// Single scope in the environment
struct Scope {
    /// Variables defined in this scope
    variables: RefCell<HashMap<String, Value>>,
    /// Enclosing scope (None for the root scope)
    parent: Option<Environment>,
}

impl Environment {
    /// Creates a new root scope
    pub fn new() -> Self {
        Environment {
            scope: Rc::new(Scope {
                variables: RefCell::new(HashMap::new()),
                parent: None,
            }),
        }
    }

    /// Creates a new empty scope whose parent is `self`
    pub fn child(&self) -> Self {
        Environment {
            scope: Rc::new(Scope {
                variables: RefCell::new(HashMap::new()),
                parent: Some(self.clone()),
            }),
        }
    }

    /// Defines (or overwrites) a variable in this scope only
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.scope.variables.borrow_mut().insert(name.into(), value);
    }

    /// Gets the value of a variable, searching outward from this scope
    pub fn get(&self, name: &str) -> Result<Value> {
        self.lookup(name).ok_or_else(|| Error::UnboundVariable {
            name: name.to_string(),
        })
    }

    /// Like [`Environment::get`] but without building an error
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut env = self;
        loop {
            if let Some(val) = env.scope.variables.borrow().get(name) {
                return Some(val.clone());
            }
            match &env.scope.parent {
                Some(parent) => env = parent,
                None => return None,
            }
        }
    }

    /// Overwrites the nearest existing binding of `name`
    ///
    /// Fails with `UnboundVariable` when no scope on the chain binds it.
    pub fn set(&self, name: &str, value: Value) -> Result<()> {
        let mut env = self;
        loop {
            if let Some(slot) = env.scope.variables.borrow_mut().get_mut(name) {
                *slot = value;
                return Ok(());
            }
            match &env.scope.parent {
                Some(parent) => env = parent,
                None => {
                    return Err(Error::UnboundVariable {
                        name: name.to_string(),
                    })
                }
            }
        }
    }

    /// Checks if a variable exists in any scope on the chain
    pub fn exists(&self, name: &str) -> bool {
        self.scope_of(name).is_some()
    }

    /// Returns the scope that binds `name`, if any
    fn scope_of(&self, name: &str) -> Option<&Environment> {
        let mut env = self;
        loop {
            if env.scope.variables.borrow().contains_key(name) {
                return Some(env);
            }
            env = env.scope.parent.as_ref()?;
        }
    }

    /// Returns the number of scopes from here to the root (1 for the root)
    pub fn scope_depth(&self) -> usize {
        let mut depth = 1;
        let mut env = self;
        while let Some(parent) = &env.scope.parent {
            depth += 1;
            env = parent;
        }
        depth
    }

    /// Names bound directly in this scope, sorted
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scope.variables.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// True when both handles point at the same scope
    pub fn same_scope(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.scope, &other.scope)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    // Bindings may hold closures over this very scope, so only names are shown
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Environment")
            .field("names", &self.local_names())
            .field("depth", &self.scope_depth())
            .finish()
    }
}
