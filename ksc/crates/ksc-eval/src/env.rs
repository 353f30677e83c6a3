//! Lexical environments.
//!
//! An environment is one scope's binding table plus a link to the
//! enclosing scope, forming a chain from the innermost block out to the
//! globals. Closures hold a reference to the node that was current when
//! their declaration executed, so nodes are shared and reference-counted.

use crate::value::Value;
use ksc_util::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to an environment node.
///
/// A node lives as long as the longest-lived holder: the interpreter while
/// the scope is active, or any function value that captured it.
pub type EnvRef = Rc<RefCell<Environment>>;

/// One scope's bindings plus the enclosing scope.
#[derive(Default)]
pub struct Environment {
    values: FxHashMap<String, Value>,
    parent: Option<EnvRef>,
}

impl Environment {
    /// Creates the root (global) scope.
    pub fn global() -> EnvRef {
        Rc::new(RefCell::new(Environment::default()))
    }

    /// Creates a child scope of `parent`.
    pub fn with_parent(parent: EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            values: FxHashMap::default(),
            parent: Some(parent),
        }))
    }

    /// Creates a binding in this scope, shadowing any outer binding of
    /// the same name.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Looks a name up through the scope chain. The innermost scope that
    /// defines the name wins.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.borrow().get(name))
    }

    /// Rebinds a name in the innermost scope that defines it.
    ///
    /// Returns false when no scope in the chain defines the name;
    /// assignment never creates a binding.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            return true;
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => false,
        }
    }
}
