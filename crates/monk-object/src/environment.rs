//! Lexical scope chain.
//!
//! An `Environment` is a singly-linked chain of scopes, each owning a
//! mapping from identifier to `Object`. It is cloned by handle, not by
//! value: every closure and macro that captures an `Environment` shares the
//! same underlying `Rc<RefCell<_>>`, so a `let` executed later in an outer
//! scope is visible to a closure created earlier from it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use monk_util::Symbol;

use crate::Object;

struct EnvironmentData {
    store: HashMap<Symbol, Object>,
    outer: Option<Environment>,
}

#[derive(Clone)]
pub struct Environment(Rc<RefCell<EnvironmentData>>);

impl Environment {
    pub fn new() -> Self {
        Environment(Rc::new(RefCell::new(EnvironmentData {
            store: HashMap::new(),
            outer: None,
        })))
    }

    /// A new scope nested inside `self`. Lookups that miss in the new scope
    /// fall through to `self`.
    pub fn new_enclosed(outer: &Environment) -> Self {
        Environment(Rc::new(RefCell::new(EnvironmentData {
            store: HashMap::new(),
            outer: Some(outer.clone()),
        })))
    }

    /// Walks outward from this scope to the root, returning the first
    /// binding found.
    pub fn get(&self, name: Symbol) -> Option<Object> {
        let data = self.0.borrow();
        if let Some(value) = data.store.get(&name) {
            return Some(value.clone());
        }
        data.outer.as_ref().and_then(|outer| outer.get(name))
    }

    /// Always writes into this scope, never an enclosing one - shadowing is
    /// how a nested `let` with the same name behaves.
    pub fn set(&self, name: Symbol, value: Object) {
        self.0.borrow_mut().store.insert(name, value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_falls_through_to_outer_scope() {
        let outer = Environment::new();
        outer.set(Symbol::intern("x"), Object::Integer(5));
        let inner = Environment::new_enclosed(&outer);
        assert_eq!(inner.get(Symbol::intern("x")), Some(Object::Integer(5)));
    }

    #[test]
    fn set_never_escapes_to_outer_scope() {
        let outer = Environment::new();
        let inner = Environment::new_enclosed(&outer);
        inner.set(Symbol::intern("x"), Object::Integer(5));
        assert_eq!(outer.get(Symbol::intern("x")), None);
    }

    #[test]
    fn shared_handle_sees_writes_from_any_clone() {
        let env = Environment::new();
        let captured = env.clone();
        env.set(Symbol::intern("x"), Object::Integer(1));
        assert_eq!(captured.get(Symbol::intern("x")), Some(Object::Integer(1)));
    }
}
