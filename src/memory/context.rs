//! Variable bindings
//!
//! [`Context`] is a stack of scopes, each a name → [`Value`] map. Lookup walks
//! from the innermost scope outwards; the outermost scope is the global one
//! and is never popped.
//!
//! [`Location`] is the assignable view of one name, handed out by
//! [`Context::locate`] for assignment and increment/decrement.

use super::value::Value;
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::SourceLocation;
use rustc_hash::FxHashMap;

/// Scope chain with global fallback
#[derive(Debug, Clone)]
pub struct Context {
    scopes: Vec<FxHashMap<String, Value>>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Context {
            scopes: vec![FxHashMap::default()],
        }
    }

    /// Look a name up, innermost scope first
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Overwrite an existing binding; returns false if the name is unbound
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(name) {
                *slot = value;
                return true;
            }
        }
        false
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Bind in the innermost scope, shadowing any outer binding
    pub fn define_local(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    /// Bind in the outermost scope
    pub fn define_global(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.first_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Drop the innermost scope. The global scope stays.
    pub fn pop_scope(&mut self) -> bool {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            true
        } else {
            false
        }
    }

    /// Number of scopes, including the global one
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Names bound in the global scope, sorted
    pub fn global_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .scopes
            .first()
            .map(|scope| scope.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    pub fn locate<'a>(&'a mut self, name: &'a str, location: SourceLocation) -> Location<'a> {
        Location {
            context: self,
            name,
            location,
        }
    }
}

/// Assignable reference to one variable
pub struct Location<'a> {
    context: &'a mut Context,
    name: &'a str,
    location: SourceLocation,
}

impl Location<'_> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn get(&self) -> Result<Value, RuntimeError> {
        self.context
            .get(self.name)
            .cloned()
            .ok_or_else(|| self.unbound())
    }

    /// Store `value` and return it
    pub fn set(&mut self, value: Value) -> Result<Value, RuntimeError> {
        if self.context.set(self.name, value.clone()) {
            Ok(value)
        } else {
            Err(self.unbound())
        }
    }

    fn unbound(&self) -> RuntimeError {
        RuntimeError::UndefinedVariable {
            name: self.name.to_string(),
            location: self.location,
        }
    }
}
