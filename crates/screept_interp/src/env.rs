use std::collections::HashMap;

use screept_ast::ast::{Stmt, Value};

use crate::RuntimeError;

/// The mutable store for one interpreter session: variable bindings,
/// procedure bodies, and accumulated PRINT output.
///
/// `Clone` is the deep-copy operation function application relies on:
/// mutating a clone's `vars`/`procedures` is never observable through
/// the original.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    pub vars: HashMap<String, Value>,
    pub procedures: HashMap<String, Stmt>,
    pub output: Vec<String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name lookups never fall back to a default: a missing name is
    /// always a hard error.
    pub fn lookup_var(&self, name: &str) -> Result<&Value, RuntimeError> {
        self.vars
            .get(name)
            .ok_or_else(|| RuntimeError::new(format!("undefined variable '{}'", name)))
    }

    pub fn lookup_procedure(&self, name: &str) -> Result<&Stmt, RuntimeError> {
        self.procedures
            .get(name)
            .ok_or_else(|| RuntimeError::new(format!("undefined procedure '{}'", name)))
    }
}
