//! Lexical scope stack used by the checker

use crate::config::compile_time::semantic::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Declared with a type keyword
    Typed(String),
    /// Introduced by plain assignment
    Variable,
    Parameter,
    LoopVariable,
    Function,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub line: u32,
}

#[derive(Debug, Default, Clone)]
struct Scope {
    symbols: HashMap<String, Symbol>,
}

/// Why a declaration was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclareError {
    AlreadyDeclared,
    ScopeFull,
}

/// Innermost scope last; the global scope is never popped
#[derive(Debug, Clone)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
    declared_total: usize,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
            declared_total: 0,
        }
    }

    /// Number of scopes above the global one
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn push(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn declare(&mut self, symbol: Symbol) -> Result<(), DeclareError> {
        let Some(scope) = self.scopes.last_mut() else {
            return Err(DeclareError::ScopeFull);
        };
        if scope.symbols.contains_key(&symbol.name) {
            return Err(DeclareError::AlreadyDeclared);
        }
        if scope.symbols.len() >= MAX_SYMBOLS_PER_SCOPE {
            return Err(DeclareError::ScopeFull);
        }
        scope.symbols.insert(symbol.name.clone(), symbol);
        self.declared_total += 1;
        Ok(())
    }

    /// Innermost visible symbol
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.symbols.get(name))
    }

    pub fn declared_here(&self, name: &str) -> bool {
        self.scopes
            .last()
            .is_some_and(|scope| scope.symbols.contains_key(name))
    }

    pub fn declared_total(&self) -> usize {
        self.declared_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(name: &str) -> Symbol {
        Symbol {
            name: name.to_string(),
            kind: SymbolKind::Variable,
            line: 1,
        }
    }

    #[test]
    fn test_shadowing_and_pop() {
        let mut scopes = ScopeStack::new();
        scopes.declare(symbol("x")).unwrap();
        scopes.push();
        assert!(!scopes.declared_here("x"));
        assert!(scopes.lookup("x").is_some());

        scopes.declare(symbol("x")).unwrap();
        scopes.declare(symbol("y")).unwrap();
        assert_eq!(scopes.declare(symbol("y")), Err(DeclareError::AlreadyDeclared));

        scopes.pop();
        assert!(scopes.lookup("y").is_none());
        assert_eq!(scopes.depth(), 0);
        scopes.pop();
        assert_eq!(scopes.depth(), 0);
        assert_eq!(scopes.declared_total(), 3);
    }
}
