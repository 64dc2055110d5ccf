//! Symbol table: a stack of lexical scopes.

use cwalk_par::CType;
use indexmap::IndexMap;

/// What a name is bound to.
#[derive(Clone, Debug, PartialEq)]
pub enum Symbol {
    /// A declared variable and its declared type.
    Variable { ty: CType },

    /// A function declared in the program.
    Function { ret_type: CType, arity: usize },

    /// A native callable bound by an include.
    Builtin,
}

/// A stack of name-to-symbol scopes, innermost last.
///
/// The bottom scope is the global scope and is never popped. Maps are
/// ordered so that diagnostics and iteration follow declaration order.
pub struct SymbolTable {
    scopes: Vec<IndexMap<String, Symbol>>,
}

impl SymbolTable {
    /// Creates a table holding only the global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![IndexMap::new()],
        }
    }

    /// Pushes a fresh innermost scope.
    pub fn enter_scope(&mut self) {
        self.scopes.push(IndexMap::new());
    }

    /// Pops the innermost scope. The global scope stays.
    pub fn exit_scope(&mut self) {
        debug_assert!(self.scopes.len() > 1, "cannot exit the global scope");
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declares `name` in the innermost scope.
    ///
    /// Returns false when the name is already declared in that same
    /// scope (shadowing an outer scope is fine).
    pub fn declare(&mut self, name: &str, symbol: Symbol) -> bool {
        let scope = self.scopes.last_mut().expect("scope stack is never empty");
        if scope.contains_key(name) {
            return false;
        }
        scope.insert(name.to_string(), symbol);
        true
    }

    /// Looks `name` up, innermost scope first.
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Looks `name` up in the innermost scope only.
    pub fn resolve_local(&self, name: &str) -> Option<&Symbol> {
        self.scopes.last().and_then(|scope| scope.get(name))
    }

    /// Number of live scopes, global included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
