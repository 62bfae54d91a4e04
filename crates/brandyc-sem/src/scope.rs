//! The scope-table stack used by the fill and resolve passes.

use brandyc_util::{Name, SymbolId, TableId};

use crate::symbol::Symbols;

/// A stack of symbol tables reflecting lexical nesting, with the
/// builtin table at the bottom.
pub struct ScopeStack {
    tables: Vec<TableId>,
}

impl ScopeStack {
    /// Create a stack holding only the builtin table.
    pub fn new(builtins: TableId) -> Self {
        Self {
            tables: vec![builtins],
        }
    }

    /// Enter a scope.
    pub fn push(&mut self, table: TableId) {
        self.tables.push(table);
    }

    /// Leave the current scope.
    pub fn pop(&mut self) {
        debug_assert!(self.tables.len() > 1, "cannot pop the builtin table");
        self.tables.pop();
    }

    /// The innermost table.
    pub fn innermost(&self) -> TableId {
        *self.tables.last().expect("scope stack is never empty")
    }

    /// Resolve a name from the innermost scope outward.
    pub fn resolve(&self, symbols: &Symbols, name: Name) -> Option<SymbolId> {
        self.tables
            .iter()
            .rev()
            .find_map(|&table| symbols.table(table).get(name))
    }

    /// True when the name is bound in any table on the stack, used by
    /// the implicit-declaration check.
    pub fn resolves_anywhere(&self, symbols: &Symbols, name: Name) -> bool {
        self.resolve(symbols, name).is_some()
    }
}
